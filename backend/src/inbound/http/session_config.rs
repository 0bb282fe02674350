//! Cookie-session settings read from the environment.
//!
//! Release builds insist on explicit, valid values for every toggle; debug
//! builds fall back to defaults with a warning so local runs need no setup.
//!
//! | variable | meaning |
//! |---|---|
//! | `SESSION_KEY_FILE` | path to at least 64 bytes of key material |
//! | `SESSION_COOKIE_SECURE` | mark the cookie `Secure` |
//! | `SESSION_SAMESITE` | `Strict`, `Lax` or `None` |
//! | `SESSION_ALLOW_EPHEMERAL` | allow a generated key when the file is missing |
//! | `SESSION_TTL_HOURS` | dashboard session lifetime, default 12 |

use std::path::PathBuf;

use actix_session::config::PersistentSession;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite, time::Duration};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/voice_orders_session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
pub const SESSION_COOKIE_NAME: &str = "voice_orders_session";
const DEFAULT_TTL_HOURS: i64 = 12;
const MAX_TTL_HOURS: i64 = 24 * 30;

const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const TTL_HOURS_ENV: &str = "SESSION_TTL_HOURS";

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";
const TTL_EXPECTED: &str = "1..=720";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Defaults with warnings.
    Debug,
    /// Explicit values required.
    Release,
}

impl BuildMode {
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Validated cookie-session settings.
#[derive(Clone)]
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
    pub ttl: Duration,
}

impl SessionSettings {
    /// Session middleware using these settings.
    pub fn middleware(&self) -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name(SESSION_COOKIE_NAME.to_owned())
            .cookie_path("/".to_owned())
            .cookie_secure(self.cookie_secure)
            .cookie_http_only(true)
            .cookie_same_site(self.same_site)
            .session_lifecycle(PersistentSession::default().session_ttl(self.ttl))
            .build()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Read and validate session settings.
///
/// # Examples
///
/// ```rust
/// use mockable::MockEnv;
/// use voice_orders::inbound::http::session_config::{BuildMode, session_settings_from_env};
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|_| None);
/// let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");
/// assert!(settings.cookie_secure);
/// assert_eq!(settings.ttl.whole_hours(), 12);
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = bool_from_env(env, mode, COOKIE_SECURE_ENV, true)?;
    let same_site = same_site_from_env(env, mode, cookie_secure)?;
    let allow_ephemeral = bool_from_env(env, mode, ALLOW_EPHEMERAL_ENV, false)?;
    if allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = session_key_from_env(env, mode, allow_ephemeral)?;
    let ttl = ttl_from_env(env, mode)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
        ttl,
    })
}

/// Debug builds log and fall back; release builds surface `error`.
fn fallback_or_error<T>(
    mode: BuildMode,
    fallback: T,
    error: SessionConfigError,
) -> Result<T, SessionConfigError> {
    if mode.is_debug() {
        warn!(%error, "session setting falls back to its default");
        Ok(fallback)
    } else {
        Err(error)
    }
}

fn bool_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    default_value: bool,
) -> Result<bool, SessionConfigError> {
    let Some(value) = env.string(name) else {
        return fallback_or_error(mode, default_value, SessionConfigError::MissingEnv { name });
    };
    match parse_bool(&value) {
        Some(flag) => Ok(flag),
        None => fallback_or_error(
            mode,
            default_value,
            SessionConfigError::InvalidEnv {
                name,
                value,
                expected: BOOL_EXPECTED,
            },
        ),
    }
}

fn same_site_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default_same_site = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    let Some(value) = env.string(SAMESITE_ENV) else {
        return fallback_or_error(
            mode,
            default_same_site,
            SessionConfigError::MissingEnv { name: SAMESITE_ENV },
        );
    };
    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => fallback_or_error(
            mode,
            SameSite::None,
            SessionConfigError::InsecureSameSiteNone,
        ),
        _ => fallback_or_error(
            mode,
            default_same_site,
            SessionConfigError::InvalidEnv {
                name: SAMESITE_ENV,
                value,
                expected: SAMESITE_EXPECTED,
            },
        ),
    }
}

fn ttl_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Duration, SessionConfigError> {
    let default_ttl = Duration::hours(DEFAULT_TTL_HOURS);
    // Unlike the other toggles the lifetime has a safe default in every build.
    let Some(value) = env.string(TTL_HOURS_ENV) else {
        return Ok(default_ttl);
    };
    match value.trim().parse::<i64>() {
        Ok(hours) if (1..=MAX_TTL_HOURS).contains(&hours) => Ok(Duration::hours(hours)),
        _ => fallback_or_error(
            mode,
            default_ttl,
            SessionConfigError::InvalidEnv {
                name: TTL_HOURS_ENV,
                value,
                expected: TTL_EXPECTED,
            },
        ),
    }
}

fn session_key_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned()),
    );

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if length < SESSION_KEY_MIN_LEN && !mode.is_debug() {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead { path, source }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
