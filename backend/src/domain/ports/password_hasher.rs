//! Driven port for password hashing.
//!
//! Hashing is CPU-bound and synchronous; services run it on the blocking
//! pool through [`TraceId::spawn_blocking`](crate::domain::TraceId::spawn_blocking).

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Failures raised by hashing adapters.
    pub enum PasswordHashError {
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash is not in a recognised format.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Whether `password` matches `hash`.
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError>;
}
