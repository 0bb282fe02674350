//! Role guards used by the admin and business handlers.
//!
//! A session only proves who signed in. The guards re-resolve the account on
//! every request. A deleted account or a changed role ends the session; a
//! deactivated business is refused but stays signed in.

use tracing::info;

use crate::domain::{Error, Principal, Role};

use super::ApiResult;
use super::session::SessionContext;
use super::state::HttpState;

async fn require_role(
    session: &SessionContext,
    state: &HttpState,
    role: Role,
) -> ApiResult<Principal> {
    let identity = session.require_identity()?;
    if identity.role != role {
        return Err(Error::forbidden(format!("{role} access required")));
    }
    let Some(principal) = state.login.resolve(&identity.account_id).await? else {
        info!(account_id = %identity.account_id, "session refers to a deleted account");
        session.purge();
        return Err(Error::unauthorized("session expired"));
    };
    if principal.role != identity.role {
        info!(account_id = %identity.account_id, "account role changed since sign-in");
        session.purge();
        return Err(Error::unauthorized("session expired"));
    }
    if !principal.is_active {
        return Err(Error::forbidden("account is inactive"));
    }
    Ok(principal)
}

pub async fn require_admin(session: &SessionContext, state: &HttpState) -> ApiResult<Principal> {
    require_role(session, state, Role::Admin).await
}

pub async fn require_business(
    session: &SessionContext,
    state: &HttpState,
) -> ApiResult<Principal> {
    require_role(session, state, Role::Business).await
}
