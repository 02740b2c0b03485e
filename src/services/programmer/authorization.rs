use crate::database::Programmer;
use crate::middleware::AuthUser;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthorizationError {
    #[error("You must be logged in to do that")]
    Unauthenticated,
    #[error("You are not the owner of this programmer")]
    Forbidden,
}

/// Any logged-in user may create programmers
pub fn require_user(caller: Option<&AuthUser>) -> Result<&AuthUser, AuthorizationError> {
    caller.ok_or(AuthorizationError::Unauthenticated)
}

/// Only the owner may change or delete a programmer
pub fn authorize_mutation<'a>(
    programmer: &Programmer,
    caller: Option<&'a AuthUser>,
) -> Result<&'a AuthUser, AuthorizationError> {
    let user = require_user(caller)?;

    if !programmer.is_owned_by(user.id) {
        tracing::warn!(
            "User {} ({}) attempted to modify programmer {:?} owned by {:?}",
            user.name,
            user.id,
            programmer.nickname,
            programmer.owner_id
        );
        return Err(AuthorizationError::Forbidden);
    }

    Ok(user)
}
