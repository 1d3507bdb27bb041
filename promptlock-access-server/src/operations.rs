mod lock;
mod unlock;

pub(crate) use lock::Lock;
pub(crate) use unlock::Unlock;

use crate::AccessServerError;
use promptlock::types::auth::AuthProof;
use time::OffsetDateTime;
use std::time::Duration;

/// Check the requester's proof of wallet ownership against the current time.
pub(crate) fn verify_auth_proof(
    auth_proof: &AuthProof,
    max_age: Duration,
) -> Result<(), AccessServerError> {
    auth_proof
        .verify(OffsetDateTime::now_utc(), max_age)
        .map_err(AccessServerError::InvalidAuthProof)
}
