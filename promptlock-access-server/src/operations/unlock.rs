use crate::{
    condition::{check_supported, is_satisfied},
    operations::verify_auth_proof,
    server::{database::DataStore, Context, Operation},
    AccessServerError,
};
use async_trait::async_trait;
use promptlock::types::{
    identity::WalletAddress,
    operations::{UnlockRequest, UnlockResponse},
};
use tracing::{info, instrument};

#[derive(Debug)]
pub(crate) struct Unlock(pub UnlockRequest);

#[async_trait]
impl<DB: DataStore> Operation<DB> for Unlock {
    type Response = UnlockResponse;

    fn actor(&self) -> WalletAddress {
        self.0.auth_proof.address
    }

    /// Release a locked secret.
    /// 1) Verify the requester's authentication proof.
    /// 2) Evaluate the submitted condition against the ledger, live.
    /// 3) Decrypt the locked secret. This fails if the condition differs from
    ///    the one it was locked under or if the lock was altered.
    #[instrument(skip_all, err(Debug))]
    async fn operation(
        self,
        context: &mut Context<DB>,
    ) -> Result<UnlockResponse, AccessServerError> {
        info!("Starting unlock operation.");
        let request = self.0;
        context.lock_hash = Some(request.lock_hash.clone());

        verify_auth_proof(&request.auth_proof, context.config.max_auth_proof_age)?;
        check_supported(&request.condition, &context.config.program_id)?;

        let requester = request.auth_proof.address;
        if !is_satisfied(context.ledger.as_ref(), &request.condition, &requester).await? {
            return Err(AccessServerError::AccessDenied);
        }

        let secret = context.config.service_key.unlock(
            &request.locked_secret,
            &request.lock_hash,
            &request.condition,
        )?;

        info!("Successfully completed unlock operation.");
        Ok(UnlockResponse { secret })
    }
}
