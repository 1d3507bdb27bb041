use crate::{
    condition::check_supported,
    operations::verify_auth_proof,
    server::{database::DataStore, Context, Operation},
    AccessServerError,
};
use async_trait::async_trait;
use promptlock::types::{
    identity::WalletAddress,
    operations::{LockRequest, LockResponse},
};
use tracing::{info, instrument};

#[derive(Debug)]
pub(crate) struct Lock(pub LockRequest);

#[async_trait]
impl<DB: DataStore> Operation<DB> for Lock {
    type Response = LockResponse;

    fn actor(&self) -> WalletAddress {
        self.0.auth_proof.address
    }

    /// Lock a secret under an access condition.
    /// 1) Verify the requester's authentication proof.
    /// 2) Check that the condition can be evaluated by this service.
    /// 3) Encrypt the secret under a key derived for the condition.
    #[instrument(skip_all, err(Debug))]
    async fn operation(
        self,
        context: &mut Context<DB>,
    ) -> Result<LockResponse, AccessServerError> {
        info!("Starting lock operation.");
        let request = self.0;
        verify_auth_proof(&request.auth_proof, context.config.max_auth_proof_age)?;
        check_supported(&request.condition, &context.config.program_id)?;

        let (locked_secret, lock_hash) = {
            let mut rng = context.rng.lock().await;
            context
                .config
                .service_key
                .lock(&mut *rng, &request.secret, &request.condition)?
        };
        context.lock_hash = Some(lock_hash.clone());

        info!("Successfully completed lock operation.");
        Ok(LockResponse {
            locked_secret,
            lock_hash,
        })
    }
}
