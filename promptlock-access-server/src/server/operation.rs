use crate::{
    server::{database::DataStore, Context},
    AccessServerError,
};
use async_trait::async_trait;
use promptlock::{
    infrastructure::logging::record_field,
    services::access_control::AccessControlError,
    types::{audit_event::EventStatus, identity::WalletAddress, operations::ServiceAction},
};
use tracing::{error, instrument};

/// A type implementing [`Operation`] handles one request to the
/// access-control service.
#[async_trait]
pub(crate) trait Operation<DB: DataStore>: Sized + Send + 'static {
    type Response: Send;

    /// The wallet the request claims to come from. Used for audit events
    /// before the claim is verified.
    fn actor(&self) -> WalletAddress;

    /// Core logic for a given operation.
    async fn operation(
        self,
        context: &mut Context<DB>,
    ) -> Result<Self::Response, AccessServerError>;

    /// Run the operation, logging audit events around it. Errors are logged
    /// here and sanitized before they reach the caller.
    #[instrument(skip_all, fields(request_id, action = %action))]
    async fn handle_request(
        self,
        mut context: Context<DB>,
        action: ServiceAction,
    ) -> Result<Self::Response, AccessControlError> {
        record_field("request_id", &context.request_id);
        let actor = self.actor();

        context
            .create_audit_event(&actor, action, EventStatus::Started)
            .await?;

        match self.operation(&mut context).await {
            Ok(response) => {
                context
                    .create_audit_event(&actor, action, EventStatus::Successful)
                    .await?;
                Ok(response)
            }
            Err(e) => {
                error!("{}", e);
                context
                    .create_audit_event(&actor, action, EventStatus::Failed)
                    .await?;
                Err(e.into())
            }
        }
    }
}
