mod context;
pub mod database;
mod operation;

pub(crate) use context::Context;
pub(crate) use operation::Operation;

use crate::{config::Config, operations, server::database::DataStore};
use async_trait::async_trait;
use promptlock::{
    services::{
        access_control::{AccessControlError, AccessControlService},
        ledger::LedgerRpc,
    },
    types::operations::{
        LockRequest, LockResponse, ServiceAction, UnlockRequest, UnlockResponse,
    },
};
use rand::{rngs::StdRng, SeedableRng};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// The access-control service. Reads the ledger it gates access on through
/// `ledger`, and records audit events in `db`.
pub struct AccessServer<DB: DataStore> {
    config: Arc<Config>,
    db: Arc<DB>,
    ledger: Arc<dyn LedgerRpc>,
    rng: Arc<Mutex<StdRng>>,
}

impl<DB: DataStore> AccessServer<DB> {
    pub fn new(db: Arc<DB>, ledger: Arc<dyn LedgerRpc>, config: Config) -> Self {
        Self {
            config: Arc::new(config),
            db,
            ledger,
            rng: Arc::new(Mutex::new(StdRng::from_entropy())),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> &Arc<DB> {
        &self.db
    }

    pub(crate) fn context(&self) -> Context<DB> {
        Context {
            db: self.db.clone(),
            config: self.config.clone(),
            ledger: self.ledger.clone(),
            rng: self.rng.clone(),
            request_id: Uuid::new_v4(),
            lock_hash: None,
        }
    }
}

#[async_trait]
impl<DB: DataStore> AccessControlService for AccessServer<DB> {
    async fn lock(&self, request: LockRequest) -> Result<LockResponse, AccessControlError> {
        operations::Lock(request)
            .handle_request(self.context(), ServiceAction::Lock)
            .await
    }

    async fn unlock(&self, request: UnlockRequest) -> Result<UnlockResponse, AccessControlError> {
        operations::Unlock(request)
            .handle_request(self.context(), ServiceAction::Unlock)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        server::database::{DataStore, DatabaseError},
        AccessServerError,
    };
    use promptlock::{
        constants::{PLATFORM_TREASURY, PROGRAM_ID},
        crypto::{ServiceKey, WalletKeyPair},
        services::wallet::Wallet,
        types::{
            audit_event::{AuditEvent, EventStatus},
            auth::AuthProof,
            bundle::LockHash,
            condition::AccessCondition,
            content::{ContentId, StoragePointer},
            identity::{ProgramId, WalletAddress},
            operations::SecretMaterial,
            transaction::{Instruction, SignedTransaction},
        },
    };
    use promptlock_settlement::{Ledger, ProgramConfig};
    use std::time::Duration;
    use time::OffsetDateTime;

    #[derive(Default)]
    struct AuditLog(std::sync::Mutex<Vec<AuditEvent>>);

    #[async_trait]
    impl DataStore for AuditLog {
        async fn create_audit_event(
            &self,
            request_id: Uuid,
            actor: &WalletAddress,
            lock_hash: &Option<LockHash>,
            action: ServiceAction,
            status: EventStatus,
        ) -> Result<(), DatabaseError> {
            let event = AuditEvent::new(request_id, *actor, lock_hash.clone(), action, status);
            self.0
                .lock()
                .map_err(|e| DatabaseError::InternalDatabaseError(e.to_string()))?
                .push(event);
            Ok(())
        }

        async fn find_audit_events(
            &self,
            actor: &WalletAddress,
            action: Option<ServiceAction>,
        ) -> Result<Vec<AuditEvent>, DatabaseError> {
            Ok(self
                .0
                .lock()
                .map_err(|e| DatabaseError::InternalDatabaseError(e.to_string()))?
                .iter()
                .filter(|event| event.actor() == actor)
                .filter(|event| action.map_or(true, |action| event.action() == action))
                .cloned()
                .collect())
        }
    }

    struct TestSetup {
        server: AccessServer<AuditLog>,
        ledger: Arc<Ledger>,
        seller: WalletKeyPair,
        buyer: WalletKeyPair,
        condition: AccessCondition,
    }

    const PRICE: u64 = 1_000_000;

    async fn submit(ledger: &Ledger, wallet: &WalletKeyPair, instruction: Instruction) {
        let transaction = SignedTransaction::sign(wallet, ledger.program_id(), instruction)
            .await
            .unwrap();
        let _ = ledger.submit_transaction(transaction).await.unwrap();
    }

    async fn setup() -> TestSetup {
        let mut rng = rand::thread_rng();
        let ledger = Arc::new(Ledger::new(ProgramConfig::default()));
        let seller = WalletKeyPair::generate(&mut rng);
        let buyer = WalletKeyPair::generate(&mut rng);
        let _ = ledger.airdrop(&seller.address(), 100 * PRICE).await.unwrap();
        let _ = ledger.airdrop(&buyer.address(), 100 * PRICE).await.unwrap();

        let content_id = ContentId::new("course_1").unwrap();
        submit(
            &ledger,
            &seller,
            Instruction::ListContent {
                content_id: content_id.clone(),
                storage_pointer: StoragePointer::new("pointer"),
                title: "Course".into(),
                price: PRICE,
            },
        )
        .await;

        let config = Config {
            service_key: Arc::new(ServiceKey::generate(&mut rng).unwrap()),
            program_id: PROGRAM_ID,
            max_auth_proof_age: Duration::from_secs(60),
            logging: Default::default(),
        };
        let server = AccessServer::new(Arc::new(AuditLog::default()), ledger.clone(), config);

        TestSetup {
            server,
            ledger,
            seller,
            buyer,
            condition: AccessCondition::receipt_exists(PROGRAM_ID, content_id),
        }
    }

    async fn purchase(setup: &TestSetup) {
        submit(
            &setup.ledger,
            &setup.buyer,
            Instruction::BuyContent {
                content_id: ContentId::new("course_1").unwrap(),
                treasury: PLATFORM_TREASURY,
            },
        )
        .await;
    }

    async fn lock(setup: &TestSetup, secret: &SecretMaterial) -> LockResponse {
        setup
            .server
            .lock(LockRequest {
                secret: secret.clone(),
                condition: setup.condition.clone(),
                auth_proof: AuthProof::request(&setup.seller).await.unwrap(),
            })
            .await
            .unwrap()
    }

    async fn unlock_request(
        locked: &LockResponse,
        condition: &AccessCondition,
        wallet: &WalletKeyPair,
    ) -> UnlockRequest {
        UnlockRequest {
            locked_secret: locked.locked_secret.clone(),
            lock_hash: locked.lock_hash.clone(),
            condition: condition.clone(),
            auth_proof: AuthProof::request(wallet).await.unwrap(),
        }
    }

    #[tokio::test]
    async fn buyer_can_unlock_after_purchase() {
        let setup = setup().await;
        let secret = SecretMaterial::new(vec![42; 32]);
        let locked = lock(&setup, &secret).await;

        let request = unlock_request(&locked, &setup.condition, &setup.buyer).await;
        assert_eq!(
            setup.server.unlock(request).await.unwrap_err(),
            AccessControlError::AccessDenied
        );

        purchase(&setup).await;
        let request = unlock_request(&locked, &setup.condition, &setup.buyer).await;
        let response = setup.server.unlock(request).await.unwrap();
        assert_eq!(response.secret, secret);
    }

    #[tokio::test]
    async fn non_buyers_are_denied() {
        let setup = setup().await;
        purchase(&setup).await;
        let locked = lock(&setup, &SecretMaterial::new(vec![42; 32])).await;

        // Not even the seller holds a receipt.
        let request = unlock_request(&locked, &setup.condition, &setup.seller).await;
        let error = setup.server.unlock(request).await.unwrap_err();
        assert_eq!(error, AccessControlError::AccessDenied);
        assert_eq!(error.category(), promptlock::ErrorCategory::Authorization);
    }

    #[tokio::test]
    async fn altered_condition_is_rejected() {
        let setup = setup().await;
        purchase(&setup).await;
        let locked = lock(&setup, &SecretMaterial::new(vec![42; 32])).await;

        // The buyer satisfies this condition, but the key was not locked
        // under it.
        let placeholder = AccessCondition::MinimumBalance { lamports: 0 };
        let request = unlock_request(&locked, &placeholder, &setup.buyer).await;
        assert_eq!(
            setup.server.unlock(request).await.unwrap_err(),
            AccessControlError::ConditionMismatch
        );
    }

    #[tokio::test]
    async fn altered_lock_is_rejected() {
        let setup = setup().await;
        purchase(&setup).await;
        let locked = lock(&setup, &SecretMaterial::new(vec![42; 32])).await;

        let mut request = unlock_request(&locked, &setup.condition, &setup.buyer).await;
        request.lock_hash = LockHash("00".repeat(32));
        assert_eq!(
            setup.server.unlock(request).await.unwrap_err(),
            AccessControlError::LockHashMismatch
        );
    }

    #[tokio::test]
    async fn stale_and_forged_proofs_are_rejected() {
        let setup = setup().await;
        purchase(&setup).await;
        let locked = lock(&setup, &SecretMaterial::new(vec![42; 32])).await;

        let issued_at = OffsetDateTime::now_utc() - time::Duration::hours(1);
        let nonce = [1; 16];
        let address = setup.buyer.address();
        let stale = AuthProof {
            address,
            verifying_key: setup.buyer.verifying_key(),
            issued_at,
            nonce,
            signature: setup
                .buyer
                .sign(&AuthProof::statement(&address, issued_at, &nonce)),
        };
        let mut request = unlock_request(&locked, &setup.condition, &setup.buyer).await;
        request.auth_proof = stale;
        assert!(matches!(
            setup.server.unlock(request).await.unwrap_err(),
            AccessControlError::InvalidAuthProof(_)
        ));

        // The seller claims to be the buyer.
        let mut forged = AuthProof::request(&setup.seller).await.unwrap();
        forged.address = setup.buyer.address();
        let mut request = unlock_request(&locked, &setup.condition, &setup.buyer).await;
        request.auth_proof = forged;
        assert!(matches!(
            setup.server.unlock(request).await.unwrap_err(),
            AccessControlError::InvalidAuthProof(_)
        ));
    }

    #[tokio::test]
    async fn foreign_program_conditions_are_rejected() {
        let setup = setup().await;
        let condition = AccessCondition::receipt_exists(
            ProgramId::from_bytes([9; 32]),
            ContentId::new("course_1").unwrap(),
        );
        let result = setup
            .server
            .lock(LockRequest {
                secret: SecretMaterial::new(vec![42; 32]),
                condition,
                auth_proof: AuthProof::request(&setup.seller).await.unwrap(),
            })
            .await;
        assert!(matches!(result, Err(AccessControlError::Rejected(_))));
    }

    #[tokio::test]
    async fn requests_are_audited() -> Result<(), AccessServerError> {
        let setup = setup().await;
        let locked = lock(&setup, &SecretMaterial::new(vec![42; 32])).await;
        let request = unlock_request(&locked, &setup.condition, &setup.buyer).await;
        let _ = setup.server.unlock(request).await.unwrap_err();

        let db = setup.server.database();
        let seller_events = db.find_audit_events(&setup.seller.address(), None).await?;
        assert_eq!(
            seller_events
                .iter()
                .map(|event| (event.action(), event.status()))
                .collect::<Vec<_>>(),
            vec![
                (ServiceAction::Lock, EventStatus::Started),
                (ServiceAction::Lock, EventStatus::Successful)
            ]
        );
        assert_eq!(seller_events[1].lock_hash(), Some(&locked.lock_hash));

        let buyer_unlocks = db
            .find_audit_events(&setup.buyer.address(), Some(ServiceAction::Unlock))
            .await?;
        assert_eq!(buyer_unlocks.len(), 2);
        assert_eq!(buyer_unlocks[1].status(), EventStatus::Failed);
        assert_eq!(buyer_unlocks[0].request_id(), buyer_unlocks[1].request_id());
        Ok(())
    }
}
