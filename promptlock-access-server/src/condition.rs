//! Live evaluation of access conditions against the ledger.

use crate::AccessServerError;
use promptlock::{
    crypto::receipt_address,
    services::ledger::LedgerRpc,
    types::{
        condition::AccessCondition,
        identity::{ProgramId, WalletAddress},
    },
};
use tracing::{info, warn};

/// Reject conditions this service can't evaluate. A receipt condition must
/// name the program whose ledger the service reads.
pub fn check_supported(
    condition: &AccessCondition,
    served_program: &ProgramId,
) -> Result<(), AccessServerError> {
    match condition {
        AccessCondition::ReceiptExists { program_id, .. } if program_id != served_program => Err(
            AccessServerError::UnknownProgram(program_id.to_string()),
        ),
        AccessCondition::ReceiptExists { .. } => Ok(()),
        AccessCondition::MinimumBalance { .. } => {
            warn!("Condition checks balance only and does not prove ownership");
            Ok(())
        }
    }
}

/// Whether `requester` satisfies `condition` right now. Always reads the
/// ledger; results are never cached.
pub async fn is_satisfied(
    ledger: &dyn LedgerRpc,
    condition: &AccessCondition,
    requester: &WalletAddress,
) -> Result<bool, AccessServerError> {
    let satisfied = match condition {
        AccessCondition::ReceiptExists {
            program_id,
            content_id,
        } => {
            ledger
                .account_exists(&receipt_address(program_id, requester, content_id))
                .await?
        }
        AccessCondition::MinimumBalance { lamports } => ledger.balance(requester).await? >= *lamports,
    };

    info!("Condition satisfied for {}: {}", requester, satisfied);
    Ok(satisfied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptlock::{
        constants::{PLATFORM_TREASURY, PROGRAM_ID},
        crypto::WalletKeyPair,
        services::wallet::Wallet,
        types::{
            content::{ContentId, StoragePointer},
            transaction::{Instruction, SignedTransaction},
        },
    };
    use promptlock_settlement::{Ledger, ProgramConfig};

    async fn submit(ledger: &Ledger, wallet: &WalletKeyPair, instruction: Instruction) {
        let transaction = SignedTransaction::sign(wallet, ledger.program_id(), instruction)
            .await
            .unwrap();
        let _ = ledger.submit_transaction(transaction).await.unwrap();
    }

    #[tokio::test]
    async fn receipt_condition_follows_purchases() -> Result<(), AccessServerError> {
        let ledger = Ledger::new(ProgramConfig::default());
        let mut rng = rand::thread_rng();
        let seller = WalletKeyPair::generate(&mut rng);
        let buyer = WalletKeyPair::generate(&mut rng);
        let _ = ledger.airdrop(&seller.address(), 1_000_000_000).await?;
        let _ = ledger.airdrop(&buyer.address(), 1_000_000_000).await?;

        let content_id = ContentId::new("course_1")?;
        let condition = AccessCondition::receipt_exists(PROGRAM_ID, content_id.clone());
        submit(
            &ledger,
            &seller,
            Instruction::ListContent {
                content_id: content_id.clone(),
                storage_pointer: StoragePointer::new("pointer"),
                title: "Course".into(),
                price: 1_000,
            },
        )
        .await;
        assert!(!is_satisfied(&ledger, &condition, &buyer.address()).await?);

        submit(
            &ledger,
            &buyer,
            Instruction::BuyContent {
                content_id,
                treasury: PLATFORM_TREASURY,
            },
        )
        .await;
        assert!(is_satisfied(&ledger, &condition, &buyer.address()).await?);
        assert!(!is_satisfied(&ledger, &condition, &seller.address()).await?);
        Ok(())
    }

    #[tokio::test]
    async fn balance_condition_admits_any_wallet_at_zero() -> Result<(), AccessServerError> {
        let ledger = Ledger::new(ProgramConfig::default());
        let stranger = WalletAddress::from_bytes([3; 32]);

        let placeholder = AccessCondition::MinimumBalance { lamports: 0 };
        assert!(is_satisfied(&ledger, &placeholder, &stranger).await?);

        let stricter = AccessCondition::MinimumBalance { lamports: 10 };
        assert!(!is_satisfied(&ledger, &stricter, &stranger).await?);
        let _ = ledger.airdrop(&stranger, 10).await?;
        assert!(is_satisfied(&ledger, &stricter, &stranger).await?);
        Ok(())
    }

    #[test]
    fn foreign_programs_are_unsupported() -> Result<(), AccessServerError> {
        let content_id = ContentId::new("course_1")?;
        let ours = AccessCondition::receipt_exists(PROGRAM_ID, content_id.clone());
        let theirs = AccessCondition::receipt_exists(ProgramId::from_bytes([1; 32]), content_id);

        check_supported(&ours, &PROGRAM_ID)?;
        assert!(matches!(
            check_supported(&theirs, &PROGRAM_ID),
            Err(AccessServerError::UnknownProgram(_))
        ));
        Ok(())
    }
}
