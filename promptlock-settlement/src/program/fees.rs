use promptlock::{constants::BPS_DENOMINATOR, services::ledger::ProgramError};

/// How a purchase price is divided. The two shares always sum to the price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentSplit {
    pub seller_share: u64,
    pub treasury_share: u64,
}

/// Seller gets `floor(price * seller_share_bps / 10000)`, the treasury gets
/// the rest. Computed in 128 bits so no price can overflow.
pub fn split_payment(price: u64, seller_share_bps: u64) -> Result<PaymentSplit, ProgramError> {
    if seller_share_bps > BPS_DENOMINATOR {
        return Err(ProgramError::InvalidArgument(format!(
            "seller share of {seller_share_bps} basis points"
        )));
    }

    let seller_share = u128::from(price)
        .checked_mul(u128::from(seller_share_bps))
        .map(|product| product / u128::from(BPS_DENOMINATOR))
        .and_then(|share| u64::try_from(share).ok())
        .ok_or(ProgramError::ArithmeticOverflow)?;
    let treasury_share = price
        .checked_sub(seller_share)
        .ok_or(ProgramError::ArithmeticOverflow)?;

    Ok(PaymentSplit {
        seller_share,
        treasury_share,
    })
}
