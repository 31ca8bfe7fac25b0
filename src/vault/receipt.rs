use alloy_primitives::{Address, B256};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::ledger::models::{Log, Receipt};
use crate::vault::abi::{
    cheque_bounced_topic, cheque_cashed_topic, decode_address_topic, decode_uint,
    CHEQUE_BOUNCED_EVENT, CHEQUE_CASHED_EVENT,
};
use crate::vault::models::CashChequeResult;

/// Returns the single log of the given event emitted by `vault`.
///
/// Zero matches and more than one match both fail with `EventDecodeAmbiguous`.
fn find_single_event<'r>(
    receipt: &'r Receipt,
    vault: Address,
    topic: B256,
    event: &'static str,
) -> AppResult<&'r Log> {
    let mut matches = receipt
        .logs
        .iter()
        .filter(|log| log.address == vault && log.topics.first() == Some(&topic));

    match (matches.next(), matches.count()) {
        (Some(log), 0) => Ok(log),
        (first, rest) => Err(AppError::EventDecodeAmbiguous {
            event,
            vault,
            found: usize::from(first.is_some()) + rest,
        }),
    }
}

/// Decodes the outcome of a `cashChequeBeneficiary` transaction from its receipt
pub fn parse_cash_cheque_beneficiary_receipt(
    vault: Address,
    receipt: &Receipt,
) -> AppResult<CashChequeResult> {
    let cashed = find_single_event(receipt, vault, cheque_cashed_topic(), CHEQUE_CASHED_EVENT)?;

    if cashed.topics.len() != 4 {
        return Err(AppError::AbiDecode(format!(
            "{} expects 4 topics, got {}",
            CHEQUE_CASHED_EVENT,
            cashed.topics.len()
        )));
    }

    let bounced = match find_single_event(receipt, vault, cheque_bounced_topic(), CHEQUE_BOUNCED_EVENT)
    {
        Ok(_) => true,
        Err(e) if e.is_event_not_found() => false,
        Err(e) => return Err(e),
    };

    let result = CashChequeResult {
        beneficiary: decode_address_topic(&cashed.topics[1]),
        recipient: decode_address_topic(&cashed.topics[2]),
        caller: decode_address_topic(&cashed.topics[3]),
        total_payout: decode_uint(&cashed.data, 0)?,
        cumulative_payout: decode_uint(&cashed.data, 1)?,
        caller_payout: decode_uint(&cashed.data, 2)?,
        bounced,
    };

    debug!(
        "🧾 Parsed cashout receipt {}: total payout {}, bounced {}",
        receipt.transaction_hash, result.total_payout, result.bounced
    );

    Ok(result)
}
