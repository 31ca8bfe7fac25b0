//! Store key layout.
//!
//! Vault addresses are rendered as lowercase hex without a `0x` prefix.

use alloy_primitives::Address;
use chrono::NaiveDate;

pub const CASHOUT_RESULT_PREFIX: &str = "cashout_result_";
pub const TOTAL_RECEIVED_CASHED_KEY: &str = "total_received_cashed";
pub const TOTAL_RECEIVED_CASHED_COUNT_KEY: &str = "total_received_cashed_count";

const CASHOUT_ACTION_PREFIX: &str = "swap_cashout_";
const DAILY_RECEIVED_CASHED_PREFIX: &str = "total_daily_received_cashed_";
const UNCASHED_RECORDS_COUNT_PREFIX: &str = "peer_received_uncash_records_count_";

/// Last submitted cashout action for a vault
pub fn cashout_action_key(vault: Address) -> String {
    format!("{}{}", CASHOUT_ACTION_PREFIX, hex::encode(vault))
}

/// Last finalized cashout result for a vault
pub fn cashout_result_key(vault: Address) -> String {
    format!("{}{}", CASHOUT_RESULT_PREFIX, hex::encode(vault))
}

/// Received-cashed amount bucketed by UTC calendar day
pub fn daily_received_cashed_key(day: NaiveDate) -> String {
    format!("{}{}", DAILY_RECEIVED_CASHED_PREFIX, day.format("%Y-%m-%d"))
}

pub fn today_received_cashed_key() -> String {
    daily_received_cashed_key(chrono::Utc::now().date_naive())
}

/// Cheques received from a vault that no finalized cashout has accounted for yet
pub fn uncashed_records_count_key(vault: Address) -> String {
    format!("{}{}", UNCASHED_RECORDS_COUNT_PREFIX, hex::encode(vault))
}
