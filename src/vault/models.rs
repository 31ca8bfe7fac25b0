use alloy_primitives::{Address, TxHash};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ledger::models::SignedCheque;

/// Persisted pointer to the last submitted cashout for a vault.
///
/// A new submission overwrites the previous action; no history is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashoutAction {
    pub tx_hash: TxHash,
    /// Cheque used for the submission, possibly older than the latest cheque
    pub cheque: SignedCheque,
}

/// Decoded outcome of a `cashChequeBeneficiary` transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashChequeResult {
    pub beneficiary: Address,
    /// Address which received the funds
    pub recipient: Address,
    pub caller: Address,
    /// Amount paid out by this transaction
    #[serde(with = "crate::amount")]
    pub total_payout: BigUint,
    /// Cumulative payout of the cheque that was cashed
    #[serde(with = "crate::amount")]
    pub cumulative_payout: BigUint,
    #[serde(with = "crate::amount")]
    pub caller_payout: BigUint,
    /// Part of the cheque could not be covered by the vault
    pub bounced: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastCashout {
    pub tx_hash: TxHash,
    pub cheque: SignedCheque,
    pub result: Option<CashChequeResult>,
    pub reverted: bool,
}

/// Point-in-time view of a vault's settlement, never persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashoutStatus {
    pub last: Option<LastCashout>,
    pub uncashed_amount: BigUint,
}

/// Lifecycle state derived for the last cashout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CashoutState {
    NoAction,
    Pending,
    Reverted,
    Confirmed,
}

impl CashoutStatus {
    pub fn state(&self) -> CashoutState {
        match &self.last {
            None => CashoutState::NoAction,
            Some(last) if last.reverted => CashoutState::Reverted,
            Some(LastCashout { result: Some(_), .. }) => CashoutState::Confirmed,
            Some(_) => CashoutState::Pending,
        }
    }

    /// Settlement result when the last cashout is confirmed
    pub fn confirmed_result(&self) -> Option<&CashChequeResult> {
        self.last.as_ref().and_then(|last| last.result.as_ref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CashoutResultStatus {
    #[default]
    Fail,
    Success,
}

impl fmt::Display for CashoutResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CashoutResultStatus::Fail => write!(f, "fail"),
            CashoutResultStatus::Success => write!(f, "success"),
        }
    }
}

/// Finalized record of the last cashout per vault, overwritten on each finalize
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashOutResult {
    pub tx_hash: TxHash,
    pub vault: Address,
    #[serde(with = "crate::amount")]
    pub amount: BigUint,
    /// Unix seconds
    pub cash_time: i64,
    pub status: CashoutResultStatus,
}
