use alloy_primitives::{Address, Bytes, TxHash, B256};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// Off-chain cheque: a signed promise of the cumulative amount a beneficiary
/// may redeem from a vault.
///
/// INVARIANT: for a fixed (vault, beneficiary) `cumulative_payout` never decreases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedCheque {
    pub beneficiary: Address,
    #[serde(with = "crate::amount")]
    pub cumulative_payout: BigUint,
    pub signature: Bytes,
}

/// Call or transaction aimed at a vault contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxRequest {
    pub to: Address,
    pub data: Bytes,
    pub value: BigUint,
    pub description: String,
}

impl TxRequest {
    /// Read-only call, never broadcast
    pub fn call(to: Address, data: Bytes) -> Self {
        Self {
            to,
            data,
            value: BigUint::default(),
            description: String::new(),
        }
    }
}

/// Transaction as reported by the ledger node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerTransaction {
    pub hash: TxHash,
    pub to: Option<Address>,
    pub block_number: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
    Success,
    Failed,
}

/// Event emitted during a mined transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Log {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

/// Outcome of a mined transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub transaction_hash: TxHash,
    pub block_number: u64,
    pub status: ReceiptStatus,
    pub logs: Vec<Log>,
}

impl Receipt {
    pub fn is_failed(&self) -> bool {
        self.status == ReceiptStatus::Failed
    }
}
