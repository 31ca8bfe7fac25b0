use alloy_primitives::{Address, Bytes, TxHash};
use async_trait::async_trait;

use crate::error::AppResult;
use crate::ledger::models::{LedgerTransaction, Receipt, SignedCheque, TxRequest};

/// Source of the most recent off-chain cheque per vault
#[async_trait]
pub trait ChequeSource: Send + Sync {
    /// `None` when no cheque was ever received for the vault
    async fn latest_cheque(&self, vault: Address) -> AppResult<Option<SignedCheque>>;
}

/// Read access to mined and pending transactions
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// Returns the transaction and whether it is still pending.
    ///
    /// Unknown hashes fail with `LedgerError::TransactionNotFound`.
    async fn transaction_by_hash(&self, hash: TxHash) -> AppResult<(LedgerTransaction, bool)>;

    async fn transaction_receipt(&self, hash: TxHash) -> AppResult<Receipt>;
}

/// Builds, sends and tracks settlement transactions
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    /// Read-only call against current ledger state
    async fn call(&self, request: TxRequest) -> AppResult<Bytes>;

    /// Signs and broadcasts, returning the transaction hash
    async fn send(&self, request: TxRequest) -> AppResult<TxHash>;

    /// Blocks until the receipt is available. No timeout is applied here.
    async fn wait_for_receipt(&self, hash: TxHash) -> AppResult<Receipt>;
}
