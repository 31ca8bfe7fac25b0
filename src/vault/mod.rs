// Vault cheque cashout: submission, status reconciliation and the finalize pipeline
pub mod abi;
pub mod cashout;
pub mod finalize;
pub mod models;
pub mod receipt;
pub mod stats;

#[cfg(test)]
pub(crate) mod testing;

pub use cashout::{CashoutService, VaultCashoutService};
pub use models::{
    CashChequeResult, CashOutResult, CashoutAction, CashoutResultStatus, CashoutState,
    CashoutStatus, LastCashout,
};
pub use receipt::parse_cash_cheque_beneficiary_receipt;
pub use stats::CashoutStats;
