// Ledger-facing types and the collaborator contracts the cashout core consumes
pub mod models;
pub mod traits;

pub use models::{Log, LedgerTransaction, Receipt, ReceiptStatus, SignedCheque, TxRequest};
pub use traits::{ChequeSource, LedgerReader, TransactionSubmitter};
