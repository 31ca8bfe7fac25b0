//! Reconciles off-chain vault cheques against on-chain settlement.
//!
//! [`vault::VaultCashoutService`] submits cashouts, derives their live status from
//! the latest cheque, the stored cashout action and the ledger, and finalizes
//! confirmed cashouts into aggregate counters in the background.

pub mod amount;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod ledger;
pub mod store;
pub mod vault;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};
pub use vault::{CashoutService, VaultCashoutService};

/// Initialize logging and tracing, honouring `RUST_LOG`
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,vault_cashout=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
