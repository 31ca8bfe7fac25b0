// Cashout finalize pipeline
//
// Runs once per submitted cashout, detached from the caller:
// 1. Wait for the receipt (no timeout)
// 2. Re-derive the vault's cashout status
// 3. On confirmation, fold the payout into the received-cashed counters
// 4. Persist the cashout result, "fail" unless step 3 happened
//
// Nothing here is retried and nothing is returned; failures are logged.

use alloy_primitives::{Address, TxHash};
use chrono::Utc;
use futures::FutureExt;
use num_bigint::BigUint;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

use crate::ledger::models::SignedCheque;
use crate::store::{self, keys, StoreResult};
use crate::vault::cashout::{CashoutService, VaultCashoutService};
use crate::vault::models::{CashOutResult, CashoutResultStatus};
use crate::vault::stats;

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

impl VaultCashoutService {
    /// Starts the finalize pipeline for a sent cashout (runs in background)
    pub(crate) fn spawn_finalize(
        &self,
        vault: Address,
        tx_hash: TxHash,
        cheque: SignedCheque,
    ) -> JoinHandle<()> {
        let service = self.clone();

        tokio::spawn(async move {
            let finalize = AssertUnwindSafe(service.finalize_cashout(vault, tx_hash, cheque));
            if let Err(panic) = finalize.catch_unwind().await {
                error!(
                    "❌ Cashout finalize for vault {} ({}) panicked: {}",
                    vault,
                    tx_hash,
                    panic_message(&*panic)
                );
            }
        })
    }

    #[instrument(skip_all, fields(vault = %vault, tx_hash = %tx_hash))]
    pub(crate) async fn finalize_cashout(
        &self,
        vault: Address,
        tx_hash: TxHash,
        cheque: SignedCheque,
    ) {
        let mut result = CashOutResult {
            tx_hash,
            vault,
            amount: cheque.cumulative_payout,
            cash_time: Utc::now().timestamp(),
            status: CashoutResultStatus::Fail,
        };

        match self.transactions.wait_for_receipt(tx_hash).await {
            Err(e) => {
                warn!("⚠️ Waiting for cashout receipt failed: {}", e);
                if let Ok(status) = self.cashout_status(vault).await {
                    result.amount = status.uncashed_amount;
                }
            }
            Ok(receipt) => {
                info!("📬 Cashout mined in block {}", receipt.block_number);

                match self.cashout_status(vault).await {
                    Err(e) => warn!("⚠️ Failed to get cashout status: {}", e),
                    Ok(status) => match status.confirmed_result() {
                        Some(settled) => {
                            result.amount = settled.total_payout.clone();
                            result.status = CashoutResultStatus::Success;
                            self.record_received_cashed(vault, &settled.total_payout)
                                .await;
                        }
                        None => warn!(
                            "⚠️ Cashout not confirmed after receipt, state {:?}",
                            status.state()
                        ),
                    },
                }
            }
        }

        let key = keys::cashout_result_key(vault);
        match store::put_json(&*self.store, &key, &result).await {
            Ok(()) => info!(
                "✓ Cashout result stored: {} {} ({})",
                result.status, result.amount, tx_hash
            ),
            Err(e) => error!("❌ Failed to store cashout result: {}", e),
        }
    }

    /// Folds a confirmed payout into the aggregate counters; each update stands alone
    async fn record_received_cashed(&self, vault: Address, total_payout: &BigUint) {
        let store = &*self.store;

        if let Err(e) = stats::add_amount(store, keys::TOTAL_RECEIVED_CASHED_KEY, total_payout).await
        {
            warn!("⚠️ Failed to update total received cashed: {}", e);
        }

        let daily_key = keys::today_received_cashed_key();
        if let Err(e) = stats::add_amount(store, &daily_key, total_payout).await {
            warn!("⚠️ Failed to update daily received cashed: {}", e);
        }

        match self.move_uncashed_records(vault).await {
            Ok(moved) => info!("📊 {} uncashed records of vault {} now cashed", moved, vault),
            Err(e) => warn!("⚠️ Failed to update received cashed count: {}", e),
        }
    }

    /// Moves the vault's uncashed record count into the global cashed count
    async fn move_uncashed_records(&self, vault: Address) -> StoreResult<u64> {
        let store = &*self.store;
        let vault_key = keys::uncashed_records_count_key(vault);

        let uncashed = stats::read_count(store, &vault_key).await?;
        let cashed = stats::read_count(store, keys::TOTAL_RECEIVED_CASHED_COUNT_KEY).await?;

        store::put_json(store, keys::TOTAL_RECEIVED_CASHED_COUNT_KEY, &(cashed + uncashed)).await?;
        store::put_json(store, &vault_key, &0u64).await?;

        Ok(uncashed)
    }
}
