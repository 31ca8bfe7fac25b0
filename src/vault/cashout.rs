use alloy_primitives::{Address, TxHash};
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use num_bigint::BigUint;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::amount::saturating_sub;
use crate::error::{AppError, AppResult, LedgerError, StoreError};
use crate::ledger::models::{SignedCheque, TxRequest};
use crate::ledger::traits::{ChequeSource, LedgerReader, TransactionSubmitter};
use crate::store::{self, keys, RecordStore};
use crate::vault::abi;
use crate::vault::models::{CashOutResult, CashoutAction, CashoutStatus, LastCashout};
use crate::vault::receipt::parse_cash_cheque_beneficiary_receipt;

const CASHOUT_DESCRIPTION: &str = "cheque cashout";

/// Cashing out vault cheques and reconciling their settlement
#[async_trait]
pub trait CashoutService: Send + Sync {
    /// Sends a cashing transaction for the latest cheque of `vault`.
    ///
    /// Returns as soon as the transaction is sent; confirmation is tracked in the background.
    async fn cash_cheque(&self, vault: Address, recipient: Address) -> AppResult<TxHash>;

    /// Status of the latest cashout and the amount not yet cashed
    async fn cashout_status(&self, vault: Address) -> AppResult<CashoutStatus>;

    /// Whether a cashout was ever submitted for `vault`, confirmed or not
    async fn has_cashout_action(&self, vault: Address) -> AppResult<bool>;

    /// Last finalized cashout of every vault, in store key order
    async fn cashout_results(&self) -> AppResult<Vec<CashOutResult>>;
}

/// Reconciles cheques, submitted cashouts and ledger state.
///
/// Sole writer of cashout actions, cashout results and the received-cashed counters.
#[derive(Clone)]
pub struct VaultCashoutService {
    pub(crate) store: Arc<dyn RecordStore>,
    pub(crate) ledger: Arc<dyn LedgerReader>,
    pub(crate) transactions: Arc<dyn TransactionSubmitter>,
    pub(crate) cheques: Arc<dyn ChequeSource>,
}

impl VaultCashoutService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        ledger: Arc<dyn LedgerReader>,
        transactions: Arc<dyn TransactionSubmitter>,
        cheques: Arc<dyn ChequeSource>,
    ) -> Self {
        Self {
            store,
            ledger,
            transactions,
            cheques,
        }
    }

    async fn latest_cheque(&self, vault: Address) -> AppResult<SignedCheque> {
        self.cheques
            .latest_cheque(vault)
            .await?
            .ok_or(AppError::NoPriorCheque(vault))
    }

    /// Live `paidOut(beneficiary)` of the vault
    async fn paid_out(&self, vault: Address, beneficiary: Address) -> AppResult<BigUint> {
        let request = TxRequest::call(vault, abi::encode_paid_out(beneficiary));
        let output = self.transactions.call(request).await?;
        abi::decode_paid_out(&output)
    }
}

#[async_trait]
impl CashoutService for VaultCashoutService {
    #[instrument(skip_all, fields(vault = %vault, recipient = %recipient))]
    async fn cash_cheque(&self, vault: Address, recipient: Address) -> AppResult<TxHash> {
        let cheque = self.latest_cheque(vault).await?;

        let data = abi::encode_cash_cheque_beneficiary(
            recipient,
            &cheque.cumulative_payout,
            &cheque.signature,
        )?;
        let request = TxRequest {
            to: vault,
            data,
            value: BigUint::default(),
            description: CASHOUT_DESCRIPTION.to_string(),
        };

        let tx_hash = self.transactions.send(request).await?;
        info!(
            "💸 Cashout sent for vault {}: {} (cumulative payout {})",
            vault, tx_hash, cheque.cumulative_payout
        );

        // Overwrites any earlier action for this vault, last write wins
        let action = CashoutAction {
            tx_hash,
            cheque: cheque.clone(),
        };
        store::put_json(&*self.store, &keys::cashout_action_key(vault), &action).await?;

        self.spawn_finalize(vault, tx_hash, cheque);

        Ok(tx_hash)
    }

    #[instrument(skip_all, fields(vault = %vault))]
    async fn cashout_status(&self, vault: Address) -> AppResult<CashoutStatus> {
        let cheque = self.latest_cheque(vault).await?;

        let action: Option<CashoutAction> =
            store::find_json(&*self.store, &keys::cashout_action_key(vault)).await?;
        let Some(action) = action else {
            // never cashed out, everything is uncashed
            return Ok(CashoutStatus {
                last: None,
                uncashed_amount: cheque.cumulative_payout,
            });
        };

        let pending = match self.ledger.transaction_by_hash(action.tx_hash).await {
            Ok((_, pending)) => pending,
            Err(AppError::Ledger(LedgerError::TransactionNotFound(_))) => {
                debug!("Cashout {} not indexed yet, treating as pending", action.tx_hash);
                true
            }
            Err(e) => return Err(e),
        };

        if pending {
            // assume the whole submitted cheque clears with the pending transaction
            let uncashed_amount =
                saturating_sub(&cheque.cumulative_payout, &action.cheque.cumulative_payout);
            return Ok(CashoutStatus {
                last: Some(LastCashout {
                    tx_hash: action.tx_hash,
                    cheque: action.cheque,
                    result: None,
                    reverted: false,
                }),
                uncashed_amount,
            });
        }

        let receipt = self.ledger.transaction_receipt(action.tx_hash).await?;

        if receipt.is_failed() {
            // local bookkeeping no longer tells what settled, ask the vault
            warn!("⚠️ Cashout {} for vault {} reverted", action.tx_hash, vault);
            let paid_out = self.paid_out(vault, cheque.beneficiary).await?;
            return Ok(CashoutStatus {
                last: Some(LastCashout {
                    tx_hash: action.tx_hash,
                    cheque: action.cheque,
                    result: None,
                    reverted: true,
                }),
                uncashed_amount: saturating_sub(&cheque.cumulative_payout, &paid_out),
            });
        }

        let result = parse_cash_cheque_beneficiary_receipt(vault, &receipt)?;
        let uncashed_amount = saturating_sub(&cheque.cumulative_payout, &result.cumulative_payout);

        Ok(CashoutStatus {
            last: Some(LastCashout {
                tx_hash: action.tx_hash,
                cheque: action.cheque,
                result: Some(result),
                reverted: false,
            }),
            uncashed_amount,
        })
    }

    async fn has_cashout_action(&self, vault: Address) -> AppResult<bool> {
        match self.store.get(&keys::cashout_action_key(vault)).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn cashout_results(&self) -> AppResult<Vec<CashOutResult>> {
        let results = self
            .store
            .iterate(keys::CASHOUT_RESULT_PREFIX)
            .map(|entry| -> Result<CashOutResult, StoreError> {
                let (_, raw) = entry?;
                Ok(serde_json::from_slice(&raw)?)
            })
            .try_collect::<Vec<_>>()
            .await?;

        Ok(results)
    }
}
