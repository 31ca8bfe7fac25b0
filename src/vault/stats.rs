//! Received-cashed aggregate counters.
//!
//! Every update is a plain read-then-write with no compare-and-swap, so two
//! finalizations landing at the same time can lose an increment.

use alloy_primitives::Address;
use chrono::NaiveDate;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::store::{self, keys, RecordStore, StoreResult};
use crate::vault::cashout::VaultCashoutService;

#[derive(Serialize, Deserialize)]
struct StoredAmount(#[serde(with = "crate::amount")] BigUint);

/// Amount counter, absent reads as zero
pub(crate) async fn read_amount(store: &dyn RecordStore, key: &str) -> StoreResult<BigUint> {
    let stored: Option<StoredAmount> = store::find_json(store, key).await?;
    Ok(stored.map(|amount| amount.0).unwrap_or_default())
}

/// Adds `delta` to an amount counter and returns the new total
pub(crate) async fn add_amount(
    store: &dyn RecordStore,
    key: &str,
    delta: &BigUint,
) -> StoreResult<BigUint> {
    let total = read_amount(store, key).await? + delta;
    store::put_json(store, key, &StoredAmount(total.clone())).await?;
    Ok(total)
}

/// Count counter, absent reads as zero
pub(crate) async fn read_count(store: &dyn RecordStore, key: &str) -> StoreResult<u64> {
    Ok(store::find_json(store, key).await?.unwrap_or_default())
}

/// Snapshot of the received-cashed counters
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CashoutStats {
    pub total_received_cashed: BigUint,
    pub daily_received_cashed: BigUint,
    pub total_received_cashed_count: u64,
}

impl CashoutStats {
    /// Loads the global counters and the bucket of `day` (UTC)
    pub async fn load(store: &dyn RecordStore, day: NaiveDate) -> StoreResult<Self> {
        Ok(Self {
            total_received_cashed: read_amount(store, keys::TOTAL_RECEIVED_CASHED_KEY).await?,
            daily_received_cashed: read_amount(store, &keys::daily_received_cashed_key(day))
                .await?,
            total_received_cashed_count: read_count(store, keys::TOTAL_RECEIVED_CASHED_COUNT_KEY)
                .await?,
        })
    }
}

/// Cheques received from `vault` not yet accounted for by a finalized cashout
pub async fn uncashed_records(store: &dyn RecordStore, vault: Address) -> StoreResult<u64> {
    read_count(store, &keys::uncashed_records_count_key(vault)).await
}

impl VaultCashoutService {
    /// Received-cashed counters, with the daily bucket of `day`
    pub async fn cashout_stats(&self, day: NaiveDate) -> AppResult<CashoutStats> {
        Ok(CashoutStats::load(&*self.store, day).await?)
    }

    pub async fn uncashed_records(&self, vault: Address) -> AppResult<u64> {
        Ok(uncashed_records(&*self.store, vault).await?)
    }
}
