//! Fake collaborators and receipt builders shared by the vault tests.

use alloy_primitives::{address, Address, Bytes, TxHash};
use async_trait::async_trait;
use num_bigint::BigUint;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AppResult, LedgerError};
use crate::ledger::models::{
    LedgerTransaction, Log, Receipt, ReceiptStatus, SignedCheque, TxRequest,
};
use crate::ledger::traits::{ChequeSource, LedgerReader, TransactionSubmitter};
use crate::store::MemoryStore;
use crate::vault::abi::{cheque_bounced_topic, cheque_cashed_topic};
use crate::vault::cashout::VaultCashoutService;

pub(crate) const VAULT: Address = address!("00000000000000000000000000000000000000aa");
pub(crate) const BENEFICIARY: Address = address!("1111111111111111111111111111111111111111");
pub(crate) const RECIPIENT: Address = address!("2222222222222222222222222222222222222222");
pub(crate) const CALLER: Address = address!("3333333333333333333333333333333333333333");

fn word(value: u64) -> [u8; 32] {
    let mut w = [0u8; 32];
    w[24..].copy_from_slice(&value.to_be_bytes());
    w
}

pub(crate) fn cashed_log(vault: Address, total: u64, cumulative: u64, caller_payout: u64) -> Log {
    let mut data = Vec::new();
    data.extend_from_slice(&word(total));
    data.extend_from_slice(&word(cumulative));
    data.extend_from_slice(&word(caller_payout));
    Log {
        address: vault,
        topics: vec![
            cheque_cashed_topic(),
            BENEFICIARY.into_word(),
            RECIPIENT.into_word(),
            CALLER.into_word(),
        ],
        data: Bytes::from(data),
    }
}

pub(crate) fn bounced_log(vault: Address) -> Log {
    Log {
        address: vault,
        topics: vec![cheque_bounced_topic()],
        data: Bytes::new(),
    }
}

pub(crate) fn receipt(status: ReceiptStatus, logs: Vec<Log>) -> Receipt {
    Receipt {
        transaction_hash: TxHash::repeat_byte(0x01),
        block_number: 10,
        status,
        logs,
    }
}

pub(crate) fn cheque(cumulative: u64) -> SignedCheque {
    SignedCheque {
        beneficiary: BENEFICIARY,
        cumulative_payout: BigUint::from(cumulative),
        signature: Bytes::from(vec![0x5a; 65]),
    }
}

#[derive(Default)]
pub(crate) struct FakeCheques {
    cheques: Mutex<HashMap<Address, SignedCheque>>,
}

impl FakeCheques {
    pub(crate) fn receive(&self, vault: Address, cheque: SignedCheque) {
        self.cheques.lock().insert(vault, cheque);
    }
}

#[async_trait]
impl ChequeSource for FakeCheques {
    async fn latest_cheque(&self, vault: Address) -> AppResult<Option<SignedCheque>> {
        Ok(self.cheques.lock().get(&vault).cloned())
    }
}

/// What the fake node knows about a transaction
#[derive(Clone)]
pub(crate) enum TxState {
    Pending,
    Mined(Receipt),
}

/// Fake ledger node, answering both reads and submissions
#[derive(Default)]
pub(crate) struct FakeChain {
    transactions: Mutex<HashMap<TxHash, TxState>>,
    pub(crate) sent: Mutex<Vec<TxRequest>>,
    pub(crate) calls: Mutex<Vec<TxRequest>>,
    /// Value returned by `paidOut`
    pub(crate) paid_out: Mutex<u64>,
    /// When set, every sent transaction is mined immediately with these logs
    pub(crate) mine_on_send: Mutex<Option<Vec<Log>>>,
    pub(crate) reject_sends: Mutex<bool>,
    pub(crate) panic_on_wait: Mutex<bool>,
    /// Which read answers with a transport failure
    pub(crate) outage: Mutex<Option<Outage>>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outage {
    Lookup,
    Receipt,
    Call,
}

pub(crate) const OUTAGE_MESSAGE: &str = "connection reset by peer";

impl FakeChain {
    pub(crate) fn set(&self, hash: TxHash, state: TxState) {
        self.transactions.lock().insert(hash, state);
    }

    pub(crate) fn mine(&self, hash: TxHash, status: ReceiptStatus, logs: Vec<Log>) {
        let mut mined = receipt(status, logs);
        mined.transaction_hash = hash;
        self.set(hash, TxState::Mined(mined));
    }

    fn state(&self, hash: TxHash) -> Option<TxState> {
        self.transactions.lock().get(&hash).cloned()
    }

    fn check_outage(&self, read: Outage) -> AppResult<()> {
        if *self.outage.lock() == Some(read) {
            return Err(LedgerError::Transport(OUTAGE_MESSAGE.into()).into());
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerReader for FakeChain {
    async fn transaction_by_hash(&self, hash: TxHash) -> AppResult<(LedgerTransaction, bool)> {
        self.check_outage(Outage::Lookup)?;
        let state = self
            .state(hash)
            .ok_or(LedgerError::TransactionNotFound(hash))?;
        let tx = LedgerTransaction {
            hash,
            to: Some(VAULT),
            block_number: None,
        };
        Ok((tx, matches!(state, TxState::Pending)))
    }

    async fn transaction_receipt(&self, hash: TxHash) -> AppResult<Receipt> {
        self.check_outage(Outage::Receipt)?;
        match self.state(hash) {
            Some(TxState::Mined(receipt)) => Ok(receipt),
            _ => Err(LedgerError::Transport(format!("no receipt for {}", hash)).into()),
        }
    }
}

#[async_trait]
impl TransactionSubmitter for FakeChain {
    async fn call(&self, request: TxRequest) -> AppResult<Bytes> {
        self.calls.lock().push(request);
        self.check_outage(Outage::Call)?;
        let mut output = vec![0u8; 24];
        output.extend_from_slice(&self.paid_out.lock().to_be_bytes());
        Ok(Bytes::from(output))
    }

    async fn send(&self, request: TxRequest) -> AppResult<TxHash> {
        if *self.reject_sends.lock() {
            return Err(LedgerError::Rejected("insufficient funds for gas".into()).into());
        }
        let hash = {
            let mut sent = self.sent.lock();
            sent.push(request);
            TxHash::with_last_byte(sent.len() as u8)
        };
        let logs = self.mine_on_send.lock().clone();
        match logs {
            Some(logs) => self.mine(hash, ReceiptStatus::Success, logs),
            None => self.set(hash, TxState::Pending),
        }
        Ok(hash)
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> AppResult<Receipt> {
        if *self.panic_on_wait.lock() {
            panic!("receipt subscription dropped");
        }
        self.transaction_receipt(hash).await
    }
}

pub(crate) struct Harness {
    pub(crate) service: VaultCashoutService,
    pub(crate) store: MemoryStore,
    pub(crate) cheques: Arc<FakeCheques>,
    pub(crate) chain: Arc<FakeChain>,
}

pub(crate) fn harness() -> Harness {
    let store = MemoryStore::new();
    let cheques = Arc::new(FakeCheques::default());
    let chain = Arc::new(FakeChain::default());
    let service = VaultCashoutService::new(
        Arc::new(store.clone()),
        chain.clone(),
        chain.clone(),
        cheques.clone(),
    );
    Harness {
        service,
        store,
        cheques,
        chain,
    }
}
