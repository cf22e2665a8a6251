//! Внешнее хранилище (профили, депозиты, транзакции, уведомления).
//!
//! Запись идёт пакетами: `Store::commit` применяет весь `WriteBatch` или ничего.

use crate::{
    error::{EcoError, Result},
    model::{DepositRecord, EntryKind, NotificationRecord, TransactionRecord, UserId, UserProfile},
};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::io::Read;

#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    InsertDeposit(DepositRecord),
    /// Серверная процедура `create_transaction`: строка транзакции плюс движение балансов.
    CreateTransaction(TransactionRecord),
    InsertNotification(NotificationRecord),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: WriteOp) -> &mut Self {
        self.ops.push(op);
        self
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

pub trait Store: Send + Sync {
    fn authenticate(&self, token: &str) -> Option<UserId>;
    fn profile(&self, id: &UserId) -> Result<Option<UserProfile>>;
    fn profile_by_email(&self, email: &str) -> Result<Option<UserProfile>>;
    fn notifications(&self, id: &UserId) -> Result<Vec<NotificationRecord>>;
    fn commit(&self, batch: WriteBatch) -> Result<()>;
}

/// Начальные данные для `MemoryStore` (JSON).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seed {
    #[serde(default)]
    pub profiles: Vec<UserProfile>,
    /// токен сессии -> пользователь
    #[serde(default)]
    pub sessions: HashMap<String, UserId>,
}

impl Seed {
    pub fn read<R: Read>(r: R) -> Result<Self> {
        Ok(serde_json::from_reader(r)?)
    }
}

#[derive(Debug, Clone, Default)]
struct Tables {
    profiles: BTreeMap<UserId, UserProfile>,
    sessions: HashMap<String, UserId>,
    deposits: Vec<DepositRecord>,
    transactions: Vec<TransactionRecord>,
    notifications: Vec<NotificationRecord>,
}

impl Tables {
    fn apply(&mut self, op: WriteOp) -> Result<()> {
        match op {
            WriteOp::InsertDeposit(d) => {
                self.require_user(&d.user_id)?;
                self.deposits.push(d);
            }
            WriteOp::CreateTransaction(tx) => {
                if tx.amount <= Decimal::ZERO {
                    return Err(EcoError::InvalidAmount);
                }
                match tx.kind {
                    EntryKind::Deposit | EntryKind::Collection => self.adjust(&tx.user_id, tx.amount)?,
                    EntryKind::Payment | EntryKind::Donation => self.adjust(&tx.user_id, -tx.amount)?,
                    EntryKind::Transfer => {
                        let recipient = tx
                            .recipient_id
                            .clone()
                            .ok_or_else(|| EcoError::Store("transfer without recipient".into()))?;
                        self.adjust(&tx.user_id, -tx.amount)?;
                        self.adjust(&recipient, tx.amount)?;
                    }
                }
                self.transactions.push(tx);
            }
            WriteOp::InsertNotification(n) => {
                self.require_user(&n.user_id)?;
                self.notifications.push(n);
            }
        }
        Ok(())
    }

    fn require_user(&self, id: &UserId) -> Result<()> {
        if self.profiles.contains_key(id) {
            Ok(())
        } else {
            Err(EcoError::Store(format!("no profile {id}")))
        }
    }

    // баланс проверяется здесь, под блокировкой записи, а не только в сервисе
    fn adjust(&mut self, id: &UserId, delta: Decimal) -> Result<()> {
        let profile = self
            .profiles
            .get_mut(id)
            .ok_or_else(|| EcoError::Store(format!("no profile {id}")))?;
        let next = profile.wallet_balance + delta;
        if next < Decimal::ZERO {
            return Err(EcoError::InsufficientFunds { requested: -delta, available: profile.wallet_balance });
        }
        profile.wallet_balance = next;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: Seed) -> Self {
        let tables = Tables {
            profiles: seed.profiles.into_iter().map(|p| (p.id.clone(), p)).collect(),
            sessions: seed.sessions,
            ..Tables::default()
        };
        Self { tables: RwLock::new(tables) }
    }

    pub fn insert_profile(&self, profile: UserProfile) {
        self.tables.write().profiles.insert(profile.id.clone(), profile);
    }

    pub fn insert_session(&self, token: impl Into<String>, user: UserId) {
        self.tables.write().sessions.insert(token.into(), user);
    }

    pub fn deposits(&self) -> Vec<DepositRecord> {
        self.tables.read().deposits.clone()
    }

    pub fn transactions(&self) -> Vec<TransactionRecord> {
        self.tables.read().transactions.clone()
    }
}

impl Store for MemoryStore {
    fn authenticate(&self, token: &str) -> Option<UserId> {
        self.tables.read().sessions.get(token).cloned()
    }

    fn profile(&self, id: &UserId) -> Result<Option<UserProfile>> {
        Ok(self.tables.read().profiles.get(id).cloned())
    }

    fn profile_by_email(&self, email: &str) -> Result<Option<UserProfile>> {
        Ok(self.tables.read().profiles.values().find(|p| p.email == email).cloned())
    }

    fn notifications(&self, id: &UserId) -> Result<Vec<NotificationRecord>> {
        // новые сверху, как в журнале кошелька
        Ok(self
            .tables
            .read()
            .notifications
            .iter()
            .rev()
            .filter(|n| &n.user_id == id)
            .cloned()
            .collect())
    }

    fn commit(&self, batch: WriteBatch) -> Result<()> {
        let mut guard = self.tables.write();
        let mut staged = guard.clone();
        let len = batch.ops.len();
        for op in batch.ops {
            if let Err(e) = staged.apply(op) {
                tracing::warn!(error = %e, "batch rejected, nothing written");
                return Err(e);
            }
        }
        *guard = staged;
        tracing::debug!(ops = len, "batch committed");
        Ok(())
    }
}
