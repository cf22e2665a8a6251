//! Серверные операции: депозит в RVM и перевод другому пользователю.
//!
//! Каждая операция собирает один `WriteBatch`; хранилище применяет его целиком
//! или не применяет вовсе.

use crate::{
    error::EcoError,
    model::{money, DepositRecord, EntryKind, NotificationRecord, TransactionRecord, UserId},
    store::{Store, WriteBatch, WriteOp},
    traits::TransactionAttestor,
};
use chrono::Utc;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    OnceLock,
};
use thiserror::Error;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DepositRequest {
    pub rvm_location: String,
    pub recyclable_type: String,
    pub quantity: u32,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositResponse {
    pub success: bool,
    pub deposit: DepositRecord,
    pub solana_signature: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub recipient_email: String,
    pub amount: Decimal,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    pub success: bool,
    pub solana_signature: String,
}

/// Ошибки, видимые клиенту. Внутренние причины только логируются.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Recipient not found")]
    RecipientNotFound,
    #[error("Insufficient balance")]
    InsufficientBalance,
    #[error("{0}")]
    BadRequest(String),
    #[error("Not found")]
    NotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Request body too large")]
    PayloadTooLarge,
    #[error("{0}")]
    Internal(&'static str),
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static regex"))
}

pub struct RewardService<S, A> {
    store: S,
    attestor: A,
    seq: AtomicU64,
}

impl<S: Store, A: TransactionAttestor> RewardService<S, A> {
    pub fn new(store: S, attestor: A) -> Self {
        Self { store, attestor, seq: AtomicU64::new(0) }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// `Authorization: Bearer <token>` -> пользователь
    pub fn authenticate(&self, bearer: Option<&str>) -> Option<UserId> {
        let token = bearer?.strip_prefix("Bearer ")?.trim();
        if token.is_empty() {
            return None;
        }
        self.store.authenticate(token)
    }

    fn next_id(&self, prefix: &str) -> String {
        let n = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{prefix}_{}_{n}", Utc::now().timestamp_millis())
    }

    pub fn create_deposit(&self, user: Option<&UserId>, req: DepositRequest) -> Result<DepositResponse, ApiError> {
        let user = user.ok_or(ApiError::Unauthorized)?;
        if req.amount <= Decimal::ZERO {
            return Err(ApiError::BadRequest(EcoError::InvalidAmount.to_string()));
        }

        let signature = self
            .attestor
            .attest(EntryKind::Deposit, req.amount)
            .map_err(|e| internal(e, "Failed to process deposit"))?;
        let now = Utc::now();

        let deposit = DepositRecord {
            id: self.next_id("dep"),
            user_id: user.clone(),
            rvm_location: req.rvm_location.clone(),
            recyclable_type: req.recyclable_type.clone(),
            quantity: req.quantity,
            amount: req.amount,
            solana_signature: signature.clone(),
            created_at: now,
        };

        let mut batch = WriteBatch::new();
        batch
            .push(WriteOp::InsertDeposit(deposit.clone()))
            .push(WriteOp::CreateTransaction(TransactionRecord {
                id: self.next_id("tx"),
                user_id: user.clone(),
                kind: EntryKind::Deposit,
                amount: req.amount,
                description: format!("Deposited {} {} at {}", req.quantity, req.recyclable_type, req.rvm_location),
                recipient_id: None,
                recipient_name: None,
                solana_signature: signature.clone(),
                created_at: now,
            }))
            .push(WriteOp::InsertNotification(NotificationRecord {
                id: self.next_id("ntf"),
                user_id: user.clone(),
                kind: EntryKind::Deposit,
                title: "Deposit Successful".into(),
                message: format!(
                    "You earned ${} from depositing {} {}",
                    money(req.amount),
                    req.quantity,
                    req.recyclable_type
                ),
                amount: req.amount,
                solana_signature: Some(signature.clone()),
                read: false,
                created_at: now,
            }));

        self.store.commit(batch).map_err(|e| internal(e, "Failed to process deposit"))?;
        tracing::info!(user = %user, amount = %req.amount, deposit = %deposit.id, "deposit processed");

        Ok(DepositResponse { success: true, deposit, solana_signature: signature })
    }

    pub fn create_transfer(&self, user: Option<&UserId>, req: TransferRequest) -> Result<TransferResponse, ApiError> {
        const FAILED: &str = "Failed to process transfer";

        let user = user.ok_or(ApiError::Unauthorized)?;
        if req.amount <= Decimal::ZERO {
            return Err(ApiError::BadRequest(EcoError::InvalidAmount.to_string()));
        }
        // строка не похожа на адрес: такого профиля заведомо нет, в хранилище не ходим
        let email = req.recipient_email.trim();
        if !email_re().is_match(email) {
            return Err(ApiError::RecipientNotFound);
        }

        let recipient = self
            .store
            .profile_by_email(email)
            .map_err(|e| internal(e, FAILED))?
            .ok_or(ApiError::RecipientNotFound)?;

        let sender = self.store.profile(user).map_err(|e| internal(e, FAILED))?;
        match sender {
            Some(p) if p.wallet_balance >= req.amount => {}
            _ => return Err(ApiError::InsufficientBalance),
        }

        let signature = self
            .attestor
            .attest(EntryKind::Transfer, -req.amount)
            .map_err(|e| internal(e, FAILED))?;
        let now = Utc::now();
        let description = req
            .note
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| format!("Transfer to {}", recipient.full_name));

        let mut batch = WriteBatch::new();
        batch
            .push(WriteOp::CreateTransaction(TransactionRecord {
                id: self.next_id("tx"),
                user_id: user.clone(),
                kind: EntryKind::Transfer,
                amount: req.amount,
                description,
                recipient_id: Some(recipient.id.clone()),
                recipient_name: Some(recipient.full_name.clone()),
                solana_signature: signature.clone(),
                created_at: now,
            }))
            .push(WriteOp::InsertNotification(NotificationRecord {
                id: self.next_id("ntf"),
                user_id: user.clone(),
                kind: EntryKind::Transfer,
                title: "Transfer Sent".into(),
                message: format!("You sent ${} to {}", money(req.amount), recipient.full_name),
                amount: -req.amount,
                solana_signature: Some(signature.clone()),
                read: false,
                created_at: now,
            }))
            .push(WriteOp::InsertNotification(NotificationRecord {
                id: self.next_id("ntf"),
                user_id: recipient.id.clone(),
                kind: EntryKind::Transfer,
                title: "Transfer Received".into(),
                message: format!("You received ${}", money(req.amount)),
                amount: req.amount,
                solana_signature: Some(signature.clone()),
                read: false,
                created_at: now,
            }));

        match self.store.commit(batch) {
            Ok(()) => {}
            // баланс мог измениться между проверкой и записью
            Err(EcoError::InsufficientFunds { .. }) => return Err(ApiError::InsufficientBalance),
            Err(e) => return Err(internal(e, FAILED)),
        }
        tracing::info!(from = %user, to = %recipient.id, amount = %req.amount, "transfer processed");

        Ok(TransferResponse { success: true, solana_signature: signature })
    }

    pub fn notifications(&self, user: Option<&UserId>) -> Result<Vec<NotificationRecord>, ApiError> {
        let user = user.ok_or(ApiError::Unauthorized)?;
        self.store.notifications(user).map_err(|e| internal(e, "Failed to load notifications"))
    }
}

fn internal(cause: EcoError, message: &'static str) -> ApiError {
    tracing::error!(error = %cause, "{message}");
    ApiError::Internal(message)
}
