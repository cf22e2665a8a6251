//! Доменные модели — записи журнала, профиль и строки хранилища.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Метка времени записи на экране; реальное время хранится в `recorded_at`.
pub const JUST_NOW: &str = "Just now";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Transfer,
    Payment,
    Donation,
    Deposit,
    Collection,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::Transfer => "transfer",
            EntryKind::Payment => "payment",
            EntryKind::Donation => "donation",
            EntryKind::Deposit => "deposit",
            EntryKind::Collection => "collection",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            EntryKind::Transfer => "💸",
            EntryKind::Payment => "💳",
            EntryKind::Donation => "❤️",
            EntryKind::Deposit => "♻️",
            EntryKind::Collection => "🚛",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Описание будущей записи: всё, кроме суммы, id и подписи.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMeta {
    pub kind: EntryKind,
    pub title: String,
    pub description: String,
    pub icon: String,
}

impl EntryMeta {
    pub fn new(kind: EntryKind, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            description: description.into(),
            icon: kind.icon().to_string(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: String,
    pub kind: EntryKind,
    pub title: String,
    pub description: String,
    /// Знаковая сумма: `+` начисление, `-` списание.
    pub amount: Decimal,
    pub occurred_at: String,
    pub recorded_at: DateTime<Utc>,
    pub icon: String,
    pub signature: Option<String>,
}

impl LedgerEntry {
    /// `+$2.50` / `-$10.00`
    pub fn display_amount(&self) -> String {
        signed_money(self.amount)
    }
}

/// Два знака после запятой, половина округляется от нуля.
pub fn money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

pub fn signed_money(amount: Decimal) -> String {
    if amount.is_sign_negative() && !amount.is_zero() {
        format!("-${}", money(amount.abs()))
    } else {
        format!("+${}", money(amount))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub wallet_balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DepositRecord {
    pub id: String,
    pub user_id: UserId,
    pub rvm_location: String,
    pub recyclable_type: String,
    pub quantity: u32,
    pub amount: Decimal,
    pub solana_signature: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    pub user_id: UserId,
    pub kind: EntryKind,
    pub amount: Decimal,
    pub description: String,
    pub recipient_id: Option<UserId>,
    pub recipient_name: Option<String>,
    pub solana_signature: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    pub id: String,
    pub user_id: UserId,
    pub kind: EntryKind,
    pub title: String,
    pub message: String,
    /// Знаковая сумма, как в журнале кошелька.
    pub amount: Decimal,
    pub solana_signature: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_rounds_like_to_fixed() {
        assert_eq!(money(Decimal::new(25, 1)), "2.50");
        assert_eq!(money(Decimal::new(1005, 3)), "1.01");
        assert_eq!(money(Decimal::from(10)), "10.00");
        assert_eq!(signed_money(Decimal::new(-1000, 2)), "-$10.00");
        assert_eq!(signed_money(Decimal::new(550, 2)), "+$5.50");
    }
}
