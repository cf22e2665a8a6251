//! Кошелёк: баланс и журнал записей (новые сверху).
//!
//! Баланс не хранится отдельно: это начальный баланс из профиля плюс сумма
//! знаковых сумм всех записей журнала.

use crate::{
    error::{EcoError, Result},
    model::{EntryMeta, LedgerEntry, JUST_NOW},
    traits::TransactionAttestor,
};
use chrono::Utc;
use rust_decimal::Decimal;
use std::str::FromStr;

#[derive(Debug, Clone, Default)]
pub struct Wallet {
    opening_balance: Decimal,
    entries: Vec<LedgerEntry>,
    seq: u64,
}

impl Wallet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_opening_balance(opening_balance: Decimal) -> Self {
        Self { opening_balance, ..Self::default() }
    }

    pub fn opening_balance(&self) -> Decimal {
        self.opening_balance
    }

    pub fn balance(&self) -> Decimal {
        self.opening_balance + self.entries.iter().map(|e| e.amount).sum::<Decimal>()
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn find(&self, id: &str) -> Option<&LedgerEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Сбрасывает журнал и принимает новый начальный баланс (после перезагрузки профиля).
    pub fn reseed(&mut self, opening_balance: Decimal) {
        self.opening_balance = opening_balance;
        self.entries.clear();
    }

    pub fn credit<A: TransactionAttestor>(
        &mut self,
        attestor: &A,
        amount: Decimal,
        meta: EntryMeta,
    ) -> Result<LedgerEntry> {
        ensure_positive(amount)?;
        self.record(attestor, amount, meta)
    }

    pub fn debit<A: TransactionAttestor>(
        &mut self,
        attestor: &A,
        amount: Decimal,
        meta: EntryMeta,
    ) -> Result<LedgerEntry> {
        ensure_positive(amount)?;
        let available = self.balance();
        if amount > available {
            tracing::debug!(%amount, %available, kind = %meta.kind, "debit rejected");
            return Err(EcoError::InsufficientFunds { requested: amount, available });
        }
        self.record(attestor, -amount, meta)
    }

    // подпись берётся до любых изменений: ошибка аттестации состояние не трогает
    fn record<A: TransactionAttestor>(
        &mut self,
        attestor: &A,
        signed: Decimal,
        meta: EntryMeta,
    ) -> Result<LedgerEntry> {
        let signature = attestor.attest(meta.kind, signed)?;
        let now = Utc::now();
        self.seq += 1;

        let entry = LedgerEntry {
            id: format!("{}-{}", now.timestamp_millis(), self.seq),
            kind: meta.kind,
            title: meta.title,
            description: meta.description,
            amount: signed,
            occurred_at: JUST_NOW.to_string(),
            recorded_at: now,
            icon: meta.icon,
            signature: Some(signature),
        };
        self.entries.insert(0, entry.clone());

        tracing::info!(id = %entry.id, kind = %entry.kind, amount = %entry.display_amount(), "ledger entry recorded");
        Ok(entry)
    }
}

fn ensure_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(EcoError::InvalidAmount);
    }
    Ok(())
}

/// Разбор суммы из поля формы. Нечисловое значение или сумма не больше нуля дают `InvalidAmount`.
pub fn parse_amount(input: &str) -> Result<Decimal> {
    let amount = Decimal::from_str(input.trim()).map_err(|_| EcoError::InvalidAmount)?;
    ensure_positive(amount)?;
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::EntryKind, signature::FixedAttestor};

    fn att() -> FixedAttestor {
        FixedAttestor("sig".into())
    }

    #[test]
    fn ids_are_unique_within_wallet() {
        let mut w = Wallet::new();
        let a = w.credit(&att(), Decimal::ONE, EntryMeta::new(EntryKind::Deposit, "a", "a")).unwrap();
        let b = w.credit(&att(), Decimal::ONE, EntryMeta::new(EntryKind::Deposit, "b", "b")).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(w.find(&a.id).map(|e| e.title.as_str()), Some("a"));
    }

    #[test]
    fn parse_amount_rejects_garbage() {
        assert!(matches!(parse_amount("abc"), Err(EcoError::InvalidAmount)));
        assert!(matches!(parse_amount(""), Err(EcoError::InvalidAmount)));
        assert!(matches!(parse_amount("0"), Err(EcoError::InvalidAmount)));
        assert!(matches!(parse_amount("-3"), Err(EcoError::InvalidAmount)));
        assert_eq!(parse_amount(" 2.50 ").unwrap(), Decimal::new(250, 2));
    }
}
