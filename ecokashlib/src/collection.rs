//! Подписка на вывоз: бак и регулярные сборы раз в 14 дней.

use crate::{
    error::{EcoError, Result},
    model::{EntryKind, EntryMeta, LedgerEntry},
    traits::TransactionAttestor,
    wallet::Wallet,
};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

pub const COLLECTION_INTERVAL_DAYS: i64 = 14;
pub const DELIVERY_DAYS: i64 = 7;

/// `record_collection` есть только у `ActiveBin`, поэтому сбор без бака не выразить.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CollectionLifecycle {
    #[default]
    NoBin,
    Active(ActiveBin),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveBin {
    pub purchased_at: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
    pub cumulative_amount: Decimal,
    pub cumulative_items: u64,
    pub last_collection: Option<DateTime<Utc>>,
    pub next_collection: DateTime<Utc>,
}

impl CollectionLifecycle {
    pub fn has_bin(&self) -> bool {
        matches!(self, CollectionLifecycle::Active(_))
    }

    pub fn active(&self) -> Option<&ActiveBin> {
        match self {
            CollectionLifecycle::Active(bin) => Some(bin),
            CollectionLifecycle::NoBin => None,
        }
    }

    pub fn active_mut(&mut self) -> Option<&mut ActiveBin> {
        match self {
            CollectionLifecycle::Active(bin) => Some(bin),
            CollectionLifecycle::NoBin => None,
        }
    }

    /// Повторная покупка начинает подписку заново с нулевыми итогами.
    pub fn purchase_bin(&mut self, now: DateTime<Utc>) -> ActiveBin {
        let bin = ActiveBin {
            purchased_at: now,
            delivery_date: now + Duration::days(DELIVERY_DAYS),
            cumulative_amount: Decimal::ZERO,
            cumulative_items: 0,
            last_collection: None,
            next_collection: now + Duration::days(COLLECTION_INTERVAL_DAYS),
        };
        tracing::info!(next = %bin.next_collection.date_naive(), "collection bin purchased");
        *self = CollectionLifecycle::Active(bin);
        bin
    }

    pub fn require_active(&mut self) -> Result<&mut ActiveBin> {
        self.active_mut().ok_or(EcoError::NoBin)
    }
}

impl ActiveBin {
    pub fn record_collection<A: TransactionAttestor>(
        &mut self,
        wallet: &mut Wallet,
        attestor: &A,
        amount: Decimal,
        items: u32,
        now: DateTime<Utc>,
    ) -> Result<LedgerEntry> {
        let meta = EntryMeta::new(
            EntryKind::Collection,
            "Collection Completed",
            format!("Collected {items} items from your bin"),
        );
        let entry = wallet.credit(attestor, amount, meta)?;

        self.cumulative_amount += amount;
        self.cumulative_items += u64::from(items);
        self.last_collection = Some(now);
        self.next_collection = now + Duration::days(COLLECTION_INTERVAL_DAYS);

        tracing::info!(
            total = %self.cumulative_amount,
            items = self.cumulative_items,
            next = %self.next_collection.date_naive(),
            "collection recorded"
        );
        Ok(entry)
    }

    /// «October 31, 2025»
    pub fn next_collection_label(&self) -> String {
        self.next_collection.format("%B %-d, %Y").to_string()
    }
}
