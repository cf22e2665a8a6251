//! Точки расширения: аттестация операций и выгрузка истории на основе std::io::Write.

use crate::{error::Result, model::{EntryKind, LedgerEntry}};
use rust_decimal::Decimal;
use std::io::Write;

/// Выдаёт непрозрачную строку-подпись для операции, меняющей баланс.
///
/// Реальная реализация ходила бы в распределённый реестр; остальной код
/// работает только с контрактом «строка в ответ на операцию».
pub trait TransactionAttestor {
    fn attest(&self, kind: EntryKind, amount: Decimal) -> Result<String>;
}

pub trait WriteFormat {
    fn write<W: Write>(w: W, entries: &[LedgerEntry]) -> Result<()>;
}
