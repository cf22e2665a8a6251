//! JSON-выгрузка истории: массив записей как есть.

use crate::{error::Result, model::LedgerEntry};
use std::io::Write;

pub struct Json;

impl crate::traits::WriteFormat for Json {
    fn write<W: Write>(mut w: W, entries: &[LedgerEntry]) -> Result<()> {
        serde_json::to_writer_pretty(&mut w, entries)?;
        writeln!(w)?;
        Ok(())
    }
}
