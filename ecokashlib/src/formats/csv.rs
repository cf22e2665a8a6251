//! CSV-выгрузка истории кошелька. Заголовки:
//! id,recorded_at,kind,title,description,amount,display_amount,signature

use crate::{error::Result, model::LedgerEntry};
use csv::WriterBuilder;
use std::io::Write;

#[derive(serde::Serialize)]
struct CsvOutRow<'a> {
    id: &'a str,
    recorded_at: String,
    kind: &'a str,
    title: &'a str,
    description: &'a str,
    amount: String,
    display_amount: String,
    signature: Option<&'a str>,
}

pub struct Csv;

impl crate::traits::WriteFormat for Csv {
    fn write<W: Write>(mut w: W, entries: &[LedgerEntry]) -> Result<()> {
        let mut wrt = WriterBuilder::new().from_writer(&mut w);

        for e in entries {
            let out = CsvOutRow {
                id: &e.id,
                recorded_at: e.recorded_at.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
                kind: e.kind.as_str(),
                title: &e.title,
                description: &e.description,
                amount: e.amount.to_string(),
                display_amount: e.display_amount(),
                signature: e.signature.as_deref(),
            };
            wrt.serialize(out)?;
        }
        wrt.flush()?;
        Ok(())
    }
}
