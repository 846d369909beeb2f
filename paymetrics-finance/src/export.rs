//! CSV and JSON serialization of extracted records.
//!
//! Column order follows the field order of `ExtractedTransaction`, so a file
//! written here reads back with `read_csv`.

use std::io::{Read, Write};

use paymetrics_core::{ExtractedTransaction, Result};

pub fn write_csv<W: Write>(records: &[ExtractedTransaction], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_csv<R: Read>(reader: R) -> Result<Vec<ExtractedTransaction>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut records = Vec::new();
    for row in rdr.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

pub fn write_json<W: Write>(records: &[ExtractedTransaction], writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, records)?;
    Ok(())
}
