//! SIM list loading.
//!
//! The file has no header and exactly two columns per line: ICCID, passcode.

use crate::error::{Error, Result};
use crate::models::SimRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Load the SIM list from a CSV file.
pub fn load_sim_list(path: &Path) -> Result<Vec<SimRecord>> {
    let file = File::open(path).map_err(|source| Error::CsvOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let sims = read_sim_list(file, path)?;
    log::info!("Loaded {} SIMs from {}", sims.len(), path.display());
    Ok(sims)
}

/// Parse SIM rows from any reader; `path` is only used in error messages.
pub fn read_sim_list<R: Read>(input: R, path: &Path) -> Result<Vec<SimRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut sims = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| Error::CsvRead {
            path: path.to_path_buf(),
            source,
        })?;
        if record.len() != 2 {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(Error::CsvColumns {
                line,
                found: record.len(),
            });
        }
        sims.push(SimRecord::new(&record[0], &record[1]));
    }
    Ok(sims)
}
