use super::error::Result;
use super::ledger::Estate;
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};
use tracing::debug;

pub fn load_estate_json(path: impl AsRef<Path>) -> Result<Estate> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let estate: Estate = serde_json::from_reader(reader)?;
    estate.check_amounts()?;
    debug!(path = %path.display(), properties = estate.properties.len(), "estate loaded");
    Ok(estate)
}

pub fn save_estate_json(path: impl AsRef<Path>, estate: &Estate) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, estate)?;
    writer.flush()?;
    debug!(path = %path.display(), "estate saved");
    Ok(())
}
