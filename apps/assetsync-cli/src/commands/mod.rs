//! One module per program. `execute` sets up logging and runs; `run` is
//! the part that does not touch global state.

pub mod asset_import;
pub mod user_import;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{CliError, CliResult};

/// Open the input CSV, reporting a missing file as such.
fn open_input(path: &Path) -> CliResult<BufReader<File>> {
    match File::open(path) {
        Ok(file) => Ok(BufReader::new(file)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::InputNotFound(path.display().to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
