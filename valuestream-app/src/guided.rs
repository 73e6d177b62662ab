//! Interactive guided collection over stdin.

use anyhow::{Context, Result};
use std::{
    io::{self, BufRead, Write},
    path::Path,
};
use tracing::warn;
use valuestream_core::{
    files,
    intake::{session::GuidedSession, tabular},
};
use valuestream_schemas::file_formats::DatasetFile;

const IMPORT_COMMAND: &str = ":import ";
const QUIT_COMMAND: &str = ":quit";

/// Asks for every missing field until the draft is complete, then saves it to `out`.
///
/// `:import <file.csv>` replaces the drafted steps with a table; `:quit` saves the draft as is.
pub fn run_guided(out: &Path) -> Result<()> {
    let mut session = GuidedSession::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    if let Some(opening) = session.transcript().last() {
        println!("{}", opening.text);
    }

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        let line = line.trim();

        if line == QUIT_COMMAND {
            break;
        }
        if let Some(path) = line.strip_prefix(IMPORT_COMMAND) {
            match tabular::import_csv_path(path.trim()) {
                Ok(report) => println!("{}", session.import_table(report)),
                Err(e) => {
                    warn!(error = %e, "table import failed");
                    println!("Could not import '{}': {}", path.trim(), e);
                }
            }
        } else {
            for reply in session.answer(line) {
                println!("{}", reply);
            }
        }

        if session.is_complete() {
            break;
        }
        print!("> ");
        stdout.flush()?;
    }

    files::save_dataset_file(out, &DatasetFile::new(session.into_dataset()))
        .with_context(|| format!("Failed to write dataset: {}", out.display()))?;
    println!("Dataset written to '{}'", out.display());
    Ok(())
}
