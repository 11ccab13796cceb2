//! CSV export of saved favorites.
//!
//! Column order (`word,translation,date`) and the quoting of every field
//! are a compatibility contract — spreadsheet imports rely on them.

use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use super::store::VocabularyStore;

/// Write the store as CSV to `writer`: a `word,translation,date` header,
/// then one row per favorite in insertion order. Every field is
/// double-quoted with embedded quotes doubled; dates are `YYYY-MM-DD`.
pub fn write_csv<W: Write>(store: &VocabularyStore, writer: &mut W) -> Result<()> {
    writeln!(writer, "word,translation,date").context("failed to write CSV header")?;

    for favorite in store.iter() {
        let date = favorite.added_at.format("%Y-%m-%d");
        writeln!(
            writer,
            "\"{}\",\"{}\",\"{}\"",
            quote(&favorite.word),
            quote(&favorite.translation),
            date
        )
        .context("failed to write CSV row")?;
    }

    writer.flush().context("failed to flush CSV output")?;
    Ok(())
}

/// Export the store to a CSV file at `path`.
pub fn export_to_file(store: &VocabularyStore, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_csv(store, &mut writer)
}

/// Double embedded double-quotes, per RFC 4180.
fn quote(field: &str) -> String {
    field.replace('"', "\"\"")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
