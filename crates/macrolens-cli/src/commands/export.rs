//! Export command implementation

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use macrolens_core::{Database, DateRange, ExportFormat};

pub fn cmd_export(
    db: &Database,
    code: i64,
    range: DateRange,
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<()> {
    let rendered = db
        .export_observations(code, range, format)
        .with_context(|| format!("Failed to export series {}", code))?;

    match output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("✅ Exported series {} as {} to {}", code, format, path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
