//! Catalog command implementation

use anyhow::Result;
use macrolens_core::source::CATALOG;

pub fn cmd_catalog() -> Result<()> {
    println!();
    println!("📚 Suggested SGS Series");
    println!("   ─────────────────────────────────────────────────────────────");

    for entry in CATALOG.iter() {
        println!("   {:>6} │ {}", entry.code, entry.name);
    }

    println!();
    println!("Fetch one with: macrolens sync <code>");

    Ok(())
}
