//! Regions command implementation.

use crate::config::Settings;
use anyhow::Result;

/// Lists the region table, including entries from the settings file.
pub(crate) fn list_regions(settings: &Settings) -> Result<()> {
    let table = settings.region_table();

    if table.is_empty() {
        println!("No regions found.");
        return Ok(());
    }

    println!("{:<6} {:<14} {:<40}", "CODE", "NAME", "GATEWAY");
    println!("{}", "-".repeat(60));

    for code in table.codes() {
        if let Some(region) = table.get(code) {
            println!(
                "{:<6} {:<14} {:<40}",
                region.code(),
                region.name(),
                region.base_url()
            );
        }
    }

    println!("\nTotal: {} regions", table.len());
    Ok(())
}
