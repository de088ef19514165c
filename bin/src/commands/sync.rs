//! Orders and products harvest commands.
//!
//! Runs discover, plan, fan-out and normalization over one collection and
//! writes the records in the requested format.

use crate::config::Settings;
use crate::display::{open_output, spinner, summary};
use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate};
use clap::Args;
use lazsync_lib::prelude::*;
use lazsync_lib::{EmptyCountPolicy, harvest_records};
use std::io::Write;
use std::path::PathBuf;

/// Options shared by the `orders` and `products` commands.
#[derive(Args, Debug)]
pub(crate) struct SyncArgs {
    /// Seller access token. Defaults to the settings file value
    #[arg(short, long)]
    access_token: Option<String>,

    /// Only items created after this time (RFC 3339, or YYYY-MM-DD for midnight UTC)
    #[arg(long)]
    created_after: Option<String>,

    /// Items requested per page
    #[arg(long, default_value_t = 18)]
    page_size: u32,

    /// Concurrent page fetches
    #[arg(short, long, default_value_t = 5)]
    workers: usize,

    /// Output format (csv, json, ndjson)
    #[arg(short, long, default_value = "csv")]
    format: OutputFormat,

    /// Output file path. Defaults to stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Keep fetched pages when some pages fail
    #[arg(long)]
    allow_partial: bool,

    /// Fail when the gateway reports no total count
    #[arg(long)]
    strict_count: bool,
}

impl SyncArgs {
    fn harvest_config(&self) -> HarvestConfig {
        HarvestConfig {
            page_size: self.page_size,
            workers: self.workers,
            failure_policy: if self.allow_partial {
                FailurePolicy::AcceptPartial
            } else {
                FailurePolicy::AbortOnFailure
            },
            empty_count: if self.strict_count {
                EmptyCountPolicy::Reject
            } else {
                EmptyCountPolicy::TreatAsEmpty
            },
        }
    }

    fn query(&self) -> Result<Params> {
        let mut query = Params::new();
        if let Some(created_after) = &self.created_after {
            query.insert("created_after".to_string(), parse_created_after(created_after)?);
        }
        Ok(query)
    }
}

/// Normalizes a `--created-after` value to RFC 3339.
pub(crate) fn parse_created_after(value: &str) -> Result<String> {
    if let Ok(time) = DateTime::parse_from_rfc3339(value) {
        return Ok(time.to_rfc3339());
    }
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => {
            let Some(midnight) = date.and_hms_opt(0, 0, 0) else {
                bail!("Invalid date: {value}");
            };
            Ok(midnight.and_utc().fixed_offset().to_rfc3339())
        }
        Err(_) => bail!("Invalid created-after time: {value}. Expected RFC 3339 or YYYY-MM-DD"),
    }
}

/// Harvests one collection and writes its records.
pub(crate) async fn sync(
    settings: &Settings,
    collection: Collection,
    args: &SyncArgs,
    quiet: bool,
) -> Result<()> {
    let query = args.query()?;
    let config = args.harvest_config();
    let client = settings.client(args.access_token.as_deref())?;

    let progress = spinner(
        quiet,
        format!("Fetching {collection} from {}", client.region()),
    );
    let result = harvest(&client, collection, &query, &config).await;
    progress.finish_and_clear();

    let harvest = result.with_context(|| format!("Failed to harvest {collection}"))?;
    let records = harvest_records(&harvest)?;

    let mut out = open_output(args.output.as_deref())?;
    args.format.write_records(&records, &mut out)?;
    out.flush()?;

    if !quiet {
        eprintln!("{}", summary(records.len(), &harvest));
        if let Some(path) = &args.output {
            eprintln!("Output written to: {}", path.display());
        }
    }

    Ok(())
}
