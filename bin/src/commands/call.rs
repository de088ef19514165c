//! Generic signed call command.

use crate::config::Settings;
use crate::display::print_json;
use anyhow::{Context, Result};
use bytes::Bytes;
use clap::Args;
use lazsync_lib::prelude::*;
use std::path::PathBuf;

/// Options of the `call` command.
#[derive(Args, Debug)]
pub(crate) struct CallArgs {
    /// API path (e.g., /orders/get)
    path: String,

    /// HTTP method (get, post)
    #[arg(short, long, default_value = "get")]
    method: ApiMethod,

    /// API parameter as key=value. Repeatable
    #[arg(short, long = "param", value_parser = parse_pair)]
    params: Vec<(String, String)>,

    /// File attachment as key=path. Repeatable; POST only
    #[arg(long = "file", value_parser = parse_pair)]
    files: Vec<(String, String)>,

    /// Seller access token. Defaults to the settings file value
    #[arg(short, long)]
    access_token: Option<String>,

    /// Set the gateway debug flag
    #[arg(long)]
    debug: bool,
}

/// Parses a `key=value` argument. The value may contain `=`.
pub(crate) fn parse_pair(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{s}'")),
    }
}

/// Adds the `--param` values and, only when requested, the debug flag.
fn apply_params(client: &mut ApiClient, args: &CallArgs) {
    if args.debug {
        client.set_debug(true);
    }
    for (key, value) in &args.params {
        client.add_api_param(key.as_str(), value.as_str());
    }
}

/// Makes one signed call and prints the envelope.
///
/// Fails after printing if the envelope reports an error.
pub(crate) async fn call(settings: &Settings, args: &CallArgs) -> Result<()> {
    let mut client = settings.client(args.access_token.as_deref())?;
    apply_params(&mut client, args);

    for (key, path) in &args.files {
        let path = PathBuf::from(path);
        let data = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        client.add_file_param(key.as_str(), Bytes::from(data));
    }

    let envelope = client
        .execute(&args.path, args.method, None)
        .await
        .with_context(|| format!("Call to {} failed", args.path))?;
    print_json(&envelope)?;

    client.ensure_success(envelope)?;
    Ok(())
}
