//! Token exchange command.

use crate::config::Settings;
use crate::display::print_json;
use anyhow::{Context, Result};
use lazsync_lib::exchange_code;

/// Exchanges an authorization code and prints the grant as JSON.
pub(crate) async fn exchange(settings: &Settings, code: &str) -> Result<()> {
    let mut client = settings.client(None)?;
    let grant = exchange_code(&mut client, code)
        .await
        .context("Token exchange failed")?;
    print_json(&grant)
}
