//! Authorization URL command.

use crate::config::Settings;
use anyhow::Result;
use lazsync_lib::authorize_url;

/// Prints the URL a seller opens to authorize the app.
pub(crate) fn print_auth_url(settings: &Settings, callback: &str) -> Result<()> {
    let url = authorize_url(settings.app_key()?, settings.region()?, callback)?;
    println!("{url}");
    Ok(())
}
