//! Settings file and environment overrides.

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use lazsync_lib::prelude::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the app key.
pub(crate) const ENV_APP_KEY: &str = "LAZSYNC_APP_KEY";
/// Environment variable overriding the app secret.
pub(crate) const ENV_APP_SECRET: &str = "LAZSYNC_APP_SECRET";
/// Environment variable overriding the region.
pub(crate) const ENV_REGION: &str = "LAZSYNC_REGION";

/// A region entry added or replaced by the settings file.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RegionEntry {
    code: String,
    #[serde(default)]
    name: String,
    base_url: String,
}

impl From<RegionEntry> for Region {
    fn from(entry: RegionEntry) -> Self {
        Self::new(entry.code, entry.name, entry.base_url)
    }
}

/// CLI settings.
///
/// ```json
/// {
///   "app_key": "123456",
///   "app_secret": "...",
///   "region": "MY",
///   "access_token": "...",
///   "timeout_secs": 30,
///   "regions": [{ "code": "MY", "name": "Staging", "base_url": "https://..." }]
/// }
/// ```
#[derive(Default, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) app_key: Option<String>,
    pub(crate) app_secret: Option<String>,
    pub(crate) region: Option<String>,
    /// Seller access token used when a command gets none.
    pub(crate) access_token: Option<String>,
    pub(crate) timeout_secs: Option<u64>,
    pub(crate) regions: Vec<RegionEntry>,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("app_key", &self.app_key)
            .field("app_secret", &self.app_secret.as_ref().map(|_| "<redacted>"))
            .field("region", &self.region)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .field("regions", &self.regions)
            .finish()
    }
}

impl Settings {
    /// Returns the default settings path.
    ///
    /// - Linux: `~/.config/lazsync/config.json`
    /// - macOS: `~/Library/Application Support/lazsync/config.json`
    /// - Windows: `C:\Users\<User>\AppData\Roaming\lazsync\config\config.json`
    pub(crate) fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "lazsync").map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Loads settings from `path`, or from the default path if it exists.
    ///
    /// A missing explicit file is an error; a missing default file yields
    /// empty settings.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Reads settings from a JSON file.
    pub(crate) fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid settings file {}", path.display()))
    }

    /// Applies environment overrides read through `var`.
    pub(crate) fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(key) = var(ENV_APP_KEY) {
            self.app_key = Some(key);
        }
        if let Some(secret) = var(ENV_APP_SECRET) {
            self.app_secret = Some(secret);
        }
        if let Some(region) = var(ENV_REGION) {
            self.region = Some(region);
        }
    }

    /// Returns the configured region code.
    pub(crate) fn region(&self) -> Result<&str> {
        match self.region.as_deref() {
            Some(region) if !region.trim().is_empty() => Ok(region),
            _ => bail!("No region configured. Pass --region or set {ENV_REGION}"),
        }
    }

    /// Returns the configured app key.
    pub(crate) fn app_key(&self) -> Result<&str> {
        self.app_key
            .as_deref()
            .with_context(|| format!("No app key configured. Set {ENV_APP_KEY}"))
    }

    /// Returns the built-in region table with the settings' entries applied.
    pub(crate) fn region_table(&self) -> RegionTable {
        RegionTable::global().with_overrides(self.regions.iter().cloned().map(Region::from))
    }

    /// Returns the client configuration.
    pub(crate) fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default();
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        config
    }

    /// Builds an API client, applying `access_token` or the configured one.
    pub(crate) fn client(&self, access_token: Option<&str>) -> Result<ApiClient> {
        let app_secret = self
            .app_secret
            .as_deref()
            .with_context(|| format!("No app secret configured. Set {ENV_APP_SECRET}"))?;
        let credentials = Credentials::new(self.app_key()?, app_secret, self.region()?)?;
        let mut client =
            ApiClient::with_regions(credentials, self.client_config(), self.region_table())?;

        if let Some(token) = access_token.or(self.access_token.as_deref()) {
            client.set_access_token(token);
        }
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn write_settings(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_from_file() {
        let file = write_settings(
            r#"{
                "app_key": "123456",
                "app_secret": "helloworld",
                "region": "my",
                "timeout_secs": 5,
                "regions": [{"code": "my", "name": "Mock", "base_url": "http://127.0.0.1:9/rest/"}]
            }"#,
        );

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.app_key().unwrap(), "123456");
        assert_eq!(settings.region().unwrap(), "my");
        assert_eq!(settings.client_config().timeout, Duration::from_secs(5));

        let table = settings.region_table();
        assert_eq!(
            table.get("MY").unwrap().base_url(),
            "http://127.0.0.1:9/rest"
        );
        assert!(table.get("SG").is_some());

        let client = settings.client(Some("seller-token")).unwrap();
        assert_eq!(client.region(), "MY");
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(Some(&dir.path().join("absent.json"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read settings file"));
    }

    #[test]
    fn test_invalid_file() {
        let file = write_settings("{ not json");
        let err = Settings::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid settings file"));
    }

    #[test]
    fn test_env_overrides() {
        let file = write_settings(r#"{"app_key": "from-file", "region": "SG"}"#);
        let mut settings = Settings::from_file(file.path()).unwrap();

        let env: HashMap<&str, &str> = [
            (ENV_APP_KEY, "from-env"),
            (ENV_APP_SECRET, "s3cret"),
        ]
        .into_iter()
        .collect();
        settings.apply_env(|key| env.get(key).map(ToString::to_string));

        assert_eq!(settings.app_key().unwrap(), "from-env");
        assert_eq!(settings.app_secret.as_deref(), Some("s3cret"));
        assert_eq!(settings.region().unwrap(), "SG");
    }

    #[test]
    fn test_missing_credentials() {
        let settings = Settings {
            app_key: Some("123456".to_string()),
            region: Some("MY".to_string()),
            ..Settings::default()
        };
        let err = settings.client(None).unwrap_err();
        assert!(err.to_string().contains(ENV_APP_SECRET));

        let settings = Settings::default();
        assert!(settings.region().is_err());
        assert!(settings.app_key().is_err());
    }

    #[test]
    fn test_unknown_region_rejected() {
        let settings = Settings {
            app_key: Some("123456".to_string()),
            app_secret: Some("helloworld".to_string()),
            region: Some("XX".to_string()),
            ..Settings::default()
        };
        assert!(settings.client(None).is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let settings = Settings {
            app_secret: Some("helloworld".to_string()),
            access_token: Some("seller-token".to_string()),
            ..Settings::default()
        };
        let debug = format!("{settings:?}");
        assert!(!debug.contains("helloworld"));
        assert!(!debug.contains("seller-token"));
        assert!(debug.contains("<redacted>"));
    }
}
