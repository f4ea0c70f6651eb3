use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::StoreError;
use crate::schema::Collection;

const DEFAULT_BASE_URL: &str = "https://api.quickbase.com/v1";

/// Table ids for the logical collections inside the realm.
///
/// These are realm-specific and part of the deployed schema contract;
/// the defaults match the documented realm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSet {
    pub work_requests: String,
    pub questions: String,
    pub answers: String,
    pub attachments: String,
}

impl Default for TableSet {
    fn default() -> Self {
        Self {
            work_requests: "buzzytkvk".to_string(),
            questions: "buzzze3pn".to_string(),
            answers: "buzzzhvkj".to_string(),
            attachments: "buz3i82er".to_string(),
        }
    }
}

impl TableSet {
    /// Resolve a logical collection to its table id
    pub fn id(&self, collection: Collection) -> &str {
        match collection {
            Collection::WorkRequests => &self.work_requests,
            Collection::Questions => &self.questions,
            Collection::Answers => &self.answers,
            Collection::Attachments => &self.attachments,
        }
    }
}

/// Connection settings for a record store realm.
///
/// Passed into the client constructor; nothing here is read from
/// process-wide globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Realm hostname, e.g. "yourrealm.quickbase.com"
    pub realm_hostname: String,
    /// Static application token used for the temporary-token exchange
    pub app_token: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub tables: TableSet,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    format!("intake-store/{}", env!("CARGO_PKG_VERSION"))
}

impl StoreConfig {
    /// Create a config with default base URL, user agent and tables
    pub fn new(realm_hostname: impl Into<String>, app_token: impl Into<String>) -> Self {
        Self {
            realm_hostname: realm_hostname.into(),
            app_token: app_token.into(),
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            tables: TableSet::default(),
        }
    }

    /// Override the API base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Override the table id set
    pub fn with_tables(mut self, tables: TableSet) -> Self {
        self.tables = tables;
        self
    }

    /// Load configuration from the platform config file, with
    /// `INTAKE_*` environment variables layered on top.
    pub fn load() -> Result<Self, StoreError> {
        let mut builder = Config::builder();
        if let Some(path) = config_path() {
            builder = builder.add_source(File::from(path).required(false));
        }
        let settings = builder
            .add_source(Environment::with_prefix("INTAKE").separator("__"))
            .build()
            .map_err(|e| StoreError::config(e.to_string()))?;

        let config: StoreConfig = settings
            .try_deserialize()
            .map_err(|e| StoreError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the settings a client needs are present
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.realm_hostname.is_empty() {
            return Err(StoreError::config("realm hostname cannot be empty"));
        }
        if self.app_token.is_empty() {
            return Err(StoreError::config("app token cannot be empty"));
        }
        if self.base_url.is_empty() {
            return Err(StoreError::config("base URL cannot be empty"));
        }
        Ok(())
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("intake/store.toml"))
}
