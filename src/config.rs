// The `config` module gathers everything a triage run needs from code or the environment.

use crate::pipeline::OwnerIdentity;
use crate::pipeline::paginator::DEFAULT_LABEL;
use crate::utils::google_auth::GoogleAuthConfig;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

pub const FIRST_NAME_VAR: &str = "USER_FIRST_NAME";
pub const LAST_NAME_VAR: &str = "USER_LAST_NAME";
pub const CREDENTIALS_PATH_VAR: &str = "GMAIL_CREDENTIALS_PATH";
pub const TOKEN_PATH_VAR: &str = "GMAIL_TOKEN_PATH";
pub const LABEL_VAR: &str = "TRIAGE_LABEL";
pub const MODEL_VAR: &str = "TRIAGE_MODEL";
pub const DRY_RUN_VAR: &str = "TRIAGE_DRY_RUN";

pub const DEFAULT_CREDENTIALS_PATH: &str = "credentials.json";
pub const DEFAULT_TOKEN_PATH: &str = "token.json";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required value was neither set on the builder nor in the environment.
    #[error("Missing required setting: {0}")]
    Missing(&'static str),
}

/// Everything a triage run needs.
#[derive(Debug, Clone)]
pub struct TriageConfig {
    pub owner: OwnerIdentity,
    pub auth: GoogleAuthConfig,
    pub label: String,
    pub model: String,
    pub dry_run: bool,
}

/// A builder for [`TriageConfig`].
///
/// Any value left unset is read from the environment when `build` runs.
#[derive(Default)]
pub struct TriageConfigBuilder {
    first_name: Option<String>,
    last_name: Option<String>,
    credentials_path: Option<PathBuf>,
    token_path: Option<PathBuf>,
    label: Option<String>,
    model: Option<String>,
    dry_run: Option<bool>,
}

impl TriageConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the mailbox owner's name.
    ///
    /// If not set, `USER_FIRST_NAME` and `USER_LAST_NAME` are used.
    pub fn with_owner(mut self, first_name: &str, last_name: &str) -> Self {
        self.first_name = Some(first_name.to_string());
        self.last_name = Some(last_name.to_string());
        self
    }

    pub fn with_credentials_path(mut self, path: PathBuf) -> Self {
        self.credentials_path = Some(path);
        self
    }

    pub fn with_token_path(mut self, path: PathBuf) -> Self {
        self.token_path = Some(path);
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = Some(model.to_string());
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = Some(dry_run);
        self
    }

    pub fn build(self) -> Result<TriageConfig, ConfigError> {
        let first_name = required(self.first_name, FIRST_NAME_VAR)?;
        let last_name = required(self.last_name, LAST_NAME_VAR)?;

        let credentials_path = self
            .credentials_path
            .or_else(|| env::var(CREDENTIALS_PATH_VAR).ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_PATH));
        let token_path = self
            .token_path
            .or_else(|| env::var(TOKEN_PATH_VAR).ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_PATH));

        let label = self
            .label
            .or_else(|| env::var(LABEL_VAR).ok())
            .unwrap_or_else(|| DEFAULT_LABEL.to_string());
        let model = self
            .model
            .or_else(|| env::var(MODEL_VAR).ok())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let dry_run = self.dry_run.unwrap_or_else(|| {
            env::var(DRY_RUN_VAR)
                .map(|v| matches!(v.trim(), "1" | "true"))
                .unwrap_or(false)
        });

        Ok(TriageConfig {
            owner: OwnerIdentity::new(&first_name, &last_name),
            auth: GoogleAuthConfig::new(credentials_path, token_path),
            label,
            model,
            dry_run,
        })
    }
}

fn required(value: Option<String>, var: &'static str) -> Result<String, ConfigError> {
    value
        .or_else(|| env::var(var).ok())
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(var))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_static::lazy_static;
    use std::sync::Mutex;

    lazy_static! {
        static ref ENV_LOCK: Mutex<()> = Mutex::new(());
    }

    const ALL_VARS: [&str; 7] = [
        FIRST_NAME_VAR,
        LAST_NAME_VAR,
        CREDENTIALS_PATH_VAR,
        TOKEN_PATH_VAR,
        LABEL_VAR,
        MODEL_VAR,
        DRY_RUN_VAR,
    ];

    fn clear_env() {
        for var in ALL_VARS {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }

    #[test]
    fn builder_values_with_defaults() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env();

        let config = TriageConfigBuilder::new()
            .with_owner(" Ada ", "Lovelace")
            .build()
            .unwrap();

        assert_eq!(config.owner, OwnerIdentity::new("Ada", "Lovelace"));
        assert_eq!(config.auth.credentials_path(), &PathBuf::from("credentials.json"));
        assert_eq!(config.auth.token_path(), &PathBuf::from("token.json"));
        assert_eq!(config.label, "INBOX");
        assert_eq!(config.model, "gpt-4o-mini");
        assert!(!config.dry_run);
    }

    #[test]
    fn values_fall_back_to_env() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env();
        unsafe {
            std::env::set_var(FIRST_NAME_VAR, "Grace");
            std::env::set_var(LAST_NAME_VAR, "Hopper");
            std::env::set_var(TOKEN_PATH_VAR, "/tmp/triage-token.json");
            std::env::set_var(LABEL_VAR, "CATEGORY_PROMOTIONS");
            std::env::set_var(DRY_RUN_VAR, "true");
        }

        let config = TriageConfigBuilder::new().build().unwrap();

        assert_eq!(config.owner.first_name(), "Grace");
        assert_eq!(config.owner.last_name(), "Hopper");
        assert_eq!(config.auth.token_path(), &PathBuf::from("/tmp/triage-token.json"));
        assert_eq!(config.label, "CATEGORY_PROMOTIONS");
        assert!(config.dry_run);
        clear_env();
    }

    #[test]
    fn builder_overrides_env() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env();
        unsafe {
            std::env::set_var(MODEL_VAR, "from-env");
            std::env::set_var(DRY_RUN_VAR, "1");
        }

        let config = TriageConfigBuilder::new()
            .with_owner("Ada", "Lovelace")
            .with_model("from-builder")
            .with_dry_run(false)
            .build()
            .unwrap();

        assert_eq!(config.model, "from-builder");
        assert!(!config.dry_run);
        clear_env();
    }

    #[test]
    fn missing_owner_is_an_error() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env();
        unsafe {
            std::env::set_var(FIRST_NAME_VAR, "Ada");
            std::env::set_var(LAST_NAME_VAR, "   ");
        }

        let result = TriageConfigBuilder::new().build();

        match result {
            Err(ConfigError::Missing(var)) => assert_eq!(var, LAST_NAME_VAR),
            other => panic!("Expected missing last name, got {:?}", other.map(|c| c.owner)),
        }
        clear_env();
    }
}
