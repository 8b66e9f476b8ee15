use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::ConfigError;

/// Per-session settings read by account operations. Built once at startup
/// and shared read-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    /// Quota bar is shown, so quota is worth fetching.
    pub show_quota_bar: bool,
    /// Users may edit (and therefore remove) their default account.
    pub allow_change_email_settings: bool,
    pub calendar_installed: bool,
    pub contacts_installed: bool,
    pub is_mobile: bool,
    /// Running in a secondary browser tab (e.g. a detached compose window).
    pub is_new_tab: bool,
    /// IANA zone name sent with extension requests.
    pub client_time_zone: Option<String>,
}

fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("webmail-account")
        .join("session.json")
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

impl SessionConfig {
    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(path)?;
        Ok(Some(Self::from_json(&data)?))
    }

    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(data)?)
    }

    /// Env vars override individual fields.
    pub fn apply_env(self) -> Self {
        self.apply_overrides(env_var)
    }

    /// Flags read as true for "true" or "1" and false for anything else.
    /// The time zone falls back from `WEBMAIL_TIME_ZONE` to `TZ`.
    fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |name: &str| lookup(name).map(|v| v == "true" || v == "1");
        let flags: [(&str, &mut bool); 6] = [
            ("WEBMAIL_SHOW_QUOTA_BAR", &mut self.show_quota_bar),
            ("WEBMAIL_ALLOW_CHANGE_EMAIL_SETTINGS", &mut self.allow_change_email_settings),
            ("WEBMAIL_CALENDAR", &mut self.calendar_installed),
            ("WEBMAIL_CONTACTS", &mut self.contacts_installed),
            ("WEBMAIL_MOBILE", &mut self.is_mobile),
            ("WEBMAIL_NEW_TAB", &mut self.is_new_tab),
        ];
        for (name, field) in flags {
            if let Some(v) = flag(name) {
                *field = v;
            }
        }
        if let Some(tz) = lookup("WEBMAIL_TIME_ZONE").or_else(|| lookup("TZ")) {
            if !tz.is_empty() {
                self.client_time_zone = Some(tz);
            }
        }
        self
    }

    /// Config file (or defaults), then env overrides.
    pub fn resolve() -> Self {
        Self::resolve_at(&config_path(), env_var)
    }

    fn resolve_at(path: &Path, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base = match Self::load_from(path) {
            Ok(Some(cfg)) => {
                log::info!("Session config loaded from {}", path.display());
                cfg
            }
            Ok(None) => {
                log::info!("No session config file, using defaults");
                Self::default()
            }
            Err(e) => {
                log::warn!("Session config error, using defaults: {}", e);
                Self::default()
            }
        };
        base.apply_overrides(lookup)
    }

    pub fn time_zone(&self) -> &str {
        self.client_time_zone.as_deref().unwrap_or("")
    }
}
