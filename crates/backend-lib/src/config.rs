// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::auth::{HashAlgorithm, SESSION_TTL};


/// Config file read from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix of environment overrides, e.g. `LOGINSVC_SERVER__PORT`
pub const ENV_PREFIX: &str = "LOGINSVC_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const MAX_SESSION_TTL_SECS: u64 = 60 * 60 * 24 * 365;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub session: SessionSettings,
    pub auth: AuthSettings,
}

/// HTTP listener
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Which user store backs the service
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Persistent,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// Directory of the persistent store
    pub path: PathBuf,
    /// Create the demo accounts when they are missing
    pub seed_demo_users: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionSettings {
    /// Absolute session lifetime in seconds
    pub ttl_secs: u64,
    /// Period of the expired-session sweep; 0 leaves expiry lazy
    pub sweep_interval_secs: u64,
}

/// Password hashing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AuthSettings {
    pub algorithm: HashAlgorithm,
    pub argon2_memory_kib: u32,
    pub argon2_iterations: u32,
    pub scrypt_log_n: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            server: ServerSettings::default(),
            storage: StorageSettings::default(),
            session: SessionSettings::default(),
            auth: AuthSettings::default(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            path: PathBuf::from("data"),
            seed_demo_users: true,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ttl_secs: SESSION_TTL.as_secs(),
            sweep_interval_secs: 0,
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::Argon2,
            argon2_memory_kib: argon2::Params::DEFAULT_M_COST,
            argon2_iterations: argon2::Params::DEFAULT_T_COST,
            scrypt_log_n: 15,
        }
    }
}

impl SessionSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_secs > 0).then(|| Duration::from_secs(self.sweep_interval_secs))
    }
}

impl Settings {
    /// Load settings from `config.toml` in the working directory and the environment
    pub fn load() -> Result<Self> {
        let settings: Settings = Self::figment(DEFAULT_CONFIG_FILE).extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from an explicit config file and the environment
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            bail!("config file {} does not exist", path.display());
        }
        let settings: Settings = Self::figment(path).extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Defaults, then the file, then `LOGINSVC_*`, then a bare `PORT`
    fn figment<P: AsRef<Path>>(file: P) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(file.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Env::raw().only(&["PORT"]).map(|_| "server.port".into()))
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            bail!("invalid log level '{}'", self.log_level);
        }
        if self.server.port == 0 {
            bail!("server.port must be non-zero");
        }
        if self.session.ttl_secs == 0 || self.session.ttl_secs > MAX_SESSION_TTL_SECS {
            bail!("session.ttl_secs must be between 1 and {MAX_SESSION_TTL_SECS}");
        }
        if self.storage.backend == StorageBackend::Persistent
            && self.storage.path.as_os_str().is_empty()
        {
            bail!("storage.path is required for the persistent backend");
        }
        if self.auth.argon2_memory_kib < argon2::Params::MIN_M_COST {
            bail!(
                "auth.argon2_memory_kib must be at least {}",
                argon2::Params::MIN_M_COST
            );
        }
        if self.auth.argon2_iterations == 0 {
            bail!("auth.argon2_iterations must be non-zero");
        }
        if !(1..=20).contains(&self.auth.scrypt_log_n) {
            bail!("auth.scrypt_log_n must be between 1 and 20");
        }
        Ok(())
    }
}
