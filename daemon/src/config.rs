//! Daemon configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;

use rollcall_types::PresenceConfig;
use rollcall_utils::LogFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(#[from] rollcall_types::TypeError),
}

/// Configuration for the daemon.
///
/// Loaded from a TOML file via [`DaemonConfig::from_toml_file`]; CLI flags
/// are layered on top with [`DaemonConfig::apply`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Directory holding the LMDB environment.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_rpc_bind")]
    pub rpc_bind: IpAddr,

    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// LMDB map size in MiB.
    #[serde(default = "default_map_size_mb")]
    pub map_size_mb: usize,

    #[serde(default)]
    pub presence: PresenceConfig,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./rollcall_data")
}

fn default_rpc_bind() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_rpc_port() -> u16 {
    7077
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_map_size_mb() -> usize {
    1024
}

// ── Impl ───────────────────────────────────────────────────────────────

/// Values given on the command line or through `ROLLCALL_*` variables.
#[derive(Debug, Default)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub rpc_bind: Option<IpAddr>,
    pub rpc_port: Option<u16>,
    pub log_format: Option<LogFormat>,
    pub log_level: Option<String>,
    pub validity_secs: Option<u64>,
    pub grace_secs: Option<u64>,
}

impl DaemonConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Layer command-line values over the file (or default) values and
    /// validate the result.
    pub fn apply(mut self, o: Overrides) -> Result<Self, ConfigError> {
        if let Some(v) = o.data_dir {
            self.data_dir = v;
        }
        if let Some(v) = o.rpc_bind {
            self.rpc_bind = v;
        }
        if let Some(v) = o.rpc_port {
            self.rpc_port = v;
        }
        if let Some(v) = o.log_format {
            self.log_format = v;
        }
        if let Some(v) = o.log_level {
            self.log_level = v;
        }
        if let Some(v) = o.validity_secs {
            self.presence.validity_secs = v;
        }
        if let Some(v) = o.grace_secs {
            self.presence.grace_secs = v;
        }
        self.presence.validate()?;
        Ok(self)
    }

    pub fn rpc_addr(&self) -> SocketAddr {
        SocketAddr::new(self.rpc_bind, self.rpc_port)
    }

    pub fn map_size_bytes(&self) -> usize {
        self.map_size_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            rpc_bind: default_rpc_bind(),
            rpc_port: default_rpc_port(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            map_size_mb: default_map_size_mb(),
            presence: PresenceConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = DaemonConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.rpc_port, 7077);
        assert_eq!(config.log_format, LogFormat::Human);
        assert_eq!(config.presence.validity_secs, 20);
        assert_eq!(config.presence.grace_secs, 60);
        assert_eq!(config.rpc_addr().to_string(), "127.0.0.1:7077");
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            rpc_port = 9999
            log_format = "json"

            [presence]
            grace_secs = 30
        "#;
        let config = DaemonConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.rpc_port, 9999);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.presence.grace_secs, 30);
        assert_eq!(config.presence.validity_secs, 20);
    }

    #[test]
    fn cli_values_win_over_file() {
        let config = DaemonConfig::from_toml_str("rpc_port = 9000")
            .unwrap()
            .apply(Overrides {
                rpc_port: Some(9100),
                validity_secs: Some(45),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(config.rpc_port, 9100);
        assert_eq!(config.presence.validity_secs, 45);
    }

    #[test]
    fn short_nonce_is_rejected() {
        let config = DaemonConfig::from_toml_str("[presence]\nnonce_bytes = 8").unwrap();
        assert!(matches!(
            config.apply(Overrides::default()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn unknown_log_format_fails_to_parse() {
        assert!(matches!(
            DaemonConfig::from_toml_str("log_format = \"xml\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = DaemonConfig::from_toml_file(Path::new("/nonexistent/rollcall.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rollcall.toml");
        std::fs::write(&path, "map_size_mb = 64\n").unwrap();
        let config = DaemonConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.map_size_bytes(), 64 << 20);
    }
}
