/*!
Pipeline configuration (spec §6), loaded from a JSON file the way the
original Go implementation's `loadConfig` does, with two environment
variables overriding the registry's HTTP Basic Auth credentials, and
(in the `cli` feature) a `--config` flag overriding the config path the
way the original's `-config` flag does.
*/
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub registry_path: String,
    pub output_file: String,
    /// Shell command launched asynchronously, fire-and-forget, after a
    /// successful publish (spec §4.6, §6 "post-generation shell command").
    #[serde(default)]
    pub post_generate_command: Option<String>,
    pub mrt_collector: MrtCollectorConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MrtCollectorConfig {
    pub master4_url: String,
    pub master6_url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub insecure_skip_verify: bool,
    /// Custom DNS server (`ip:port`) used to resolve the collector's
    /// hostnames, overriding the system resolver (spec §4.1, §6).
    #[serde(default)]
    pub dns_server: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub enabled: bool,
    pub listen_addr: String,
    pub auth_token: String,
}

impl Config {
    /// Loads the config file, then applies `MRT_BASIC_AUTH_USER` /
    /// `MRT_BASIC_AUTH_PASSWORD` overrides if set (spec §6, higher
    /// priority than the file).
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let mut config: Config = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        if let Ok(user) = std::env::var("MRT_BASIC_AUTH_USER") {
            if !user.is_empty() {
                config.mrt_collector.username = user;
            }
        }
        if let Ok(password) = std::env::var("MRT_BASIC_AUTH_PASSWORD") {
            if !password.is_empty() {
                config.mrt_collector.password = password;
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_config_and_applies_env_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{
                "registry_path": "/var/dn42/registry",
                "output_file": "/var/dn42/map.bin",
                "mrt_collector": {
                    "master4_url": "https://example.dn42/master4.mrt.bz2",
                    "master6_url": "https://example.dn42/master6.mrt.bz2",
                    "username": "file-user",
                    "password": "file-pass",
                    "insecure_skip_verify": true
                },
                "api": {
                    "enabled": true,
                    "listen_addr": "0.0.0.0:8080",
                    "auth_token": "secret"
                }
            }"#,
        )
        .unwrap();

        std::env::set_var("MRT_BASIC_AUTH_USER", "env-user");
        std::env::remove_var("MRT_BASIC_AUTH_PASSWORD");
        let config = Config::load(&path).unwrap();
        std::env::remove_var("MRT_BASIC_AUTH_USER");

        assert_eq!(config.mrt_collector.username, "env-user");
        assert_eq!(config.mrt_collector.password, "file-pass");
        assert!(config.mrt_collector.insecure_skip_verify);
        assert_eq!(config.post_generate_command, None);
        assert_eq!(config.mrt_collector.dns_server, None);
    }

    #[test]
    fn post_generate_command_and_dns_server_are_read_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{
                "registry_path": "/var/dn42/registry",
                "output_file": "/var/dn42/map.bin",
                "post_generate_command": "curl -X POST https://hook.example/done",
                "mrt_collector": {
                    "master4_url": "https://example.dn42/master4.mrt.bz2",
                    "master6_url": "https://example.dn42/master6.mrt.bz2",
                    "dns_server": "172.20.0.53:53"
                },
                "api": {
                    "enabled": false,
                    "listen_addr": "127.0.0.1:8080",
                    "auth_token": "secret"
                }
            }"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(
            config.post_generate_command.as_deref(),
            Some("curl -X POST https://hook.example/done")
        );
        assert_eq!(config.mrt_collector.dns_server.as_deref(), Some("172.20.0.53:53"));
    }
}
