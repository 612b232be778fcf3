//! # Configuration Loader / 配置加载器
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Read TOML configuration files / 读取 TOML 配置文件
//! - ✅ Parse TOML into AppConfig DTO / 将 TOML 解析为 AppConfig DTO
//! - ✅ Report I/O and parsing errors with context / 报告带上下文的 I/O 和解析错误
//!
//! Operational defaults are applied by [`resolve_config`], never while parsing.

use std::path::{Path, PathBuf};

use anyhow::Context;
use lt_core::config::AppConfig;

pub const DEFAULT_CONFIG_FILE: &str = "lectern.toml";

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// Missing sections and keys are empty facts. Only unreadable files, invalid
/// TOML and structurally wrong `[resources]` entries are errors.
pub fn load_config(config_path: PathBuf) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
        .with_context(|| format!("Invalid config file: {}", config_path.display()))
}

/// Load `explicit` if given, else `./lectern.toml` if present, else an empty
/// config; then fill defaults.
pub fn resolve_config(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    let config = match explicit {
        Some(path) => load_config(path.to_path_buf())?,
        None => {
            let local = PathBuf::from(DEFAULT_CONFIG_FILE);
            if local.is_file() {
                load_config(local)?
            } else {
                AppConfig::empty()
            }
        }
    };
    Ok(config.with_defaults(default_data_dir()))
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("lectern")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lt_core::{ResourceId, ResourceKind};
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Test that valid TOML is parsed correctly
    /// 测试有效 TOML 被正确解析
    #[test]
    fn test_load_config_reads_valid_toml() {
        let toml_content = r#"
            [storage]
            data_dir = "/srv/lectern"
            bundled_dir = "/usr/share/lectern"

            [sync]
            poll_interval_ms = 100

            [autoplay]
            interval_secs = 8

            [resources.harpa]
            kind = "hymnal"
            mirrors = ["https://raw.example.org/harpa.json"]
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = load_config(temp_file.path().to_path_buf()).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/lectern"));
        assert_eq!(config.bundled_dir, PathBuf::from("/usr/share/lectern"));
        assert_eq!(config.poll_interval_ms, 100);
        assert_eq!(config.autoplay_interval_secs, 8);
        assert_eq!(
            config.resources[&ResourceId::new("harpa")].kind,
            ResourceKind::Hymnal
        );
    }

    /// Test that missing values result in empty values
    /// 测试缺失的值导致空值
    #[test]
    fn test_load_config_returns_empty_values_when_missing() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[storage]\n[display]\n").unwrap();

        let config = load_config(temp_file.path().to_path_buf()).unwrap();
        assert_eq!(config, AppConfig::empty());
    }

    #[test]
    fn test_load_config_reports_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[storage\n").unwrap();

        let err = load_config(temp_file.path().to_path_buf()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config as TOML"));
    }

    #[test]
    fn test_load_config_reports_missing_file() {
        let err = load_config(PathBuf::from("/nonexistent/lectern.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/lectern.toml"));
    }

    #[test]
    fn test_resolve_config_applies_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[storage]\ndata_dir = \"/tmp/lt\"\n").unwrap();

        let config = resolve_config(Some(temp_file.path())).unwrap();
        assert_eq!(config.bundled_dir, PathBuf::from("/tmp/lt/bundled"));
        assert_eq!(config.fetch_timeout_secs, 20);
        assert_eq!(config.font_size, 60.0);
    }
}
