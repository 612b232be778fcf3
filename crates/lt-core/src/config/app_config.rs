//! # Pure Data Module / 纯数据模块
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Define configuration data structures / 定义配置数据结构
//! - ✅ Provide TOML → DTO mapping / 提供 TOML → DTO 的映射
//!
//! `from_toml` accepts whatever is in the file: missing keys become empty
//! facts. Operational defaults are applied separately by [`AppConfig::with_defaults`]
//! at wiring time, and validation belongs to the use cases.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::ids::ResourceId;
use crate::projection::DEFAULT_FONT_SIZE;
use crate::resource::ResourceKind;

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;
pub const DEFAULT_AUTOPLAY_INTERVAL_SECS: u64 = 5;

/// One `[resources.<id>]` table.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceConfig {
    pub kind: ResourceKind,
    /// Ordered: earlier mirrors are always preferred.
    pub mirrors: Vec<String>,
    /// Overrides [`ResourceKind::default_min_items`].
    pub min_items: Option<usize>,
}

impl ResourceConfig {
    pub fn min_items(&self) -> usize {
        self.min_items.unwrap_or_else(|| self.kind.default_min_items())
    }
}

/// Application configuration DTO (pure data, no logic)
/// 应用配置 DTO（纯数据，无逻辑）
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Root for cache, projection snapshot and logs (may be empty)
    pub data_dir: PathBuf,
    /// Directory of bundled `<resource_id>.json` datasets (may be empty)
    pub bundled_dir: PathBuf,
    pub fetch_timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub font_size: f32,
    pub background_image: Option<String>,
    pub autoplay_interval_secs: u64,
    pub resources: BTreeMap<ResourceId, ResourceConfig>,
}

impl AppConfig {
    /// Create AppConfig from TOML value
    /// 从 TOML 值创建 AppConfig
    ///
    /// Only a structurally wrong `[resources]` entry (unknown kind, mirrors not
    /// a list of strings) is an error; everything else maps to an empty value.
    pub fn from_toml(toml_value: &toml::Value) -> Result<Self, ConfigError> {
        let str_at = |section: &str, key: &str| {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_str())
        };
        let int_at = |section: &str, key: &str| {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_integer())
        };

        let font_size = toml_value
            .get("display")
            .and_then(|d| d.get("font_size"))
            .and_then(|v| v.as_float().or_else(|| v.as_integer().map(|i| i as f64)))
            .unwrap_or(0.0) as f32;

        let mut resources = BTreeMap::new();
        if let Some(table) = toml_value.get("resources").and_then(|r| r.as_table()) {
            for (id, entry) in table {
                resources.insert(ResourceId::new(id.clone()), parse_resource(id, entry)?);
            }
        }

        Ok(Self {
            data_dir: PathBuf::from(str_at("storage", "data_dir").unwrap_or("")),
            bundled_dir: PathBuf::from(str_at("storage", "bundled_dir").unwrap_or("")),
            fetch_timeout_secs: int_at("network", "fetch_timeout_secs").unwrap_or(0).max(0) as u64,
            poll_interval_ms: int_at("sync", "poll_interval_ms").unwrap_or(0).max(0) as u64,
            font_size,
            background_image: str_at("display", "background_image")
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            autoplay_interval_secs: int_at("autoplay", "interval_secs").unwrap_or(0).max(0) as u64,
            resources,
        })
    }

    /// Create empty AppConfig (all empty/default values)
    /// 创建空的 AppConfig（所有字段为空/默认值）
    pub fn empty() -> Self {
        Self {
            data_dir: PathBuf::new(),
            bundled_dir: PathBuf::new(),
            fetch_timeout_secs: 0,
            poll_interval_ms: 0,
            font_size: 0.0,
            background_image: None,
            autoplay_interval_secs: 0,
            resources: BTreeMap::new(),
        }
    }

    /// Fill zero/empty operational values with defaults. `default_data_dir` is
    /// supplied by the caller (platform data directory).
    pub fn with_defaults(mut self, default_data_dir: PathBuf) -> Self {
        if self.data_dir.as_os_str().is_empty() {
            self.data_dir = default_data_dir;
        }
        if self.bundled_dir.as_os_str().is_empty() {
            self.bundled_dir = self.data_dir.join("bundled");
        }
        if self.fetch_timeout_secs == 0 {
            self.fetch_timeout_secs = DEFAULT_FETCH_TIMEOUT_SECS;
        }
        if self.poll_interval_ms == 0 {
            self.poll_interval_ms = DEFAULT_POLL_INTERVAL_MS;
        }
        if !(self.font_size > 0.0) {
            self.font_size = DEFAULT_FONT_SIZE;
        }
        if self.autoplay_interval_secs == 0 {
            self.autoplay_interval_secs = DEFAULT_AUTOPLAY_INTERVAL_SECS;
        }
        self
    }
}

fn parse_resource(id: &str, entry: &toml::Value) -> Result<ResourceConfig, ConfigError> {
    let invalid = |key: &str, reason: String| ConfigError::InvalidValue {
        key: format!("resources.{id}.{key}"),
        reason,
    };

    let kind = entry
        .get("kind")
        .and_then(|v| v.as_str())
        .ok_or_else(|| invalid("kind", "missing".into()))?
        .parse::<ResourceKind>()
        .map_err(|e| invalid("kind", e))?;

    let mirrors = match entry.get("mirrors") {
        None => Vec::new(),
        Some(toml::Value::Array(items)) => items
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| invalid("mirrors", "expected a list of strings".into()))
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(invalid("mirrors", "expected a list of strings".into())),
    };

    let min_items = entry
        .get("min_items")
        .and_then(|v| v.as_integer())
        .map(|n| n.max(0) as usize);

    Ok(ResourceConfig {
        kind,
        mirrors,
        min_items,
    })
}
