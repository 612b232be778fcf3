//! # Dependency Injection / 依赖注入模块
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Create infra implementations (fs store, HTTP fetcher, sync channel) / 创建 infra 层具体实现
//! - ✅ Inject them into the use cases through port traits / 通过 Port trait 注入用例
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No business logic / 禁止包含任何业务逻辑**
//! ❌ **No configuration validation / 禁止做配置验证**
//!
//! > **This is the only place allowed to depend on lt-infra + lt-app simultaneously.**
//! > **这是唯一允许同时依赖 lt-infra 和 lt-app 的地方。**

use std::sync::Arc;
use std::time::Duration;

use lt_app::{AcquireResource, LoadResource, ProjectionStore, SnapshotPublisher};
use lt_core::config::AppConfig;
use lt_core::ports::ProjectionChannelPort;
use lt_core::DisplaySettings;
use lt_infra::{
    FileProjectionChannel, FsBundledDatasets, FsResourceStore, ReqwestMirrorFetcher, SystemClock,
};

/// Result type for wiring operations
pub type WiringResult<T> = Result<T, WiringError>;

/// Errors during dependency injection
/// 依赖注入错误（基础设施初始化失败）
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("HTTP client initialization failed: {0}")]
    HttpClient(String),

    #[error("Projection channel unavailable: {0}")]
    Channel(String),

    #[error("Invalid display settings: {0}")]
    DisplaySettings(String),
}

/// Everything a surface needs, assembled once at startup.
pub struct AppDeps {
    pub config: AppConfig,
    pub channel: Arc<FileProjectionChannel>,
    pub load_resource: Arc<LoadResource>,
}

pub fn wire_dependencies(config: AppConfig) -> WiringResult<AppDeps> {
    let fetcher = ReqwestMirrorFetcher::new(Duration::from_secs(config.fetch_timeout_secs))
        .map_err(|e| WiringError::HttpClient(e.to_string()))?;

    let acquire = Arc::new(AcquireResource::new(
        Arc::new(FsResourceStore::new(&config.data_dir)),
        Arc::new(fetcher),
        Arc::new(SystemClock),
    ));
    let load_resource = Arc::new(LoadResource::new(
        config.resources.clone(),
        Arc::new(FsBundledDatasets::new(&config.bundled_dir)),
        acquire,
    ));

    Ok(AppDeps {
        channel: Arc::new(FileProjectionChannel::new(&config.data_dir)),
        load_resource,
        config,
    })
}

impl AppDeps {
    /// Create the control surface's store, continuing the seq of any snapshot
    /// a previous run left behind.
    pub async fn projection_store(&self) -> WiringResult<(Arc<ProjectionStore>, SnapshotPublisher)> {
        let resume_seq = self
            .channel
            .load_snapshot()
            .await
            .map_err(|e| WiringError::Channel(format!("{e:#}")))?
            .map_or(0, |snapshot| snapshot.seq);

        let settings = DisplaySettings::new(
            self.config.font_size,
            self.config.background_image.clone(),
        )
        .map_err(|e| WiringError::DisplaySettings(e.to_string()))?;

        Ok(ProjectionStore::new(self.channel.clone(), settings, resume_seq))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.config.poll_interval_ms)
    }

    pub fn autoplay_interval(&self) -> Duration {
        Duration::from_secs(self.config.autoplay_interval_secs)
    }
}
