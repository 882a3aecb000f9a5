//! Artifact Reaper - 后台过期音频回收

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{ArtifactStorePort, ArtifactStoreError, ReapResult};

/// Reaper 配置
#[derive(Debug, Clone)]
pub struct ArtifactReaperConfig {
    /// 回收间隔
    pub interval: Duration,
    /// 产物存活时间
    pub ttl: Duration,
}

impl Default for ArtifactReaperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3600), // 1 小时
            ttl: Duration::from_secs(86400),     // 24 小时
        }
    }
}

/// 过期产物回收器
///
/// 定时扫描产物存储，删除超过 TTL 的音频
pub struct ArtifactReaper {
    config: ArtifactReaperConfig,
    store: Arc<dyn ArtifactStorePort>,
}

impl ArtifactReaper {
    pub fn new(config: ArtifactReaperConfig, store: Arc<dyn ArtifactStorePort>) -> Self {
        Self { config, store }
    }

    /// 执行一次回收
    pub async fn reap_once(&self) -> Result<ReapResult, ArtifactStoreError> {
        let result = self.store.reap(self.config.ttl).await?;
        if result.deleted > 0 {
            tracing::info!(
                deleted = result.deleted,
                freed_bytes = result.freed_bytes,
                "Expired artifacts reaped"
            );
        }
        Ok(result)
    }

    /// 启动 Reaper，直到 shutdown 完成
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()> + Send,
    {
        tracing::info!(
            interval_secs = self.config.interval.as_secs(),
            ttl_secs = self.config.ttl.as_secs(),
            "ArtifactReaper started"
        );

        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    if let Err(e) = self.reap_once().await {
                        tracing::error!(error = %e, "Artifact reap failed");
                    }
                }
            }
        }

        tracing::info!("ArtifactReaper stopped");
    }
}
