//! Voxgate - 语音问答网关
//!
//! 启动流程：
//! - 加载配置并初始化日志
//! - 构造四个阶段客户端与音频产物存储
//! - 启动过期音频回收任务与 HTTP 服务器，Ctrl-C 时一并关闭

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use voxgate::application::{ArtifactStorePort, StagePorts};
use voxgate::config::{load_config, print_config, AppConfig, StorageBackend};
use voxgate::infrastructure::adapters::{
    FileArtifactStore, HttpLlmClient, HttpRagClient, HttpSttClient, HttpTtsClient,
    InMemoryArtifactStore, StageClient,
};
use voxgate::infrastructure::http::{AppState, HttpServer, ServerConfig};
use voxgate::infrastructure::worker::{ArtifactReaper, ArtifactReaperConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：部署变量 > 环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Voxgate - 语音问答网关");
    print_config(&config);

    // 音频产物存储
    let artifact_store: Arc<dyn ArtifactStorePort> = match config.storage.backend {
        StorageBackend::File => Arc::new(FileArtifactStore::new(&config.storage.audio_dir).await?),
        StorageBackend::Memory => Arc::new(InMemoryArtifactStore::new()),
    };

    // 四个阶段客户端共享一个连接池
    let client = StageClient::new()?;
    let stages = &config.stages;
    let stage_ports = StagePorts {
        stt: Arc::new(HttpSttClient::new(
            client.clone(),
            &stages.stt.url,
            stages.stt.timeout(),
        )),
        rag: Arc::new(HttpRagClient::new(
            client.clone(),
            &stages.rag.url,
            stages.rag.timeout(),
        )),
        llm: Arc::new(HttpLlmClient::new(
            client.clone(),
            &stages.llm.url,
            stages.llm.timeout(),
        )),
        tts: Arc::new(HttpTtsClient::new(client, &stages.tts.url, stages.tts.timeout())),
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // 启动过期音频回收
    let reaper_handle = if config.gc.enabled {
        let reaper = ArtifactReaper::new(
            ArtifactReaperConfig {
                interval: std::time::Duration::from_secs(config.gc.interval_secs),
                ttl: std::time::Duration::from_secs(config.gc.artifact_ttl_secs),
            },
            artifact_store.clone(),
        );
        let mut rx = shutdown_rx.clone();
        Some(tokio::spawn(reaper.run_until(async move {
            let _ = rx.changed().await;
        })))
    } else {
        None
    };

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(
        &config.server.host,
        config.server.port,
        config.server.max_upload_bytes,
    );
    let state = AppState::new(stage_ports, artifact_store);
    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
            }
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(true);
        })
        .await?;

    if let Some(handle) = reaper_handle {
        handle.await?;
    }

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// 初始化日志；RUST_LOG 优先于配置中的级别
fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},voxgate={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
