use anyhow::{Context, Result};
use clap::Parser;

use authmap_core::pipeline::Pipeline;
use authmap_daemon::bootstrap::load_or_create_config;
use authmap_daemon::cli::DaemonCli;
use authmap_daemon::logging::init_tracing;
use authmap_daemon::metrics_server::install_metrics_recorder;
use authmap_daemon::preflight::run_preflight;
use authmap_pipeline::{AuthPipelineBuilder, InfluxSink, PipelineConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = DaemonCli::parse();

    // 설정 로드 (없으면 기본 설정 파일 생성)
    let mut config = load_or_create_config(&cli.config)
        .await
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;

    // CLI 오버라이드 (최고 우선순위)
    if let Some(level) = &cli.log_level {
        config.general.log_level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.general.log_format = format.clone();
    }
    config.validate().context("invalid configuration")?;

    if cli.validate {
        println!("configuration OK: {}", cli.config.display());
        return Ok(());
    }

    // 로깅 초기화
    init_tracing(&config.general)?;
    tracing::info!(config = %cli.config.display(), "authmap-daemon starting");

    // Prometheus 메트릭 노출 (설정된 경우)
    if config.metrics.enabled {
        install_metrics_recorder(&config.metrics)?;
    }

    // 외부 의존성 사전 점검 + GeoLite 데이터베이스 오픈
    let resolver = run_preflight(&config).await?;

    let sink = InfluxSink::new(&config.influx).context("failed to create influx sink")?;

    // 파이프라인 빌드 및 시작
    let mut pipeline = AuthPipelineBuilder::new(resolver, sink)
        .config(PipelineConfig::from_core(&config))
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build auth pipeline: {}", e))?;

    pipeline
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("failed to start auth pipeline: {}", e))?;
    tracing::info!("authmap-daemon running; pipeline active");

    // 종료 시그널 대기
    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");

    // 우아한 종료
    if let Err(e) = pipeline.stop().await {
        tracing::error!(error = %e, "failed to stop auth pipeline");
    }

    tracing::info!("authmap-daemon shut down");
    Ok(())
}
