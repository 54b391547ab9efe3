use plts_proposal::{logging, router, AppConfig, AppState, PvgisClient};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载配置
    let config = AppConfig::load()?;
    logging::init(&config.logging);
    info!("Starting server with config: {:?}", config);

    // PVGIS 客户端
    let pvgis = Arc::new(PvgisClient::new(&config.pvgis)?);
    let app = router(AppState::new(pvgis, config.solar.clone()));

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/pvout         - PVOUT lookup (PVGIS)");
    info!("  POST /api/calculate_bep - sizing & payback");
    info!("  POST /api/generate_pdf  - proposal PDF");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
