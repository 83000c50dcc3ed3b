use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use objstore_fn::config::AppConfig;
use objstore_fn::server::{router, AppState};
use objstore_fn::OciClientFactory;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "objstore_fn=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration / 加载配置
    let app_config = AppConfig::from_env();
    tracing::info!(
        "objstore-fn {} (built {})",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_TIME")
    );
    tracing::debug!("Function configuration: {:?}", app_config.function);

    // Handlers stay usable even if the client could not be built / 客户端创建失败时处理器仍可响应
    let state = AppState::new(&app_config.function, &OciClientFactory);
    if !state.get.context().is_ready() {
        tracing::warn!("Storage client unavailable, every call will return FAILED");
    }

    let bind_addr = app_config.server.get_bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server running at http://{}", bind_addr);

    axum::serve(listener, router(state)).await?;

    Ok(())
}
