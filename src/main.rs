use dotenvy::dotenv;
use rosterly::logging::{init_tracing, shutdown_tracer};
use rosterly::metrics::{init_metrics, metrics_app};
use rosterly::router::init_router;
use rosterly::state::init_app_state;
use rosterly_db::{init_db_pool, run_migrations};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let result = serve().await;
    if let Err(e) = &result {
        error!(error = %e, "Server stopped");
    }

    shutdown_tracer().await;
    result
}

async fn serve() -> anyhow::Result<()> {
    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let pool = init_db_pool(&database_url).await?;
    run_migrations(&pool).await?;

    let mut app = init_router(init_app_state(pool));
    if let Some(handle) = init_metrics() {
        app = app.merge(metrics_app(handle));
    }

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(3000);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("🚀 Server running on http://localhost:{port}");
    info!("📚 Swagger UI available at http://localhost:{port}/swagger-ui");
    info!("📖 Scalar UI available at http://localhost:{port}/scalar");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
