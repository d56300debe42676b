use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info, warn};

use fleet_dispatch::config::environment::EnvironmentConfig;
use fleet_dispatch::repositories::build_store;
use fleet_dispatch::routes::create_router;
use fleet_dispatch::services::bootstrap;
use fleet_dispatch::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();
    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    let level = config
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🚚 Fleet Dispatch - API de parque móvil");
    info!("================================================");
    info!("🌍 Entorno: {}", config.environment);

    if config.uses_default_secret() {
        if config.is_production() {
            warn!("⚠️ JWT_SECRET no configurado: se usa el secreto por defecto en producción");
        } else {
            warn!("⚠️ Usando JWT_SECRET por defecto (solo desarrollo)");
        }
    }

    // Inicializar almacén
    let store = match build_store(&config).await {
        Ok(store) => store,
        Err(e) => {
            error!("❌ Error inicializando el almacén: {}", e);
            return Err(e);
        }
    };
    info!("✅ Almacén '{}' listo", store.backend_name());

    let report = bootstrap::run(store.clone(), &config).await?;
    info!("🧰 Normalización inicial: {:?}", report);

    let addr: SocketAddr = config.server_url().parse()?;
    let app = create_router(AppState::new(config, store));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /api/health");
    info!("   POST /api/auth/register | /api/auth/login");
    info!("   GET/PUT /api/me");
    info!("   /api/registrations, /api/users[/:id[/approve|/reject|/role]]");
    info!("   /api/vehicles[/:id], /api/drivers[/:id]");
    info!("   /api/trips, /api/requests[/:id]");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
