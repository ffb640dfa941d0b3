use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, warn};

use oos_identity_server::adapter::handler::{self, AppState};
use oos_identity_server::adapter::repository::changes_log_postgres::ChangesLogPostgresRepository;
use oos_identity_server::adapter::repository::in_memory::{
    InMemoryAuditLogRepository, InMemoryPermissionsForRoleRepository,
};
use oos_identity_server::adapter::repository::operation_log_postgres::OperationLogPostgresRepository;
use oos_identity_server::adapter::repository::permissions_for_role_postgres::PermissionsForRolePostgresRepository;
use oos_identity_server::domain::repository::{
    ChangesLogRepository, OperationLogRepository, PermissionsForRoleRepository,
};
use oos_identity_server::infrastructure::config::Config;
use oos_identity_server::infrastructure::telemetry::init_logger;
use oos_identity_server::infrastructure::JwtTokenVerifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Config
    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/config.yaml".to_string());
    let env_path = std::env::var("CONFIG_ENV_PATH").ok();
    let cfg = Config::load(&config_path, env_path.as_deref())?;

    // Logger
    init_logger(
        &cfg.app.environment,
        &cfg.observability.log.format,
        cfg.observability.log.level.as_deref(),
    );

    info!(
        app_name = %cfg.app.name,
        version = %cfg.app.version,
        environment = %cfg.app.environment,
        "starting identity server"
    );

    // Repositories: PostgreSQL if DATABASE_URL or database config is set, otherwise in-memory
    let (permissions_repo, changes_log_repo, operation_log_repo): (
        Arc<dyn PermissionsForRoleRepository>,
        Arc<dyn ChangesLogRepository>,
        Arc<dyn OperationLogRepository>,
    ) = match connect_database(&cfg).await? {
        Some(pool) => {
            sqlx::migrate!().run(&pool).await?;
            info!("database migrations applied");
            (
                Arc::new(PermissionsForRolePostgresRepository::new(pool.clone())),
                Arc::new(ChangesLogPostgresRepository::new(pool.clone())),
                Arc::new(OperationLogPostgresRepository::new(pool)),
            )
        }
        None => {
            warn!("no database configured, using in-memory repositories");
            let audit_log = Arc::new(InMemoryAuditLogRepository::new());
            (
                Arc::new(InMemoryPermissionsForRoleRepository::new(audit_log.clone())),
                audit_log.clone(),
                audit_log,
            )
        }
    };

    let jwt = &cfg.auth.jwt;
    let token_verifier = Arc::new(JwtTokenVerifier::new(
        &jwt.secret,
        &jwt.issuer,
        &jwt.audience,
    ));

    let state = AppState::new(
        token_verifier,
        permissions_repo,
        changes_log_repo,
        operation_log_repo,
        cfg.changes_log.tracked_properties.clone(),
    );
    let app = handler::router(state);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "REST server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("identity server stopped");
    Ok(())
}

async fn connect_database(cfg: &Config) -> anyhow::Result<Option<PgPool>> {
    let mut options = PgPoolOptions::new().max_connections(25);
    if let Some(ref db) = cfg.database {
        options = options
            .max_connections(db.max_open_conns)
            .min_connections(db.max_idle_conns)
            .max_lifetime(db.conn_max_lifetime()?);
    }

    let url = if let Ok(database_url) = std::env::var("DATABASE_URL") {
        database_url
    } else if let Some(ref db_cfg) = cfg.database {
        db_cfg.connection_url()
    } else {
        return Ok(None);
    };

    info!("connecting to PostgreSQL...");
    let pool = options.connect(&url).await?;
    info!("connected to PostgreSQL");
    Ok(Some(pool))
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
}
