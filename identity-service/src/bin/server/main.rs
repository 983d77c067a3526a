use std::sync::Arc;
use std::time::Duration;

use auth::PasswordHasher;
use auth::TokenIssuer;
use identity_service::config::Config;
use identity_service::domain::identity::ports::CredentialServicePort;
use identity_service::domain::identity::service::CredentialService;
use identity_service::domain::identity::service::CredentialSettings;
use identity_service::inbound::http::cookies::CookieSettings;
use identity_service::inbound::http::router::create_router;
use identity_service::maintenance::spawn_refresh_token_sweeper;
use identity_service::outbound::events::KafkaEventNotifier;
use identity_service::outbound::repositories::PostgresRefreshTokenRepository;
use identity_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;
    config.validate()?;

    tracing::info!(
        http_port = config.server.http_port,
        kafka_brokers = %config.kafka.brokers,
        session_results_topic = %config.kafka.session_results_topic,
        access_token_ttl_secs = config.jwt.access_token_ttl_secs,
        refresh_token_ttl_secs = config.jwt.refresh_token_ttl_secs,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let password_hasher = PasswordHasher::with_work_factor(
        config.password.memory_kib,
        config.password.iterations,
        config.password.parallelism,
    )?;
    let token_issuer = Arc::new(TokenIssuer::new(
        config.jwt.secret.as_bytes(),
        config.jwt.access_lifetime(),
        config.jwt.refresh_lifetime(),
    )?);

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let refresh_token_repository = Arc::new(PostgresRefreshTokenRepository::new(pg_pool));
    let event_notifier = Arc::new(KafkaEventNotifier::new(&config.kafka)?);

    let credential_service: Arc<dyn CredentialServicePort> = Arc::new(CredentialService::new(
        user_repository,
        refresh_token_repository,
        event_notifier,
        password_hasher,
        token_issuer,
        CredentialSettings {
            session_migration_destination: config.kafka.session_results_topic.clone(),
            dispatch_timeout: config.kafka.dispatch_timeout(),
            reject_orphaned_refresh: config.credentials.reject_orphaned_refresh,
        },
    ));

    let _sweeper = spawn_refresh_token_sweeper(
        Arc::clone(&credential_service),
        Duration::from_secs(config.maintenance.sweep_interval_secs),
    );

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        credential_service,
        CookieSettings {
            domain: config.cookie.domain.clone(),
            secure: config.cookie.secure,
            refresh_max_age_secs: config.jwt.refresh_token_ttl_secs,
        },
    );

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
