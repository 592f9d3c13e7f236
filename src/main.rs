use std::net::TcpListener;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, Executor, PgConnection};

use cambio_api::configuration::{get_configuration, DatabaseSettings};
use cambio_api::exchange::ExchangeRateClient;
use cambio_api::startup::run;
use cambio_api::store::{PgUserStore, UserStore};
use cambio_api::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    tracing::info!("starting application");

    let configuration = match get_configuration() {
        Ok(config) => {
            tracing::info!("configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "configuration error",
            ));
        }
    };

    // An absent secret or an unusable algorithm is fatal here, never a
    // runtime error.
    if let Err(e) = configuration.auth.ensure_usable() {
        tracing::error!("unusable signing configuration: {}", e);
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "configuration error",
        ));
    }

    tracing::info!("attempting to connect to database");

    ensure_database(&configuration.database).await.map_err(|e| {
        tracing::error!("failed to create database: {}", e);
        std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "database creation error",
        )
    })?;

    let connection_string = configuration.database.connection_string();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&connection_string)
        .await
        .map_err(|e| {
            tracing::error!("failed to create connection pool: {}", e);
            std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "database connection error",
            )
        })?;

    sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
        tracing::error!("failed to run database migrations: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, "database migration error")
    })?;

    tracing::info!("database ready");

    let address = format!("127.0.0.1:{}", configuration.application.port);
    let listener = TcpListener::bind(&address)?;
    tracing::info!("server listening on: {}", address);

    let store: Arc<dyn UserStore> = Arc::new(PgUserStore::new(pool));
    let exchange = ExchangeRateClient::new(
        configuration.exchange.quote_url.clone(),
        reqwest::Client::new(),
    );

    let server = run(listener, store, exchange, configuration.auth.clone())?;
    tracing::info!("server started successfully");

    server.await
}

/// Create the configured database if it does not exist yet, so a fresh
/// deployment can boot against an empty Postgres server.
async fn ensure_database(settings: &DatabaseSettings) -> Result<(), sqlx::Error> {
    let mut connection = PgConnection::connect(&settings.connection_string_without_db()).await?;

    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)",
    )
    .bind(&settings.database_name)
    .fetch_one(&mut connection)
    .await?;

    if !exists {
        connection
            .execute(&*format!(r#"CREATE DATABASE "{}";"#, settings.database_name))
            .await?;
        tracing::info!(database = %settings.database_name, "database created");
    }

    Ok(())
}
