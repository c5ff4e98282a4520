use color_eyre::eyre::Result;
use dotenv::dotenv;
use studio_api::config::ApiConfig;
use studio_db::{create_pool, schema::initialize_database, services::pg_services};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;

    // Create database connection pool
    let db_pool = create_pool(&config.database_url, config.database_max_connections).await?;

    // Initialize database schema
    initialize_database(&db_pool).await?;

    // Start API server
    let services = pg_services(db_pool, config.session_ttl());
    studio_api::start_server(config, services).await?;

    Ok(())
}
