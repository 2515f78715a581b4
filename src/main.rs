use color_eyre::eyre::Result;
use dotenv::dotenv;
use konsul_api::config::ApiConfig;
use konsul_db::{create_pool, schema::initialize_database};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let config = ApiConfig::from_env()?;

    let db_pool = create_pool(&config.database_url, config.max_connections).await?;

    // The schema statements are idempotent, so every start re-applies them
    initialize_database(&db_pool).await?;

    konsul_api::start_server(config, db_pool).await?;

    Ok(())
}
