use keygate::{
    api::start_api_server,
    config::AppConfig,
    observability::init_observability,
    storage::create_pool,
    Result, APP_NAME, VERSION,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (optional - won't fail if missing).
    // This must happen before any config is read from the environment.
    if let Err(e) = dotenvy::dotenv() {
        if !e.to_string().contains("not found") {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    let config = AppConfig::from_env()?;
    init_observability(&config.observability)?;

    info!(app_name = APP_NAME, version = VERSION, "Starting Keygate account backend");

    info!(
        address = %config.server.bind_address(),
        auto_migrate = config.database.auto_migrate,
        "Loaded configuration from environment"
    );

    let pool = create_pool(&config.database).await?;

    start_api_server(&config, pool).await
}
