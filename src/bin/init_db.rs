// Installation utility to initialize the agenda database schema.
// Usage: cargo run --bin init_db -- [config.yaml] [environment]
// Falls back to $CONFIG_FILE / config.yaml and $ENVIRONMENT / production.

use pregnancy_dashboard::{agenda::AgendaStore, config::ConfigLoader, database, Settings};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let loader = ConfigLoader::new();
    if let Some(path) = args.next() {
        loader.set_source(path);
    }
    if let Some(environment) = args.next() {
        loader.set_environment(environment);
    }
    loader.load(None)?;

    let settings = Settings::from_tree(&loader.config())?;
    let pool = database::connect(&settings.database).await?;
    AgendaStore::new(pool).create_tables().await?;
    println!("Database initialized at {}", settings.database.url);
    Ok(())
}
