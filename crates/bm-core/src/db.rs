use anyhow::{Context, Result};
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use std::time::Duration;

pub const DEFAULT_DATABASE: &str = "bookmark";

/// Connects to MongoDB. An explicit `database` wins, then the one named in
/// the URI, then [`DEFAULT_DATABASE`].
pub async fn connect(uri: &str, app_name: &str, database: Option<&str>) -> Result<Database> {
    let mut options = ClientOptions::parse(uri)
        .await
        .context("invalid MongoDB connection string")?;
    options.app_name = Some(app_name.to_string());
    options.server_selection_timeout = Some(Duration::from_secs(10));

    let client = Client::with_options(options).context("failed to build MongoDB client")?;
    let database = match database {
        Some(name) => client.database(name),
        None => client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE)),
    };

    tracing::info!(database = %database.name(), "document store configured");
    Ok(database)
}

pub async fn check_ready(database: &Database) -> Result<()> {
    database.run_command(doc! { "ping": 1 }).await?;
    Ok(())
}
