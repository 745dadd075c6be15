//! Yucca configuration service entry point

use std::sync::Arc;

use clap::Parser;

use yucca::settings::Settings;
use yucca::startup;
use yucca::startup::logging::{LoggingConfig, init_logging};
use yucca_config::{SystemClock, VersionedConfigStore};

#[derive(Debug, Parser)]
#[command(name = "yucca", about = "Multi-tenant versioned configuration service")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short = 'c', long = "config")]
    config_file: Option<String>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let settings = Settings::load(args.config_file.as_deref())?;

    let _logging = init_logging(&LoggingConfig::from_env())
        .map_err(|error| anyhow::anyhow!("{error}"))?;

    let datastore = startup::build_datastore(&settings)?;
    let store = Arc::new(VersionedConfigStore::new(datastore, Arc::new(SystemClock)).await);

    tracing::info!(
        service_port = settings.service_port(),
        admin_port = settings.admin_port(),
        data_store_type = %settings.data_store_type(),
        max_pool_size = settings.max_pool_size(),
        publish_change_events = settings.publish_change_events(),
        "yucca config service starting"
    );

    startup::http::serve_admin(store, settings.admin_port()).await?;
    Ok(())
}
