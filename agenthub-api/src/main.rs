use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use agenthub_api::config::{ApiConfig, CorsConfig};
use agenthub_api::helpers::database::initialize_database;
use agenthub_api::helpers::llm::QwenClientFactory;
use agenthub_api::middleware::EnsureTables;
use agenthub_api::routes::configure_routes;
use agenthub_api::AppState;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "agenthub-api")]
#[command(about = "HTTP API for agenthub agents and executions", long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn build_cors(cors: Option<&CorsConfig>) -> Cors {
    match cors {
        Some(cors) if !cors.allowed_origins.is_empty() => cors
            .allowed_origins
            .iter()
            .fold(Cors::default(), |c, origin| c.allowed_origin(origin))
            .allow_any_method()
            .allow_any_header()
            .max_age(3600),
        _ => Cors::permissive(),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let (config, config_path) = ApiConfig::load(args.config)?;
    info!(path = %config_path.display(), environment = %config.environment, "Loaded configuration");

    if config.qwen_api_key().is_none() {
        warn!("Qwen API key is not configured; executions fail until one is set");
    }

    let database = initialize_database(&config.database.path);
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let cors_config = config.cors.clone();

    let state = web::Data::new(AppState::new(
        config,
        database,
        Arc::new(QwenClientFactory),
    ));

    info!("Starting agenthub-api server at http://{}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(EnsureTables)
            .wrap(build_cors(cors_config.as_ref()))
            .wrap(Logger::default())
            .configure(configure_routes)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}
