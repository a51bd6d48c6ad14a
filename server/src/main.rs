mod api;
mod auth;
mod config;
mod db;
mod error;
mod images;
mod load_data;
mod models;
mod schema;
mod short_links;
mod telemetry;

use anyhow::Context;
use axum::extract::{DefaultBodyLimit, FromRef, MatchedPath};
use axum::http::Request;
use axum::Router;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::db::DbPool;

/// Application state shared across all handlers
#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: Arc<DbPool>,
    pub config: Arc<Config>,
}

#[derive(Parser)]
#[command(name = "foodgram-server")]
#[command(about = "Foodgram recipe sharing API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve {
        /// Address to listen on (overrides BIND_ADDR)
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Print the OpenAPI document and exit
    Openapi,
    /// Load reference tags and ingredients from JSON files
    LoadData {
        /// JSON array of {"name", "measurement_unit"}
        #[arg(long)]
        ingredients: Option<PathBuf>,
        /// JSON array of {"name", "slug"}
        #[arg(long)]
        tags: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve { bind: None }) {
        Commands::Openapi => {
            println!("{}", api::openapi().to_pretty_json()?);
            Ok(())
        }
        Commands::LoadData { ingredients, tags } => {
            telemetry::init_telemetry()?;
            let config = Config::from_env()?;
            seed(&config, ingredients, tags)
        }
        Commands::Serve { bind } => {
            telemetry::init_telemetry()?;
            let mut config = Config::from_env()?;
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            serve(config).await
        }
    }
}

fn seed(config: &Config, ingredients: Option<PathBuf>, tags: Option<PathBuf>) -> anyhow::Result<()> {
    if ingredients.is_none() && tags.is_none() {
        anyhow::bail!("Nothing to load: pass --ingredients and/or --tags");
    }

    let pool = db::create_pool(&config.database_url, 1)?;
    let mut conn = pool.get().context("Failed to get DB connection")?;

    if let Some(path) = tags {
        let inserted = load_data::load_tags(&mut conn, &path)?;
        println!("Tags: {} new", inserted);
    }
    if let Some(path) = ingredients {
        let inserted = load_data::load_ingredients(&mut conn, &path)?;
        println!("Ingredients: {} new", inserted);
    }
    Ok(())
}

fn app(state: AppState) -> Router {
    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());
    let max_body_bytes = state.config.max_body_bytes;

    Router::new()
        .nest("/api/auth", api::auth::router())
        .nest("/api/users", api::users::router())
        .nest("/api/tags", api::tags::router())
        .nest("/api/ingredients", api::ingredients::router())
        .nest("/api/recipes", api::recipes::router())
        .merge(api::short_links::router())
        .merge(api::media::router())
        .merge(swagger_ui)
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());

                    // Image bytes are fetched constantly; keep them out of the logs
                    if matched_path == "/media/{id}" {
                        tracing::trace_span!("http_request")
                    } else {
                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            path = %matched_path,
                        )
                    }
                })
                .on_request(|_request: &Request<_>, _span: &Span| {})
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        if span.metadata().map(|m| m.level()) == Some(&tracing::Level::TRACE) {
                            return;
                        }
                        let status = response.status().as_u16();
                        if status >= 500 {
                            tracing::error!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request failed with server error"
                            );
                        } else {
                            tracing::info!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request completed"
                            );
                        }
                    },
                )
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &Span| {
                        tracing::error!(
                            error = %error,
                            latency_ms = %latency.as_millis(),
                            "request failed"
                        );
                    },
                ),
        )
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let pool = db::create_pool(&config.database_url, config.db_pool_size)?;
    let bind_addr = config.bind_addr;
    let public_url = config.public_url.clone();

    let state = AppState {
        pool: Arc::new(pool),
        config: Arc::new(config),
    };

    // Trailing slashes are trimmed before routing so `/api/recipes/` and `/api/recipes` match alike
    let app = NormalizePathLayer::trim_trailing_slash().layer(app(state));

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    tracing::info!("Server listening on {}", listener.local_addr()?);
    tracing::info!("Swagger UI available at {}/swagger-ui/", public_url);
    tracing::info!("OpenAPI spec available at {}/api-docs/openapi.json", public_url);

    axum::serve(
        listener,
        axum::ServiceExt::<axum::extract::Request>::into_make_service(app),
    )
    .await?;
    Ok(())
}
