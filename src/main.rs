use axum::http::HeaderValue;
use axum::{routing::get, routing::post, routing::put, Router};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use lead_crm_api::database::manager::DatabaseManager;
use lead_crm_api::{config, handlers, middleware, seed};

#[derive(Parser)]
#[command(name = "lead-crm-api", about = "Sales-lead CRM backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Populate the database with demo users and leads
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting lead CRM API in {:?} mode", config.environment);

    let cli = Cli::parse();
    match cli.command {
        Some(Command::Seed) => seed::run().await,
        Some(Command::Serve) | None => serve().await,
    }
}

async fn serve() -> anyhow::Result<()> {
    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("lead CRM API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/login", post(handlers::auth::login))
        // Protected API behind JWT validation
        .merge(protected_routes().layer(axum::middleware::from_fn(
            middleware::auth::jwt_auth_middleware,
        )))
        // Global middleware
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn protected_routes() -> Router {
    Router::new()
        .route("/me", get(handlers::auth::me))
        // User directory
        .route(
            "/users",
            get(handlers::users::list).post(handlers::users::create),
        )
        .route(
            "/users/:id",
            put(handlers::users::update).delete(handlers::users::delete),
        )
        // Lead registry
        .route(
            "/leads",
            get(handlers::leads::list).post(handlers::leads::create),
        )
        .route(
            "/leads/:id",
            put(handlers::leads::update).delete(handlers::leads::delete),
        )
        // Location tracking
        .route("/salespersons", get(handlers::locations::list))
        .route("/salespersons/nearby", get(handlers::locations::nearby))
        .route("/salesperson/location", post(handlers::locations::report))
        // Assignment workflow
        .route("/assign", post(handlers::assignments::create))
        .route("/assignments", get(handlers::assignments::list))
        .route("/assignments/:id", put(handlers::assignments::update))
        // Reporting
        .route("/reports/dashboard", get(handlers::reports::dashboard))
}

fn cors_layer() -> CorsLayer {
    let origins = &config::config().security.cors_origins;

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| o.parse::<HeaderValue>().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Lead CRM API",
            "version": version,
            "description": "Sales-lead CRM backend built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "login": "/login (public - token acquisition)",
                "me": "/me (protected)",
                "users": "/users[/:id] (protected)",
                "leads": "/leads[/:id] (protected)",
                "salespersons": "/salespersons, /salespersons/nearby, /salesperson/location (protected)",
                "assignments": "/assign, /assignments[/:id] (protected)",
                "reports": "/reports/dashboard (protected)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
