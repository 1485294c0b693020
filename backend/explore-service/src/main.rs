use actix_web::{dev::Service, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use std::io;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use explore_service::config::Config;
use explore_service::handlers::{get_explore_feed, get_explore_section};
use explore_service::services::ExploreService;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    // Structured logging with JSON format
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_line_number(true)
                .with_file(true)
                .with_target(true),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {:#}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting explore-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // Initialize the JWT validation key. The key is optional: without it the
    // service still runs, serving every request as anonymous.
    match std::env::var("JWT_PUBLIC_KEY_PEM") {
        Ok(public_key) => {
            if let Err(e) = explore_service::security::jwt::initialize_public_key(&public_key) {
                tracing::error!("Failed to initialize JWT public key: {}", e);
                eprintln!("ERROR: Failed to initialize JWT public key: {}", e);
                std::process::exit(1);
            }
            tracing::info!("JWT public key initialized, personalization enabled");
        }
        Err(_) => {
            tracing::warn!(
                "JWT_PUBLIC_KEY_PEM not set - all requests served as anonymous trending"
            );
        }
    }

    // Initialize database pool
    let db_pool = match PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {:#}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    let explore_state = web::Data::new(ExploreService::new(
        db_pool,
        config.explore.overfetch_multiplier,
    ));

    tracing::info!(
        "Explore service initialized (overfetch multiplier: {})",
        config.explore.overfetch_multiplier
    );

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(explore_state.clone())
            .route("/health", web::get().to(|| async { "OK" }))
            // Health endpoints for K8s probes
            .route("/api/v1/health", web::get().to(|| async { "OK" }))
            .route("/api/v1/health/live", web::get().to(|| async { "OK" }))
            .route("/api/v1/health/ready", web::get().to(|| async { "OK" }))
            .route(
                "/metrics",
                web::get().to(explore_service::metrics::serve_metrics),
            )
            .wrap_fn(|req, srv| {
                let method = req.method().to_string();
                let path = req
                    .match_pattern()
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| req.path().to_string());
                let start = Instant::now();

                let fut = srv.call(req);
                async move {
                    match fut.await {
                        Ok(res) => {
                            explore_service::metrics::observe_http_request(
                                &method,
                                &path,
                                res.status().as_u16(),
                                start.elapsed(),
                            );
                            Ok(res)
                        }
                        Err(err) => {
                            explore_service::metrics::observe_http_request(
                                &method,
                                &path,
                                500,
                                start.elapsed(),
                            );
                            Err(err)
                        }
                    }
                }
            })
            .service(get_explore_feed)
            .service(get_explore_section)
    })
    .bind(format!("0.0.0.0:{}", config.app.port))?
    .run()
    .await
}
