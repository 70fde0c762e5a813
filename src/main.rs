use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger};
use anyhow::Result;
use std::sync::Arc;

use terminal_api::procedures::{SqlxProcedureCaller, connect_pool};
use terminal_api::services::TerminalService;
use terminal_api::{AppState, Config, handlers};

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("Terminal API v1.0")
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init();

    println!("🚀 Starting Terminal API server...");

    // Load configuration
    let config = Config::from_env()?;
    println!(
        "📋 Configuration loaded (environment: {})",
        config.environment
    );

    // Connect to the procedure database
    let pool = connect_pool(&config.database_url).await?;
    println!("✅ Database pool ready");

    let caller = Arc::new(SqlxProcedureCaller::new(pool));
    let terminal = TerminalService::new(caller);
    let app_state = actix_web::web::Data::new(AppState { terminal });

    let allowed_origin = config.allowed_origin.clone();
    let server_address = config.server_address();
    println!("🌐 Server starting on http://{}", server_address);

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(
                Cors::default()
                    .allowed_origin(&allowed_origin)
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec!["Content-Type", "Accept"])
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(hello)
            .service(health)
            .configure(handlers::configure)
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
