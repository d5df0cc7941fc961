use actix_web::{middleware::Logger, web, App, HttpServer};
use log::{error, info};
use sqlx::postgres::PgPoolOptions;
use std::process;

use taskboard::{
    routes,
    security::{cors, security_headers},
    AppState, Config,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().unwrap_or_else(|e| {
        error!("Invalid configuration: {}", e);
        process::exit(1);
    });

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .unwrap_or_else(|e| {
            error!("Failed to connect to database: {}", e);
            process::exit(1);
        });
    info!("Database connection established");

    if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
        error!("Failed to run migrations: {}", e);
        process::exit(1);
    }

    let bind_addr = (config.server_host.clone(), config.server_port);
    info!(
        "Starting taskboard ({:?}) at {}",
        config.environment,
        config.server_url()
    );

    let state = web::Data::new(AppState::postgres(config, pool));

    HttpServer::new(move || {
        App::new()
            .wrap(cors(&state.config))
            .wrap(security_headers(state.config.environment))
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(routes::config)
    })
    .bind(bind_addr)
    .unwrap_or_else(|e| {
        error!("Failed to bind server address: {}", e);
        process::exit(1);
    })
    .run()
    .await
}
