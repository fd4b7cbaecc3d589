use actix_web::{http, middleware, web, App, HttpServer};
use actix_cors::Cors;
use dotenv::dotenv;
use log::info;

use content_platform_backend::config::Config;
use content_platform_backend::{handlers, services};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    info!("Loaded configuration: {:?}", config);

    // Stores live for the whole process; every worker shares this state.
    let app_state = web::Data::new(services::init_app_state(&config));

    let bind_addr = (config.host.clone(), config.port);
    let server_config = config.clone();

    info!(
        "Starting HTTP server on {}:{} (routes under {})",
        config.host,
        config.port,
        config.api_prefix()
    );
    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![http::header::CONTENT_TYPE, http::header::AUTHORIZATION]);

        for origin in &server_config.cors_allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        let route_config = server_config.clone();
        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(app_state.clone())
            .configure(move |cfg| handlers::configure_routes(cfg, &route_config))
    })
    .bind(bind_addr)?
    .run()
    .await
}
