use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use taskdesk::config::Config;
use taskdesk::{build_app_state, configure_app};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|err| {
        log::error!("Invalid configuration: {}", err);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err)
    })?;
    let bind = (config.server_host.clone(), config.server_port);
    let server_url = config.server_url();

    let state = build_app_state(config).await.map_err(|err| {
        log::error!("Failed to initialise the store: {}", err);
        std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
    })?;
    let state = web::Data::new(state);

    log::info!("Starting task API server at {}", server_url);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .configure(configure_app)
    })
    .bind(bind)?
    .run()
    .await
}
