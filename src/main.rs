mod config;
mod error;
mod model;
mod relay;
mod web;

use actix_web::{web::Data, App, HttpServer};
use dotenv::dotenv;
use log::{error, info};

use config::Config;
use model::CompletionProvider;
use relay::ResponseSchema;
use web::routes;

// App state structure
pub struct AppState {
    provider: CompletionProvider,
    response_schema: ResponseSchema,
    thread_focus: bool,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            provider: CompletionProvider::new(config),
            response_schema: config.response_schema,
            thread_focus: config.thread_focus,
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting annotation relay");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Response schema: {:?}, thread focus: {}",
        config.response_schema, config.thread_focus
    );

    let app_state = Data::new(AppState::new(&config));

    info!("Listening on {}:{}", config.host, config.port);

    // Start web server
    HttpServer::new(move || {
        App::new()
            .wrap(routes::cors())
            .app_data(app_state.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
