use actix_cors::Cors;
use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{web, Error, HttpRequest, HttpResponse};
use log::warn;
use serde_json::json;

use crate::web::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/chat", web::post().to(handlers::chat))
        .route("/health", web::get().to(handlers::health_check));
}

// The editor is served from a different origin
pub fn cors() -> Cors {
    Cors::permissive()
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    warn!("Rejected malformed request body: {}", err);
    let response = HttpResponse::BadRequest().json(json!({ "error": err.to_string() }));
    InternalError::from_response(err, response).into()
}
