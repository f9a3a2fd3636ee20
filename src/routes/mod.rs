use actix_web::{error::InternalError, web, ResponseError};

use crate::error::ApiError;

pub mod appointments;
pub mod barbers;
pub mod clients;
pub mod public;
pub mod reviews;
pub mod services;

pub fn configure(cfg: &mut web::ServiceConfig) {
    public::configure(cfg);
    clients::configure(cfg);
    barbers::configure(cfg);
    services::configure(cfg);
    reviews::configure(cfg);
    appointments::configure(cfg);
}

// Bodies that fail JSON extraction surface the same way as empty payloads.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = ApiError::Validation("Invalid input".to_string()).error_response();
        InternalError::from_response(err, response).into()
    })
}
