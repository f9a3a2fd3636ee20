use actix_web::{web, HttpResponse};
use serde_json::{json, Value};

use crate::{auth::authenticate_credentials, error::ApiError, state::AppState, views};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(index)))
        .service(web::resource("/login").route(web::post().to(login)));
}

async fn index() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": "okay" }))
}

async fn login(
    state: web::Data<AppState>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    let email = payload
        .get("email")
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty());
    let password = payload
        .get("password")
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty());

    let (Some(email), Some(password)) = (email, password) else {
        return Err(ApiError::Validation("Invalid input".to_string()));
    };

    let client = authenticate_credentials(&state.db, email, password)
        .await
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let client = views::client_out(&state.db, client)
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;
    Ok(HttpResponse::Ok().json(client))
}
