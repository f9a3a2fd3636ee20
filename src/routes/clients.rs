use actix_web::{web, HttpResponse};
use serde_json::Value;

use crate::{error::ApiError, models::ClientRow, state::AppState, validate, views};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/clients")
            .route(web::get().to(list))
            .route(web::post().to(create)),
    );
}

async fn list(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let rows = sqlx::query_as::<_, ClientRow>(
        "SELECT id, name, email, phone, password_hash FROM clients ORDER BY id",
    )
    .fetch_all(&state.db)
    .await
    .map_err(|err| ApiError::Internal(err.to_string()))?;

    let mut clients = Vec::with_capacity(rows.len());
    for row in rows {
        let client = views::client_out(&state.db, row)
            .await
            .map_err(|err| ApiError::Internal(err.to_string()))?;
        clients.push(client);
    }
    Ok(HttpResponse::Ok().json(clients))
}

async fn create(
    state: web::Data<AppState>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let new_client = validate::new_client(&state.db, &payload).await?;

    let mut tx = state.db.begin().await.map_err(write_error)?;
    let result = sqlx::query(
        "INSERT INTO clients (name, email, phone, password_hash) VALUES (?, ?, ?, ?)",
    )
    .bind(&new_client.name)
    .bind(&new_client.email)
    .bind(&new_client.phone)
    .bind(&new_client.password_hash)
    .execute(&mut *tx)
    .await
    .map_err(write_error)?;

    let row = sqlx::query_as::<_, ClientRow>(
        "SELECT id, name, email, phone, password_hash FROM clients WHERE id = ?",
    )
    .bind(result.last_insert_rowid())
    .fetch_one(&mut *tx)
    .await
    .map_err(write_error)?;
    tx.commit().await.map_err(write_error)?;

    let client = views::client_out(&state.db, row)
        .await
        .map_err(write_error)?;
    Ok(HttpResponse::Created().json(client))
}

fn write_error(err: sqlx::Error) -> ApiError {
    ApiError::Write(err.to_string())
}
