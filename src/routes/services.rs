use actix_web::{web, HttpResponse};
use serde_json::Value;

use crate::{error::ApiError, models::ServiceRow, state::AppState, validate, views};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/services")
            .route(web::get().to(list))
            .route(web::post().to(create)),
    );
}

async fn list(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let rows = sqlx::query_as::<_, ServiceRow>(
        "SELECT id, name, price, description FROM services ORDER BY id",
    )
    .fetch_all(&state.db)
    .await
    .map_err(|err| ApiError::Internal(err.to_string()))?;

    let mut services = Vec::with_capacity(rows.len());
    for row in rows {
        let service = views::service_out(&state.db, row)
            .await
            .map_err(|err| ApiError::Internal(err.to_string()))?;
        services.push(service);
    }
    Ok(HttpResponse::Ok().json(services))
}

async fn create(
    state: web::Data<AppState>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let new_service = validate::new_service(&state.db, &payload).await?;

    let mut tx = state.db.begin().await.map_err(write_error)?;
    let result = sqlx::query("INSERT INTO services (name, price, description) VALUES (?, ?, ?)")
        .bind(&new_service.name)
        .bind(new_service.price)
        .bind(&new_service.description)
        .execute(&mut *tx)
        .await
        .map_err(write_error)?;

    let row = sqlx::query_as::<_, ServiceRow>(
        "SELECT id, name, price, description FROM services WHERE id = ?",
    )
    .bind(result.last_insert_rowid())
    .fetch_one(&mut *tx)
    .await
    .map_err(write_error)?;
    tx.commit().await.map_err(write_error)?;

    let service = views::service_out(&state.db, row)
        .await
        .map_err(write_error)?;
    Ok(HttpResponse::Created().json(service))
}

fn write_error(err: sqlx::Error) -> ApiError {
    ApiError::Write(err.to_string())
}
