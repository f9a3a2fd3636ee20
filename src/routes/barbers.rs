use actix_web::{web, HttpResponse};
use serde_json::Value;

use crate::{error::ApiError, models::BarberRow, state::AppState, validate, views};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/barbers")
            .route(web::get().to(list))
            .route(web::post().to(create)),
    );
}

async fn list(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let rows = sqlx::query_as::<_, BarberRow>(
        "SELECT id, name, specialty, phone, email, image FROM barbers ORDER BY id",
    )
    .fetch_all(&state.db)
    .await
    .map_err(|err| ApiError::Internal(err.to_string()))?;

    let mut barbers = Vec::with_capacity(rows.len());
    for row in rows {
        let barber = views::barber_out(&state.db, row)
            .await
            .map_err(|err| ApiError::Internal(err.to_string()))?;
        barbers.push(barber);
    }
    Ok(HttpResponse::Ok().json(barbers))
}

async fn create(
    state: web::Data<AppState>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let new_barber = validate::new_barber(&payload)?;

    let mut tx = state.db.begin().await.map_err(write_error)?;
    let result = sqlx::query(
        "INSERT INTO barbers (name, specialty, phone, email, image) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&new_barber.name)
    .bind(&new_barber.specialty)
    .bind(&new_barber.phone)
    .bind(&new_barber.email)
    .bind(&new_barber.image)
    .execute(&mut *tx)
    .await
    .map_err(write_error)?;

    let row = sqlx::query_as::<_, BarberRow>(
        "SELECT id, name, specialty, phone, email, image FROM barbers WHERE id = ?",
    )
    .bind(result.last_insert_rowid())
    .fetch_one(&mut *tx)
    .await
    .map_err(write_error)?;
    tx.commit().await.map_err(write_error)?;

    let barber = views::barber_out(&state.db, row)
        .await
        .map_err(write_error)?;
    Ok(HttpResponse::Created().json(barber))
}

fn write_error(err: sqlx::Error) -> ApiError {
    ApiError::Write(err.to_string())
}
