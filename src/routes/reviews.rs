use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::Value;

use crate::{error::ApiError, models::ReviewRow, state::AppState, validate, views};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/reviews")
            .route(web::get().to(list))
            .route(web::post().to(create)),
    );
}

async fn list(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let rows = sqlx::query_as::<_, ReviewRow>(
        r#"SELECT id, client_id, barber_id, appointment_id, rating, comment, date
           FROM reviews
           ORDER BY id"#,
    )
    .fetch_all(&state.db)
    .await
    .map_err(fetch_error)?;

    let mut reviews = Vec::with_capacity(rows.len());
    for row in rows {
        let review = views::review_out(&state.db, row)
            .await
            .map_err(fetch_error)?;
        reviews.push(review);
    }
    Ok(HttpResponse::Ok().json(reviews))
}

async fn create(
    state: web::Data<AppState>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let new_review = validate::new_review(&payload)?;

    let mut tx = state.db.begin().await.map_err(create_error)?;
    let result = sqlx::query(
        r#"INSERT INTO reviews (client_id, barber_id, appointment_id, rating, comment, date)
           VALUES (?, ?, ?, ?, ?, ?)"#,
    )
    .bind(new_review.client_id)
    .bind(new_review.barber_id)
    .bind(new_review.appointment_id)
    .bind(new_review.rating)
    .bind(&new_review.comment)
    .bind(Utc::now().naive_utc())
    .execute(&mut *tx)
    .await
    .map_err(create_error)?;

    let row = sqlx::query_as::<_, ReviewRow>(
        r#"SELECT id, client_id, barber_id, appointment_id, rating, comment, date
           FROM reviews
           WHERE id = ?"#,
    )
    .bind(result.last_insert_rowid())
    .fetch_one(&mut *tx)
    .await
    .map_err(create_error)?;
    tx.commit().await.map_err(create_error)?;

    let review = views::review_out(&state.db, row)
        .await
        .map_err(create_error)?;
    Ok(HttpResponse::Created().json(review))
}

fn fetch_error(err: sqlx::Error) -> ApiError {
    ApiError::Internal(format!("Failed to fetch reviews: {err}"))
}

fn create_error(err: sqlx::Error) -> ApiError {
    ApiError::Write(format!("Failed to create review: {err}"))
}
