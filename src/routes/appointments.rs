use actix_web::{http::StatusCode, web, HttpResponse};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    db::fetch_appointment,
    error::ApiError,
    models::AppointmentRow,
    state::AppState,
    validate, views,
};

#[derive(Deserialize)]
struct AppointmentFilter {
    #[serde(rename = "clientId")]
    client_id: Option<String>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/appointments")
            .route(web::get().to(list_for_client))
            .route(web::post().to(create)),
    )
    .service(
        web::resource("/appointments/{id}")
            .route(web::get().to(detail))
            .route(web::patch().to(update))
            .route(web::delete().to(delete)),
    );
}

async fn list_for_client(
    state: web::Data<AppState>,
    query: web::Query<AppointmentFilter>,
) -> Result<HttpResponse, ApiError> {
    let client_id = query
        .client_id
        .as_deref()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            ApiError::Validation("clientId query parameter is required".to_string())
        })?;

    // Bound as text; sqlite's column affinity matches numeric strings and
    // lets anything else match nothing.
    let rows = sqlx::query_as::<_, AppointmentRow>(
        r#"SELECT id, client_id, barber_id, service_id, date_time, status
           FROM appointments
           WHERE client_id = ?
           ORDER BY id"#,
    )
    .bind(client_id)
    .fetch_all(&state.db)
    .await
    .map_err(internal_error)?;

    let mut appointments = Vec::with_capacity(rows.len());
    for row in rows {
        let appointment = views::appointment_out(&state.db, row)
            .await
            .map_err(internal_error)?;
        appointments.push(appointment);
    }
    Ok(HttpResponse::Ok().json(appointments))
}

async fn create(
    state: web::Data<AppState>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let new_appointment = validate::new_appointment(&payload)?;

    let mut tx = state.db.begin().await.map_err(internal_error)?;
    let result = sqlx::query(
        r#"INSERT INTO appointments (client_id, barber_id, service_id, date_time, status)
           VALUES (?, ?, ?, ?, ?)"#,
    )
    .bind(new_appointment.client_id)
    .bind(new_appointment.barber_id)
    .bind(new_appointment.service_id)
    .bind(new_appointment.date_time)
    .bind(&new_appointment.status)
    .execute(&mut *tx)
    .await
    .map_err(internal_error)?;

    let row = sqlx::query_as::<_, AppointmentRow>(
        r#"SELECT id, client_id, barber_id, service_id, date_time, status
           FROM appointments
           WHERE id = ?"#,
    )
    .bind(result.last_insert_rowid())
    .fetch_one(&mut *tx)
    .await
    .map_err(internal_error)?;
    tx.commit().await.map_err(internal_error)?;

    let appointment = views::appointment_out(&state.db, row)
        .await
        .map_err(internal_error)?;
    Ok(HttpResponse::Created().json(appointment))
}

async fn detail(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let row = fetch_appointment(&state.db, path.into_inner())
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?
        .ok_or_else(not_found)?;

    let appointment = views::appointment_out(&state.db, row)
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;
    Ok(HttpResponse::Ok().json(appointment))
}

async fn update(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let mut row = fetch_appointment(&state.db, path.into_inner())
        .await
        .map_err(write_error)?
        .ok_or_else(not_found)?;

    let payload = payload.into_inner();
    if validate::payload_is_empty(&payload) {
        return Err(ApiError::Validation("Invalid input".to_string()));
    }
    validate::apply_appointment_changes(&mut row, &payload)?;

    sqlx::query(
        r#"UPDATE appointments
           SET client_id = ?, barber_id = ?, service_id = ?, date_time = ?, status = ?
           WHERE id = ?"#,
    )
    .bind(row.client_id)
    .bind(row.barber_id)
    .bind(row.service_id)
    .bind(row.date_time)
    .bind(&row.status)
    .bind(row.id)
    .execute(&state.db)
    .await
    .map_err(write_error)?;

    let appointment = views::appointment_out(&state.db, row)
        .await
        .map_err(write_error)?;
    Ok(HttpResponse::Ok().json(appointment))
}

async fn delete(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    fetch_appointment(&state.db, id)
        .await
        .map_err(write_error)?
        .ok_or_else(not_found)?;

    sqlx::query("DELETE FROM appointments WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await
        .map_err(write_error)?;

    // 204 with a message body, kept for compatibility with existing callers.
    Ok(HttpResponse::build(StatusCode::NO_CONTENT).json(json!({ "message": "Appointment deleted" })))
}

fn not_found() -> ApiError {
    ApiError::NotFound("Appointment not found".to_string())
}

fn internal_error(err: sqlx::Error) -> ApiError {
    ApiError::Internal(format!("Internal error: {err}"))
}

fn write_error(err: sqlx::Error) -> ApiError {
    ApiError::Write(err.to_string())
}
