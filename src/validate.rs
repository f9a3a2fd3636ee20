use chrono::NaiveDateTime;
use serde_json::Value;
use sqlx::SqlitePool;

use crate::{
    auth,
    error::ApiError,
    models::{AppointmentRow, STATUS_SCHEDULED},
};

pub struct NewClient {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: String,
    pub password_hash: String,
}

pub struct NewBarber {
    pub name: Option<String>,
    pub specialty: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

pub struct NewService {
    pub name: String,
    pub price: f64,
    pub description: String,
}

#[derive(Debug)]
pub struct NewReview {
    pub client_id: i64,
    pub barber_id: i64,
    pub appointment_id: i64,
    pub rating: i64,
    pub comment: String,
}

#[derive(Debug)]
pub struct NewAppointment {
    pub client_id: i64,
    pub barber_id: i64,
    pub service_id: i64,
    pub date_time: NaiveDateTime,
    pub status: String,
}

pub fn payload_is_empty(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

fn str_field<'a>(payload: &'a Value, key: &str) -> Option<&'a str> {
    payload.get(key).and_then(Value::as_str)
}

fn owned_field(payload: &Value, key: &str) -> Option<String> {
    str_field(payload, key).map(str::to_string)
}

// Accepts JSON integers, floats (truncated), and numeric strings.
fn coerce_int(value: &Value) -> Option<i64> {
    if let Some(int) = value.as_i64() {
        return Some(int);
    }
    if let Some(float) = value.as_f64() {
        return Some(float as i64);
    }
    value.as_str().and_then(|raw| raw.trim().parse::<i64>().ok())
}

async fn value_exists(pool: &SqlitePool, query: &str, value: &str) -> Result<bool, ApiError> {
    let found = sqlx::query_scalar::<_, i64>(query)
        .bind(value)
        .fetch_optional(pool)
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;
    Ok(found.is_some())
}

pub async fn new_client(pool: &SqlitePool, payload: &Value) -> Result<NewClient, ApiError> {
    if let Some(email) = str_field(payload, "email") {
        if value_exists(pool, "SELECT id FROM clients WHERE email = ? LIMIT 1", email).await? {
            return Err(ApiError::Conflict("Email already exists.".to_string()));
        }
    }
    if let Some(phone) = str_field(payload, "phone") {
        if value_exists(pool, "SELECT id FROM clients WHERE phone = ? LIMIT 1", phone).await? {
            return Err(ApiError::Conflict("Phone number already exists.".to_string()));
        }
    }

    let phone = match str_field(payload, "phone") {
        Some(phone) if phone.len() >= 10 => phone.to_string(),
        _ => return Err(ApiError::Validation("Invalid phone number.".to_string())),
    };

    let password = match str_field(payload, "password") {
        Some(password) if password.len() >= 6 => password,
        _ => {
            return Err(ApiError::Validation(
                "Password must be at least 6 characters long.".to_string(),
            ))
        }
    };
    let password_hash =
        auth::hash_password(password).map_err(|err| ApiError::Internal(err.to_string()))?;

    Ok(NewClient {
        name: owned_field(payload, "name"),
        email: owned_field(payload, "email"),
        phone,
        password_hash,
    })
}

pub fn new_barber(payload: &Value) -> Result<NewBarber, ApiError> {
    if payload_is_empty(payload) {
        return Err(ApiError::Validation("Invalid input".to_string()));
    }

    Ok(NewBarber {
        name: owned_field(payload, "name"),
        specialty: owned_field(payload, "specialty").unwrap_or_default(),
        phone: owned_field(payload, "phone"),
        email: owned_field(payload, "email"),
        image: owned_field(payload, "image"),
    })
}

pub async fn new_service(pool: &SqlitePool, payload: &Value) -> Result<NewService, ApiError> {
    if let Some(name) = str_field(payload, "name") {
        if value_exists(pool, "SELECT id FROM services WHERE name = ? LIMIT 1", name).await? {
            return Err(ApiError::Conflict("Service already exists.".to_string()));
        }
    }

    let price = match payload.get("price").and_then(Value::as_f64) {
        Some(price) if price > 0.0 => price,
        _ => return Err(ApiError::Validation("Invalid price.".to_string())),
    };

    let name = match str_field(payload, "name") {
        Some(name) if name.len() >= 3 => name.to_string(),
        _ => return Err(ApiError::Validation("Invalid service name.".to_string())),
    };

    Ok(NewService {
        name,
        price,
        description: owned_field(payload, "description").unwrap_or_default(),
    })
}

pub fn new_review(payload: &Value) -> Result<NewReview, ApiError> {
    if payload_is_empty(payload) {
        return Err(ApiError::Validation("No input provided".to_string()));
    }

    for field in ["client_id", "barber_id", "appointment_id", "rating"] {
        if payload.get(field).is_none() {
            return Err(ApiError::Validation(format!(
                "Missing required field: {field}"
            )));
        }
    }

    let int_field = |key: &str| {
        payload
            .get(key)
            .and_then(coerce_int)
            .ok_or_else(|| ApiError::Write(format!("Failed to create review: invalid {key}")))
    };

    Ok(NewReview {
        client_id: int_field("client_id")?,
        barber_id: int_field("barber_id")?,
        appointment_id: int_field("appointment_id")?,
        rating: int_field("rating")?,
        comment: owned_field(payload, "comment").unwrap_or_default(),
    })
}

pub fn new_appointment(payload: &Value) -> Result<NewAppointment, ApiError> {
    if payload_is_empty(payload) {
        return Err(ApiError::Validation(
            "Invalid input: no JSON received".to_string(),
        ));
    }

    let required = ["clientId", "barberId", "serviceId", "date", "time"];
    let missing: Vec<&str> = required
        .iter()
        .filter(|field| payload.get(**field).is_none())
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(ApiError::Validation(format!(
            "Missing fields: {}",
            missing.join(", ")
        )));
    }

    let (client_id, barber_id, service_id, date_time) = parse_schedule(payload)
        .map_err(|detail| ApiError::Validation(format!("Date/time format error: {detail}")))?;

    let status = str_field(payload, "status")
        .unwrap_or(STATUS_SCHEDULED)
        .to_string();

    Ok(NewAppointment {
        client_id,
        barber_id,
        service_id,
        date_time,
        status,
    })
}

// One conversion step: ids and the combined timestamp succeed or fail together.
fn parse_schedule(payload: &Value) -> Result<(i64, i64, i64, NaiveDateTime), String> {
    let int_value = |key: &str| {
        payload
            .get(key)
            .and_then(coerce_int)
            .ok_or_else(|| format!("{key} is not an integer"))
    };
    let client_id = int_value("clientId")?;
    let barber_id = int_value("barberId")?;
    let service_id = int_value("serviceId")?;

    let date = str_field(payload, "date")
        .ok_or_else(|| "date is not a string".to_string())?
        .trim()
        .to_string();
    let time = str_field(payload, "time")
        .ok_or_else(|| "time is not a string".to_string())?
        .trim()
        .to_string();

    // Accepts both "09:00" and "9:00".
    let padded = format!("{time:0>5}");
    let date_time = NaiveDateTime::parse_from_str(&format!("{date}T{padded}"), "%Y-%m-%dT%H:%M")
        .map_err(|err| err.to_string())?;

    Ok((client_id, barber_id, service_id, date_time))
}

pub fn apply_appointment_changes(
    row: &mut AppointmentRow,
    payload: &Value,
) -> Result<(), ApiError> {
    if let Some(value) = payload.get("client_id") {
        row.client_id =
            coerce_int(value).ok_or_else(|| ApiError::Validation("Invalid client_id".to_string()))?;
    }
    if let Some(value) = payload.get("barber_id") {
        row.barber_id =
            coerce_int(value).ok_or_else(|| ApiError::Validation("Invalid barber_id".to_string()))?;
    }
    if let Some(value) = payload.get("service_id") {
        row.service_id = coerce_int(value)
            .ok_or_else(|| ApiError::Validation("Invalid service_id".to_string()))?;
    }
    if let Some(value) = payload.get("status") {
        row.status = value
            .as_str()
            .ok_or_else(|| ApiError::Validation("Invalid status".to_string()))?
            .to_string();
    }
    if let Some(value) = payload.get("date_time") {
        let raw = value
            .as_str()
            .ok_or_else(|| ApiError::Validation("Invalid date_time".to_string()))?;
        row.date_time = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
            .map_err(|err| ApiError::Validation(err.to_string()))?;
    }
    Ok(())
}
