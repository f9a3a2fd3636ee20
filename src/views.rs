use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::models::{AppointmentRow, BarberRow, ClientRow, ReviewRow, ServiceRow};

// Brief views are leaves: they carry ids instead of nested entities, so a
// detail view can embed its relations without ever recursing back.

#[derive(Debug, Clone, Serialize)]
pub struct ClientBrief {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl From<ClientRow> for ClientBrief {
    fn from(row: ClientRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BarberBrief {
    pub id: i64,
    pub name: String,
    pub specialty: Option<String>,
    pub phone: String,
    pub email: String,
    pub image: Option<String>,
}

impl From<BarberRow> for BarberBrief {
    fn from(row: BarberRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            specialty: row.specialty,
            phone: row.phone,
            email: row.email,
            image: row.image,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceBrief {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
}

impl From<ServiceRow> for ServiceBrief {
    fn from(row: ServiceRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            price: row.price,
            description: row.description,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AppointmentBrief {
    pub id: i64,
    pub client_id: i64,
    pub barber_id: i64,
    pub service_id: i64,
    pub date_time: NaiveDateTime,
    pub status: String,
}

impl From<AppointmentRow> for AppointmentBrief {
    fn from(row: AppointmentRow) -> Self {
        Self {
            id: row.id,
            client_id: row.client_id,
            barber_id: row.barber_id,
            service_id: row.service_id,
            date_time: row.date_time,
            status: row.status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewBrief {
    pub id: i64,
    pub client_id: i64,
    pub barber_id: i64,
    pub appointment_id: i64,
    pub rating: i64,
    pub comment: Option<String>,
    pub date: NaiveDateTime,
}

impl From<ReviewRow> for ReviewBrief {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            client_id: row.client_id,
            barber_id: row.barber_id,
            appointment_id: row.appointment_id,
            rating: row.rating,
            comment: row.comment,
            date: row.date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClientOut {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub appointments: Vec<AppointmentBrief>,
    pub reviews: Vec<ReviewBrief>,
}

#[derive(Debug, Serialize)]
pub struct BarberOut {
    pub id: i64,
    pub name: String,
    pub specialty: Option<String>,
    pub phone: String,
    pub email: String,
    pub image: Option<String>,
    pub appointments: Vec<AppointmentBrief>,
    pub reviews: Vec<ReviewBrief>,
}

#[derive(Debug, Serialize)]
pub struct ServiceOut {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub appointments: Vec<AppointmentBrief>,
}

#[derive(Debug, Serialize)]
pub struct AppointmentOut {
    pub id: i64,
    pub date_time: NaiveDateTime,
    pub status: String,
    pub client: ClientBrief,
    pub barber: BarberBrief,
    pub service: ServiceBrief,
}

#[derive(Debug, Serialize)]
pub struct ReviewOut {
    pub id: i64,
    pub rating: i64,
    pub comment: Option<String>,
    pub date: NaiveDateTime,
    pub client: ClientBrief,
    pub barber: BarberBrief,
    pub appointment: AppointmentBrief,
}

const CLIENT_BY_ID: &str =
    "SELECT id, name, email, phone, password_hash FROM clients WHERE id = ?";
const BARBER_BY_ID: &str =
    "SELECT id, name, specialty, phone, email, image FROM barbers WHERE id = ?";
const SERVICE_BY_ID: &str =
    "SELECT id, name, price, description FROM services WHERE id = ?";
const APPOINTMENT_BY_ID: &str =
    "SELECT id, client_id, barber_id, service_id, date_time, status FROM appointments WHERE id = ?";

const APPOINTMENTS_BY_CLIENT: &str = r#"SELECT id, client_id, barber_id, service_id, date_time, status
    FROM appointments WHERE client_id = ? ORDER BY id"#;
const APPOINTMENTS_BY_BARBER: &str = r#"SELECT id, client_id, barber_id, service_id, date_time, status
    FROM appointments WHERE barber_id = ? ORDER BY id"#;
const APPOINTMENTS_BY_SERVICE: &str = r#"SELECT id, client_id, barber_id, service_id, date_time, status
    FROM appointments WHERE service_id = ? ORDER BY id"#;
const REVIEWS_BY_CLIENT: &str = r#"SELECT id, client_id, barber_id, appointment_id, rating, comment, date
    FROM reviews WHERE client_id = ? ORDER BY id"#;
const REVIEWS_BY_BARBER: &str = r#"SELECT id, client_id, barber_id, appointment_id, rating, comment, date
    FROM reviews WHERE barber_id = ? ORDER BY id"#;

pub async fn client_out(pool: &SqlitePool, row: ClientRow) -> Result<ClientOut, sqlx::Error> {
    let appointments = appointment_briefs(pool, APPOINTMENTS_BY_CLIENT, row.id).await?;
    let reviews = review_briefs(pool, REVIEWS_BY_CLIENT, row.id).await?;
    Ok(ClientOut {
        id: row.id,
        name: row.name,
        email: row.email,
        phone: row.phone,
        appointments,
        reviews,
    })
}

pub async fn barber_out(pool: &SqlitePool, row: BarberRow) -> Result<BarberOut, sqlx::Error> {
    let appointments = appointment_briefs(pool, APPOINTMENTS_BY_BARBER, row.id).await?;
    let reviews = review_briefs(pool, REVIEWS_BY_BARBER, row.id).await?;
    Ok(BarberOut {
        id: row.id,
        name: row.name,
        specialty: row.specialty,
        phone: row.phone,
        email: row.email,
        image: row.image,
        appointments,
        reviews,
    })
}

pub async fn service_out(pool: &SqlitePool, row: ServiceRow) -> Result<ServiceOut, sqlx::Error> {
    let appointments = appointment_briefs(pool, APPOINTMENTS_BY_SERVICE, row.id).await?;
    Ok(ServiceOut {
        id: row.id,
        name: row.name,
        price: row.price,
        description: row.description,
        appointments,
    })
}

pub async fn appointment_out(
    pool: &SqlitePool,
    row: AppointmentRow,
) -> Result<AppointmentOut, sqlx::Error> {
    let client = sqlx::query_as::<_, ClientRow>(CLIENT_BY_ID)
        .bind(row.client_id)
        .fetch_one(pool)
        .await?;
    let barber = sqlx::query_as::<_, BarberRow>(BARBER_BY_ID)
        .bind(row.barber_id)
        .fetch_one(pool)
        .await?;
    let service = sqlx::query_as::<_, ServiceRow>(SERVICE_BY_ID)
        .bind(row.service_id)
        .fetch_one(pool)
        .await?;

    Ok(AppointmentOut {
        id: row.id,
        date_time: row.date_time,
        status: row.status,
        client: client.into(),
        barber: barber.into(),
        service: service.into(),
    })
}

pub async fn review_out(pool: &SqlitePool, row: ReviewRow) -> Result<ReviewOut, sqlx::Error> {
    let client = sqlx::query_as::<_, ClientRow>(CLIENT_BY_ID)
        .bind(row.client_id)
        .fetch_one(pool)
        .await?;
    let barber = sqlx::query_as::<_, BarberRow>(BARBER_BY_ID)
        .bind(row.barber_id)
        .fetch_one(pool)
        .await?;
    let appointment = sqlx::query_as::<_, AppointmentRow>(APPOINTMENT_BY_ID)
        .bind(row.appointment_id)
        .fetch_one(pool)
        .await?;

    Ok(ReviewOut {
        id: row.id,
        rating: row.rating,
        comment: row.comment,
        date: row.date,
        client: client.into(),
        barber: barber.into(),
        appointment: appointment.into(),
    })
}

async fn appointment_briefs(
    pool: &SqlitePool,
    query: &str,
    id: i64,
) -> Result<Vec<AppointmentBrief>, sqlx::Error> {
    let rows = sqlx::query_as::<_, AppointmentRow>(query)
        .bind(id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(AppointmentBrief::from).collect())
}

async fn review_briefs(
    pool: &SqlitePool,
    query: &str,
    id: i64,
) -> Result<Vec<ReviewBrief>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ReviewRow>(query)
        .bind(id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(ReviewBrief::from).collect())
}
