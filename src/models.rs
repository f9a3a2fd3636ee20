use chrono::NaiveDateTime;

pub const STATUS_SCHEDULED: &str = "Scheduled";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClientRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BarberRow {
    pub id: i64,
    pub name: String,
    pub specialty: Option<String>,
    pub phone: String,
    pub email: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ServiceRow {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AppointmentRow {
    pub id: i64,
    pub client_id: i64,
    pub barber_id: i64,
    pub service_id: i64,
    pub date_time: NaiveDateTime,
    pub status: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewRow {
    pub id: i64,
    pub client_id: i64,
    pub barber_id: i64,
    pub appointment_id: i64,
    pub rating: i64,
    pub comment: Option<String>,
    pub date: NaiveDateTime,
}
