use std::{fs, path::Path};

use sqlx::SqlitePool;

use crate::models::AppointmentRow;

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

pub fn ensure_sqlite_dir(db_url: &str) -> std::io::Result<()> {
    let path = if let Some(path) = db_url.strip_prefix("sqlite://") {
        Some(path)
    } else if let Some(path) = db_url.strip_prefix("sqlite:") {
        Some(path)
    } else {
        None
    };

    let Some(path) = path else {
        return Ok(());
    };

    let path = path.split('?').next().unwrap_or(path);
    if path == ":memory:" || path.is_empty() {
        return Ok(());
    }

    let path = path.strip_prefix("file:").unwrap_or(path);
    let db_path = Path::new(path);
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

pub async fn fetch_appointment(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<AppointmentRow>, sqlx::Error> {
    sqlx::query_as::<_, AppointmentRow>(
        r#"SELECT id, client_id, barber_id, service_id, date_time, status
           FROM appointments
           WHERE id = ?
           LIMIT 1"#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn seed_default_services(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM services")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        return Ok(());
    }

    let catalog = [
        ("Signature Cut", 35.0, "Precision cut, styling, and lineup."),
        ("Fade & Line-Up", 30.0, "Skin fade with sharp finishing touches."),
        ("Beard Sculpt", 25.0, "Shape, trim, and conditioning for the beard."),
        ("Full Grooming", 55.0, "Cut, beard, and grooming refresh."),
    ];

    for (name, price, description) in catalog {
        sqlx::query("INSERT INTO services (name, price, description) VALUES (?, ?, ?)")
            .bind(name)
            .bind(price)
            .bind(description)
            .execute(pool)
            .await?;
    }

    Ok(())
}
