use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand_core::OsRng;
use sqlx::SqlitePool;

use crate::models::ClientRow;

pub fn hash_password(password: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed_hash = PasswordHash::new(password_hash);
    match parsed_hash {
        Ok(hash) => Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok(),
        Err(_) => false,
    }
}

pub async fn authenticate_credentials(
    pool: &SqlitePool,
    email: &str,
    password: &str,
) -> Option<ClientRow> {
    let client = sqlx::query_as::<_, ClientRow>(
        r#"SELECT id, name, email, phone, password_hash
           FROM clients
           WHERE email = ?
           LIMIT 1"#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
    .ok()?;

    let client = match client {
        Some(client) => client,
        None => return None,
    };

    if !verify_password(password, &client.password_hash) {
        return None;
    }

    Some(client)
}
