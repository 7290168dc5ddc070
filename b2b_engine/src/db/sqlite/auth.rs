use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db::sqlite::{users::USER_COLUMNS, SqliteDatabaseError},
    db_types::{User, UserCredentials},
};

pub async fn credentials_for_email(
    email: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<UserCredentials>, SqliteDatabaseError> {
    let creds = sqlx::query_as::<_, UserCredentials>(
        "SELECT id AS user_id, password_hash, is_active FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(conn)
    .await?;
    Ok(creds)
}

/// Stores `candidate` as the user's token unless they already have one, then returns whichever token is on record.
pub async fn fetch_or_create_token(
    user_id: i64,
    candidate: &str,
    conn: &mut SqliteConnection,
) -> Result<String, SqliteDatabaseError> {
    let inserted = sqlx::query("INSERT OR IGNORE INTO auth_tokens (key, user_id) VALUES (?, ?)")
        .bind(candidate)
        .bind(user_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    if inserted > 0 {
        debug!("🗃️ Issued a new API token for user #{user_id}");
    }
    let token: String =
        sqlx::query_scalar("SELECT key FROM auth_tokens WHERE user_id = ?").bind(user_id).fetch_one(conn).await?;
    Ok(token)
}

pub async fn user_for_token(token: &str, conn: &mut SqliteConnection) -> Result<Option<User>, SqliteDatabaseError> {
    let q = format!(
        "SELECT {USER_COLUMNS} FROM auth_tokens JOIN users ON users.id = auth_tokens.user_id WHERE auth_tokens.key = \
         ? AND users.is_active = 1"
    );
    let user = sqlx::query_as::<_, User>(&q).bind(token).fetch_optional(conn).await?;
    Ok(user)
}
