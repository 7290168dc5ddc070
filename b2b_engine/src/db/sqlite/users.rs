use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db::sqlite::SqliteDatabaseError,
    db_types::{NewUser, User, UserUpdate},
};

pub(crate) const USER_COLUMNS: &str =
    "users.id, users.email, users.first_name, users.last_name, users.company, users.position, users.is_active, \
     users.user_type, users.created_at";
const RETURNING_USER: &str =
    "RETURNING id, email, first_name, last_name, company, position, is_active, user_type, created_at";

/// Inserts a new, inactive user and their e-mail confirmation token. This is not atomic. Run it inside a transaction
/// and pass `&mut *tx` as the connection.
pub async fn insert_user(
    user: &NewUser,
    password_hash: &str,
    confirm_token: &str,
    conn: &mut SqliteConnection,
) -> Result<User, SqliteDatabaseError> {
    let q = format!(
        "INSERT INTO users (email, first_name, last_name, company, position, password_hash, user_type) VALUES (?, ?, \
         ?, ?, ?, ?, ?) {RETURNING_USER}"
    );
    let user = sqlx::query_as::<_, User>(&q)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.company)
        .bind(&user.position)
        .bind(password_hash)
        .bind(user.user_type)
        .fetch_one(&mut *conn)
        .await?;
    sqlx::query("INSERT INTO confirm_email_tokens (user_id, key) VALUES (?, ?)")
        .bind(user.id)
        .bind(confirm_token)
        .execute(conn)
        .await?;
    debug!("🗃️ User #{} ({}) created", user.id, user.email);
    Ok(user)
}

pub async fn user_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<User>, SqliteDatabaseError> {
    let q = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
    let user = sqlx::query_as::<_, User>(&q).bind(id).fetch_optional(conn).await?;
    Ok(user)
}

pub async fn user_by_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<User>, SqliteDatabaseError> {
    let q = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");
    let user = sqlx::query_as::<_, User>(&q).bind(email).fetch_optional(conn).await?;
    Ok(user)
}

/// Activates the account if `token` is the outstanding confirmation token for `email`, and burns the token.
pub async fn confirm_email(email: &str, token: &str, conn: &mut SqliteConnection) -> Result<bool, SqliteDatabaseError> {
    let user_id: Option<i64> = sqlx::query_scalar(
        "SELECT users.id FROM confirm_email_tokens JOIN users ON users.id = confirm_email_tokens.user_id WHERE \
         users.email = ? AND confirm_email_tokens.key = ?",
    )
    .bind(email)
    .bind(token)
    .fetch_optional(&mut *conn)
    .await?;
    let Some(user_id) = user_id else {
        return Ok(false);
    };
    sqlx::query("UPDATE users SET is_active = 1 WHERE id = ?").bind(user_id).execute(&mut *conn).await?;
    sqlx::query("DELETE FROM confirm_email_tokens WHERE user_id = ?").bind(user_id).execute(conn).await?;
    debug!("🗃️ User #{user_id} confirmed their e-mail address");
    Ok(true)
}

pub async fn update_user(
    id: i64,
    update: UserUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<User>, SqliteDatabaseError> {
    if update.is_empty() {
        debug!("🗃️ No fields to update for user #{id}. Update request skipped.");
        return user_by_id(id, conn).await;
    }
    let mut builder = QueryBuilder::new("UPDATE users SET ");
    let mut set_clause = builder.separated(", ");
    if let Some(email) = update.email {
        set_clause.push("email = ");
        set_clause.push_bind_unseparated(email);
    }
    if let Some(first_name) = update.first_name {
        set_clause.push("first_name = ");
        set_clause.push_bind_unseparated(first_name);
    }
    if let Some(last_name) = update.last_name {
        set_clause.push("last_name = ");
        set_clause.push_bind_unseparated(last_name);
    }
    if let Some(company) = update.company {
        set_clause.push("company = ");
        set_clause.push_bind_unseparated(company);
    }
    if let Some(position) = update.position {
        set_clause.push("position = ");
        set_clause.push_bind_unseparated(position);
    }
    if let Some(hash) = update.password_hash {
        set_clause.push("password_hash = ");
        set_clause.push_bind_unseparated(hash);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(format!(" {RETURNING_USER}"));
    trace!("🗃️ Executing query: {}", builder.sql());
    let user = builder.build_query_as::<User>().fetch_optional(conn).await?;
    Ok(user)
}

pub async fn insert_password_reset_token(
    user_id: i64,
    token: &str,
    conn: &mut SqliteConnection,
) -> Result<(), SqliteDatabaseError> {
    sqlx::query("INSERT INTO password_reset_tokens (user_id, key) VALUES (?, ?)")
        .bind(user_id)
        .bind(token)
        .execute(conn)
        .await?;
    Ok(())
}

/// Sets a new password hash for the holder of `token`, and clears every reset token that user has outstanding.
pub async fn reset_password(
    token: &str,
    password_hash: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<User>, SqliteDatabaseError> {
    let user_id: Option<i64> = sqlx::query_scalar("SELECT user_id FROM password_reset_tokens WHERE key = ?")
        .bind(token)
        .fetch_optional(&mut *conn)
        .await?;
    let Some(user_id) = user_id else {
        return Ok(None);
    };
    sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
        .bind(password_hash)
        .bind(user_id)
        .execute(&mut *conn)
        .await?;
    sqlx::query("DELETE FROM password_reset_tokens WHERE user_id = ?").bind(user_id).execute(&mut *conn).await?;
    debug!("🗃️ Password for user #{user_id} has been reset");
    user_by_id(user_id, conn).await
}
