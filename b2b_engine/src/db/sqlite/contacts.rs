use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db::sqlite::SqliteDatabaseError,
    db_types::{Contact, ContactUpdate, NewContact},
};

const CONTACT_COLUMNS: &str = "id, user_id, city, street, house, structure, building, apartment, phone";

pub async fn contacts_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Contact>, SqliteDatabaseError> {
    let q = format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE user_id = ? ORDER BY id");
    let contacts = sqlx::query_as::<_, Contact>(&q).bind(user_id).fetch_all(conn).await?;
    Ok(contacts)
}

pub async fn contact_for_user(
    user_id: i64,
    contact_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Contact>, SqliteDatabaseError> {
    let q = format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ? AND user_id = ?");
    let contact = sqlx::query_as::<_, Contact>(&q).bind(contact_id).bind(user_id).fetch_optional(conn).await?;
    Ok(contact)
}

pub async fn insert_contact(
    user_id: i64,
    contact: &NewContact,
    conn: &mut SqliteConnection,
) -> Result<Contact, SqliteDatabaseError> {
    let q = format!(
        "INSERT INTO contacts (user_id, city, street, house, structure, building, apartment, phone) VALUES (?, ?, ?, \
         ?, ?, ?, ?, ?) RETURNING {CONTACT_COLUMNS}"
    );
    let contact = sqlx::query_as::<_, Contact>(&q)
        .bind(user_id)
        .bind(&contact.city)
        .bind(&contact.street)
        .bind(&contact.house)
        .bind(&contact.structure)
        .bind(&contact.building)
        .bind(&contact.apartment)
        .bind(&contact.phone)
        .fetch_one(conn)
        .await?;
    debug!("🗃️ Contact #{} created for user #{user_id}", contact.id);
    Ok(contact)
}

pub async fn update_contact(
    user_id: i64,
    contact_id: i64,
    update: ContactUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Contact>, SqliteDatabaseError> {
    if update.is_empty() {
        return contact_for_user(user_id, contact_id, conn).await;
    }
    let mut builder = QueryBuilder::new("UPDATE contacts SET ");
    let mut set_clause = builder.separated(", ");
    let fields = [
        ("city", update.city),
        ("street", update.street),
        ("house", update.house),
        ("structure", update.structure),
        ("building", update.building),
        ("apartment", update.apartment),
        ("phone", update.phone),
    ];
    for (column, value) in fields {
        if let Some(value) = value {
            set_clause.push(format!("{column} = "));
            set_clause.push_bind_unseparated(value);
        }
    }
    builder.push(" WHERE id = ");
    builder.push_bind(contact_id);
    builder.push(" AND user_id = ");
    builder.push_bind(user_id);
    builder.push(format!(" RETURNING {CONTACT_COLUMNS}"));
    trace!("🗃️ Executing query: {}", builder.sql());
    let contact = builder.build_query_as::<Contact>().fetch_optional(conn).await?;
    Ok(contact)
}

pub async fn delete_contacts(user_id: i64, ids: &[i64], conn: &mut SqliteConnection) -> Result<u64, SqliteDatabaseError> {
    if ids.is_empty() {
        return Ok(0);
    }
    let mut builder = QueryBuilder::new("DELETE FROM contacts WHERE user_id = ");
    builder.push_bind(user_id);
    builder.push(" AND id IN (");
    let mut id_list = builder.separated(", ");
    for id in ids {
        id_list.push_bind(*id);
    }
    builder.push(")");
    let deleted = builder.build().execute(conn).await?.rows_affected();
    debug!("🗃️ Deleted {deleted} contacts for user #{user_id}");
    Ok(deleted)
}
