/**
 * User Records and Queries
 *
 * Reads go through the shared pool; writes run on a leased
 * `TransactionalClient` so they can be part of a larger transaction.
 * Emails are expected to be normalised by the caller.
 */
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::FromRow;
use uuid::Uuid;

use crate::backend::db::{Database, DatabaseError, QueryResult, SqlParam, TransactionalClient};
use crate::shared::{Role, SharedError, UserProfile};

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, phone, avatar_url, \
     role, membership_type, membership_expires_at, created_at, updated_at";

/// A row of the `users` table
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    /// bcrypt hash; never leaves the backend
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub role: String,
    pub membership_type: Option<String>,
    pub membership_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Client-facing view of the record, without the password hash
    pub fn into_profile(self) -> Result<UserProfile, SharedError> {
        let role: Role = self.role.parse()?;
        Ok(UserProfile {
            id: self.id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            avatar_url: self.avatar_url,
            role,
            membership_type: self.membership_type,
            membership_expires_at: self.membership_expires_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Fields required to insert a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

fn first_record(result: &QueryResult) -> Result<Option<UserRecord>, DatabaseError> {
    result
        .first()
        .map(|row: &PgRow| UserRecord::from_row(row))
        .transpose()
        .map_err(DatabaseError::Query)
}

/// Get user by email
pub async fn find_by_email(db: &Database, email: &str) -> Result<Option<UserRecord>, DatabaseError> {
    let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
    let result = db.query(&sql, &[email.into()]).await?;
    first_record(&result)
}

/// Get user by ID
pub async fn find_by_id(db: &Database, id: Uuid) -> Result<Option<UserRecord>, DatabaseError> {
    let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
    let result = db.query(&sql, &[id.into()]).await?;
    first_record(&result)
}

/// Whether an account already uses this email. Locks the matching row, if
/// any, for the rest of the transaction.
pub async fn email_exists(
    client: &mut TransactionalClient,
    email: &str,
) -> Result<bool, DatabaseError> {
    let result = client
        .query("SELECT id FROM users WHERE email = $1 FOR UPDATE", &[email.into()])
        .await?;
    Ok(!result.rows.is_empty())
}

/// Insert a user and return the stored row
pub async fn insert_user(
    client: &mut TransactionalClient,
    user: &NewUser,
) -> Result<UserRecord, DatabaseError> {
    let sql = format!(
        "INSERT INTO users (id, email, password_hash, first_name, last_name, phone, role) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {}",
        USER_COLUMNS
    );
    let params: [SqlParam; 7] = [
        Uuid::new_v4().into(),
        user.email.as_str().into(),
        user.password_hash.as_str().into(),
        user.first_name.as_str().into(),
        user.last_name.as_str().into(),
        user.phone.clone().into(),
        Role::User.as_str().into(),
    ];
    let result = client.query(&sql, &params).await?;
    first_record(&result)?.ok_or(DatabaseError::Query(sqlx::Error::RowNotFound))
}
