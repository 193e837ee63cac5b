//! Database operations for the `users` table.
//!
//! Identity and billing are owned by the external auth collaborator; this
//! module covers the tier, usage counter, and gift-tier expiry the API needs.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// Subscription tiers accepted by [`grant_tier`].
pub const VALID_TIERS: &[&str] = &["free", "starter", "pro", "admin"];

/// A row from the `users` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub tier: String,
    pub usage_count: i32,
    pub gift_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const USER_COLUMNS: &str =
    "id, email, tier, usage_count, gift_expires_at, created_at, updated_at";

/// Insert a user profile, returning the stored row.
///
/// Existing ids are left untouched and returned as-is, so the call is safe
/// to repeat when the auth collaborator re-delivers a signup event.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert or re-read fails.
pub async fn create_user(pool: &PgPool, id: Uuid, email: &str) -> Result<UserRow, DbError> {
    sqlx::query(
        "INSERT INTO users (id, email) VALUES ($1, $2) \
         ON CONFLICT (id) DO NOTHING",
    )
    .bind(id)
    .bind(email)
    .execute(pool)
    .await?;

    get_user(pool, id).await?.ok_or(DbError::NotFound)
}

/// Fetch a user profile by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_user(pool: &PgPool, id: Uuid) -> Result<Option<UserRow>, DbError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Set a user's tier, optionally with a gift expiry timestamp.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the user does not exist, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn grant_tier(
    pool: &PgPool,
    id: Uuid,
    tier: &str,
    gift_expires_at: Option<DateTime<Utc>>,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE users SET tier = $2, gift_expires_at = $3, updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(id)
    .bind(tier)
    .bind(gift_expires_at)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}

/// Increment a user's usage counter and return the new value.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the user does not exist, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn increment_usage(pool: &PgPool, id: Uuid) -> Result<i32, DbError> {
    let count: Option<i32> = sqlx::query_scalar(
        "UPDATE users SET usage_count = usage_count + 1, updated_at = NOW() \
         WHERE id = $1 \
         RETURNING usage_count",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    count.ok_or(DbError::NotFound)
}

/// The tier a user currently holds, with gift expiry applied.
///
/// A gifted tier reverts to `free` once `gift_expires_at` passes; permanent
/// tiers (no expiry) are returned unchanged.
#[must_use]
pub fn effective_tier(user: &UserRow, now: DateTime<Utc>) -> &str {
    match user.gift_expires_at {
        Some(expiry) if expiry <= now => "free",
        _ => &user.tier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user(tier: &str, gift_expires_at: Option<DateTime<Utc>>) -> UserRow {
        let now = Utc::now();
        UserRow {
            id: Uuid::new_v4(),
            email: "user@example.com".to_string(),
            tier: tier.to_string(),
            usage_count: 0,
            gift_expires_at,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn permanent_tier_is_returned_unchanged() {
        let u = user("pro", None);
        assert_eq!(effective_tier(&u, Utc::now()), "pro");
    }

    #[test]
    fn unexpired_gift_keeps_granted_tier() {
        let now = Utc::now();
        let u = user("starter", Some(now + Duration::days(7)));
        assert_eq!(effective_tier(&u, now), "starter");
    }

    #[test]
    fn expired_gift_reverts_to_free() {
        let now = Utc::now();
        let u = user("pro", Some(now - Duration::hours(1)));
        assert_eq!(effective_tier(&u, now), "free");
    }

    #[test]
    fn gift_expiring_exactly_now_reverts() {
        let now = Utc::now();
        let u = user("starter", Some(now));
        assert_eq!(effective_tier(&u, now), "free");
    }
}
