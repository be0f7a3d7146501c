use anyhow::{Context, Result};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use contracts::system::auth::SessionClaims;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

/// A signed session token and the row that backs it
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub session_id: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Fixed-width UTC timestamp so SQL string comparison matches time order
fn ts(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Get or create the signing secret stored in `sys_settings`
pub async fn get_jwt_secret<C: ConnectionTrait>(db: &C) -> Result<String> {
    if let Some(secret) = get_jwt_secret_from_db(db).await? {
        return Ok(secret);
    }
    let secret = generate_jwt_secret();
    save_jwt_secret_to_db(db, &secret).await?;
    // another request may have won the race
    get_jwt_secret_from_db(db)
        .await?
        .context("JWT secret missing after insert")
}

/// Generate a cryptographically secure JWT secret (256 bits)
fn generate_jwt_secret() -> String {
    use base64::{engine::general_purpose, Engine as _};
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen::<u8>()).collect();
    general_purpose::STANDARD.encode(&random_bytes)
}

async fn get_jwt_secret_from_db<C: ConnectionTrait>(db: &C) -> Result<Option<String>> {
    let result = db
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT value FROM sys_settings WHERE key = ?",
            ["jwt_secret".into()],
        ))
        .await?;

    match result {
        Some(row) => Ok(Some(row.try_get("", "value")?)),
        None => Ok(None),
    }
}

async fn save_jwt_secret_to_db<C: ConnectionTrait>(db: &C, secret: &str) -> Result<()> {
    let now = ts(Utc::now());
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT OR IGNORE INTO sys_settings (key, value, description, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)",
        [
            "jwt_secret".into(),
            secret.to_string().into(),
            "Auto-generated JWT secret for session cookies".into(),
            now.clone().into(),
            now.into(),
        ],
    ))
    .await?;
    Ok(())
}

fn hash_token(token: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn sign_claims(claims: &SessionClaims, secret: &str) -> Result<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to encode session token")
}

pub fn decode_claims(token: &str, secret: &str) -> Result<SessionClaims> {
    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode session token")?;
    Ok(data.claims)
}

/// Create a `sys_sessions` row and the signed token pointing at it
pub async fn start_session<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    email: &str,
    is_admin: bool,
    lifetime: Duration,
) -> Result<IssuedSession> {
    let now = Utc::now();
    let expires_at = now + lifetime;
    let session_id = uuid::Uuid::new_v4().to_string();

    let claims = SessionClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        is_admin,
        sid: session_id.clone(),
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    let secret = get_jwt_secret(db).await?;
    let token = sign_claims(&claims, &secret)?;

    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO sys_sessions (id, user_id, token_hash, expires_at, created_at)
         VALUES (?, ?, ?, ?, ?)",
        [
            session_id.clone().into(),
            user_id.to_string().into(),
            hash_token(&token).into(),
            ts(expires_at).into(),
            ts(now).into(),
        ],
    ))
    .await
    .context("Failed to store session")?;

    Ok(IssuedSession {
        session_id,
        token,
        expires_at,
    })
}

/// Decode the token and check its session row and user are still live.
///
/// `is_admin` and `email` are refreshed from `sys_users`, so role changes
/// apply to running sessions.
pub async fn resolve_session<C: ConnectionTrait>(db: &C, token: &str) -> Result<Option<SessionClaims>> {
    let secret = get_jwt_secret(db).await?;
    let Ok(mut claims) = decode_claims(token, &secret) else {
        return Ok(None);
    };

    let row = db
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT u.email AS email, u.is_admin AS is_admin
             FROM sys_sessions s JOIN sys_users u ON u.id = s.user_id
             WHERE s.id = ? AND s.user_id = ? AND s.token_hash = ?
               AND s.revoked_at IS NULL AND s.expires_at > ? AND u.is_active = 1",
            [
                claims.sid.clone().into(),
                claims.sub.clone().into(),
                hash_token(token).into(),
                ts(Utc::now()).into(),
            ],
        ))
        .await?;

    match row {
        Some(row) => {
            claims.email = row.try_get("", "email")?;
            claims.is_admin = row.try_get::<i32>("", "is_admin")? != 0;
            Ok(Some(claims))
        }
        None => Ok(None),
    }
}

pub async fn revoke_session<C: ConnectionTrait>(db: &C, session_id: &str) -> Result<()> {
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE sys_sessions SET revoked_at = ? WHERE id = ? AND revoked_at IS NULL",
        [ts(Utc::now()).into(), session_id.to_string().into()],
    ))
    .await?;
    Ok(())
}

/// Revoke every live session of a user except `keep`
pub async fn revoke_user_sessions<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    keep: Option<&str>,
) -> Result<u64> {
    let result = db
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE sys_sessions SET revoked_at = ?
             WHERE user_id = ? AND revoked_at IS NULL AND id <> ?",
            [
                ts(Utc::now()).into(),
                user_id.to_string().into(),
                keep.unwrap_or("").to_string().into(),
            ],
        ))
        .await?;
    Ok(result.rows_affected())
}

/// Drop expired and revoked rows
pub async fn purge_stale_sessions<C: ConnectionTrait>(db: &C) -> Result<u64> {
    let result = db
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "DELETE FROM sys_sessions WHERE revoked_at IS NOT NULL OR expires_at <= ?",
            [ts(Utc::now()).into()],
        ))
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_in_memory;

    async fn insert_user<C: ConnectionTrait>(db: &C, id: &str, is_active: bool) {
        let now = ts(Utc::now());
        db.execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT INTO sys_users (id, email, password_hash, is_active, is_admin, created_at, updated_at)
             VALUES (?, ?, 'x', ?, 0, ?, ?)",
            [
                id.into(),
                format!("{}@local", id).into(),
                (if is_active { 1 } else { 0 }).into(),
                now.clone().into(),
                now.into(),
            ],
        ))
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn secret_is_created_once() {
        let db = connect_in_memory().await;
        let first = get_jwt_secret(&db).await.unwrap();
        assert_eq!(first, get_jwt_secret(&db).await.unwrap());
        assert!(first.len() >= 43);
    }

    #[tokio::test]
    async fn session_round_trip_and_revoke() {
        let db = connect_in_memory().await;
        insert_user(&db, "u1", true).await;

        let s = start_session(&db, "u1", "u1@local", false, Duration::hours(1))
            .await
            .unwrap();
        let claims = resolve_session(&db, &s.token).await.unwrap().unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.sid, s.session_id);

        revoke_session(&db, &s.session_id).await.unwrap();
        assert!(resolve_session(&db, &s.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn tampered_or_foreign_tokens_are_rejected() {
        let db = connect_in_memory().await;
        insert_user(&db, "u1", true).await;
        let s = start_session(&db, "u1", "u1@local", false, Duration::hours(1))
            .await
            .unwrap();

        assert!(resolve_session(&db, "garbage").await.unwrap().is_none());
        let claims = decode_claims(&s.token, &get_jwt_secret(&db).await.unwrap()).unwrap();
        let forged = sign_claims(&claims, "another-secret").unwrap();
        assert!(resolve_session(&db, &forged).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn inactive_users_lose_their_sessions() {
        let db = connect_in_memory().await;
        insert_user(&db, "u2", false).await;
        let s = start_session(&db, "u2", "u2@local", false, Duration::hours(1))
            .await
            .unwrap();
        assert!(resolve_session(&db, &s.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn revoke_all_but_current() {
        let db = connect_in_memory().await;
        insert_user(&db, "u1", true).await;
        let a = start_session(&db, "u1", "u1@local", false, Duration::hours(1))
            .await
            .unwrap();
        let b = start_session(&db, "u1", "u1@local", false, Duration::hours(1))
            .await
            .unwrap();

        let revoked = revoke_user_sessions(&db, "u1", Some(&a.session_id)).await.unwrap();
        assert_eq!(revoked, 1);
        assert!(resolve_session(&db, &a.token).await.unwrap().is_some());
        assert!(resolve_session(&db, &b.token).await.unwrap().is_none());

        assert_eq!(purge_stale_sessions(&db).await.unwrap(), 1);
    }
}
