use anyhow::{Context, Result};
use contracts::system::users::User;
use sea_orm::{ConnectionTrait, DatabaseBackend, QueryResult, Statement};

const USER_COLUMNS: &str = "id, email, full_name, is_active, is_admin, created_at, updated_at, last_login_at, created_by";

fn flag(value: bool) -> i32 {
    if value {
        1
    } else {
        0
    }
}

fn user_from_row(row: &QueryResult) -> Result<User> {
    Ok(User {
        id: row.try_get("", "id")?,
        email: row.try_get("", "email")?,
        full_name: row.try_get("", "full_name")?,
        is_active: row.try_get::<i32>("", "is_active")? != 0,
        is_admin: row.try_get::<i32>("", "is_admin")? != 0,
        created_at: row.try_get("", "created_at")?,
        updated_at: row.try_get("", "updated_at")?,
        last_login_at: row.try_get("", "last_login_at")?,
        created_by: row.try_get("", "created_by")?,
    })
}

/// Create user with password hash
pub async fn create_with_password<C: ConnectionTrait>(
    db: &C,
    user: &User,
    password_hash: &str,
) -> Result<()> {
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO sys_users (id, email, password_hash, full_name, is_active, is_admin, created_at, updated_at, last_login_at, created_by)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        [
            user.id.clone().into(),
            user.email.clone().into(),
            password_hash.to_string().into(),
            user.full_name.clone().into(),
            flag(user.is_active).into(),
            flag(user.is_admin).into(),
            user.created_at.clone().into(),
            user.updated_at.clone().into(),
            user.last_login_at.clone().into(),
            user.created_by.clone().into(),
        ],
    ))
    .await
    .context("Failed to insert user")?;

    Ok(())
}

pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: &str) -> Result<Option<User>> {
    let row = db
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &format!("SELECT {} FROM sys_users WHERE id = ?", USER_COLUMNS),
            [id.into()],
        ))
        .await?;
    row.as_ref().map(user_from_row).transpose()
}

/// Emails are stored lowercased
pub async fn get_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<Option<User>> {
    let row = db
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &format!("SELECT {} FROM sys_users WHERE email = ?", USER_COLUMNS),
            [email.into()],
        ))
        .await?;
    row.as_ref().map(user_from_row).transpose()
}

pub async fn get_password_hash<C: ConnectionTrait>(db: &C, user_id: &str) -> Result<Option<String>> {
    let result = db
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT password_hash FROM sys_users WHERE id = ?",
            [user_id.into()],
        ))
        .await?;

    match result {
        Some(row) => Ok(Some(row.try_get("", "password_hash")?)),
        None => Ok(None),
    }
}

pub async fn list_all<C: ConnectionTrait>(db: &C) -> Result<Vec<User>> {
    let rows = db
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            format!("SELECT {} FROM sys_users ORDER BY created_at DESC", USER_COLUMNS),
        ))
        .await?;

    rows.iter().map(user_from_row).collect()
}

pub async fn update<C: ConnectionTrait>(db: &C, user: &User) -> Result<()> {
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE sys_users
         SET email = ?, full_name = ?, is_active = ?, is_admin = ?, updated_at = ?
         WHERE id = ?",
        [
            user.email.clone().into(),
            user.full_name.clone().into(),
            flag(user.is_active).into(),
            flag(user.is_admin).into(),
            user.updated_at.clone().into(),
            user.id.clone().into(),
        ],
    ))
    .await
    .context("Failed to update user")?;

    Ok(())
}

/// Hard delete
pub async fn delete<C: ConnectionTrait>(db: &C, id: &str) -> Result<bool> {
    let result = db
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "DELETE FROM sys_users WHERE id = ?",
            [id.into()],
        ))
        .await
        .context("Failed to delete user")?;

    Ok(result.rows_affected() > 0)
}

pub async fn update_last_login<C: ConnectionTrait>(db: &C, id: &str) -> Result<()> {
    let now = chrono::Utc::now().to_rfc3339();
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE sys_users SET last_login_at = ? WHERE id = ?",
        [now.into(), id.to_string().into()],
    ))
    .await
    .context("Failed to update last login")?;

    Ok(())
}

pub async fn count_users<C: ConnectionTrait>(db: &C) -> Result<usize> {
    count(db, "SELECT COUNT(*) AS count FROM sys_users").await
}

pub async fn count_active_admins<C: ConnectionTrait>(db: &C) -> Result<usize> {
    count(
        db,
        "SELECT COUNT(*) AS count FROM sys_users WHERE is_admin = 1 AND is_active = 1",
    )
    .await
}

async fn count<C: ConnectionTrait>(db: &C, sql: &str) -> Result<usize> {
    let result = db
        .query_one(Statement::from_string(DatabaseBackend::Sqlite, sql.to_string()))
        .await?;

    match result {
        Some(row) => {
            let count: i64 = row.try_get("", "count")?;
            Ok(count as usize)
        }
        None => Ok(0),
    }
}

pub async fn update_password<C: ConnectionTrait>(db: &C, id: &str, password_hash: &str) -> Result<()> {
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE sys_users SET password_hash = ?, updated_at = ? WHERE id = ?",
        [
            password_hash.to_string().into(),
            chrono::Utc::now().to_rfc3339().into(),
            id.to_string().into(),
        ],
    ))
    .await
    .context("Failed to update password")?;

    Ok(())
}
