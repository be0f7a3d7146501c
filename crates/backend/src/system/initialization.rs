use anyhow::Result;
use contracts::system::users::CreateUserDto;
use sea_orm::DatabaseConnection;

use crate::system::auth::session;
use crate::system::users::{repository, service};

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@local";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin12345";

/// Ensure admin user exists (create if table is empty)
pub async fn ensure_admin_user_exists(db: &DatabaseConnection) -> Result<()> {
    if repository::count_users(db).await? > 0 {
        return Ok(());
    }

    tracing::info!("No users found. Creating default admin user...");

    let admin_dto = CreateUserDto {
        email: DEFAULT_ADMIN_EMAIL.to_string(),
        password: DEFAULT_ADMIN_PASSWORD.to_string(),
        full_name: Some("Administrador".to_string()),
        is_admin: true,
    };

    let admin_id = service::create(db, admin_dto, None)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create default admin: {}", e))?;

    tracing::warn!("Default admin user created ({})", admin_id);
    tracing::warn!("  Email: {}", DEFAULT_ADMIN_EMAIL);
    tracing::warn!("  Password: {}", DEFAULT_ADMIN_PASSWORD);
    tracing::warn!("  Change the password after the first login!");

    Ok(())
}

/// Start-up housekeeping of the session table
pub async fn purge_sessions(db: &DatabaseConnection) -> Result<()> {
    let removed = session::purge_stale_sessions(db).await?;
    if removed > 0 {
        tracing::info!("Removed {} stale sessions", removed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_in_memory;

    #[tokio::test]
    async fn admin_is_created_only_on_empty_table() {
        let db = connect_in_memory().await;
        ensure_admin_user_exists(&db).await.unwrap();
        ensure_admin_user_exists(&db).await.unwrap();

        let users = repository::list_all(&db).await.unwrap();
        assert_eq!(users.len(), 1);
        assert!(users[0].is_admin);
        assert!(service::verify_credentials(&db, DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD)
            .await
            .unwrap()
            .is_some());
    }
}
