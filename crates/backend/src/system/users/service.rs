use chrono::Utc;
use contracts::system::users::{normalize_email, ChangePasswordDto, CreateUserDto, UpdateUserDto, User};
use sea_orm::DatabaseConnection;

use super::repository;
use crate::shared::error::{ServiceError, ServiceResult};
use crate::system::auth::{password, session};

const EMAIL_TAKEN: &str = "Este email ya está siendo usado por otro usuario";

fn clean_name(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

async fn ensure_email_free(db: &DatabaseConnection, email: &str, except_id: Option<&str>) -> ServiceResult<()> {
    if let Some(existing) = repository::get_by_email(db, email).await? {
        if Some(existing.id.as_str()) != except_id {
            return Err(ServiceError::Conflict(EMAIL_TAKEN.into()));
        }
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    dto: CreateUserDto,
    created_by: Option<String>,
) -> ServiceResult<String> {
    let email = normalize_email(&dto.email).map_err(ServiceError::Validation)?;
    ensure_email_free(db, &email, None).await?;
    password::validate_password_strength(&dto.password)?;

    let password_hash = password::hash_password(&dto.password)?;

    let user_id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    let user = User {
        id: user_id.clone(),
        email,
        full_name: clean_name(dto.full_name),
        is_active: true,
        is_admin: dto.is_admin,
        created_at: now.clone(),
        updated_at: now,
        last_login_at: None,
        created_by,
    };

    repository::create_with_password(db, &user, &password_hash).await?;
    tracing::info!("User {} created", user.email);

    Ok(user_id)
}

/// Admin edit of a user; an optional password resets it
pub async fn update(db: &DatabaseConnection, dto: UpdateUserDto, requester_id: &str) -> ServiceResult<()> {
    let mut user = repository::get_by_id(db, &dto.id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Usuario"))?;

    let email = normalize_email(&dto.email).map_err(ServiceError::Validation)?;
    ensure_email_free(db, &email, Some(&user.id)).await?;

    let loses_admin = user.is_admin && user.is_active && (!dto.is_admin || !dto.is_active);
    if loses_admin {
        if user.id == requester_id {
            return Err(ServiceError::Conflict(
                "No puedes quitarte tus propios permisos de administrador".into(),
            ));
        }
        if repository::count_active_admins(db).await? <= 1 {
            return Err(ServiceError::Conflict(
                "Debe existir al menos un administrador".into(),
            ));
        }
    }

    let new_password = dto.password.as_deref().filter(|p| !p.is_empty());
    if let Some(p) = new_password {
        password::validate_password_strength(p)?;
    }

    let deactivated = user.is_active && !dto.is_active;
    user.email = email;
    user.full_name = clean_name(dto.full_name);
    user.is_active = dto.is_active;
    user.is_admin = dto.is_admin;
    user.updated_at = Utc::now().to_rfc3339();

    repository::update(db, &user).await?;

    if let Some(p) = new_password {
        let hash = password::hash_password(p)?;
        repository::update_password(db, &user.id, &hash).await?;
    }
    if deactivated || new_password.is_some() {
        session::revoke_user_sessions(db, &user.id, None).await?;
    }

    Ok(())
}

/// Hard delete; the user's sessions go with it
pub async fn delete(db: &DatabaseConnection, id: &str, requester_id: &str) -> ServiceResult<()> {
    if id == requester_id {
        return Err(ServiceError::Conflict("No puedes eliminar tu propio usuario".into()));
    }
    let user = repository::get_by_id(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Usuario"))?;
    if user.is_admin && user.is_active && repository::count_active_admins(db).await? <= 1 {
        return Err(ServiceError::Conflict(
            "Debe existir al menos un administrador".into(),
        ));
    }

    if !repository::delete(db, id).await? {
        return Err(ServiceError::not_found("Usuario"));
    }
    session::revoke_user_sessions(db, id, None).await?;
    tracing::info!("User {} deleted", user.email);
    Ok(())
}

pub async fn get_by_id(db: &DatabaseConnection, id: &str) -> ServiceResult<User> {
    repository::get_by_id(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Usuario"))
}

pub async fn list_all(db: &DatabaseConnection) -> ServiceResult<Vec<User>> {
    Ok(repository::list_all(db).await?)
}

/// Change a password and sign out every other session of that user.
///
/// Users changing their own password must give the old one; admins can
/// set anyone's password without it.
pub async fn change_password(
    db: &DatabaseConnection,
    dto: ChangePasswordDto,
    requester_id: &str,
    requester_session: &str,
) -> ServiceResult<()> {
    let user = get_by_id(db, &dto.user_id).await?;
    let requester = get_by_id(db, requester_id).await?;

    let own = dto.user_id == requester_id;
    if !own && !requester.is_admin {
        return Err(ServiceError::Forbidden("Permiso denegado".into()));
    }
    if own {
        let old_password = dto
            .old_password
            .as_deref()
            .ok_or_else(|| ServiceError::Validation("Ingresa tu contraseña actual".into()))?;
        let current_hash = repository::get_password_hash(db, &user.id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Usuario"))?;
        if !password::verify_password(old_password, &current_hash)? {
            return Err(ServiceError::Validation("Contraseña actual incorrecta".into()));
        }
    }

    password::validate_password_strength(&dto.new_password)?;
    let new_hash = password::hash_password(&dto.new_password)?;
    repository::update_password(db, &user.id, &new_hash).await?;

    let keep = if own { Some(requester_session) } else { None };
    session::revoke_user_sessions(db, &user.id, keep).await?;
    Ok(())
}

/// Check login credentials. `None` for unknown email, wrong password or
/// an inactive account, so callers cannot tell them apart.
pub async fn verify_credentials(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> ServiceResult<Option<User>> {
    let Ok(email) = normalize_email(email) else {
        return Ok(None);
    };
    let user = match repository::get_by_email(db, &email).await? {
        Some(u) => u,
        None => return Ok(None),
    };

    if !user.is_active {
        tracing::warn!("Login attempt for inactive user {}", user.email);
        return Ok(None);
    }

    let password_hash = repository::get_password_hash(db, &user.id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Usuario"))?;

    if !password::verify_password(password, &password_hash)? {
        return Ok(None);
    }

    if let Err(e) = repository::update_last_login(db, &user.id).await {
        tracing::warn!("Failed to update last login for {}: {}", user.email, e);
    }

    Ok(Some(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_in_memory;

    async fn new_user(db: &DatabaseConnection, email: &str, is_admin: bool) -> String {
        create(
            db,
            CreateUserDto {
                email: email.into(),
                password: "password123".into(),
                full_name: Some("Test".into()),
                is_admin,
            },
            None,
        )
        .await
        .unwrap()
    }

    fn edit(user: &User) -> UpdateUserDto {
        UpdateUserDto {
            id: user.id.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            is_active: user.is_active,
            is_admin: user.is_admin,
            password: None,
        }
    }

    #[tokio::test]
    async fn email_is_normalized_and_unique() {
        let db = connect_in_memory().await;
        let id = new_user(&db, " Ana@Taller.com ", false).await;
        assert_eq!(get_by_id(&db, &id).await.unwrap().email, "ana@taller.com");

        let err = create(
            &db,
            CreateUserDto {
                email: "ANA@taller.com".into(),
                password: "password123".into(),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap_err();
        match err {
            ServiceError::Conflict(msg) => assert_eq!(msg, EMAIL_TAKEN),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let db = connect_in_memory().await;
        let err = create(
            &db,
            CreateUserDto {
                email: "a@b.c".into(),
                password: "1234".into(),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn credentials_check() {
        let db = connect_in_memory().await;
        let id = new_user(&db, "ana@taller.com", false).await;

        let ok = verify_credentials(&db, "ANA@taller.com", "password123").await.unwrap();
        assert_eq!(ok.map(|u| u.id), Some(id.clone()));
        assert!(verify_credentials(&db, "ana@taller.com", "wrong-password")
            .await
            .unwrap()
            .is_none());
        assert!(verify_credentials(&db, "nadie@taller.com", "password123")
            .await
            .unwrap()
            .is_none());

        let mut dto = edit(&get_by_id(&db, &id).await.unwrap());
        dto.is_active = false;
        update(&db, dto, "someone-else").await.unwrap();
        assert!(verify_credentials(&db, "ana@taller.com", "password123")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn last_admin_is_protected() {
        let db = connect_in_memory().await;
        let admin = new_user(&db, "admin@local", true).await;
        let other = new_user(&db, "otro@local", false).await;

        assert!(matches!(
            delete(&db, &admin, &admin).await,
            Err(ServiceError::Conflict(_))
        ));
        assert!(matches!(
            delete(&db, &admin, &other).await,
            Err(ServiceError::Conflict(_))
        ));

        let mut demote = edit(&get_by_id(&db, &admin).await.unwrap());
        demote.is_admin = false;
        assert!(matches!(
            update(&db, demote.clone(), &admin).await,
            Err(ServiceError::Conflict(_))
        ));

        let second = new_user(&db, "segundo@local", true).await;
        update(&db, demote, &second).await.unwrap();
        assert!(!get_by_id(&db, &admin).await.unwrap().is_admin);

        delete(&db, &other, &second).await.unwrap();
        assert!(matches!(
            get_by_id(&db, &other).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn change_password_rules() {
        let db = connect_in_memory().await;
        let admin = new_user(&db, "admin@local", true).await;
        let ana = new_user(&db, "ana@local", false).await;

        let own = |old: Option<&str>| ChangePasswordDto {
            user_id: ana.clone(),
            old_password: old.map(str::to_string),
            new_password: "nueva-clave-1".into(),
        };

        assert!(matches!(
            change_password(&db, own(None), &ana, "sid").await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            change_password(&db, own(Some("incorrecta")), &ana, "sid").await,
            Err(ServiceError::Validation(_))
        ));
        change_password(&db, own(Some("password123")), &ana, "sid")
            .await
            .unwrap();
        assert!(verify_credentials(&db, "ana@local", "nueva-clave-1")
            .await
            .unwrap()
            .is_some());

        let reset_admin = ChangePasswordDto {
            user_id: admin.clone(),
            old_password: None,
            new_password: "hackeado-123".into(),
        };
        assert!(matches!(
            change_password(&db, reset_admin, &ana, "sid").await,
            Err(ServiceError::Forbidden(_))
        ));

        let reset_ana = ChangePasswordDto {
            user_id: ana.clone(),
            old_password: None,
            new_password: "reiniciada-1".into(),
        };
        change_password(&db, reset_ana, &admin, "sid").await.unwrap();
        assert!(verify_credentials(&db, "ana@local", "reiniciada-1")
            .await
            .unwrap()
            .is_some());
    }
}
