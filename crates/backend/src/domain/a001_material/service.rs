use super::repository;
use contracts::domain::a001_material::aggregate::{Material, MaterialDto};
use contracts::domain::common::base_aggregate::generate_code;
use contracts::domain::common::AggregateRoot;
use contracts::shared::list::{paginate, ListQuery, PaginatedResponse};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::shared::error::{ServiceError, ServiceResult};

fn parse_id(id: Option<&String>) -> ServiceResult<Uuid> {
    id.and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| ServiceError::Validation("Identificador inválido".into()))
}

pub async fn create(db: &DatabaseConnection, owner_id: &str, dto: MaterialDto) -> ServiceResult<Uuid> {
    let code = dto
        .code
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| generate_code("MAT"));
    let mut aggregate = Material::new_for_insert(
        owner_id.to_string(),
        code,
        dto.description.trim().to_string(),
        dto.comment,
        dto.quantity,
        dto.stock.unwrap_or(dto.quantity),
        dto.price,
    );

    aggregate.validate().map_err(ServiceError::Validation)?;
    aggregate.before_write();

    let id = repository::insert(db, &aggregate).await?;
    tracing::info!("Material {} created ({})", aggregate.base.description, id);
    Ok(id)
}

pub async fn update(db: &DatabaseConnection, owner_id: &str, dto: MaterialDto) -> ServiceResult<()> {
    let id = parse_id(dto.id.as_ref())?;

    let mut aggregate = repository::get_by_id(db, owner_id, id)
        .await?
        .ok_or_else(|| ServiceError::not_found(Material::element_name()))?;

    aggregate.update(&dto);
    aggregate.validate().map_err(ServiceError::Validation)?;
    aggregate.before_write();
    aggregate.base.metadata.increment_version();

    repository::update(db, &aggregate).await?;
    Ok(())
}

/// Soft delete. Budget lines keep their snapshot of the material.
pub async fn delete(db: &DatabaseConnection, owner_id: &str, id: Uuid) -> ServiceResult<()> {
    if !repository::soft_delete(db, owner_id, id).await? {
        return Err(ServiceError::not_found(Material::element_name()));
    }
    Ok(())
}

pub async fn get_by_id(db: &DatabaseConnection, owner_id: &str, id: Uuid) -> ServiceResult<Material> {
    repository::get_by_id(db, owner_id, id)
        .await?
        .ok_or_else(|| ServiceError::not_found(Material::element_name()))
}

pub async fn list_all(db: &DatabaseConnection, owner_id: &str) -> ServiceResult<Vec<Material>> {
    Ok(repository::list_all(db, owner_id).await?)
}

pub async fn list_paginated(
    db: &DatabaseConnection,
    owner_id: &str,
    query: &ListQuery,
) -> ServiceResult<PaginatedResponse<Material>> {
    let mut items = repository::list_all(db, owner_id).await?;
    if let Some(needle) = query.search() {
        items.retain(|m| {
            m.base.description.to_lowercase().contains(&needle)
                || m.base.code.to_lowercase().contains(&needle)
        });
    }
    Ok(paginate(items, query))
}

/// Demo materials of a notebook workshop
pub async fn insert_test_data(db: &DatabaseConnection, owner_id: &str) -> ServiceResult<()> {
    let data = vec![
        MaterialDto {
            description: "Hojas".into(),
            comment: Some("Paquete de 500 hojas".into()),
            quantity: 500,
            stock: Some(500),
            price: 4500.0,
            ..Default::default()
        },
        MaterialDto {
            description: "Tapas".into(),
            quantity: 20,
            stock: Some(20),
            price: 10000.0,
            ..Default::default()
        },
        MaterialDto {
            description: "Resortes".into(),
            quantity: 20,
            stock: Some(20),
            price: 2800.0,
            ..Default::default()
        },
    ];

    for dto in data {
        create(db, owner_id, dto).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_in_memory;

    #[tokio::test]
    async fn create_defaults_stock_and_generates_code() {
        let db = connect_in_memory().await;
        let id = create(
            &db,
            "u1",
            MaterialDto {
                description: " Hojas ".into(),
                quantity: 500,
                price: 4500.0,
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let m = get_by_id(&db, "u1", id).await.unwrap();
        assert_eq!(m.base.description, "Hojas");
        assert_eq!(m.stock, 500);
        assert_eq!(m.unit_price, 9.0);
        assert!(m.base.code.starts_with("MAT-"));
    }

    #[tokio::test]
    async fn create_rejects_invalid_form() {
        let db = connect_in_memory().await;
        let err = create(
            &db,
            "u1",
            MaterialDto {
                description: "Hojas".into(),
                quantity: 0,
                price: 10.0,
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn other_owners_cannot_see_or_delete() {
        let db = connect_in_memory().await;
        insert_test_data(&db, "u1").await.unwrap();
        let items = list_all(&db, "u1").await.unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].base.description, "Hojas");

        assert!(list_all(&db, "u2").await.unwrap().is_empty());
        let id = items[0].base.id.value();
        assert!(matches!(
            get_by_id(&db, "u2", id).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            delete(&db, "u2", id).await,
            Err(ServiceError::NotFound(_))
        ));

        delete(&db, "u1", id).await.unwrap();
        assert_eq!(list_all(&db, "u1").await.unwrap().len(), 2);
        assert!(delete(&db, "u1", id).await.is_err());
    }

    #[tokio::test]
    async fn update_bumps_version_and_keeps_code() {
        let db = connect_in_memory().await;
        let id = create(
            &db,
            "u1",
            MaterialDto {
                code: Some("MAT-HOJAS".into()),
                description: "Hojas".into(),
                quantity: 500,
                price: 4500.0,
                ..Default::default()
            },
        )
        .await
        .unwrap();

        update(
            &db,
            "u1",
            MaterialDto {
                id: Some(id.to_string()),
                description: "Hojas carta".into(),
                quantity: 500,
                stock: Some(120),
                price: 5000.0,
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let m = get_by_id(&db, "u1", id).await.unwrap();
        assert_eq!(m.base.code, "MAT-HOJAS");
        assert_eq!(m.stock, 120);
        assert_eq!(m.unit_price, 10.0);
        assert_eq!(m.base.metadata.version, 1);
    }

    #[tokio::test]
    async fn paginated_search_matches_name() {
        let db = connect_in_memory().await;
        insert_test_data(&db, "u1").await.unwrap();
        let page = list_paginated(
            &db,
            "u1",
            &ListQuery {
                q: Some("TAP".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].base.description, "Tapas");
    }

    #[tokio::test]
    async fn adjust_stock_never_goes_negative() {
        let db = connect_in_memory().await;
        insert_test_data(&db, "u1").await.unwrap();
        let tapas = list_all(&db, "u1")
            .await
            .unwrap()
            .into_iter()
            .find(|m| m.base.description == "Tapas")
            .unwrap();
        let id = tapas.base.id.value().to_string();

        assert!(repository::adjust_stock(&db, "u1", &id, -20).await.unwrap());
        assert!(!repository::adjust_stock(&db, "u1", &id, -1).await.unwrap());
        assert!(repository::adjust_stock(&db, "u1", &id, 5).await.unwrap());
        assert!(!repository::adjust_stock(&db, "u2", &id, 1).await.unwrap());

        let m = get_by_id(&db, "u1", tapas.base.id.value()).await.unwrap();
        assert_eq!(m.stock, 5);

        delete(&db, "u1", tapas.base.id.value()).await.unwrap();
        assert!(!repository::adjust_stock(&db, "u1", &id, -1).await.unwrap());
        assert!(repository::adjust_stock(&db, "u1", &id, 3).await.unwrap());
        let m = repository::get_including_deleted(&db, "u1", &id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(m.stock, 8);
        assert!(m.base.metadata.is_deleted);
    }

    #[tokio::test]
    async fn update_without_stock_keeps_current_count() {
        let db = connect_in_memory().await;
        let id = create(
            &db,
            "u1",
            MaterialDto {
                description: "Resortes".into(),
                quantity: 20,
                price: 2800.0,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(repository::adjust_stock(&db, "u1", &id.to_string(), -6).await.unwrap());

        update(
            &db,
            "u1",
            MaterialDto {
                id: Some(id.to_string()),
                description: "Resortes".into(),
                quantity: 20,
                stock: None,
                price: 3000.0,
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let m = get_by_id(&db, "u1", id).await.unwrap();
        assert_eq!(m.stock, 14);
        assert_eq!(m.unit_price, 150.0);
    }
}
