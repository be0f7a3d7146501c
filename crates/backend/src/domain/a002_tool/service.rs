use super::repository;
use contracts::domain::a002_tool::aggregate::{Tool, ToolDto};
use contracts::domain::common::base_aggregate::generate_code;
use contracts::domain::common::AggregateRoot;
use contracts::shared::list::{paginate, ListQuery, PaginatedResponse};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::shared::error::{ServiceError, ServiceResult};

pub async fn create(db: &DatabaseConnection, owner_id: &str, dto: ToolDto) -> ServiceResult<Uuid> {
    let code = dto
        .code
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| generate_code("HER"));
    let mut aggregate = Tool::new_for_insert(
        owner_id.to_string(),
        code,
        dto.description.trim().to_string(),
        dto.comment,
        dto.quantity,
        dto.unit_price,
    );

    aggregate.validate().map_err(ServiceError::Validation)?;
    aggregate.before_write();

    Ok(repository::insert(db, &aggregate).await?)
}

pub async fn update(db: &DatabaseConnection, owner_id: &str, dto: ToolDto) -> ServiceResult<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| ServiceError::Validation("Identificador inválido".into()))?;

    let mut aggregate = repository::get_by_id(db, owner_id, id)
        .await?
        .ok_or_else(|| ServiceError::not_found(Tool::element_name()))?;

    aggregate.update(&dto);
    aggregate.validate().map_err(ServiceError::Validation)?;
    aggregate.before_write();
    aggregate.base.metadata.increment_version();

    repository::update(db, &aggregate).await?;
    Ok(())
}

pub async fn delete(db: &DatabaseConnection, owner_id: &str, id: Uuid) -> ServiceResult<()> {
    if !repository::soft_delete(db, owner_id, id).await? {
        return Err(ServiceError::not_found(Tool::element_name()));
    }
    Ok(())
}

pub async fn get_by_id(db: &DatabaseConnection, owner_id: &str, id: Uuid) -> ServiceResult<Tool> {
    repository::get_by_id(db, owner_id, id)
        .await?
        .ok_or_else(|| ServiceError::not_found(Tool::element_name()))
}

pub async fn list_all(db: &DatabaseConnection, owner_id: &str) -> ServiceResult<Vec<Tool>> {
    Ok(repository::list_all(db, owner_id).await?)
}

pub async fn list_paginated(
    db: &DatabaseConnection,
    owner_id: &str,
    query: &ListQuery,
) -> ServiceResult<PaginatedResponse<Tool>> {
    let mut items = repository::list_all(db, owner_id).await?;
    if let Some(needle) = query.search() {
        items.retain(|t| {
            t.base.description.to_lowercase().contains(&needle)
                || t.base.code.to_lowercase().contains(&needle)
        });
    }
    Ok(paginate(items, query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_in_memory;

    fn dto(name: &str, quantity: i32, unit_price: f64) -> ToolDto {
        ToolDto {
            description: name.into(),
            quantity,
            unit_price,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn total_price_is_derived() {
        let db = connect_in_memory().await;
        let id = create(&db, "u1", dto("Guillotina", 2, 1500.5)).await.unwrap();
        let tool = get_by_id(&db, "u1", id).await.unwrap();
        assert_eq!(tool.total_price, 3001.0);
        assert!(tool.base.code.starts_with("HER-"));

        update(
            &db,
            "u1",
            ToolDto {
                id: Some(id.to_string()),
                ..dto("Guillotina", 3, 1000.0)
            },
        )
        .await
        .unwrap();
        assert_eq!(get_by_id(&db, "u1", id).await.unwrap().total_price, 3000.0);
    }

    #[tokio::test]
    async fn validation_and_missing_rows() {
        let db = connect_in_memory().await;
        assert!(matches!(
            create(&db, "u1", dto("", 1, 1.0)).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            create(&db, "u1", dto("Regla", 1, 0.0)).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            update(
                &db,
                "u1",
                ToolDto {
                    id: Some(Uuid::new_v4().to_string()),
                    ..dto("Regla", 1, 1.0)
                }
            )
            .await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_hides_tool() {
        let db = connect_in_memory().await;
        let id = create(&db, "u1", dto("Perforadora", 1, 800.0)).await.unwrap();
        create(&db, "u1", dto("Engrapadora", 1, 300.0)).await.unwrap();
        delete(&db, "u1", id).await.unwrap();
        let items = list_all(&db, "u1").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].base.description, "Engrapadora");
    }
}
