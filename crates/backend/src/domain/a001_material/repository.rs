use chrono::Utc;
use contracts::domain::a001_material::aggregate::{Material, MaterialId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_material")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub owner_id: String,
    pub stock: i32,
    pub quantity: i32,
    pub price: f64,
    pub unit_price: f64,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Material {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        Material {
            base: BaseAggregate::with_metadata(
                MaterialId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            owner_id: m.owner_id,
            stock: m.stock,
            quantity: m.quantity,
            price: m.price,
            unit_price: m.unit_price,
        }
    }
}

fn owned(owner_id: &str) -> sea_orm::Select<Entity> {
    Entity::find()
        .filter(Column::OwnerId.eq(owner_id))
        .filter(Column::IsDeleted.eq(false))
}

/// Live materials of one owner, sorted by name
pub async fn list_all<C: ConnectionTrait>(db: &C, owner_id: &str) -> anyhow::Result<Vec<Material>> {
    let mut items: Vec<Material> = owned(owner_id)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    items.sort_by(|a, b| {
        a.base
            .description
            .to_lowercase()
            .cmp(&b.base.description.to_lowercase())
    });
    Ok(items)
}

pub async fn get_by_id<C: ConnectionTrait>(
    db: &C,
    owner_id: &str,
    id: Uuid,
) -> anyhow::Result<Option<Material>> {
    let result = owned(owner_id)
        .filter(Column::Id.eq(id.to_string()))
        .one(db)
        .await?;
    Ok(result.map(Into::into))
}

/// Material by id regardless of the soft delete flag
pub async fn get_including_deleted<C: ConnectionTrait>(
    db: &C,
    owner_id: &str,
    id: &str,
) -> anyhow::Result<Option<Material>> {
    let result = Entity::find()
        .filter(Column::OwnerId.eq(owner_id))
        .filter(Column::Id.eq(id))
        .one(db)
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert<C: ConnectionTrait>(db: &C, aggregate: &Material) -> anyhow::Result<Uuid> {
    let uuid = aggregate.base.id.value();
    let active = ActiveModel {
        id: Set(uuid.to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        owner_id: Set(aggregate.owner_id.clone()),
        stock: Set(aggregate.stock),
        quantity: Set(aggregate.quantity),
        price: Set(aggregate.price),
        unit_price: Set(aggregate.unit_price),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    };
    active.insert(db).await?;
    Ok(uuid)
}

pub async fn update<C: ConnectionTrait>(db: &C, aggregate: &Material) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        owner_id: Set(aggregate.owner_id.clone()),
        stock: Set(aggregate.stock),
        quantity: Set(aggregate.quantity),
        price: Set(aggregate.price),
        unit_price: Set(aggregate.unit_price),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
        created_at: sea_orm::ActiveValue::NotSet,
    };
    active.update(db).await?;
    Ok(())
}

pub async fn soft_delete<C: ConnectionTrait>(
    db: &C,
    owner_id: &str,
    id: Uuid,
) -> anyhow::Result<bool> {
    let result = Entity::update_many()
        .col_expr(Column::IsDeleted, Expr::value(true))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id.to_string()))
        .filter(Column::OwnerId.eq(owner_id))
        .filter(Column::IsDeleted.eq(false))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Add `delta` to the stock unless the result would drop below zero.
///
/// Deleted materials still take units back but never give any out.
/// Returns `false` when the row is missing, deleted (for a negative delta)
/// or the stock is insufficient.
pub async fn adjust_stock<C: ConnectionTrait>(
    db: &C,
    owner_id: &str,
    id: &str,
    delta: i32,
) -> anyhow::Result<bool> {
    let mut update = Entity::update_many()
        .col_expr(Column::Stock, Expr::col(Column::Stock).add(delta))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id))
        .filter(Column::OwnerId.eq(owner_id))
        .filter(Column::Stock.gte(-delta));
    if delta < 0 {
        update = update.filter(Column::IsDeleted.eq(false));
    }
    let result = update.exec(db).await?;
    Ok(result.rows_affected > 0)
}
