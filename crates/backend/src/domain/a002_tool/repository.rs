use chrono::Utc;
use contracts::domain::a002_tool::aggregate::{Tool, ToolId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_tool")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub owner_id: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub total_price: f64,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Tool {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        Tool {
            base: BaseAggregate::with_metadata(ToolId(uuid), m.code, m.description, m.comment, metadata),
            owner_id: m.owner_id,
            quantity: m.quantity,
            unit_price: m.unit_price,
            total_price: m.total_price,
        }
    }
}

/// Live tools of one owner, newest first
pub async fn list_all<C: ConnectionTrait>(db: &C, owner_id: &str) -> anyhow::Result<Vec<Tool>> {
    let items = Entity::find()
        .filter(Column::OwnerId.eq(owner_id))
        .filter(Column::IsDeleted.eq(false))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id<C: ConnectionTrait>(
    db: &C,
    owner_id: &str,
    id: Uuid,
) -> anyhow::Result<Option<Tool>> {
    let result = Entity::find_by_id(id.to_string())
        .filter(Column::OwnerId.eq(owner_id))
        .filter(Column::IsDeleted.eq(false))
        .one(db)
        .await?;
    Ok(result.map(Into::into))
}

fn to_active(aggregate: &Tool) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        owner_id: Set(aggregate.owner_id.clone()),
        quantity: Set(aggregate.quantity),
        unit_price: Set(aggregate.unit_price),
        total_price: Set(aggregate.total_price),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

pub async fn insert<C: ConnectionTrait>(db: &C, aggregate: &Tool) -> anyhow::Result<Uuid> {
    to_active(aggregate).insert(db).await?;
    Ok(aggregate.base.id.value())
}

pub async fn update<C: ConnectionTrait>(db: &C, aggregate: &Tool) -> anyhow::Result<()> {
    let mut active = to_active(aggregate);
    active.created_at = sea_orm::ActiveValue::NotSet;
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
