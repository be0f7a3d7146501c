use chrono::Utc;
use contracts::domain::a003_budget::aggregate::{Budget, BudgetId, BudgetLine, BudgetStatus};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a003_budget")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub owner_id: String,
    pub status_id: i32,
    pub sales_price: f64,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub mod line {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "a003_budget_line")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub budget_id: String,
        pub line_no: i32,
        pub material_id: String,
        pub material_name: String,
        pub quantity: i32,
        pub unit_price: f64,
        pub assigned_at: chrono::DateTime<chrono::Utc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<line::Model> for BudgetLine {
    fn from(m: line::Model) -> Self {
        BudgetLine {
            material_id: m.material_id,
            material_name: m.material_name,
            quantity: m.quantity,
            unit_price: m.unit_price,
            assigned_at: m.assigned_at,
        }
    }
}

fn to_aggregate(m: Model, lines: Vec<BudgetLine>) -> Budget {
    let metadata = EntityMetadata {
        created_at: m.created_at.unwrap_or_else(Utc::now),
        updated_at: m.updated_at.unwrap_or_else(Utc::now),
        is_deleted: m.is_deleted,
        version: m.version,
    };
    let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
    let status = BudgetStatus::from_id(m.status_id).unwrap_or_else(|| {
        tracing::warn!("Budget {} has unknown status {}", m.id, m.status_id);
        BudgetStatus::Pending
    });

    Budget {
        base: BaseAggregate::with_metadata(BudgetId(uuid), m.code, m.description, m.comment, metadata),
        owner_id: m.owner_id,
        status,
        sales_price: m.sales_price,
        lines,
    }
}

async fn load_lines<C: ConnectionTrait>(
    db: &C,
    budget_ids: Vec<String>,
) -> anyhow::Result<HashMap<String, Vec<BudgetLine>>> {
    let mut grouped: HashMap<String, Vec<BudgetLine>> = HashMap::new();
    if budget_ids.is_empty() {
        return Ok(grouped);
    }
    let rows = line::Entity::find()
        .filter(line::Column::BudgetId.is_in(budget_ids))
        .order_by_asc(line::Column::LineNo)
        .all(db)
        .await?;
    for row in rows {
        grouped.entry(row.budget_id.clone()).or_default().push(row.into());
    }
    Ok(grouped)
}

/// Live budgets of one owner with the given statuses, newest first
pub async fn list_with_status<C: ConnectionTrait>(
    db: &C,
    owner_id: &str,
    statuses: &[BudgetStatus],
) -> anyhow::Result<Vec<Budget>> {
    let headers = Entity::find()
        .filter(Column::OwnerId.eq(owner_id))
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::StatusId.is_in(statuses.iter().map(BudgetStatus::id)))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?;

    let mut lines = load_lines(db, headers.iter().map(|h| h.id.clone()).collect()).await?;
    Ok(headers
        .into_iter()
        .map(|h| {
            let own_lines = lines.remove(&h.id).unwrap_or_default();
            to_aggregate(h, own_lines)
        })
        .collect())
}

pub async fn get_by_id<C: ConnectionTrait>(
    db: &C,
    owner_id: &str,
    id: Uuid,
) -> anyhow::Result<Option<Budget>> {
    let header = Entity::find_by_id(id.to_string())
        .filter(Column::OwnerId.eq(owner_id))
        .filter(Column::IsDeleted.eq(false))
        .one(db)
        .await?;
    let Some(header) = header else {
        return Ok(None);
    };
    let mut lines = load_lines(db, vec![header.id.clone()]).await?;
    let own_lines = lines.remove(&header.id).unwrap_or_default();
    Ok(Some(to_aggregate(header, own_lines)))
}

fn header_active(aggregate: &Budget) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        owner_id: Set(aggregate.owner_id.clone()),
        status_id: Set(aggregate.status.id()),
        sales_price: Set(aggregate.sales_price),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

async fn insert_lines<C: ConnectionTrait>(
    db: &C,
    budget_id: &str,
    lines: &[BudgetLine],
) -> anyhow::Result<()> {
    if lines.is_empty() {
        return Ok(());
    }
    let models = lines.iter().enumerate().map(|(idx, l)| line::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        budget_id: Set(budget_id.to_string()),
        line_no: Set(idx as i32 + 1),
        material_id: Set(l.material_id.clone()),
        material_name: Set(l.material_name.clone()),
        quantity: Set(l.quantity),
        unit_price: Set(l.unit_price),
        assigned_at: Set(l.assigned_at),
    });
    line::Entity::insert_many(models).exec(db).await?;
    Ok(())
}

/// Header and lines
pub async fn insert<C: ConnectionTrait>(db: &C, aggregate: &Budget) -> anyhow::Result<Uuid> {
    let uuid = aggregate.base.id.value();
    header_active(aggregate).insert(db).await?;
    insert_lines(db, &uuid.to_string(), &aggregate.lines).await?;
    Ok(uuid)
}

/// Header only
pub async fn update_header<C: ConnectionTrait>(db: &C, aggregate: &Budget) -> anyhow::Result<()> {
    let mut active = header_active(aggregate);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(db).await?;
    Ok(())
}

pub async fn replace_lines<C: ConnectionTrait>(
    db: &C,
    budget_id: Uuid,
    lines: &[BudgetLine],
) -> anyhow::Result<()> {
    let budget_id = budget_id.to_string();
    line::Entity::delete_many()
        .filter(line::Column::BudgetId.eq(budget_id.clone()))
        .exec(db)
        .await?;
    insert_lines(db, &budget_id, lines).await
}

/// Lines are kept so the deleted budget stays readable in the database
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
