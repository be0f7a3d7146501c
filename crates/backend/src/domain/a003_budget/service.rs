use super::{repository, stock};
use crate::domain::a001_material::repository as material_repository;
use chrono::Utc;
use contracts::domain::a003_budget::aggregate::{
    Budget, BudgetDto, BudgetLine, BudgetStatus, BudgetStatusInfo,
};
use contracts::domain::a001_material::aggregate::Material;
use contracts::domain::common::base_aggregate::generate_code;
use contracts::domain::common::AggregateRoot;
use contracts::shared::list::{paginate, ListQuery, PaginatedResponse};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

use crate::shared::error::{ServiceError, ServiceResult};

const OPEN_STATUSES: [BudgetStatus; 2] = [BudgetStatus::Pending, BudgetStatus::Rejected];

fn parse_id(id: Option<&String>) -> ServiceResult<Uuid> {
    id.and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| ServiceError::Validation("Identificador inválido".into()))
}

fn held_by(lines: &[BudgetLine]) -> BTreeMap<String, i32> {
    stock::held_units(lines.iter().map(|l| (l.material_id.as_str(), l.quantity)))
}

/// Apply stock changes; fails when a material would go below zero or was
/// deleted and still has to hand out units. Callers must be inside a
/// transaction.
async fn apply_stock_changes<C: ConnectionTrait>(
    txn: &C,
    owner_id: &str,
    changes: &BTreeMap<String, i32>,
    names: &HashMap<String, String>,
) -> ServiceResult<()> {
    for (material_id, delta) in changes {
        let applied =
            material_repository::adjust_stock(txn, owner_id, material_id, *delta).await?;
        if applied {
            continue;
        }
        let material =
            material_repository::get_including_deleted(txn, owner_id, material_id).await?;
        let name = material
            .as_ref()
            .map(|m| m.base.description.clone())
            .or_else(|| names.get(material_id).cloned())
            .unwrap_or_else(|| material_id.clone());
        if *delta < 0 {
            return Err(match material {
                Some(m) if !m.base.metadata.is_deleted => {
                    ServiceError::Validation(format!("Stock insuficiente para {}", name))
                }
                _ => ServiceError::NotFound(format!(
                    "{} {} no encontrado",
                    Material::element_name(),
                    name
                )),
            });
        }
        // the row is gone; the budget write goes on without these units
        tracing::error!("Could not return {} units of {} to stock", delta, name);
    }
    Ok(())
}

/// Snapshot a live material into a budget line
async fn new_line<C: ConnectionTrait>(
    txn: &C,
    owner_id: &str,
    material_id: &str,
    quantity: i32,
) -> ServiceResult<BudgetLine> {
    let uuid = Uuid::parse_str(material_id)
        .map_err(|_| ServiceError::Validation("Material inválido".into()))?;
    let material = material_repository::get_by_id(txn, owner_id, uuid)
        .await?
        .ok_or_else(|| ServiceError::not_found(Material::element_name()))?;
    Ok(BudgetLine {
        material_id: material_id.to_string(),
        material_name: material.base.description,
        quantity,
        unit_price: material.unit_price,
        assigned_at: Utc::now(),
    })
}

fn names_of<'a>(lines: impl IntoIterator<Item = &'a BudgetLine>) -> HashMap<String, String> {
    lines
        .into_iter()
        .map(|l| (l.material_id.clone(), l.material_name.clone()))
        .collect()
}

/// Pending and rejected budgets, newest first
pub async fn list_open(
    db: &DatabaseConnection,
    owner_id: &str,
    query: &ListQuery,
) -> ServiceResult<PaginatedResponse<Budget>> {
    let mut items = repository::list_with_status(db, owner_id, &OPEN_STATUSES).await?;
    if let Some(needle) = query.search() {
        items.retain(|b| {
            b.base.description.to_lowercase().contains(&needle)
                || b.base.code.to_lowercase().contains(&needle)
        });
    }
    Ok(paginate(items, query))
}

pub async fn get_by_id(db: &DatabaseConnection, owner_id: &str, id: Uuid) -> ServiceResult<Budget> {
    repository::get_by_id(db, owner_id, id)
        .await?
        .ok_or_else(|| ServiceError::not_found(Budget::element_name()))
}

pub fn statuses() -> Vec<BudgetStatusInfo> {
    BudgetStatus::all().into_iter().map(Into::into).collect()
}

/// Insert the budget and take its materials out of stock
pub async fn create(db: &DatabaseConnection, owner_id: &str, dto: BudgetDto) -> ServiceResult<Uuid> {
    dto.validate().map_err(ServiceError::Validation)?;

    let code = dto
        .code
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| generate_code("PRE"));
    let mut aggregate = Budget::new_for_insert(
        owner_id.to_string(),
        code,
        dto.description.trim().to_string(),
        dto.comment.clone(),
        dto.sales_price,
    );

    let txn = db.begin().await?;

    for line in &dto.lines {
        let line = new_line(&txn, owner_id, &line.material_id, line.quantity).await?;
        aggregate.lines.push(line);
    }

    let changes = stock::stock_changes(&BTreeMap::new(), &held_by(&aggregate.lines));
    apply_stock_changes(&txn, owner_id, &changes, &names_of(&aggregate.lines)).await?;

    aggregate.before_write();
    let id = repository::insert(&txn, &aggregate).await?;

    txn.commit().await?;

    tracing::info!(
        "Budget {} created with {} lines, cost {:.2}",
        aggregate.base.code,
        aggregate.lines.len(),
        aggregate.cost()
    );
    Ok(id)
}

/// Rewrite header and lines, moving only the net difference of stock
pub async fn update(db: &DatabaseConnection, owner_id: &str, dto: BudgetDto) -> ServiceResult<()> {
    dto.validate().map_err(ServiceError::Validation)?;
    let id = parse_id(dto.id.as_ref())?;

    let txn = db.begin().await?;

    let mut aggregate = repository::get_by_id(&txn, owner_id, id)
        .await?
        .ok_or_else(|| ServiceError::not_found(Budget::element_name()))?;
    if aggregate.is_confirmed() {
        return Err(ServiceError::Conflict(
            "Un presupuesto confirmado no se puede modificar".into(),
        ));
    }

    let old_lines = std::mem::take(&mut aggregate.lines);
    let mut kept: HashMap<&str, &BudgetLine> = old_lines
        .iter()
        .map(|l| (l.material_id.as_str(), l))
        .collect();

    let mut new_lines = Vec::with_capacity(dto.lines.len());
    for line in &dto.lines {
        let next = match kept.remove(line.material_id.as_str()) {
            // unit price stays as quoted when the line was first written
            Some(previous) => BudgetLine {
                quantity: line.quantity,
                ..previous.clone()
            },
            None => new_line(&txn, owner_id, &line.material_id, line.quantity).await?,
        };
        new_lines.push(next);
    }

    let changes = stock::stock_changes(&held_by(&old_lines), &held_by(&new_lines));
    let names = names_of(old_lines.iter().chain(new_lines.iter()));
    apply_stock_changes(&txn, owner_id, &changes, &names).await?;

    aggregate.update_header(&dto);
    aggregate.lines = new_lines;
    aggregate.before_write();
    aggregate.base.metadata.increment_version();

    repository::update_header(&txn, &aggregate).await?;
    repository::replace_lines(&txn, id, &aggregate.lines).await?;

    txn.commit().await?;
    Ok(())
}

/// Soft delete and give every line back to stock
pub async fn delete(db: &DatabaseConnection, owner_id: &str, id: Uuid) -> ServiceResult<()> {
    let txn = db.begin().await?;

    let aggregate = repository::get_by_id(&txn, owner_id, id)
        .await?
        .ok_or_else(|| ServiceError::not_found(Budget::element_name()))?;
    if aggregate.is_confirmed() {
        return Err(ServiceError::Conflict(
            "Un presupuesto confirmado no se puede eliminar".into(),
        ));
    }

    if !repository::soft_delete(&txn, owner_id, id).await? {
        return Err(ServiceError::not_found(Budget::element_name()));
    }

    let changes = stock::stock_changes(&held_by(&aggregate.lines), &BTreeMap::new());
    apply_stock_changes(&txn, owner_id, &changes, &names_of(&aggregate.lines)).await?;

    txn.commit().await?;

    tracing::info!("Budget {} deleted, stock restored", aggregate.base.code);
    Ok(())
}

/// Status only; stock is held by the budget whatever its status
pub async fn change_status(
    db: &DatabaseConnection,
    owner_id: &str,
    id: Uuid,
    status_id: i32,
) -> ServiceResult<()> {
    let status = BudgetStatus::from_id(status_id)
        .ok_or_else(|| ServiceError::Validation("Estado inválido".into()))?;

    let mut aggregate = get_by_id(db, owner_id, id).await?;
    if aggregate.status == status {
        return Ok(());
    }

    aggregate.status = status;
    aggregate.before_write();
    aggregate.base.metadata.increment_version();
    repository::update_header(db, &aggregate).await?;

    tracing::info!(
        "Budget {} moved to {}",
        aggregate.base.code,
        status.display_name()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_material::service as material_service;
    use crate::shared::data::db::connect_in_memory;
    use contracts::domain::a001_material::aggregate::MaterialDto;
    use contracts::domain::a003_budget::aggregate::BudgetLineDto;

    struct Fixture {
        db: DatabaseConnection,
        hojas: String,
        tapas: String,
    }

    async fn fixture() -> Fixture {
        let db = connect_in_memory().await;
        let hojas = material_service::create(
            &db,
            "u1",
            MaterialDto {
                description: "Hojas".into(),
                quantity: 500,
                price: 4500.0,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let tapas = material_service::create(
            &db,
            "u1",
            MaterialDto {
                description: "Tapas".into(),
                quantity: 20,
                price: 10000.0,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        Fixture {
            db,
            hojas: hojas.to_string(),
            tapas: tapas.to_string(),
        }
    }

    async fn stock_of(f: &Fixture, id: &str) -> i32 {
        material_service::get_by_id(&f.db, "u1", Uuid::parse_str(id).unwrap())
            .await
            .unwrap()
            .stock
    }

    /// Stock of a material, soft deleted or not
    async fn raw_stock_of(f: &Fixture, id: &str) -> i32 {
        material_repository::get_including_deleted(&f.db, "u1", id)
            .await
            .unwrap()
            .unwrap()
            .stock
    }

    fn dto(lines: &[(&String, i32)], sales_price: f64) -> BudgetDto {
        BudgetDto {
            description: "Cuadernos".into(),
            sales_price,
            lines: lines
                .iter()
                .map(|(id, q)| BudgetLineDto {
                    material_id: id.to_string(),
                    quantity: *q,
                })
                .collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_takes_stock_and_snapshots_prices() {
        let f = fixture().await;
        let id = create(&f.db, "u1", dto(&[(&f.hojas, 50), (&f.tapas, 2)], 2000.0))
            .await
            .unwrap();

        assert_eq!(stock_of(&f, &f.hojas).await, 450);
        assert_eq!(stock_of(&f, &f.tapas).await, 18);

        let budget = get_by_id(&f.db, "u1", id).await.unwrap();
        assert_eq!(budget.status, BudgetStatus::Pending);
        assert_eq!(budget.lines.len(), 2);
        assert_eq!(budget.lines[0].material_name, "Hojas");
        assert_eq!(budget.cost(), 50.0 * 9.0 + 2.0 * 500.0);
        assert_eq!(budget.margin(), 2000.0 - 1450.0);
    }

    #[tokio::test]
    async fn insufficient_stock_rolls_back_everything() {
        let f = fixture().await;
        let err = create(&f.db, "u1", dto(&[(&f.hojas, 10), (&f.tapas, 21)], 0.0))
            .await
            .unwrap_err();
        match err {
            ServiceError::Validation(msg) => assert_eq!(msg, "Stock insuficiente para Tapas"),
            other => panic!("unexpected {:?}", other),
        }

        assert_eq!(stock_of(&f, &f.hojas).await, 500);
        assert_eq!(stock_of(&f, &f.tapas).await, 20);
        let open = list_open(&f.db, "u1", &ListQuery::default()).await.unwrap();
        assert_eq!(open.total, 0);
    }

    #[tokio::test]
    async fn update_moves_only_the_difference() {
        let f = fixture().await;
        let id = create(&f.db, "u1", dto(&[(&f.hojas, 50), (&f.tapas, 2)], 0.0))
            .await
            .unwrap();

        let mut edit = dto(&[(&f.hojas, 80)], 1500.0);
        edit.id = Some(id.to_string());
        update(&f.db, "u1", edit).await.unwrap();

        assert_eq!(stock_of(&f, &f.hojas).await, 420);
        assert_eq!(stock_of(&f, &f.tapas).await, 20);

        let budget = get_by_id(&f.db, "u1", id).await.unwrap();
        assert_eq!(budget.lines.len(), 1);
        assert_eq!(budget.lines[0].quantity, 80);
        assert_eq!(budget.sales_price, 1500.0);
        assert_eq!(budget.base.metadata.version, 1);
    }

    #[tokio::test]
    async fn update_with_insufficient_stock_rolls_back() {
        let f = fixture().await;
        let id = create(&f.db, "u1", dto(&[(&f.hojas, 50), (&f.tapas, 2)], 100.0))
            .await
            .unwrap();

        let mut edit = dto(&[(&f.hojas, 60), (&f.tapas, 25)], 200.0);
        edit.id = Some(id.to_string());
        edit.description = "Agendas".into();
        match update(&f.db, "u1", edit).await.unwrap_err() {
            ServiceError::Validation(msg) => assert_eq!(msg, "Stock insuficiente para Tapas"),
            other => panic!("unexpected {:?}", other),
        }

        assert_eq!(stock_of(&f, &f.hojas).await, 450);
        assert_eq!(stock_of(&f, &f.tapas).await, 18);

        let budget = get_by_id(&f.db, "u1", id).await.unwrap();
        assert_eq!(budget.base.description, "Cuadernos");
        assert_eq!(budget.sales_price, 100.0);
        assert_eq!(budget.base.metadata.version, 0);
        let quantities: Vec<(String, i32)> = budget
            .lines
            .iter()
            .map(|l| (l.material_id.clone(), l.quantity))
            .collect();
        assert_eq!(quantities.len(), 2);
        assert!(quantities.contains(&(f.hojas.clone(), 50)));
        assert!(quantities.contains(&(f.tapas.clone(), 2)));
    }

    #[tokio::test]
    async fn material_edit_keeps_stock_held_by_budgets() {
        let f = fixture().await;
        let id = create(&f.db, "u1", dto(&[(&f.hojas, 50)], 0.0)).await.unwrap();

        material_service::update(
            &f.db,
            "u1",
            MaterialDto {
                id: Some(f.hojas.clone()),
                description: "Hojas".into(),
                quantity: 500,
                stock: None,
                price: 5000.0,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(stock_of(&f, &f.hojas).await, 450);

        delete(&f.db, "u1", id).await.unwrap();
        assert_eq!(stock_of(&f, &f.hojas).await, 500);
    }

    #[tokio::test]
    async fn deleted_material_gives_no_more_stock() {
        let f = fixture().await;
        let id = create(&f.db, "u1", dto(&[(&f.hojas, 50)], 0.0)).await.unwrap();
        material_service::delete(&f.db, "u1", Uuid::parse_str(&f.hojas).unwrap())
            .await
            .unwrap();

        let mut more = dto(&[(&f.hojas, 400)], 10.0);
        more.id = Some(id.to_string());
        match update(&f.db, "u1", more).await.unwrap_err() {
            ServiceError::NotFound(msg) => assert_eq!(msg, "Material Hojas no encontrado"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(raw_stock_of(&f, &f.hojas).await, 450);

        // units still flow back to a deleted material
        let mut less = dto(&[(&f.hojas, 30)], 10.0);
        less.id = Some(id.to_string());
        update(&f.db, "u1", less).await.unwrap();
        assert_eq!(raw_stock_of(&f, &f.hojas).await, 470);

        delete(&f.db, "u1", id).await.unwrap();
        assert_eq!(raw_stock_of(&f, &f.hojas).await, 500);
    }

    #[tokio::test]
    async fn update_requires_sales_price() {
        let f = fixture().await;
        let id = create(&f.db, "u1", dto(&[(&f.hojas, 1)], 0.0)).await.unwrap();
        let mut edit = dto(&[(&f.hojas, 2)], 0.0);
        edit.id = Some(id.to_string());
        assert!(matches!(
            update(&f.db, "u1", edit).await,
            Err(ServiceError::Validation(_))
        ));
        assert_eq!(stock_of(&f, &f.hojas).await, 499);
    }

    #[tokio::test]
    async fn delete_restores_stock_once() {
        let f = fixture().await;
        let id = create(&f.db, "u1", dto(&[(&f.hojas, 50)], 0.0)).await.unwrap();
        delete(&f.db, "u1", id).await.unwrap();
        assert_eq!(stock_of(&f, &f.hojas).await, 500);

        assert!(matches!(
            delete(&f.db, "u1", id).await,
            Err(ServiceError::NotFound(_))
        ));
        assert_eq!(stock_of(&f, &f.hojas).await, 500);
    }

    #[tokio::test]
    async fn confirmed_budgets_are_locked_and_leave_open_list() {
        let f = fixture().await;
        let id = create(&f.db, "u1", dto(&[(&f.tapas, 5)], 900.0)).await.unwrap();
        change_status(&f.db, "u1", id, BudgetStatus::Confirmed.id())
            .await
            .unwrap();

        assert_eq!(stock_of(&f, &f.tapas).await, 15);
        assert_eq!(
            list_open(&f.db, "u1", &ListQuery::default()).await.unwrap().total,
            0
        );
        assert!(matches!(
            delete(&f.db, "u1", id).await,
            Err(ServiceError::Conflict(_))
        ));
        let mut edit = dto(&[(&f.tapas, 1)], 900.0);
        edit.id = Some(id.to_string());
        assert!(matches!(
            update(&f.db, "u1", edit).await,
            Err(ServiceError::Conflict(_))
        ));

        change_status(&f.db, "u1", id, BudgetStatus::Rejected.id())
            .await
            .unwrap();
        delete(&f.db, "u1", id).await.unwrap();
        assert_eq!(stock_of(&f, &f.tapas).await, 20);
    }

    #[tokio::test]
    async fn unknown_status_and_foreign_materials_are_rejected() {
        let f = fixture().await;
        let id = create(&f.db, "u1", dto(&[(&f.hojas, 1)], 0.0)).await.unwrap();
        assert!(matches!(
            change_status(&f.db, "u1", id, 9).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            create(&f.db, "u2", dto(&[(&f.hojas, 1)], 0.0)).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            get_by_id(&f.db, "u2", id).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn statuses_are_listed_in_order() {
        let names: Vec<String> = statuses().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Por confirmar", "Confirmado", "Rechazado"]);
    }
}
