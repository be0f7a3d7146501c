use contracts::domain::a003_budget::aggregate::{Budget, BudgetStatus};
use contracts::projections::p900_sales::dto::{SalesReport, SalesRow, SalesSummary};
use contracts::shared::list::{paginate, ListQuery};
use sea_orm::DatabaseConnection;

use crate::domain::a003_budget::repository as budget_repository;
use crate::shared::error::ServiceResult;
use contracts::shared::format::format_money;

fn to_row(b: &Budget) -> SalesRow {
    let cost = b.cost();
    SalesRow {
        budget_id: b.base.id.value().to_string(),
        code: b.base.code.clone(),
        description: b.base.description.clone(),
        status: b.status.display_name().to_string(),
        cost,
        sales_price: b.sales_price,
        margin: b.sales_price - cost,
        line_count: b.lines.len(),
        updated_at: b.base.metadata.updated_at.to_rfc3339(),
    }
}

/// Confirmed budgets, newest first, with totals over all of them
pub async fn report(
    db: &DatabaseConnection,
    owner_id: &str,
    query: &ListQuery,
) -> ServiceResult<SalesReport> {
    let budgets =
        budget_repository::list_with_status(db, owner_id, &[BudgetStatus::Confirmed]).await?;

    let mut rows: Vec<SalesRow> = budgets.iter().map(to_row).collect();
    let summary = SalesSummary::from_rows(&rows);

    if let Some(needle) = query.search() {
        rows.retain(|r| {
            r.description.to_lowercase().contains(&needle)
                || r.code.to_lowercase().contains(&needle)
        });
    }
    let page = paginate(rows, query);

    tracing::debug!(
        "Sales report for {}: {} sales, total {}",
        owner_id,
        summary.count,
        format_money(summary.total_sales)
    );

    Ok(SalesReport {
        items: page.items,
        total: page.total,
        page: page.page,
        page_size: page.page_size,
        total_pages: page.total_pages,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_material::service as material_service;
    use crate::domain::a003_budget::service as budget_service;
    use crate::shared::data::db::connect_in_memory;
    use contracts::domain::a001_material::aggregate::MaterialDto;
    use contracts::domain::a003_budget::aggregate::{BudgetDto, BudgetLineDto};

    #[tokio::test]
    async fn only_confirmed_budgets_are_sales() {
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

        let mut ids = Vec::new();
        for (name, qty, price) in [("Agenda", 100, 1200.0), ("Libreta", 10, 50.0)] {
            let id = budget_service::create(
                &db,
                "u1",
                BudgetDto {
                    description: name.into(),
                    sales_price: price,
                    lines: vec![BudgetLineDto {
                        material_id: hojas.to_string(),
                        quantity: qty,
                    }],
                    ..Default::default()
                },
            )
            .await
            .unwrap();
            ids.push(id);
        }

        let empty = report(&db, "u1", &ListQuery::default()).await.unwrap();
        assert_eq!(empty.summary, SalesSummary::default());

        budget_service::change_status(&db, "u1", ids[0], BudgetStatus::Confirmed.id())
            .await
            .unwrap();

        let r = report(&db, "u1", &ListQuery::default()).await.unwrap();
        assert_eq!(r.total, 1);
        assert_eq!(r.items[0].description, "Agenda");
        assert_eq!(r.items[0].status, "Confirmado");
        assert_eq!(r.items[0].cost, 900.0);
        assert_eq!(r.items[0].margin, 300.0);
        assert_eq!(r.summary.total_sales, 1200.0);

        let filtered = report(
            &db,
            "u1",
            &ListQuery {
                q: Some("libreta".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(filtered.items.is_empty());
        assert_eq!(filtered.summary.count, 1);
    }
}
