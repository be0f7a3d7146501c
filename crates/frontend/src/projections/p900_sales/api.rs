use contracts::projections::p900_sales::dto::SalesReport;
use contracts::shared::list::ListQuery;

use crate::shared::api_utils::{get_json, with_query};

pub async fn fetch_report(query: ListQuery) -> Result<SalesReport, String> {
    get_json(&with_query("/api/sales", &query)).await
}
