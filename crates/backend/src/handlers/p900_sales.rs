use axum::{extract::Query, Json};
use contracts::projections::p900_sales::dto::SalesReport;
use contracts::shared::list::ListQuery;

use crate::projections::p900_sales;
use crate::shared::data::db::get_connection;
use crate::shared::error::ApiError;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/sales
pub async fn report(
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<SalesReport>, ApiError> {
    Ok(Json(
        p900_sales::service::report(get_connection(), user.owner_id(), &query).await?,
    ))
}
