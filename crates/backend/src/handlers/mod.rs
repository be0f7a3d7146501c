pub mod a001_material;
pub mod a002_tool;
pub mod a003_budget;
pub mod p900_sales;

use crate::shared::error::ApiError;

/// Path id as UUID, 400 otherwise
pub(crate) fn parse_uuid(id: &str) -> Result<uuid::Uuid, ApiError> {
    uuid::Uuid::parse_str(id).map_err(|_| ApiError::BadRequest("Identificador inválido".into()))
}
