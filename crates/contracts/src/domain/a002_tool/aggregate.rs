use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolId(pub Uuid);

impl ToolId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for ToolId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(ToolId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

/// Workshop tool (guillotine, binder, ...). Not consumed by budgets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    #[serde(flatten)]
    pub base: BaseAggregate<ToolId>,

    #[serde(rename = "ownerId")]
    pub owner_id: String,

    pub quantity: i32,

    #[serde(rename = "unitPrice")]
    pub unit_price: f64,

    #[serde(rename = "totalPrice")]
    pub total_price: f64,
}

impl Tool {
    pub fn new_for_insert(
        owner_id: String,
        code: String,
        description: String,
        comment: Option<String>,
        quantity: i32,
        unit_price: f64,
    ) -> Self {
        let mut base = BaseAggregate::new(ToolId::new_v4(), code, description);
        base.set_comment(comment);

        Self {
            base,
            owner_id,
            quantity,
            unit_price,
            total_price: Self::compute_total_price(quantity, unit_price),
        }
    }

    pub fn compute_total_price(quantity: i32, unit_price: f64) -> f64 {
        quantity.max(0) as f64 * unit_price
    }

    pub fn update(&mut self, dto: &ToolDto) {
        if let Some(code) = dto.code.as_ref().filter(|c| !c.trim().is_empty()) {
            self.base.code = code.clone();
        }
        self.base.description = dto.description.trim().to_string();
        self.base.set_comment(dto.comment.clone());
        self.quantity = dto.quantity;
        self.unit_price = dto.unit_price;
        self.total_price = Self::compute_total_price(dto.quantity, dto.unit_price);
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Nombre es requerido".into());
        }
        if self.quantity <= 0 {
            return Err("Cantidad es requerido".into());
        }
        if !self.unit_price.is_finite() || self.unit_price <= 0.0 {
            return Err("Precio unitario es requerido".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for Tool {
    type Id = ToolId;

    fn id(&self) -> Self::Id {
        self.base.id
    }

    fn code(&self) -> &str {
        &self.base.code
    }

    fn description(&self) -> &str {
        &self.base.description
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn aggregate_index() -> &'static str {
        "a002"
    }

    fn collection_name() -> &'static str {
        "tool"
    }

    fn element_name() -> &'static str {
        "Herramienta"
    }

    fn list_name() -> &'static str {
        "Herramientas"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ToolDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,
    pub comment: Option<String>,
    pub quantity: i32,

    #[serde(rename = "unitPrice")]
    pub unit_price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_price_follows_quantity_and_unit_price() {
        let mut tool = Tool::new_for_insert(
            "owner".into(),
            "HER-1".into(),
            "Guillotina".into(),
            None,
            2,
            150.5,
        );
        assert_eq!(tool.total_price, 301.0);

        tool.update(&ToolDto {
            description: "Guillotina".into(),
            quantity: 3,
            unit_price: 100.0,
            ..Default::default()
        });
        assert_eq!(tool.total_price, 300.0);
        assert!(tool.validate().is_ok());
    }

    #[test]
    fn rejects_missing_unit_price() {
        let tool = Tool::new_for_insert("o".into(), "c".into(), "Corchetera".into(), None, 1, 0.0);
        assert_eq!(tool.validate().unwrap_err(), "Precio unitario es requerido");
    }
}
