use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialId(pub Uuid);

impl MaterialId {
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

impl AggregateId for MaterialId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(MaterialId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Raw material bought in packs and consumed by budgets
///
/// `quantity` is the pack size and `price` what the pack cost, so
/// `unit_price` is always `price / quantity`. `stock` is the number of units
/// still available and is the only field budgets write to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    #[serde(flatten)]
    pub base: BaseAggregate<MaterialId>,

    #[serde(rename = "ownerId")]
    pub owner_id: String,

    pub stock: i32,
    pub quantity: i32,
    pub price: f64,

    #[serde(rename = "unitPrice")]
    pub unit_price: f64,
}

impl Material {
    pub fn new_for_insert(
        owner_id: String,
        code: String,
        description: String,
        comment: Option<String>,
        quantity: i32,
        stock: i32,
        price: f64,
    ) -> Self {
        let mut base = BaseAggregate::new(MaterialId::new_v4(), code, description);
        base.set_comment(comment);

        Self {
            base,
            owner_id,
            stock,
            quantity,
            price,
            unit_price: Self::compute_unit_price(price, quantity),
        }
    }

    /// Price of a single unit, rounded to cents
    pub fn compute_unit_price(price: f64, quantity: i32) -> f64 {
        if quantity <= 0 {
            return 0.0;
        }
        (price / quantity as f64 * 100.0).round() / 100.0
    }

    pub fn update(&mut self, dto: &MaterialDto) {
        if let Some(code) = dto.code.as_ref().filter(|c| !c.trim().is_empty()) {
            self.base.code = code.clone();
        }
        self.base.description = dto.description.trim().to_string();
        self.base.set_comment(dto.comment.clone());
        self.quantity = dto.quantity;
        // missing stock keeps the current count
        if let Some(stock) = dto.stock {
            self.stock = stock;
        }
        self.price = dto.price;
        self.unit_price = Self::compute_unit_price(dto.price, dto.quantity);
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Nombre es requerido".into());
        }
        if self.quantity <= 0 {
            return Err("Cantidad es requerido".into());
        }
        if self.stock < 0 {
            return Err("Stock no puede ser negativo".into());
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err("Precio es requerido".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for Material {
    type Id = MaterialId;

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
        "a001"
    }

    fn collection_name() -> &'static str {
        "material"
    }

    fn element_name() -> &'static str {
        "Material"
    }

    fn list_name() -> &'static str {
        "Materiales"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// Create/update form. Missing `stock` starts a new material at the pack
/// quantity and leaves an existing one unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MaterialDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,
    pub comment: Option<String>,
    pub quantity: i32,
    pub stock: Option<i32>,
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Material {
        Material::new_for_insert(
            "owner".into(),
            "MAT-1".into(),
            "Hojas".into(),
            None,
            500,
            500,
            4500.0,
        )
    }

    #[test]
    fn unit_price_is_price_over_quantity() {
        assert_eq!(sample().unit_price, 9.0);
        assert_eq!(Material::compute_unit_price(2800.0, 20), 140.0);
        assert_eq!(Material::compute_unit_price(10.0, 3), 3.33);
        assert_eq!(Material::compute_unit_price(10.0, 0), 0.0);
    }

    #[test]
    fn full_name_matches_table() {
        assert_eq!(Material::full_name(), "a001_material");
        assert_eq!(Material::list_name(), "Materiales");
    }

    #[test]
    fn update_keeps_stock_when_not_given() {
        let mut m = sample();
        m.stock = 450;
        m.update(&MaterialDto {
            description: "Tapas".into(),
            quantity: 20,
            stock: None,
            price: 10000.0,
            ..Default::default()
        });
        assert_eq!(m.stock, 450);
        assert_eq!(m.unit_price, 500.0);
        assert_eq!(m.base.code, "MAT-1");
    }

    #[test]
    fn validation_rules() {
        assert!(sample().validate().is_ok());

        let mut m = sample();
        m.base.description = "  ".into();
        assert_eq!(m.validate().unwrap_err(), "Nombre es requerido");

        let mut m = sample();
        m.quantity = 0;
        assert!(m.validate().is_err());

        let mut m = sample();
        m.stock = 0;
        assert!(m.validate().is_ok());
        m.stock = -1;
        assert!(m.validate().is_err());

        let mut m = sample();
        m.price = 0.0;
        assert_eq!(m.validate().unwrap_err(), "Precio es requerido");
    }
}
