use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BudgetId(pub Uuid);

impl BudgetId {
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

impl AggregateId for BudgetId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(BudgetId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Status
// ============================================================================

/// Budget lifecycle. Stored as its numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BudgetStatus {
    Pending,
    Confirmed,
    Rejected,
}

impl BudgetStatus {
    pub fn id(&self) -> i32 {
        match self {
            BudgetStatus::Pending => 1,
            BudgetStatus::Confirmed => 2,
            BudgetStatus::Rejected => 3,
        }
    }

    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(BudgetStatus::Pending),
            2 => Some(BudgetStatus::Confirmed),
            3 => Some(BudgetStatus::Rejected),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BudgetStatus::Pending => "Por confirmar",
            BudgetStatus::Confirmed => "Confirmado",
            BudgetStatus::Rejected => "Rechazado",
        }
    }

    pub fn all() -> Vec<BudgetStatus> {
        vec![
            BudgetStatus::Pending,
            BudgetStatus::Confirmed,
            BudgetStatus::Rejected,
        ]
    }
}

impl Default for BudgetStatus {
    fn default() -> Self {
        BudgetStatus::Pending
    }
}

/// Status entry for UI selectors
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetStatusInfo {
    pub id: i32,
    pub name: String,
}

impl From<BudgetStatus> for BudgetStatusInfo {
    fn from(s: BudgetStatus) -> Self {
        Self {
            id: s.id(),
            name: s.display_name().to_string(),
        }
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// One material consumed by a budget
///
/// `unit_price` is copied from the material when the line is written so later
/// price changes do not rewrite old quotes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetLine {
    #[serde(rename = "materialId")]
    pub material_id: String,

    #[serde(rename = "materialName")]
    pub material_name: String,

    pub quantity: i32,

    #[serde(rename = "unitPrice")]
    pub unit_price: f64,

    #[serde(rename = "assignedAt")]
    pub assigned_at: DateTime<Utc>,
}

impl BudgetLine {
    pub fn subtotal(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

/// Quote composed of material lines and a sales price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    #[serde(flatten)]
    pub base: BaseAggregate<BudgetId>,

    #[serde(rename = "ownerId")]
    pub owner_id: String,

    pub status: BudgetStatus,

    #[serde(rename = "salesPrice")]
    pub sales_price: f64,

    pub lines: Vec<BudgetLine>,
}

impl Budget {
    pub fn new_for_insert(
        owner_id: String,
        code: String,
        description: String,
        comment: Option<String>,
        sales_price: f64,
    ) -> Self {
        let mut base = BaseAggregate::new(BudgetId::new_v4(), code, description);
        base.set_comment(comment);

        Self {
            base,
            owner_id,
            status: BudgetStatus::Pending,
            sales_price,
            lines: Vec::new(),
        }
    }

    /// Material cost of the budget
    pub fn cost(&self) -> f64 {
        self.lines.iter().map(BudgetLine::subtotal).sum()
    }

    pub fn margin(&self) -> f64 {
        self.sales_price - self.cost()
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == BudgetStatus::Confirmed
    }

    /// Header fields only; lines are rebuilt by the service from stored materials
    pub fn update_header(&mut self, dto: &BudgetDto) {
        if let Some(code) = dto.code.as_ref().filter(|c| !c.trim().is_empty()) {
            self.base.code = code.clone();
        }
        self.base.description = dto.description.trim().to_string();
        self.base.set_comment(dto.comment.clone());
        self.sales_price = dto.sales_price;
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for Budget {
    type Id = BudgetId;

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
        "a003"
    }

    fn collection_name() -> &'static str {
        "budget"
    }

    fn element_name() -> &'static str {
        "Presupuesto"
    }

    fn list_name() -> &'static str {
        "Presupuestos"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BudgetLineDto {
    #[serde(rename = "materialId")]
    pub material_id: String,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BudgetDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,
    pub comment: Option<String>,

    #[serde(rename = "salesPrice")]
    pub sales_price: f64,

    pub lines: Vec<BudgetLineDto>,
}

impl BudgetDto {
    pub fn is_update(&self) -> bool {
        self.id.is_some()
    }

    /// Form-level checks that do not need the database
    pub fn validate(&self) -> Result<(), String> {
        if self.description.trim().is_empty() {
            return Err("Asignale un nombre a tu presupuesto".into());
        }
        if self.lines.is_empty() {
            return Err("Agrega al menos un material".into());
        }
        let mut seen = HashSet::new();
        for line in &self.lines {
            if line.material_id.trim().is_empty() {
                return Err("Selecciona un material".into());
            }
            if line.quantity <= 0 {
                return Err("Ingresa la cantidad".into());
            }
            if !seen.insert(line.material_id.as_str()) {
                return Err("Ya está incluido ese material".into());
            }
        }
        if !self.sales_price.is_finite() || self.sales_price < 0.0 {
            return Err("Precio de venta inválido".into());
        }
        if self.is_update() && self.sales_price <= 0.0 {
            return Err("Agrega el precio de venta".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeStatusDto {
    #[serde(rename = "statusId")]
    pub status_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(material_id: &str, quantity: i32) -> BudgetLineDto {
        BudgetLineDto {
            material_id: material_id.into(),
            quantity,
        }
    }

    fn dto(lines: Vec<BudgetLineDto>) -> BudgetDto {
        BudgetDto {
            description: "Cuadernos".into(),
            sales_price: 0.0,
            lines,
            ..Default::default()
        }
    }

    #[test]
    fn status_ids_round_trip() {
        for s in BudgetStatus::all() {
            assert_eq!(BudgetStatus::from_id(s.id()), Some(s));
        }
        assert_eq!(BudgetStatus::from_id(0), None);
        assert_eq!(BudgetStatus::default(), BudgetStatus::Pending);
    }

    #[test]
    fn cost_and_margin() {
        let mut b = Budget::new_for_insert("o".into(), "PRE-1".into(), "x".into(), None, 1000.0);
        b.lines = vec![
            BudgetLine {
                material_id: "a".into(),
                material_name: "Hojas".into(),
                quantity: 50,
                unit_price: 9.0,
                assigned_at: Utc::now(),
            },
            BudgetLine {
                material_id: "b".into(),
                material_name: "Tapas".into(),
                quantity: 1,
                unit_price: 500.0,
                assigned_at: Utc::now(),
            },
        ];
        assert_eq!(b.cost(), 950.0);
        assert_eq!(b.margin(), 50.0);
    }

    #[test]
    fn create_allows_zero_sales_price_update_does_not() {
        let mut d = dto(vec![line("a", 1)]);
        assert!(d.validate().is_ok());
        d.id = Some("x".into());
        assert_eq!(d.validate().unwrap_err(), "Agrega el precio de venta");
        d.sales_price = 10.0;
        assert!(d.validate().is_ok());
    }

    #[test]
    fn rejects_bad_lines() {
        assert_eq!(
            dto(vec![]).validate().unwrap_err(),
            "Agrega al menos un material"
        );
        assert_eq!(
            dto(vec![line("a", 0)]).validate().unwrap_err(),
            "Ingresa la cantidad"
        );
        assert_eq!(
            dto(vec![line("a", 1), line("a", 2)]).validate().unwrap_err(),
            "Ya está incluido ese material"
        );
        let mut d = dto(vec![line("a", 1)]);
        d.description = " ".into();
        assert_eq!(
            d.validate().unwrap_err(),
            "Asignale un nombre a tu presupuesto"
        );
    }
}
