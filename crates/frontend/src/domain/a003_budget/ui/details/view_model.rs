use contracts::domain::a001_material::aggregate::Material;
use contracts::domain::a003_budget::aggregate::{Budget, BudgetDto, BudgetLineDto};
use contracts::domain::common::AggregateId;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a001_material::api as material_api;
use crate::domain::a003_budget::api;
use crate::shared::parse_number;

/// One material line as edited in the form
#[derive(Clone, Debug, PartialEq)]
pub struct FormLine {
    pub material_id: String,
    pub material_name: String,
    pub quantity: i32,
    /// Stored snapshot for saved lines, current material price for new ones
    pub unit_price: f64,
}

impl FormLine {
    pub fn subtotal(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

pub fn lines_cost(lines: &[FormLine]) -> f64 {
    lines.iter().map(FormLine::subtotal).sum()
}

/// Append a picked material, rejecting blanks and duplicates
pub fn add_line(lines: &mut Vec<FormLine>, material: &Material, quantity: i32) -> Result<(), String> {
    let material_id = material.base.id.as_string();
    if quantity <= 0 {
        return Err("Ingresa la cantidad".into());
    }
    if lines.iter().any(|l| l.material_id == material_id) {
        return Err("Ya está incluido ese material".into());
    }
    lines.push(FormLine {
        material_id,
        material_name: material.base.description.clone(),
        quantity,
        unit_price: material.unit_price,
    });
    Ok(())
}

#[derive(Clone, Copy)]
pub struct BudgetDetailsViewModel {
    pub id: RwSignal<Option<String>>,
    pub code: RwSignal<Option<String>>,
    pub description: RwSignal<String>,
    pub comment: RwSignal<String>,
    pub sales_price: RwSignal<String>,
    pub lines: RwSignal<Vec<FormLine>>,
    pub materials: RwSignal<Vec<Material>>,
    pub picked_material: RwSignal<String>,
    pub picked_quantity: RwSignal<String>,
    pub error: RwSignal<Option<String>>,
    pub is_saving: RwSignal<bool>,
}

impl BudgetDetailsViewModel {
    pub fn new() -> Self {
        Self {
            id: RwSignal::new(None),
            code: RwSignal::new(None),
            description: RwSignal::new(String::new()),
            comment: RwSignal::new(String::new()),
            sales_price: RwSignal::new(String::new()),
            lines: RwSignal::new(Vec::new()),
            materials: RwSignal::new(Vec::new()),
            picked_material: RwSignal::new(String::new()),
            picked_quantity: RwSignal::new("1".into()),
            error: RwSignal::new(None),
            is_saving: RwSignal::new(false),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.id.with(Option::is_some)
    }

    pub fn cost(&self) -> f64 {
        self.lines.with(|l| lines_cost(l))
    }

    pub fn margin(&self) -> f64 {
        parse_number::<f64>(&self.sales_price.get()) - self.cost()
    }

    fn fill_from(&self, budget: Budget) {
        self.id.set(Some(budget.base.id.as_string()));
        self.code.set(Some(budget.base.code));
        self.description.set(budget.base.description);
        self.comment.set(budget.base.comment.unwrap_or_default());
        self.sales_price.set(budget.sales_price.to_string());
        self.lines.set(
            budget
                .lines
                .into_iter()
                .map(|l| FormLine {
                    material_id: l.material_id,
                    material_name: l.material_name,
                    quantity: l.quantity,
                    unit_price: l.unit_price,
                })
                .collect(),
        );
    }

    /// Materials for the picker, and the budget itself when editing
    pub fn load(&self, id: Option<String>) {
        let vm = *self;
        spawn_local(async move {
            match material_api::fetch_all().await {
                Ok(materials) => vm.materials.set(materials),
                Err(e) => vm.error.set(Some(format!("Error al cargar materiales: {}", e))),
            }
        });
        if let Some(existing_id) = id {
            spawn_local(async move {
                match api::fetch_by_id(&existing_id).await {
                    Ok(budget) => vm.fill_from(budget),
                    Err(e) => vm.error.set(Some(format!("Error al cargar: {}", e))),
                }
            });
        }
    }

    pub fn add_picked(&self) {
        let picked = self.picked_material.get_untracked();
        let material = self
            .materials
            .with_untracked(|all| all.iter().find(|m| m.base.id.as_string() == picked).cloned());
        let Some(material) = material else {
            self.error.set(Some("Selecciona un material".into()));
            return;
        };

        let quantity = parse_number(&self.picked_quantity.get_untracked());
        let mut result = Ok(());
        self.lines.update(|lines| result = add_line(lines, &material, quantity));
        match result {
            Ok(()) => {
                self.error.set(None);
                self.picked_material.set(String::new());
                self.picked_quantity.set("1".into());
            }
            Err(e) => self.error.set(Some(e)),
        }
    }

    pub fn set_line_quantity(&self, material_id: &str, quantity: i32) {
        self.lines.update(|lines| {
            if let Some(line) = lines.iter_mut().find(|l| l.material_id == material_id) {
                line.quantity = quantity;
            }
        });
    }

    pub fn remove_line(&self, material_id: &str) {
        self.lines.update(|lines| lines.retain(|l| l.material_id != material_id));
    }

    pub fn to_dto(&self) -> BudgetDto {
        let comment = self.comment.get_untracked();
        BudgetDto {
            id: self.id.get_untracked(),
            code: self.code.get_untracked(),
            description: self.description.get_untracked(),
            comment: (!comment.trim().is_empty()).then_some(comment),
            sales_price: parse_number(&self.sales_price.get_untracked()),
            lines: self.lines.with_untracked(|lines| {
                lines
                    .iter()
                    .map(|l| BudgetLineDto {
                        material_id: l.material_id.clone(),
                        quantity: l.quantity,
                    })
                    .collect()
            }),
        }
    }

    pub fn save_command(&self, on_saved: Callback<()>) {
        let dto = self.to_dto();
        if let Err(e) = dto.validate() {
            self.error.set(Some(e));
            return;
        }

        let vm = *self;
        vm.is_saving.set(true);
        spawn_local(async move {
            let result = api::save(&dto).await;
            vm.is_saving.set(false);
            match result {
                Ok(_) => on_saved.run(()),
                Err(e) => vm.error.set(Some(e)),
            }
        });
    }
}

impl Default for BudgetDetailsViewModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material(name: &str, unit_price: f64) -> Material {
        Material::new_for_insert(
            "owner".into(),
            format!("MAT-{}", name),
            name.into(),
            None,
            10,
            10,
            unit_price * 10.0,
        )
    }

    #[test]
    fn test_add_line_snapshots_unit_price() {
        let hojas = material("Hojas", 9.0);
        let mut lines = Vec::new();
        add_line(&mut lines, &hojas, 4).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].material_name, "Hojas");
        assert_eq!(lines[0].unit_price, 9.0);
        assert_eq!(lines_cost(&lines), 36.0);
    }

    #[test]
    fn test_add_line_rejects_duplicates_and_zero_quantity() {
        let tapas = material("Tapas", 500.0);
        let mut lines = Vec::new();
        assert_eq!(add_line(&mut lines, &tapas, 0), Err("Ingresa la cantidad".into()));
        add_line(&mut lines, &tapas, 2).unwrap();
        assert_eq!(
            add_line(&mut lines, &tapas, 1),
            Err("Ya está incluido ese material".into())
        );
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_lines_cost_sums_subtotals() {
        let lines = vec![
            FormLine {
                material_id: "a".into(),
                material_name: "Hojas".into(),
                quantity: 100,
                unit_price: 9.0,
            },
            FormLine {
                material_id: "b".into(),
                material_name: "Resortes".into(),
                quantity: 2,
                unit_price: 140.0,
            },
        ];
        assert_eq!(lines_cost(&lines), 1180.0);
        assert_eq!(lines_cost(&[]), 0.0);
    }
}
