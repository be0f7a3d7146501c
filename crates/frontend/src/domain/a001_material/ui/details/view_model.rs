use contracts::domain::a001_material::aggregate::{Material, MaterialDto};
use contracts::domain::common::AggregateId;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a001_material::api;
use crate::shared::parse_number;

/// Blank stock field means "not given"
pub fn stock_from_text(value: &str) -> Option<i32> {
    (!value.trim().is_empty()).then(|| parse_number(value))
}

#[derive(Clone, Copy)]
pub struct MaterialDetailsViewModel {
    pub id: RwSignal<Option<String>>,
    pub code: RwSignal<Option<String>>,
    pub description: RwSignal<String>,
    pub comment: RwSignal<String>,
    pub quantity: RwSignal<String>,
    pub stock: RwSignal<String>,
    pub price: RwSignal<String>,
    pub error: RwSignal<Option<String>>,
    pub is_saving: RwSignal<bool>,
}

impl MaterialDetailsViewModel {
    pub fn new() -> Self {
        Self {
            id: RwSignal::new(None),
            code: RwSignal::new(None),
            description: RwSignal::new(String::new()),
            comment: RwSignal::new(String::new()),
            quantity: RwSignal::new(String::new()),
            stock: RwSignal::new(String::new()),
            price: RwSignal::new(String::new()),
            error: RwSignal::new(None),
            is_saving: RwSignal::new(false),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.id.with(Option::is_some)
    }

    /// Preview of what the backend will store as unit price
    pub fn unit_price(&self) -> f64 {
        Material::compute_unit_price(
            parse_number(&self.price.get()),
            parse_number(&self.quantity.get()),
        )
    }

    fn fill_from(&self, m: Material) {
        self.id.set(Some(m.base.id.as_string()));
        self.code.set(Some(m.base.code));
        self.description.set(m.base.description);
        self.comment.set(m.base.comment.unwrap_or_default());
        self.quantity.set(m.quantity.to_string());
        self.stock.set(m.stock.to_string());
        self.price.set(m.price.to_string());
    }

    pub fn load_if_needed(&self, id: Option<String>) {
        let Some(existing_id) = id else { return };
        let vm = *self;
        spawn_local(async move {
            match api::fetch_by_id(&existing_id).await {
                Ok(material) => vm.fill_from(material),
                Err(e) => vm.error.set(Some(format!("Error al cargar: {}", e))),
            }
        });
    }

    pub fn to_dto(&self) -> MaterialDto {
        let comment = self.comment.get_untracked();
        MaterialDto {
            id: self.id.get_untracked(),
            code: self.code.get_untracked(),
            description: self.description.get_untracked(),
            comment: (!comment.trim().is_empty()).then_some(comment),
            quantity: parse_number(&self.quantity.get_untracked()),
            stock: stock_from_text(&self.stock.get_untracked()),
            price: parse_number(&self.price.get_untracked()),
        }
    }

    pub fn save_command(&self, on_saved: Callback<()>) {
        let current = self.to_dto();
        if current.description.trim().is_empty() {
            self.error.set(Some("Nombre es requerido".to_string()));
            return;
        }

        let vm = *self;
        vm.is_saving.set(true);
        spawn_local(async move {
            let result = api::save(&current).await;
            vm.is_saving.set(false);
            match result {
                Ok(_) => on_saved.run(()),
                Err(e) => vm.error.set(Some(e)),
            }
        });
    }
}

impl Default for MaterialDetailsViewModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::stock_from_text;

    #[test]
    fn test_blank_stock_is_not_sent() {
        assert_eq!(stock_from_text(""), None);
        assert_eq!(stock_from_text("   "), None);
        assert_eq!(stock_from_text("450"), Some(450));
        assert_eq!(stock_from_text("0"), Some(0));
    }
}
