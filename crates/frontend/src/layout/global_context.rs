use leptos::prelude::*;
use std::collections::HashMap;
use web_sys::window;

pub const PAGE_MATERIALS: &str = "a001_material";
pub const PAGE_TOOLS: &str = "a002_tool";
pub const PAGE_BUDGETS: &str = "a003_budget";
pub const PAGE_SALES: &str = "p900_sales";
pub const PAGE_USERS: &str = "sys_users";

pub const DEFAULT_PAGE: &str = PAGE_BUDGETS;

/// Sidebar title of a page key
pub fn page_label(key: &str) -> &'static str {
    match key {
        PAGE_MATERIALS => "Materiales",
        PAGE_TOOLS => "Herramientas",
        PAGE_BUDGETS => "Presupuestos",
        PAGE_SALES => "Ventas",
        PAGE_USERS => "Usuarios",
        _ => "",
    }
}

fn is_known_page(key: &str) -> bool {
    !page_label(key).is_empty()
}

/// `active` value of a query string like `?active=p900_sales`
fn active_from_search(search: &str) -> Option<String> {
    let params: HashMap<String, String> =
        serde_qs::from_str(search.trim_start_matches('?')).unwrap_or_default();
    params.get("active").filter(|k| is_known_page(k)).cloned()
}

#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    pub active: RwSignal<String>,
    pub left_open: RwSignal<bool>,
}

impl AppGlobalContext {
    pub fn new() -> Self {
        Self {
            active: RwSignal::new(DEFAULT_PAGE.to_string()),
            left_open: RwSignal::new(true),
        }
    }

    /// Restore the active page from `?active=` and keep the URL in sync
    pub fn init_router_integration(&self) {
        let search = window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        if let Some(key) = active_from_search(&search) {
            self.active.set(key);
        }

        let active = self.active;
        Effect::new(move |_| {
            let key = active.get();
            let query_string =
                serde_qs::to_string(&HashMap::from([("active".to_string(), key)]))
                    .unwrap_or_default();
            let new_url = format!("?{}", query_string);

            let current_search = window()
                .and_then(|w| w.location().search().ok())
                .unwrap_or_default();
            if current_search != new_url {
                if let Some(history) = window().and_then(|w| w.history().ok()) {
                    let _ = history.replace_state_with_url(
                        &wasm_bindgen::JsValue::NULL,
                        "",
                        Some(&new_url),
                    );
                }
            }
        });
    }

    pub fn open(&self, key: &str) {
        log::debug!("open page '{}'", key);
        self.active.set(key.to_string());
    }

    pub fn toggle_left(&self) {
        self.left_open.update(|val| *val = !*val);
    }
}

impl Default for AppGlobalContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_from_search() {
        assert_eq!(active_from_search("?active=p900_sales"), Some(PAGE_SALES.to_string()));
        assert_eq!(active_from_search("?active=unknown"), None);
        assert_eq!(active_from_search(""), None);
    }
}
