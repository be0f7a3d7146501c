//! Budget form
//!
//! - view_model.rs: header, lines and the material picker state
//! - view.rs: Leptos component

mod view;
mod view_model;

pub use view::BudgetDetails;
pub use view_model::{BudgetDetailsViewModel, FormLine};
