//! Material form
//!
//! - view_model.rs: form state, load and save commands
//! - view.rs: Leptos component

mod view;
mod view_model;

pub use view::MaterialDetails;
pub use view_model::MaterialDetailsViewModel;
