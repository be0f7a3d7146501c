pub mod a001_material;
pub mod a002_tool;
pub mod a003_budget;
