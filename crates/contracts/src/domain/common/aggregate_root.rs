use super::EntityMetadata;

/// Aggregate root contract
///
/// Instance accessors plus the static names used for tables, routes and UI labels.
pub trait AggregateRoot {
    type Id;

    fn id(&self) -> Self::Id;

    /// Business code of the record (e.g. "MAT-1A2B3C4D")
    fn code(&self) -> &str;

    fn description(&self) -> &str;

    fn metadata(&self) -> &EntityMetadata;

    fn metadata_mut(&mut self) -> &mut EntityMetadata;

    /// Aggregate index in the system (e.g. "a001")
    fn aggregate_index() -> &'static str;

    /// Collection name used for tables and routes (e.g. "material")
    fn collection_name() -> &'static str;

    /// Singular UI label
    fn element_name() -> &'static str;

    /// Plural UI label
    fn list_name() -> &'static str;

    /// Full system name (e.g. "a001_material"), also the table name
    fn full_name() -> String {
        format!("{}_{}", Self::aggregate_index(), Self::collection_name())
    }
}
