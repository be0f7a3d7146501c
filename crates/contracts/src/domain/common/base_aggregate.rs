use super::EntityMetadata;
use serde::{Deserialize, Serialize};

/// Fields shared by every aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseAggregate<Id> {
    pub id: Id,
    /// Business code (e.g. "MAT-1A2B3C4D", "PRE-0F9E8D7C")
    pub code: String,
    /// Name shown in lists
    pub description: String,
    pub comment: Option<String>,
    pub metadata: EntityMetadata,
}

impl<Id> BaseAggregate<Id> {
    pub fn new(id: Id, code: String, description: String) -> Self {
        Self {
            id,
            code,
            description,
            comment: None,
            metadata: EntityMetadata::new(),
        }
    }

    /// Rebuild an aggregate loaded from the database
    pub fn with_metadata(
        id: Id,
        code: String,
        description: String,
        comment: Option<String>,
        metadata: EntityMetadata,
    ) -> Self {
        Self {
            id,
            code,
            description,
            comment,
            metadata,
        }
    }

    pub fn touch(&mut self) {
        self.metadata.touch();
    }

    pub fn set_comment(&mut self, comment: Option<String>) {
        self.comment = comment.filter(|c| !c.trim().is_empty());
    }
}

/// Generates a short business code like "MAT-1A2B3C4D"
pub fn generate_code(prefix: &str) -> String {
    let raw = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, raw[..8].to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_code_has_prefix_and_suffix() {
        let code = generate_code("MAT");
        assert!(code.starts_with("MAT-"));
        assert_eq!(code.len(), 12);
        assert!(code[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn blank_comment_is_dropped() {
        let mut base = BaseAggregate::new(1u8, "C".into(), "D".into());
        base.set_comment(Some("   ".into()));
        assert!(base.comment.is_none());
        base.set_comment(Some("nota".into()));
        assert_eq!(base.comment.as_deref(), Some("nota"));
    }
}
