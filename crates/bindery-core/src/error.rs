/// Errors in the declared model. Any of these aborts the run before output is produced.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("unknown class `{name}` referenced by {referenced_by}")]
    UnknownClass { name: String, referenced_by: String },

    #[error("class `{0}` is declared more than once")]
    DuplicateClass(String),

    #[error("`{name}` is not a valid identifier ({context})")]
    InvalidIdentifier { name: String, context: String },

    /// Path starts and ends at the same class.
    #[error("parent cycle: {}", .path.join(" -> "))]
    ParentCycle { path: Vec<String> },

    #[error("unsupported type `{ty}` in {context}: {reason}")]
    UnsupportedType {
        ty: String,
        context: String,
        reason: String,
    },

    #[error("invalid instance of template `{template}`: {reason}")]
    InvalidTemplateInstance { template: String, reason: String },
}
