use crate::catalog::CapabilityId;

/// Structural problems in a capability catalog.
///
/// These are catalog-authoring mistakes, not user input errors; generation
/// refuses to run against a catalog that produces one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog contains no capabilities")]
    Empty,

    #[error("capability at position {position} has an empty id")]
    EmptyId { position: usize },

    #[error("capability id is empty")]
    BlankId,

    #[error("duplicate capability id {0}")]
    DuplicateId(CapabilityId),

    #[error("capability {0} has an empty title")]
    EmptyTitle(CapabilityId),

    #[error("capability {id} declares invalid target path '{path}': {reason}")]
    InvalidTargetPath {
        id: CapabilityId,
        path: String,
        reason: &'static str,
    },
}

/// Fatal outcomes of a generation call.
///
/// Everything else (unknown ids, unresolved placeholders, path collisions) is
/// reported through [`crate::Diagnostic`] next to a successful result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error("invalid capability catalog: {0}")]
    InvalidCatalog(#[from] CatalogError),
}
