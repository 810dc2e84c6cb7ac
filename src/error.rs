use thiserror::Error;

/// Structural problems found in a farm value, usually one read back from storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FarmError {
    #[error("farm should have {expected} plots but has {found}")]
    PlotCount { expected: usize, found: usize },

    #[error("plot '{id}' at ({row}, {col}) lies outside the grid")]
    OutOfBounds { id: String, row: usize, col: usize },

    #[error("plot id '{0}' is used more than once")]
    DuplicateId(String),

    #[error("more than one plot sits at ({row}, {col})")]
    DuplicateCell { row: usize, col: usize },

    #[error("plot '{0}' is both a merge head and a merge member")]
    HeadAndMember(String),

    #[error("plot '{id}' is merged into '{head}', which is not a merge head")]
    HeadlessMember { id: String, head: String },
}

impl FarmError {
    /// True for broken merge links, which [`crate::logic::merge::repair_groups`] can fix.
    /// Grid-shape errors are not repairable.
    pub fn is_group_error(&self) -> bool {
        matches!(
            self,
            FarmError::HeadAndMember(_) | FarmError::HeadlessMember { .. }
        )
    }
}

/// Errors raised by a blob store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
