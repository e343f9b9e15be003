//! Result type alias shared across the workspace.
use crate::error::StockError;

/// Workspace-wide `Result` alias with `StockError` as the default error.
pub type Result<T, E = StockError> = std::result::Result<T, E>;
