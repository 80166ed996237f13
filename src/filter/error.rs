use thiserror::Error;

/// Rejections raised while turning `FilterData` into SQL
#[derive(Error, Debug)]
pub enum FilterError {
    /// Table or column name outside `[A-Za-z_][A-Za-z0-9_]*`
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Invalid order term: {0}")]
    InvalidOrder(String),

    #[error("Invalid WHERE clause: {0}")]
    InvalidWhereClause(String),

    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    #[error("Invalid operator data: {0}")]
    InvalidOperatorData(String),

    #[error("Limit must not be negative, got {0}")]
    NegativeLimit(i32),
}
