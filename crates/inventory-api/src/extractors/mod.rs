//! Axum extractors for request handling
//!
//! Custom extractors for operator identity, validation, and pagination.

mod operator;
mod pagination;
mod path;
mod validated;

pub use operator::{CurrentOperator, OPERATOR_ID_HEADER, OPERATOR_NAME_HEADER};
pub use pagination::Pagination;
pub use path::MaterialIdPath;
pub use validated::{ValidatedJson, ValidatedQuery};
