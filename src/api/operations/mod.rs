//! Generic CRUD/publish operations over named admin resources

pub mod operation;
pub mod operations;

pub use operation::{Operation, OperationResult};
pub use operations::Operations;
