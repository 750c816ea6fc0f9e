pub mod patient;
pub mod query;

pub use patient::InsertPatientRequest;
pub use query::{ExecuteQueryRequest, SelectQueryParams};
