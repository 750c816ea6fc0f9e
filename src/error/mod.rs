mod api;
mod patients;

pub use api::{ApiError, StoreContext};
pub use patients::PatientsError;
