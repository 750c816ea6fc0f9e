pub mod extract;
pub mod router;
pub mod routes;

pub use router::{AppState, patients_router};
