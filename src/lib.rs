pub mod config;
pub mod db;
pub mod error;
pub mod server;
pub mod statement;
mod utils;

pub use error::{ApiError, PatientsError};
