//! Database module: the store actor, row conversion and schema.
//!
//! Layout:
//! - `actor.rs`: ractor actor owning the SQLite pool, plus its cloneable handle
//! - `models.rs`: Rust structs mirroring DB rows
//! - `rows.rs`: dynamic row -> JSON conversion for arbitrary SELECTs
//! - `schema.rs`: SQL DDL for initializing the database

pub mod actor;
pub mod models;
pub mod rows;
pub mod schema;

pub use models::{PatientCreate, SqlValue};
pub use rows::JsonRow;
pub use schema::SQLITE_INIT;

pub use actor::{DbActorHandle, spawn};
