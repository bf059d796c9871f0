//! Relational data layer for a recruiting admin desk, kept entirely in a
//! flat key-value store.
//!
//! Three collections live under fixed keys: `jobsData`, `candidatesData` and
//! one `job_{id}_questions` list per job. Every mutation is a full
//! read-modify-write of one key through [`store::Coordinator`].

pub mod config;
pub mod editor;
pub mod errors;
pub mod jobs;
pub mod kv;
pub mod models;
pub mod questions;
pub mod relations;
pub mod seed;
pub mod state;
pub mod store;

pub use errors::{AppError, AppResult, StoreError};
pub use state::DeskState;
