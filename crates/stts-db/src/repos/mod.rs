//! Repository modules implementing CRUD and workflow operations for all STTS entities.
//!
//! Each module adds methods to `SttsService` via `impl SttsService` blocks.

pub mod application;
pub mod audit;
pub mod crop;
pub mod declaration;
pub mod lab;
pub mod label;
pub mod market;
pub mod permit;
pub mod planting_return;
pub mod stock;
pub mod track_trace;
pub mod user;
