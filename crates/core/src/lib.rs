//! Domain logic for building-inspection records ("vistorias").
//!
//! This crate has no database or HTTP dependencies. Stores and handlers in
//! the other workspace crates pass snapshots in and get plain values back.

pub mod aggregation;
pub mod command;
pub mod error;
pub mod geo;
pub mod inspection;
pub mod report;
pub mod roles;
pub mod sample;
pub mod search;
pub mod types;
