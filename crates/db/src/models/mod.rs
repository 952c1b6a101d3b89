//! Row structs and insert DTOs.
//!
//! Status and area columns are read as text and converted to the closed
//! enums of `vistoria-core` when a record is assembled.

pub mod inspection;
pub mod session;
pub mod user;
