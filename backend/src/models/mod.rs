//! Data models for the PHARMADICES service.
//!
//! Field names serialize in camelCase to match the web client.

mod activity;
mod medicine;
mod review;
mod schedule;
mod store;
mod user;
mod userdata;

pub use activity::*;
pub use medicine::*;
pub use review::*;
pub use schedule::*;
pub use store::*;
pub use user::*;
pub use userdata::*;
