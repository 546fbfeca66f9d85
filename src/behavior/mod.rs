//! Behavior-tree extraction
//!
//! Turns parsed behavior configuration documents into symbols and
//! references: each node becomes a global symbol typed by its class, and
//! its fields become member symbols linked to animations, other behaviors
//! and condition types.

mod error;
mod schema;
mod walker;

pub use error::ExtractError;
pub use schema::{BehaviorSchema, FieldRole};
pub use walker::BehaviorWalker;
