//! Domain models for the dilutio system.

mod extract;
mod issue;
mod prescription;

pub use extract::*;
pub use issue::*;
pub use prescription::*;
