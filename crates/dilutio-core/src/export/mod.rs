//! Export module for dossiers and batch identity.

mod batch;
mod dossier;

pub use batch::*;
pub use dossier::*;
