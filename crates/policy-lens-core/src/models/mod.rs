//! Domain models for policy-lens.

mod contract;
mod finding;
mod provider;
mod score;

pub use contract::*;
pub use finding::*;
pub use provider::*;
pub use score::*;
