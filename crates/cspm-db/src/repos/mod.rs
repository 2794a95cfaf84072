//! Save and query operations, one module per table group.

pub mod acceptances;
pub mod inventory;
pub mod relations;
pub mod requirements;
pub mod resources;
pub mod stats;
