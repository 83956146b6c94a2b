pub mod parameters;
pub mod types;

pub use parameters::*;
pub use types::*;
