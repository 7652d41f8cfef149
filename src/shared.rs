pub mod types;
pub mod settings;
pub mod errors;
pub mod error;
pub mod events;
pub mod emit;
pub mod format;

// Re-export CalcError for convenience
pub use errors::{CalcError, CalcResult};
