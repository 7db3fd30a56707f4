pub mod notifier;
pub mod types;

pub use notifier::*;
pub use types::*;
