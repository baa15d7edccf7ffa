// Re-export all types so callers can keep using `domain::types::*`.

pub use key::*;
pub use cert::*;
pub use signature::*;
pub use config::*;

// Module declarations
mod key;
mod cert;
mod signature;
mod config;
