// OpenSSL-backed key service and signature primitive

mod store;
mod verifier;

pub use store::*;
pub use verifier::*;
