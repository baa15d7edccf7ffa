pub mod anchor;
pub mod error;
pub mod gate;
pub mod key_service;
pub mod resolver;
pub mod types;
pub mod verify;
