pub mod cert_source;
