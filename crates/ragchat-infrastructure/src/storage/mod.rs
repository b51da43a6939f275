//! Storage layer for small TOML files.

mod atomic_toml;

pub use atomic_toml::AtomicTomlFile;
