pub mod config_service;
pub mod identity_repository;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::identity_repository::TomlIdentityRepository;
pub use crate::paths::RagchatPaths;
