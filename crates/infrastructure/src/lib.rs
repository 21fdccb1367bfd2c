//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_access_repository;
mod postgres_access_control_repository;
mod postgres_access_token_repository;
mod postgres_directory_repository;
mod postgres_user_repository;
mod tracing_audit_repository;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_access_repository::InMemoryAccessRepository;
pub use postgres_access_control_repository::PostgresAccessControlRepository;
pub use postgres_access_token_repository::PostgresAccessTokenRepository;
pub use postgres_directory_repository::PostgresDirectoryRepository;
pub use postgres_user_repository::PostgresUserRepository;
pub use tracing_audit_repository::TracingAuditRepository;
