//! Domain layer: tenant-scoped entities, value objects and the storage ports
//! the application layer depends on.

pub mod audit;
pub mod bank;
pub mod money;
pub mod ports;
pub mod security;
pub mod transaction;
pub mod validation;
