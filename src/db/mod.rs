pub mod connection;
pub mod logs;
pub mod tenants;
