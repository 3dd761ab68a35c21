pub mod loader;
pub mod reshape;

pub use loader::TransactionDb;
