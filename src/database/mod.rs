pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use manager::DatabaseManager;
pub use memory::MemoryStore;
pub use models::Programmer;
pub use postgres::PgProgrammerStore;
pub use store::{ProgrammerStore, StoreError};
