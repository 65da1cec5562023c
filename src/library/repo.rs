mod diesel;
mod memory;

pub use self::diesel::{upgrade_schema, DbPool, DieselRepository};
pub use self::memory::MemoryRepository;
