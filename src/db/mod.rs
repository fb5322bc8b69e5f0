//! Database layer: pool, credential store trait and its implementations.

mod memory;
mod pool;
mod store;
mod users;

pub use memory::MemoryUserStore;
pub use pool::{check_connection, create_pool, run_migrations, DbPool};
pub use store::{NewUser, StoreError, UserRow, UserStore};
pub use users::PgUserStore;
