//! # Scaffold Repository
//!
//! Generic data access for the CRUD scaffold:
//!
//! ```text
//! Controller
//!   ↓  Dao<E, S>            (envelopes, unit-of-work scoping, logging)
//! EntityStore<E>            (store interface)
//!   ├─ MySqlStore<E>        (SQLx, parameterized SQL)
//!   └─ MemoryStore<E>       (in-process, for tests)
//! ```

pub mod dao;
pub mod pool;
pub mod store;

pub use dao::Dao;
pub use pool::*;
pub use store::{EntityStore, FindQuery, MemoryStore, MemoryWork, MySqlStore, Window};
