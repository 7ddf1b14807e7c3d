//! Terminal backing stores.
//!
//! Four interchangeable physical representations behind one contract:
//!
//! ```text
//! DataSource<E> (trait)
//! ├── ArrayStore      - dense, fully materialized in memory
//! ├── FileStore       - out-of-core, memory-mapped fixed-width records
//! ├── SparseStore     - red-black tree over non-zero entries only
//! └── RelationalStore - one database row per index (feature "relational")
//! ```
//!
//! [`StorageFactory`] picks between them, degrading from dense to
//! file-backed when memory runs out.

mod array;
mod factory;
mod file;
#[cfg(feature = "relational")]
mod relational;
mod sparse;
pub(crate) mod tree;

pub use array::ArrayStore;
pub use factory::{StorageFactory, Store, Strategy};
pub use file::FileStore;
#[cfg(feature = "relational")]
pub use relational::RelationalStore;
pub use sparse::SparseStore;
