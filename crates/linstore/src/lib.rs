//! linstore - uniform indexed storage with interchangeable backings.
//!
//! A [`DataSource`] is a fixed-length, linearly addressable sequence of
//! elements accessed through one contract (`get`/`set`/`size`/`duplicate`),
//! regardless of the physical representation underneath.
//!
//! # Architecture
//!
//! ```text
//! Level 1: Element contracts (element module)
//!     → Value, Element codec, Primitive kinds
//!
//! Level 2: Terminal backings (store module)
//!     → ArrayStore (dense), FileStore (out-of-core),
//!       SparseStore (tree-indexed), RelationalStore (database),
//!       chosen via StorageFactory with dense→file fallback
//!
//! Level 3: Composable views (view module)
//!     → Padded, Masked, Conditional, Concatenated,
//!       Sequenced, Trimmed, Transformed
//!
//! Level 4: N-dimensional addressing (ndim module)
//!     → MultiDimAccessor over any data source
//! ```
//!
//! # Example
//!
//! ```
//! use linstore::{DataSource, StorageFactory, Trimmed};
//!
//! // Allocate storage without reasoning about memory limits; the factory
//! // degrades to a file backing when dense allocation fails.
//! let mut store = StorageFactory::allocate::<f64>(100).unwrap();
//! store.set(42, &3.5).unwrap();
//!
//! // Views compose over any source without copying.
//! let window = Trimmed::new(store, 40, 49).unwrap();
//! assert_eq!(window.size(), 10);
//! assert_eq!(window.get_value(2).unwrap(), 3.5);
//! ```

pub mod element;
pub mod error;
pub mod ndim;
pub mod source;
pub mod store;
pub mod view;

pub use element::{Element, FixedPrimitive, Primitive, PrimitiveKind, Value};
pub use error::{BackingFailure, StoreError};
pub use ndim::MultiDimAccessor;
pub use source::{DataSource, GenericStore, SharedStore};
#[cfg(feature = "relational")]
pub use store::RelationalStore;
pub use store::{ArrayStore, FileStore, SparseStore, StorageFactory, Store, Strategy};
pub use view::{Concatenated, Conditional, Masked, Padded, Sequenced, Transformed, Trimmed};
