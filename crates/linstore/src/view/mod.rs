//! Composable views over data sources.
//!
//! Every view implements the same `get`/`set`/`size`/`duplicate` contract by
//! delegating to one or two underlying sources; none allocate backing
//! storage of their own beyond small fixed scratch. Views add no
//! synchronization, so their thread-safety is exactly that of what they
//! wrap.
//!
//! ```text
//! DataSource<T> (trait)
//! ├── Padded       - zero outside the declared extent
//! ├── Masked       - cyclic boolean pattern selects positions
//! ├── Conditional  - predicate snapshot taken at construction
//! ├── Concatenated - two sources as one contiguous sequence
//! ├── Sequenced    - start/stride/count sub-sequence
//! ├── Trimmed      - contiguous [first, last] sub-range
//! └── Transformed  - bidirectional element-type projection
//! ```
//!
//! Views duplicate by duplicating their source(s); wrap the source in
//! [`SharedStore`](crate::SharedStore) first when an aliasing duplicate is
//! wanted.

mod concat;
mod conditional;
mod masked;
mod padded;
mod sequenced;
mod transformed;
mod trimmed;

pub use concat::Concatenated;
pub use conditional::Conditional;
pub use masked::Masked;
pub use padded::Padded;
pub use sequenced::Sequenced;
pub use transformed::Transformed;
pub use trimmed::Trimmed;
