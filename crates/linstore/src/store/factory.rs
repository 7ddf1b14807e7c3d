//! Backing-strategy selection with automatic out-of-core fallback.

use crate::element::{Element, FixedPrimitive};
use crate::error::StoreError;
use crate::source::DataSource;
use crate::store::{ArrayStore, FileStore, SparseStore};

/// Explicit backing selection for callers who know their access pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Dense in-memory backing.
    Array,
    /// Tree-indexed backing for mostly-zero data.
    Sparse,
    /// File-backed (out-of-core) backing.
    Virtual,
}

/// A factory-allocated backing, dispatching statically over the chosen
/// strategy.
#[derive(Debug)]
pub enum Store<E: Element>
where
    E::Primitive: FixedPrimitive,
{
    Array(ArrayStore<E>),
    File(FileStore<E>),
    Sparse(SparseStore<E>),
}

impl<E: Element> Store<E>
where
    E::Primitive: FixedPrimitive,
{
    /// The strategy actually backing this store.
    pub fn strategy(&self) -> Strategy {
        match self {
            Store::Array(_) => Strategy::Array,
            Store::File(_) => Strategy::Virtual,
            Store::Sparse(_) => Strategy::Sparse,
        }
    }
}

/// Chooses a backing strategy for a requested size.
///
/// Callers that request storage never reason about memory limits up front:
/// [`allocate`](StorageFactory::allocate) tries the dense backing first and
/// degrades to the file-backed one when memory is exhausted.
pub struct StorageFactory;

impl StorageFactory {
    /// Allocate `size` elements, dense first, file-backed on memory
    /// exhaustion.
    ///
    /// # Examples
    ///
    /// ```
    /// use linstore::{DataSource, StorageFactory};
    ///
    /// let mut store = StorageFactory::allocate::<f64>(1024).unwrap();
    /// store.set(1023, &3.5).unwrap();
    /// assert_eq!(store.get_value(1023).unwrap(), 3.5);
    /// ```
    pub fn allocate<E: Element>(size: u64) -> Result<Store<E>, StoreError>
    where
        E::Primitive: FixedPrimitive,
    {
        match ArrayStore::try_new(size) {
            Ok(store) => Ok(Store::Array(store)),
            Err(StoreError::AllocationFailed(err)) => {
                tracing::warn!(size, %err, "dense allocation failed, falling back to file backing");
                Ok(Store::File(FileStore::try_new(size)?))
            }
            Err(err) => Err(err),
        }
    }

    /// Allocate `size` elements with an explicit strategy.
    pub fn allocate_with<E: Element>(
        strategy: Strategy,
        size: u64,
    ) -> Result<Store<E>, StoreError>
    where
        E::Primitive: FixedPrimitive,
    {
        match strategy {
            Strategy::Array => Ok(Store::Array(ArrayStore::try_new(size)?)),
            Strategy::Sparse => Ok(Store::Sparse(SparseStore::new(size))),
            Strategy::Virtual => Ok(Store::File(FileStore::try_new(size)?)),
        }
    }
}

impl<E: Element> DataSource<E> for Store<E>
where
    E::Primitive: FixedPrimitive,
{
    fn size(&self) -> u64 {
        match self {
            Store::Array(store) => store.size(),
            Store::File(store) => store.size(),
            Store::Sparse(store) => store.size(),
        }
    }

    fn get(&self, index: u64, out: &mut E) -> Result<(), StoreError> {
        match self {
            Store::Array(store) => store.get(index, out),
            Store::File(store) => store.get(index, out),
            Store::Sparse(store) => store.get(index, out),
        }
    }

    fn set(&mut self, index: u64, value: &E) -> Result<(), StoreError> {
        match self {
            Store::Array(store) => store.set(index, value),
            Store::File(store) => store.set(index, value),
            Store::Sparse(store) => store.set(index, value),
        }
    }

    fn duplicate(&self) -> Result<Self, StoreError> {
        match self {
            Store::Array(store) => store.duplicate().map(Store::Array),
            Store::File(store) => store.duplicate().map(Store::File),
            Store::Sparse(store) => store.duplicate().map(Store::Sparse),
        }
    }
}
