//! The data-source contract and its plain in-memory implementations.
//!
//! Every backing store and every view implements [`DataSource`]; consumers
//! interact solely through `get`/`set`/`size`/`duplicate` and stay oblivious
//! to the physical representation underneath.
//!
//! # Ownership model
//!
//! `duplicate` follows one documented rule: **store duplicate clones, view
//! duplicate aliases**. Terminal stores produce an independent deep copy.
//! Views duplicate by duplicating the source they wrap, so wrapping a store
//! in [`SharedStore`] first makes every downstream duplicate an alias of the
//! same backing.

use std::fmt::Debug;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::element::Value;
use crate::error::StoreError;

/// A fixed-length, zero-based sequence of elements of one type.
///
/// The size is immutable after construction; there is no growth or shrink
/// primitive. All accesses are bounds-checked against `[0, size)` and fail
/// fast with [`StoreError::IndexOutOfBounds`].
pub trait DataSource<T: Value>: Debug {
    /// Number of addressable elements.
    fn size(&self) -> u64;

    /// Read the element at `index` into `out`.
    fn get(&self, index: u64, out: &mut T) -> Result<(), StoreError>;

    /// Write `value` at `index`.
    fn set(&mut self, index: u64, value: &T) -> Result<(), StoreError>;

    /// Produce an independent handle on the same logical contents.
    ///
    /// Deep for terminal stores, aliasing for [`SharedStore`]; views follow
    /// whichever their wrapped source does. Fallible because out-of-core and
    /// relational backings copy through their medium.
    fn duplicate(&self) -> Result<Self, StoreError>
    where
        Self: Sized;

    /// Convenience: read the element at `index` by value.
    fn get_value(&self, index: u64) -> Result<T, StoreError> {
        let mut out = T::zero();
        self.get(index, &mut out)?;
        Ok(out)
    }
}

pub(crate) fn check_bounds(index: u64, size: u64) -> Result<(), StoreError> {
    if index < size {
        Ok(())
    } else {
        Err(StoreError::IndexOutOfBounds { index, size })
    }
}

/// A reference-sharing handle over any data source.
///
/// `duplicate` clones the handle, not the backing, so all duplicates observe
/// each other's writes. Access is serialized behind a read-write lock; the
/// wrapped source needs no synchronization of its own.
#[derive(Debug)]
pub struct SharedStore<S> {
    inner: Arc<RwLock<S>>,
}

impl<S> SharedStore<S> {
    pub fn new(source: S) -> Self {
        Self {
            inner: Arc::new(RwLock::new(source)),
        }
    }

    /// Whether `self` and `other` share one backing.
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<S> Clone for SharedStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Value, S: DataSource<T>> DataSource<T> for SharedStore<S> {
    fn size(&self) -> u64 {
        self.inner.read().size()
    }

    fn get(&self, index: u64, out: &mut T) -> Result<(), StoreError> {
        self.inner.read().get(index, out)
    }

    fn set(&mut self, index: u64, value: &T) -> Result<(), StoreError> {
        self.inner.write().set(index, value)
    }

    fn duplicate(&self) -> Result<Self, StoreError> {
        Ok(self.clone())
    }
}

/// Plain in-memory storage of whole element instances, with no codec
/// encoding in between.
///
/// This is the backing for element types that have no fixed-width primitive
/// representation; everything else normally goes through the encoding stores
/// in [`crate::store`].
///
/// # Examples
///
/// ```
/// use linstore::{DataSource, GenericStore};
///
/// let mut store: GenericStore<f64> = GenericStore::new(4);
/// store.set(2, &1.5).unwrap();
/// assert_eq!(store.get_value(2).unwrap(), 1.5);
/// assert_eq!(store.get_value(3).unwrap(), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct GenericStore<T: Value> {
    data: Vec<T>,
}

impl<T: Value> GenericStore<T> {
    /// Create a zero-filled store of `size` elements.
    pub fn new(size: u64) -> Self {
        Self {
            data: vec![T::zero(); size as usize],
        }
    }

    /// Create a store that takes ownership of existing values.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T: Value> DataSource<T> for GenericStore<T> {
    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn get(&self, index: u64, out: &mut T) -> Result<(), StoreError> {
        check_bounds(index, self.size())?;
        out.clone_from(&self.data[index as usize]);
        Ok(())
    }

    fn set(&mut self, index: u64, value: &T) -> Result<(), StoreError> {
        check_bounds(index, self.size())?;
        self.data[index as usize].clone_from(value);
        Ok(())
    }

    fn duplicate(&self) -> Result<Self, StoreError> {
        Ok(self.clone())
    }
}
