//! Contiguous sub-range view.

use std::marker::PhantomData;

use crate::element::Value;
use crate::error::StoreError;
use crate::source::{check_bounds, DataSource};

/// An inclusive `[first, last]` sub-range of the source.
///
/// Construction validates `first <= last < source.size()`.
///
/// # Examples
///
/// ```
/// use linstore::{DataSource, GenericStore, Trimmed};
///
/// let data = GenericStore::<i32>::from_vec((0..10).collect());
/// let middle = Trimmed::new(data, 3, 6).unwrap();
/// assert_eq!(middle.size(), 4);
/// assert_eq!(middle.get_value(0).unwrap(), 3);
/// ```
#[derive(Debug)]
pub struct Trimmed<T: Value, S: DataSource<T>> {
    source: S,
    first: u64,
    size: u64,
    _marker: PhantomData<T>,
}

impl<T: Value, S: DataSource<T>> Trimmed<T, S> {
    /// Wrap `source` trimmed to `[first, last]` inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Configuration`] if the range is inverted or
    /// extends past the source.
    pub fn new(source: S, first: u64, last: u64) -> Result<Self, StoreError> {
        if first > last || last >= source.size() {
            return Err(StoreError::configuration(format!(
                "trim range [{first}, {last}] invalid for size {}",
                source.size()
            )));
        }
        Ok(Self {
            source,
            first,
            size: last - first + 1,
            _marker: PhantomData,
        })
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<T: Value, S: DataSource<T>> DataSource<T> for Trimmed<T, S> {
    fn size(&self) -> u64 {
        self.size
    }

    fn get(&self, index: u64, out: &mut T) -> Result<(), StoreError> {
        check_bounds(index, self.size)?;
        self.source.get(self.first + index, out)
    }

    fn set(&mut self, index: u64, value: &T) -> Result<(), StoreError> {
        check_bounds(index, self.size)?;
        let underlying = self.first + index;
        self.source.set(underlying, value)
    }

    fn duplicate(&self) -> Result<Self, StoreError> {
        Ok(Self {
            source: self.source.duplicate()?,
            first: self.first,
            size: self.size,
            _marker: PhantomData,
        })
    }
}
