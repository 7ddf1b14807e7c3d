//! Strided sub-sequence view.

use std::marker::PhantomData;

use crate::element::Value;
use crate::error::StoreError;
use crate::source::{check_bounds, DataSource};

/// A start offset, stride and count defining a strided sub-view.
///
/// Exposed index `i` maps to underlying index `start + stride * i`.
/// Construction validates `stride >= 1`, `count >= 1` and that the final
/// position `start + stride * (count - 1)` stays within the underlying
/// bounds.
///
/// # Examples
///
/// ```
/// use linstore::{DataSource, GenericStore, Sequenced};
///
/// let data = GenericStore::<i32>::from_vec((0..10).collect());
/// let every_third = Sequenced::new(data, 1, 3, 3).unwrap();
/// assert_eq!(every_third.size(), 3);
/// assert_eq!(every_third.get_value(2).unwrap(), 7);
/// ```
#[derive(Debug)]
pub struct Sequenced<T: Value, S: DataSource<T>> {
    source: S,
    start: u64,
    stride: u64,
    count: u64,
    _marker: PhantomData<T>,
}

impl<T: Value, S: DataSource<T>> Sequenced<T, S> {
    /// Wrap `source` with strided geometry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Configuration`] for a zero stride or count, or
    /// when the last strided position falls outside the source (including
    /// arithmetic overflow).
    pub fn new(source: S, start: u64, stride: u64, count: u64) -> Result<Self, StoreError> {
        if stride == 0 {
            return Err(StoreError::configuration("stride must be at least 1"));
        }
        if count == 0 {
            return Err(StoreError::configuration("count must be at least 1"));
        }
        let last = stride
            .checked_mul(count - 1)
            .and_then(|span| start.checked_add(span));
        match last {
            Some(last) if last < source.size() => Ok(Self {
                source,
                start,
                stride,
                count,
                _marker: PhantomData,
            }),
            _ => Err(StoreError::configuration(format!(
                "strided range start={start} stride={stride} count={count} exceeds size {}",
                source.size()
            ))),
        }
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<T: Value, S: DataSource<T>> DataSource<T> for Sequenced<T, S> {
    fn size(&self) -> u64 {
        self.count
    }

    fn get(&self, index: u64, out: &mut T) -> Result<(), StoreError> {
        check_bounds(index, self.count)?;
        self.source.get(self.start + self.stride * index, out)
    }

    fn set(&mut self, index: u64, value: &T) -> Result<(), StoreError> {
        check_bounds(index, self.count)?;
        let underlying = self.start + self.stride * index;
        self.source.set(underlying, value)
    }

    fn duplicate(&self) -> Result<Self, StoreError> {
        Ok(Self {
            source: self.source.duplicate()?,
            start: self.start,
            stride: self.stride,
            count: self.count,
            _marker: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::GenericStore;

    fn numbered(n: i32) -> GenericStore<i32> {
        GenericStore::from_vec((0..n).collect())
    }

    #[test]
    fn test_strided_reads() {
        let view = Sequenced::new(numbered(10), 0, 2, 5).unwrap();
        let values: Vec<i32> = (0..5).map(|i| view.get_value(i).unwrap()).collect();
        assert_eq!(values, vec![0, 2, 4, 6, 8]);
    }

    #[test]
    fn test_offset_stride() {
        let view = Sequenced::new(numbered(10), 3, 3, 3).unwrap();
        let values: Vec<i32> = (0..3).map(|i| view.get_value(i).unwrap()).collect();
        assert_eq!(values, vec![3, 6, 9]);
    }

    #[test]
    fn test_geometry_validated() {
        assert!(Sequenced::new(numbered(10), 0, 0, 3).is_err());
        assert!(Sequenced::new(numbered(10), 0, 2, 0).is_err());
        // last position 0 + 2*5 = 10 is out of bounds
        assert!(Sequenced::new(numbered(10), 0, 2, 6).is_err());
        assert!(Sequenced::new(numbered(10), 10, 1, 1).is_err());
        assert!(Sequenced::new(numbered(10), 1, u64::MAX, 2).is_err());
    }

    #[test]
    fn test_set_writes_through() {
        let mut view = Sequenced::new(numbered(10), 1, 4, 2).unwrap();
        view.set(1, &-9).unwrap();
        assert_eq!(view.into_inner().get_value(5).unwrap(), -9);
    }
}
