//! N-dimensional coordinate mapping over a linear data source.
//!
//! Column-major order: the first dimension varies fastest.

use std::marker::PhantomData;

use crate::element::Value;
use crate::error::StoreError;
use crate::source::DataSource;

/// Compute column-major strides from a shape.
///
/// For dims `[d0, d1, d2, ...]`, returns `[1, d0, d0*d1, ...]`.
///
/// # Examples
///
/// ```
/// use linstore::ndim::compute_strides;
///
/// assert_eq!(compute_strides(&[3, 4, 5]), vec![1, 3, 12]);
/// assert_eq!(compute_strides(&[2, 3]), vec![1, 2]);
/// assert_eq!(compute_strides(&[]), vec![]);
/// ```
pub fn compute_strides(dims: &[u64]) -> Vec<u64> {
    let mut strides = Vec::with_capacity(dims.len());
    let mut stride = 1u64;
    for &dim in dims {
        strides.push(stride);
        stride = stride.saturating_mul(dim);
    }
    strides
}

/// Convert a coordinate to a linear index: `Σ coord[i] * stride[i]`.
#[inline]
pub fn coord_to_linear(coord: &[u64], strides: &[u64]) -> u64 {
    coord
        .iter()
        .zip(strides.iter())
        .map(|(&index, &stride)| index * stride)
        .sum()
}

/// Convert a linear index back to a coordinate for the given dims.
pub fn linear_to_coord(mut linear: u64, dims: &[u64]) -> Vec<u64> {
    let mut coord = Vec::with_capacity(dims.len());
    for &dim in dims {
        coord.push(linear % dim);
        linear /= dim;
    }
    coord
}

/// Maps N-dimensional coordinates onto any linear data source.
///
/// Owns the bijection between coordinate and linear index for a fixed shape;
/// the wrapped source must hold exactly `Π dims` elements.
///
/// `get`/`set` compute the linear index directly (the underlying bounds
/// check still applies); the `_checked` variants additionally validate the
/// coordinate rank and each component against its dimension.
///
/// # Examples
///
/// ```
/// use linstore::{DataSource, GenericStore, MultiDimAccessor};
///
/// let data = GenericStore::<i32>::from_vec(vec![1, 2, 3, 4, 5, 6]);
/// let grid = MultiDimAccessor::new(data, vec![2, 3]).unwrap();
/// assert_eq!(grid.get(&[0, 0]).unwrap(), 1);
/// assert_eq!(grid.get(&[1, 0]).unwrap(), 2);
/// assert_eq!(grid.get(&[0, 1]).unwrap(), 3);
/// assert_eq!(grid.get(&[1, 2]).unwrap(), 6);
/// ```
#[derive(Debug)]
pub struct MultiDimAccessor<T: Value, S: DataSource<T>> {
    source: S,
    dims: Vec<u64>,
    strides: Vec<u64>,
    _marker: PhantomData<T>,
}

impl<T: Value, S: DataSource<T>> MultiDimAccessor<T, S> {
    /// Wrap `source` with shape `dims`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Configuration`] if `Π dims` (checked) does not
    /// equal the source size.
    pub fn new(source: S, dims: Vec<u64>) -> Result<Self, StoreError> {
        let volume = dims
            .iter()
            .try_fold(1u64, |acc, &dim| acc.checked_mul(dim))
            .ok_or_else(|| StoreError::configuration("shape volume overflows u64"))?;
        if volume != source.size() {
            return Err(StoreError::configuration(format!(
                "shape {dims:?} addresses {volume} elements, source holds {}",
                source.size()
            )));
        }
        let strides = compute_strides(&dims);
        Ok(Self {
            source,
            dims,
            strides,
            _marker: PhantomData,
        })
    }

    pub fn dims(&self) -> &[u64] {
        &self.dims
    }

    pub fn strides(&self) -> &[u64] {
        &self.strides
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    /// Read the element at `coord`.
    pub fn get(&self, coord: &[u64]) -> Result<T, StoreError> {
        self.source.get_value(coord_to_linear(coord, &self.strides))
    }

    /// Write `value` at `coord`.
    pub fn set(&mut self, coord: &[u64], value: &T) -> Result<(), StoreError> {
        let linear = coord_to_linear(coord, &self.strides);
        self.source.set(linear, value)
    }

    fn validate(&self, coord: &[u64]) -> Result<(), StoreError> {
        if coord.len() != self.dims.len() {
            return Err(StoreError::WrongCoordinateRank {
                expected: self.dims.len(),
                actual: coord.len(),
            });
        }
        for (axis, (&index, &extent)) in coord.iter().zip(self.dims.iter()).enumerate() {
            if index >= extent {
                return Err(StoreError::CoordinateOutOfBounds {
                    axis,
                    index,
                    extent,
                });
            }
        }
        Ok(())
    }

    /// Read the element at `coord`, validating rank and each component.
    pub fn get_checked(&self, coord: &[u64]) -> Result<T, StoreError> {
        self.validate(coord)?;
        self.get(coord)
    }

    /// Write `value` at `coord`, validating rank and each component.
    pub fn set_checked(&mut self, coord: &[u64], value: &T) -> Result<(), StoreError> {
        self.validate(coord)?;
        self.set(coord, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::GenericStore;

    #[test]
    fn test_compute_strides() {
        assert_eq!(compute_strides(&[3, 4, 5]), vec![1, 3, 12]);
        assert_eq!(compute_strides(&[5]), vec![1]);
    }

    #[test]
    fn test_linear_roundtrip() {
        let dims = [3u64, 4, 5];
        let strides = compute_strides(&dims);
        for linear in 0..60 {
            let coord = linear_to_coord(linear, &dims);
            assert_eq!(coord_to_linear(&coord, &strides), linear);
        }
    }

    #[test]
    fn test_two_by_three_layout() {
        let data = GenericStore::from_vec(vec![1, 2, 3, 4, 5, 6]);
        let grid = MultiDimAccessor::new(data, vec![2, 3]).unwrap();
        assert_eq!(grid.get(&[0, 0]).unwrap(), 1);
        assert_eq!(grid.get(&[1, 0]).unwrap(), 2);
        assert_eq!(grid.get(&[0, 1]).unwrap(), 3);
        assert_eq!(grid.get(&[1, 1]).unwrap(), 4);
        assert_eq!(grid.get(&[0, 2]).unwrap(), 5);
        assert_eq!(grid.get(&[1, 2]).unwrap(), 6);
    }

    #[test]
    fn test_shape_must_match_size() {
        let data = GenericStore::<i32>::new(6);
        assert!(MultiDimAccessor::new(data, vec![2, 2]).is_err());
    }

    #[test]
    fn test_checked_access() {
        let data = GenericStore::<i32>::new(6);
        let mut grid = MultiDimAccessor::new(data, vec![2, 3]).unwrap();
        grid.set_checked(&[1, 2], &9).unwrap();
        assert_eq!(grid.get_checked(&[1, 2]).unwrap(), 9);

        assert!(matches!(
            grid.get_checked(&[1]),
            Err(StoreError::WrongCoordinateRank {
                expected: 2,
                actual: 1
            })
        ));
        assert!(matches!(
            grid.get_checked(&[2, 0]),
            Err(StoreError::CoordinateOutOfBounds {
                axis: 0,
                index: 2,
                extent: 2
            })
        ));
        assert!(grid.set_checked(&[0, 3], &1).is_err());
    }
}
