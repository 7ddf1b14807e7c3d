//! Tree-indexed backing that stores only non-zero elements.

use parking_lot::Mutex;

use crate::element::Value;
use crate::error::StoreError;
use crate::source::{check_bounds, DataSource};
use crate::store::tree::RbTree;

/// Sparse storage: a red-black tree keyed by index, holding only entries
/// whose value is non-zero.
///
/// Unset indices read as zero, and writing zero removes any existing entry,
/// so memory stays proportional to the number of non-zero entries no matter
/// how large the declared size is. Accesses cost O(log k) in the entry
/// count, independent of `size`.
///
/// Every tree operation goes through one mutex, so shared-reference access
/// (via [`read`](SparseStore::read)/[`write`](SparseStore::write) or a
/// [`SharedStore`](crate::SharedStore)) from multiple threads is safe but
/// serialized, not parallel.
///
/// # Examples
///
/// ```
/// use linstore::{DataSource, SparseStore};
///
/// let mut store: SparseStore<f64> = SparseStore::new(1 << 40);
/// store.set(999_999_999_999, &4.25).unwrap();
/// assert_eq!(store.get_value(999_999_999_999).unwrap(), 4.25);
/// assert_eq!(store.get_value(7).unwrap(), 0.0);
/// assert_eq!(store.nonzero_count(), 1);
/// ```
#[derive(Debug)]
pub struct SparseStore<E: Value> {
    size: u64,
    tree: Mutex<RbTree<E>>,
}

impl<E: Value> SparseStore<E> {
    /// Create an all-zero store addressing `size` elements.
    pub fn new(size: u64) -> Self {
        Self {
            size,
            tree: Mutex::new(RbTree::new()),
        }
    }

    /// Read through a shared reference; see [`DataSource::get`].
    pub fn read(&self, index: u64, out: &mut E) -> Result<(), StoreError> {
        check_bounds(index, self.size)?;
        match self.tree.lock().get(index) {
            Some(value) => out.clone_from(value),
            None => *out = E::zero(),
        }
        Ok(())
    }

    /// Write through a shared reference; see [`DataSource::set`].
    ///
    /// A zero value elides the entry instead of storing it.
    pub fn write(&self, index: u64, value: &E) -> Result<(), StoreError> {
        check_bounds(index, self.size)?;
        let mut tree = self.tree.lock();
        if value.is_zero() {
            tree.remove(index);
        } else {
            tree.insert(index, value.clone());
        }
        Ok(())
    }

    /// Number of explicitly stored (non-zero) entries.
    pub fn nonzero_count(&self) -> usize {
        self.tree.lock().len()
    }

    /// Ascending `(index, value)` pairs of the non-zero entries.
    pub fn nonzero_entries(&self) -> Vec<(u64, E)> {
        self.tree
            .lock()
            .iter()
            .map(|(index, value)| (index, value.clone()))
            .collect()
    }
}

impl<E: Value> DataSource<E> for SparseStore<E> {
    fn size(&self) -> u64 {
        self.size
    }

    fn get(&self, index: u64, out: &mut E) -> Result<(), StoreError> {
        self.read(index, out)
    }

    fn set(&mut self, index: u64, value: &E) -> Result<(), StoreError> {
        self.write(index, value)
    }

    fn duplicate(&self) -> Result<Self, StoreError> {
        let tree = self.tree.lock().clone();
        Ok(Self {
            size: self.size,
            tree: Mutex::new(tree),
        })
    }
}
