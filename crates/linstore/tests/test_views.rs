//! View-layer behavior over real backings, including composition and the
//! documented duplicate ownership model (store duplicate clones, view
//! duplicate aliases through a shared handle).

use linstore::{
    ArrayStore, Concatenated, Conditional, DataSource, GenericStore, Masked, MultiDimAccessor,
    Padded, Sequenced, SharedStore, SparseStore, StoreError, Transformed, Trimmed,
};

fn numbered(n: i32) -> GenericStore<i32> {
    GenericStore::from_vec((0..n).collect())
}

#[test]
fn test_padded_boundary_semantics() {
    let mut padded = Padded::new(numbered(4));
    assert_eq!(padded.size(), 4);
    assert_eq!(padded.get_value(1_000).unwrap(), 0);
    assert!(padded.set(1_000, &0).is_ok());
    assert!(matches!(
        padded.set(1_000, &5),
        Err(StoreError::InvalidBoundaryWrite { .. })
    ));
}

#[test]
fn test_masked_cyclic_pattern() {
    let masked = Masked::new(numbered(8), vec![true, false, true]).unwrap();
    assert_eq!(masked.size(), 5);
    let exposed: Vec<i32> = (0..masked.size())
        .map(|i| masked.get_value(i).unwrap())
        .collect();
    assert_eq!(exposed, vec![0, 2, 3, 5, 6]);
}

#[test]
fn test_conditional_snapshot_is_not_live() {
    let store = SharedStore::new(numbered(6));
    let view = Conditional::new(store.duplicate().unwrap(), |v: &i32| *v % 2 == 0).unwrap();
    assert_eq!(view.size(), 3); // 0, 2, 4

    // External mutation through the shared handle changes values the view
    // reads live, but never resizes the snapshot.
    let mut outside = store.duplicate().unwrap();
    outside.set(1, &100).unwrap();
    outside.set(2, &101).unwrap();
    assert_eq!(view.size(), 3);
    assert_eq!(view.get_value(1).unwrap(), 101);
}

#[test]
fn test_conditional_rejects_violating_write() {
    let mut view = Conditional::new(numbered(6), |v: &i32| *v % 2 == 0).unwrap();
    assert!(matches!(
        view.set(0, &3),
        Err(StoreError::PredicateViolation { index: 0 })
    ));
    view.set(0, &42).unwrap();
    assert_eq!(view.get_value(0).unwrap(), 42);
}

#[test]
fn test_concatenated_routing_and_sizes() {
    let mut sparse: SparseStore<i32> = SparseStore::new(3);
    sparse.set(0, &-1).unwrap();
    let joined = Concatenated::new(sparse, numbered(4)).unwrap();
    assert_eq!(joined.size(), 7);
    assert_eq!(joined.get_value(0).unwrap(), -1);
    assert_eq!(joined.get_value(1).unwrap(), 0);
    assert_eq!(joined.get_value(3).unwrap(), 0);
    assert_eq!(joined.get_value(6).unwrap(), 3);
}

#[test]
fn test_sequenced_and_trimmed_validation() {
    assert!(matches!(
        Trimmed::new(numbered(10), 6, 5),
        Err(StoreError::Configuration { .. })
    ));
    // Last strided position 1 + 3*3 = 10 falls outside the source.
    assert!(matches!(
        Sequenced::new(numbered(10), 1, 3, 4),
        Err(StoreError::Configuration { .. })
    ));
    assert!(Sequenced::new(numbered(10), 0, 3, 4).is_ok());
}

#[test]
fn test_transformed_serves_two_element_types() {
    // One physical f64 store viewed as i64 scaled values.
    let mut backing: ArrayStore<f64> = ArrayStore::try_new(4).unwrap();
    backing.set(0, &0.25).unwrap();
    let mut as_cents = Transformed::new(
        backing,
        |w: &i64| *w as f64 / 100.0,
        |u: &f64| (*u * 100.0).round() as i64,
    );
    assert_eq!(as_cents.get_value(0).unwrap(), 25i64);
    as_cents.set(1, &150i64).unwrap();
    assert_eq!(as_cents.get_value(1).unwrap(), 150i64);
    let backing = as_cents.into_inner();
    assert_eq!(backing.get_value(1).unwrap(), 1.5);
}

#[test]
fn test_views_compose_without_copying() {
    // Trim a strided slice of a padded sparse store: every layer delegates.
    let mut sparse: SparseStore<i32> = SparseStore::new(100);
    for i in 0..50u64 {
        sparse.set(i * 2, &(i as i32)).unwrap();
    }
    let strided = Sequenced::new(Padded::new(sparse), 0, 2, 50).unwrap();
    assert_eq!(strided.size(), 50);
    assert_eq!(strided.get_value(10).unwrap(), 10);

    let window = Trimmed::new(strided, 10, 19).unwrap();
    assert_eq!(window.size(), 10);
    assert_eq!(window.get_value(0).unwrap(), 10);
    assert_eq!(window.get_value(9).unwrap(), 19);
}

#[test]
fn test_view_duplicate_aliases_through_shared_store() {
    let shared = SharedStore::new(numbered(10));
    let view = Trimmed::new(shared, 2, 8).unwrap();
    let mut twin = view.duplicate().unwrap();

    twin.set(0, &-5).unwrap();
    assert_eq!(view.get_value(0).unwrap(), -5);
}

#[test]
fn test_view_duplicate_clones_over_plain_store() {
    let view = Trimmed::new(numbered(10), 2, 8).unwrap();
    let mut twin = view.duplicate().unwrap();

    twin.set(0, &-5).unwrap();
    assert_eq!(view.get_value(0).unwrap(), 2);
}

#[test]
fn test_multidim_over_view_stack() {
    // 2x3 grid laid over a trimmed window of a larger store.
    let window = Trimmed::new(numbered(10), 2, 7).unwrap();
    let mut grid = MultiDimAccessor::new(window, vec![2, 3]).unwrap();
    assert_eq!(grid.get(&[0, 0]).unwrap(), 2);
    assert_eq!(grid.get(&[1, 2]).unwrap(), 7);

    grid.set_checked(&[1, 0], &99).unwrap();
    assert_eq!(grid.get_checked(&[1, 0]).unwrap(), 99);
    assert!(grid.get_checked(&[0, 3]).is_err());
}

#[test]
fn test_masked_view_over_file_sized_source() {
    // Mask applied over a sparse store addressing a large index space.
    let mut sparse: SparseStore<f64> = SparseStore::new(9);
    sparse.set(4, &1.5).unwrap();
    let masked = Masked::new(sparse, vec![false, true]).unwrap();
    // Selected underlying indices: 1, 3, 5, 7.
    assert_eq!(masked.size(), 4);
    assert_eq!(masked.get_value(0).unwrap(), 0.0);
}
