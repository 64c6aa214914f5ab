//! Per-level store of subdivided geometry.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::GeometryModel;

/// Subdivided meshes keyed by subdivision level.
///
/// Entries are immutable once inserted and are shared with the displayed
/// slot through `Arc`. The cache only grows; nothing is evicted until
/// [`clear`](Self::clear).
#[derive(Debug, Clone, Default)]
pub struct LevelCache {
    levels: BTreeMap<u32, Arc<GeometryModel>>,
}

impl LevelCache {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, level: u32) -> Option<&Arc<GeometryModel>> {
        self.levels.get(&level)
    }

    #[inline]
    pub fn contains(&self, level: u32) -> bool {
        self.levels.contains_key(&level)
    }

    /// Store geometry for `level`, returning the shared handle.
    ///
    /// An existing entry for the same level is replaced.
    pub fn insert(&mut self, level: u32, mesh: GeometryModel) -> Arc<GeometryModel> {
        let mesh = Arc::new(mesh);
        self.levels.insert(level, Arc::clone(&mesh));
        mesh
    }

    /// Cached levels in ascending order.
    pub fn levels(&self) -> Vec<u32> {
        self.levels.keys().copied().collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn clear(&mut self) {
        self.levels.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn triangle() -> GeometryModel {
        GeometryModel::from_parts_unchecked(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn test_insert_and_get_share_storage() {
        let mut cache = LevelCache::new();
        let handle = cache.insert(2, triangle());

        let cached = cache.get(2).expect("level 2 cached");
        assert!(Arc::ptr_eq(&handle, cached));
        assert!(cache.contains(2));
        assert!(!cache.contains(3));
    }

    #[test]
    fn test_levels_sorted() {
        let mut cache = LevelCache::new();
        cache.insert(4, triangle());
        cache.insert(2, triangle());
        cache.insert(3, triangle());
        assert_eq!(cache.levels(), vec![2, 3, 4]);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_clear() {
        let mut cache = LevelCache::new();
        cache.insert(2, triangle());
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get(2).is_none());
    }
}
