//! Containment tree over catalog entry coverages.
//!
//! Nodes live in an arena; node 0 is a world root without an entry. Entries
//! are inserted largest area first, each under the deepest node whose
//! region contains it, taking the first containing child at every level.
//! Every non-root node's region is therefore contained in its parent's.

use crate::catalog::CatalogEntry;
use crate::geometry::BoundingBox;
use rustc_hash::FxHashSet;

#[derive(Debug, Clone)]
pub struct TileNode {
    pub region: BoundingBox,
    /// Index into [`TileTree::entries`]; `None` only for the root.
    pub entry: Option<usize>,
    pub children: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct TileTree {
    nodes: Vec<TileNode>,
    entries: Vec<CatalogEntry>,
}

impl Default for TileTree {
    fn default() -> Self {
        Self {
            nodes: vec![TileNode {
                region: BoundingBox::WORLD,
                entry: None,
                children: Vec::new(),
            }],
            entries: Vec::new(),
        }
    }
}

impl TileTree {
    pub const ROOT: usize = 0;

    /// Build from catalog entries. Entries without coverage, with inverted
    /// bounds, or whose coverage is not inside the world box, are left out.
    pub fn build(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut tree = Self::default();
        let mut entries: Vec<(BoundingBox, CatalogEntry)> = entries
            .into_iter()
            .filter_map(|e| Some((e.bbox?, e)))
            .collect();
        entries.sort_by(|(a, _), (b, _)| b.area().total_cmp(&a.area()));
        for (region, entry) in entries {
            tree.insert(region, entry);
        }
        tree
    }

    fn insert(&mut self, region: BoundingBox, entry: CatalogEntry) {
        if region.south > region.north || region.west > region.east {
            tracing::debug!(
                id = entry.id,
                file = %entry.file,
                west = region.west,
                east = region.east,
                "inverted coverage (antimeridian crossing or swapped bounds), ignored"
            );
            return;
        }
        if !self.nodes[Self::ROOT].region.contains(&region) {
            tracing::debug!(id = entry.id, file = %entry.file, "coverage outside world bounds, ignored");
            return;
        }
        let mut parent = Self::ROOT;
        while let Some(child) = self.first_containing_child(parent, &region) {
            parent = child;
        }
        let entry_index = self.entries.len();
        self.entries.push(entry);
        let node_index = self.nodes.len();
        self.nodes.push(TileNode {
            region,
            entry: Some(entry_index),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(node_index);
    }

    fn first_containing_child(&self, node: usize, region: &BoundingBox) -> Option<usize> {
        self.nodes[node]
            .children
            .iter()
            .copied()
            .find(|&c| self.nodes[c].region.contains(region))
    }

    pub fn root(&self) -> &TileNode {
        &self.nodes[Self::ROOT]
    }

    pub fn node(&self, index: usize) -> Option<&TileNode> {
        self.nodes.get(index)
    }

    pub fn nodes(&self) -> &[TileNode] {
        &self.nodes
    }

    /// Indexed entries, in insertion order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Number of indexed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deepest node whose region contains `region`, descending through the
    /// first containing child. `None` when even the root does not.
    pub fn deepest_containing(&self, region: &BoundingBox) -> Option<usize> {
        if !self.root().region.contains(region) {
            return None;
        }
        let mut node = Self::ROOT;
        while let Some(child) = self.first_containing_child(node, region) {
            node = child;
        }
        Some(node)
    }

    /// Cells needed to display `region`: the entry of the deepest node
    /// containing it, then the entries of that node's direct children.
    pub fn select_covering_set(&self, region: &BoundingBox) -> Vec<&CatalogEntry> {
        let Some(node) = self.deepest_containing(region) else {
            return Vec::new();
        };
        let node = &self.nodes[node];
        node.entry
            .into_iter()
            .chain(node.children.iter().filter_map(|&c| self.nodes[c].entry))
            .map(|i| &self.entries[i])
            .collect()
    }

    /// Height of the tree below the root.
    pub fn depth(&self) -> usize {
        fn depth_of(tree: &TileTree, node: usize) -> usize {
            tree.nodes[node]
                .children
                .iter()
                .map(|&c| 1 + depth_of(tree, c))
                .max()
                .unwrap_or(0)
        }
        depth_of(self, Self::ROOT)
    }
}

/// Whether two covering sets differ, compared by entry id.
pub fn covering_set_changed(previous: &[u32], next: &[u32]) -> bool {
    let previous: FxHashSet<u32> = previous.iter().copied().collect();
    let next: FxHashSet<u32> = next.iter().copied().collect();
    previous.symmetric_difference(&next).next().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Implementation;

    fn entry(id: u32, bbox: Option<BoundingBox>) -> CatalogEntry {
        CatalogEntry {
            id,
            file: format!("CELL{id}.000"),
            long_file: String::new(),
            volume: String::new(),
            implementation: Implementation::Binary,
            bbox,
            checksum: String::new(),
            comment: String::new(),
        }
    }

    fn sample() -> TileTree {
        TileTree::build(vec![
            entry(3, Some(BoundingBox::new(40.0, 41.0, 1.0, 2.0))),
            entry(1, Some(BoundingBox::new(30.0, 50.0, -10.0, 10.0))),
            entry(4, Some(BoundingBox::new(42.0, 43.0, 1.0, 2.0))),
            entry(2, Some(BoundingBox::new(35.0, 45.0, 0.0, 5.0))),
            entry(5, Some(BoundingBox::new(40.2, 40.4, 1.2, 1.4))),
            entry(6, None),
            entry(7, Some(BoundingBox::new(80.0, 95.0, 0.0, 1.0))),
        ])
    }

    #[test]
    fn test_children_inside_parents() {
        let tree = sample();
        assert_eq!(tree.len(), 5);
        for node in tree.nodes() {
            for &child in &node.children {
                assert!(node.region.contains(&tree.nodes()[child].region));
            }
        }
        assert_eq!(tree.depth(), 4);
        assert!(tree.root().entry.is_none());
    }

    #[test]
    fn test_covering_set() {
        let tree = sample();
        let ids = |region| -> Vec<u32> {
            tree.select_covering_set(&region).iter().map(|e| e.id).collect()
        };
        // Inside cell 2: cell 2 and its children 3 and 4.
        assert_eq!(ids(BoundingBox::new(39.0, 44.0, 0.5, 3.0)), vec![2, 3, 4]);
        // Inside the leaf 5: only 5.
        assert_eq!(ids(BoundingBox::new(40.25, 40.3, 1.25, 1.3)), vec![5]);
        // Outside every cell: the root's children.
        assert_eq!(ids(BoundingBox::new(-10.0, -5.0, 100.0, 110.0)), vec![1]);
        // Beyond the world.
        assert!(ids(BoundingBox::new(0.0, 1.0, 170.0, 190.0)).is_empty());
    }

    #[test]
    fn test_first_containing_child_wins() {
        let a = BoundingBox::new(0.0, 10.0, 0.0, 10.0);
        let b = BoundingBox::new(0.0, 10.0, 0.0, 10.0);
        let tree = TileTree::build(vec![
            entry(1, Some(a)),
            entry(2, Some(b)),
            entry(3, Some(BoundingBox::new(1.0, 2.0, 1.0, 2.0))),
        ]);
        // Equal areas keep input order; the second nests in the first.
        assert_eq!(tree.root().children.len(), 1);
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn test_overlapping_siblings_in_any_order() {
        let a = entry(1, Some(BoundingBox::new(0.0, 10.0, 0.0, 10.0)));
        let b = entry(2, Some(BoundingBox::new(5.0, 15.0, 5.0, 15.0)));
        let c = entry(3, Some(BoundingBox::new(6.0, 9.0, 6.0, 9.0)));
        let orders = [
            [&a, &b, &c],
            [&a, &c, &b],
            [&b, &a, &c],
            [&b, &c, &a],
            [&c, &a, &b],
            [&c, &b, &a],
        ];
        for order in orders {
            let tree = TileTree::build(order.iter().map(|e| (*e).clone()));
            assert_eq!(tree.len(), 3);
            for node in tree.nodes() {
                for &child in &node.children {
                    assert!(node.region.contains(&tree.nodes()[child].region));
                }
            }
            assert_eq!(tree.root().children.len(), 2);
            assert_eq!(tree.depth(), 2);

            let mut spanning: Vec<u32> = tree
                .select_covering_set(&BoundingBox::new(4.0, 12.0, 4.0, 12.0))
                .iter()
                .map(|e| e.id)
                .collect();
            spanning.sort_unstable();
            assert_eq!(spanning, vec![1, 2]);

            let inner: Vec<u32> = tree
                .select_covering_set(&BoundingBox::new(7.0, 8.0, 7.0, 8.0))
                .iter()
                .map(|e| e.id)
                .collect();
            assert_eq!(inner, vec![3]);
        }
    }

    #[test]
    fn test_inverted_coverage_ignored() {
        let tree = TileTree::build(vec![
            entry(1, Some(BoundingBox::new(-20.0, 20.0, 170.0, -170.0))),
            entry(2, Some(BoundingBox::new(10.0, 5.0, 0.0, 1.0))),
            entry(3, Some(BoundingBox::new(0.0, 1.0, 0.0, 1.0))),
        ]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.entries()[0].id, 3);
    }

    #[test]
    fn test_change_detection() {
        assert!(!covering_set_changed(&[1, 2, 3], &[3, 2, 1]));
        assert!(covering_set_changed(&[1, 2], &[1, 2, 3]));
        assert!(covering_set_changed(&[1], &[]));
        assert!(!covering_set_changed(&[], &[]));
    }
}
