//! Demonstration seeding and descriptive statistics.
//!
//! Both helpers work against the [`BinaryTree`] query surface only, so one
//! definition serves every variant, heap included.

use rand::Rng;

use crate::traits::BinaryTree;

/// Inserts a bounded random count of bounded random values, for seeding a
/// demonstration tree. Returns how many values actually landed, since the
/// search-tree variants reject duplicates.
pub fn random_fill<B: BinaryTree<i32>>(tree: &mut B) -> usize {
    let mut rng = rand::thread_rng();
    let count = rng.gen_range(8..=24);
    let mut added = 0;
    for _ in 0..count {
        if tree.add(rng.gen_range(0..100)) {
            added += 1;
        }
    }
    added
}

/// Aggregate descriptive statistics over a tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeProperties {
    /// Longest root-to-node path; `-1` for an empty tree.
    pub height: i32,
    pub node_count: usize,
    pub min: Option<i32>,
    pub max: Option<i32>,
    /// Sum of the values stored in leaf nodes.
    pub leaf_sum: i64,
    /// Node count relative to a perfect tree of the same height.
    pub fullness: f64,
}

/// Computes [`TreeProperties`] purely from the query surface.
pub fn build_properties<B: BinaryTree<i32>>(tree: &B) -> TreeProperties {
    fn walk<B: BinaryTree<i32>>(tree: &B, node: &B::NodeRef, depth: i32, props: &mut TreeProperties) {
        if !tree.is_node_valid(node) {
            return;
        }
        let Some(value) = tree.value(node) else { return };
        props.node_count += 1;
        props.height = props.height.max(depth);
        props.min = Some(props.min.map_or(value, |m| m.min(value)));
        props.max = Some(props.max.map_or(value, |m| m.max(value)));

        let left = tree.left(node);
        let right = tree.right(node);
        if !tree.is_node_valid(&left) && !tree.is_node_valid(&right) {
            props.leaf_sum += i64::from(value);
        }
        walk(tree, &left, depth + 1, props);
        walk(tree, &right, depth + 1, props);
    }

    let mut props = TreeProperties {
        height: -1,
        node_count: 0,
        min: None,
        max: None,
        leaf_sum: 0,
        fullness: 0.0,
    };
    walk(tree, &tree.root(), 0, &mut props);
    if props.height >= 0 {
        let capacity = (1u64 << (props.height as u32 + 1)) - 1;
        props.fullness = props.node_count as f64 / capacity as f64;
    }
    props
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array_heap::ArrayHeap;
    use crate::avl::AvlTree;
    use crate::search_tree::BinarySearchTree;

    #[test]
    fn properties_of_a_small_tree() {
        let mut tree = BinarySearchTree::new();
        for v in [10, 5, 15, 3, 7] {
            tree.add(v);
        }
        let props = build_properties(&tree);
        assert_eq!(props.height, 2);
        assert_eq!(props.node_count, 5);
        assert_eq!(props.min, Some(3));
        assert_eq!(props.max, Some(15));
        // leaves are 3, 7, 15
        assert_eq!(props.leaf_sum, 25);
        assert!((props.fullness - 5.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn properties_of_an_empty_tree() {
        let tree: BinarySearchTree<i32> = BinarySearchTree::new();
        let props = build_properties(&tree);
        assert_eq!(props.height, -1);
        assert_eq!(props.node_count, 0);
        assert_eq!(props.min, None);
        assert_eq!(props.max, None);
        assert_eq!(props.leaf_sum, 0);
        assert_eq!(props.fullness, 0.0);
    }

    #[test]
    fn properties_apply_to_the_heap_too() {
        let mut heap = ArrayHeap::new();
        for v in [5, 3, 8, 1] {
            heap.add(v);
        }
        let props = build_properties(&heap);
        assert_eq!(props.node_count, 4);
        assert_eq!(props.min, Some(1));
        assert_eq!(props.max, Some(8));
        assert_eq!(props.height, 2);
    }

    #[test]
    fn random_fill_lands_values() {
        let mut tree = AvlTree::new();
        let added = random_fill(&mut tree);
        assert_eq!(tree.len(), added);
        assert!(added > 0);
        let values = tree.in_order();
        assert!(values.iter().all(|v| (0..100).contains(v)));
    }
}
