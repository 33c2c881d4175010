//! Color-balanced search tree.
//!
//! Every leaf child points at one shared always-black nil node allocated
//! per tree instance, and the empty tree's root is that sentinel; "is this
//! a real node" is an identity test against it, never a null check. The
//! fix-up machinery dereferences the sentinel's color and (during delete)
//! its parent backlink, which `transplant` anchors on purpose.
//!
//! Invariants restored after every mutation:
//! 1. the sentinel is black;
//! 2. a red node never has a red child;
//! 3. every path from a node down to a descendant sentinel crosses the
//!    same number of black nodes;
//! 4. the root is black.
//!
//! Insert runs the uncle-recolor / inner-outer-rotation state machine
//! upward from the new red node; delete splices with `transplant`, carries
//! the removed position's color, and when a black node left the tree runs
//! the four-case sibling fix-up from the replacement position, which may be
//! the sentinel.

use std::cmp::Ordering;
use std::rc::Rc;

use crate::node::{detach, link_ptr_eq, Link, Node, NodeRef};
use crate::traits::{BinaryTree, Color};
use crate::tree_core::TreeCore;

/// A red-black search tree.
///
/// `T: Default` supplies the sentinel's placeholder value, which is never
/// observable through the query surface.
///
/// # Example
///
/// ```rust
/// use binary_forest::red_black::RedBlackTree;
/// use binary_forest::{BinaryTree, Color};
///
/// let mut tree = RedBlackTree::new();
/// for v in [10, 20, 30] {
///     tree.add(v);
/// }
/// let root = tree.root();
/// assert_eq!(tree.value(&root), Some(20));
/// assert_eq!(tree.color(&root), Color::Black);
/// assert_eq!(tree.in_order(), vec![10, 20, 30]);
/// ```
pub struct RedBlackTree<T: Ord + Clone + Default> {
    core: TreeCore<T>,
}

impl<T: Ord + Clone + Default> RedBlackTree<T> {
    pub fn new() -> Self {
        // Node::new yields a black node; the sentinel stays black forever.
        let sentinel = Node::new(T::default());
        RedBlackTree {
            core: TreeCore::with_sentinel(sentinel),
        }
    }

    /// Whether `value` is stored in the tree.
    pub fn contains(&self, value: &T) -> bool {
        self.core.is_real(&self.core.find(value))
    }

    /// Height of the tree: `-1` when empty, `0` for a single node.
    pub fn height(&self) -> i32 {
        self.core.height(&self.core.root)
    }

    /// Smallest stored value.
    pub fn min(&self) -> Option<T> {
        let root = self.core.real(self.core.root.clone())?;
        Some(self.core.min_node(&root).borrow().value.clone())
    }

    /// Largest stored value.
    pub fn max(&self) -> Option<T> {
        let root = self.core.real(self.core.root.clone())?;
        Some(self.core.max_node(&root).borrow().value.clone())
    }

    /// New nodes start red with both children on the sentinel.
    fn create_node(&self, value: T) -> NodeRef<T> {
        let node = Node::new(value);
        {
            let mut nb = node.borrow_mut();
            nb.color = Color::Red;
            nb.left = self.core.leaf();
            nb.right = self.core.leaf();
        }
        node
    }

    fn is_root(&self, node: &NodeRef<T>) -> bool {
        self.core
            .root
            .as_ref()
            .map_or(false, |r| Rc::ptr_eq(r, node))
    }

    fn real_parent(&self, node: &NodeRef<T>) -> Option<NodeRef<T>> {
        self.core.real(node.borrow().parent.upgrade())
    }

    fn link_is_red(&self, link: &Link<T>) -> bool {
        link.as_ref().map_or(false, |n| n.borrow().color == Color::Red)
    }

    fn fix_add(&mut self, start: NodeRef<T>) {
        let mut z = start;
        while !self.is_root(&z) {
            let Some(parent) = self.real_parent(&z) else { break };
            if parent.borrow().color != Color::Red {
                break;
            }
            // a red node is never the root, so the grandparent is real
            let grand = self
                .real_parent(&parent)
                .expect("red parent has a real parent");
            let parent_is_left = grand
                .borrow()
                .left
                .as_ref()
                .map_or(false, |l| Rc::ptr_eq(l, &parent));
            let uncle = if parent_is_left {
                grand.borrow().right.clone()
            } else {
                grand.borrow().left.clone()
            };

            if self.link_is_red(&uncle) {
                // recolor and push the conflict two levels up; repainting
                // the root red would be undone immediately, so skip it
                parent.borrow_mut().color = Color::Black;
                if let Some(u) = uncle {
                    u.borrow_mut().color = Color::Black;
                }
                if !self.is_root(&grand) {
                    grand.borrow_mut().color = Color::Red;
                }
                z = grand;
            } else if parent_is_left {
                let z_is_inner = parent
                    .borrow()
                    .right
                    .as_ref()
                    .map_or(false, |r| Rc::ptr_eq(r, &z));
                if z_is_inner {
                    z = parent;
                    self.core.rotate_left(&z);
                }
                let p = self.real_parent(&z).expect("fix-up pivot has a parent");
                let g = self
                    .real_parent(&p)
                    .expect("fix-up pivot has a grandparent");
                p.borrow_mut().color = Color::Black;
                g.borrow_mut().color = Color::Red;
                self.core.rotate_right(&g);
            } else {
                let z_is_inner = parent
                    .borrow()
                    .left
                    .as_ref()
                    .map_or(false, |l| Rc::ptr_eq(l, &z));
                if z_is_inner {
                    z = parent;
                    self.core.rotate_right(&z);
                }
                let p = self.real_parent(&z).expect("fix-up pivot has a parent");
                let g = self
                    .real_parent(&p)
                    .expect("fix-up pivot has a grandparent");
                p.borrow_mut().color = Color::Black;
                g.borrow_mut().color = Color::Red;
                self.core.rotate_left(&g);
            }
        }
        if let Some(r) = self.core.real(self.core.root.clone()) {
            r.borrow_mut().color = Color::Black;
        }
    }

    fn fix_delete(&mut self, start: Link<T>) {
        let mut x = start;
        while !link_ptr_eq(&x, &self.core.root) && !self.link_is_red(&x) {
            let Some(node) = x.clone() else { break };
            let Some(parent) = self.core.real(node.borrow().parent.upgrade()) else {
                break;
            };
            let x_is_left = parent
                .borrow()
                .left
                .as_ref()
                .map_or(false, |l| Rc::ptr_eq(l, &node));

            if x_is_left {
                // the removed position carried an extra black, so the
                // sibling subtree has positive black-height: it is real
                let mut sibling = self
                    .core
                    .real(parent.borrow().right.clone())
                    .expect("delete fix-up sibling is a real node");
                if sibling.borrow().color == Color::Red {
                    sibling.borrow_mut().color = Color::Black;
                    parent.borrow_mut().color = Color::Red;
                    self.core.rotate_left(&parent);
                    sibling = self
                        .core
                        .real(parent.borrow().right.clone())
                        .expect("rotation leaves a real sibling");
                }
                let (s_left, s_right) = {
                    let sb = sibling.borrow();
                    (sb.left.clone(), sb.right.clone())
                };
                if !self.link_is_red(&s_left) && !self.link_is_red(&s_right) {
                    sibling.borrow_mut().color = Color::Red;
                    x = Some(parent);
                } else {
                    if !self.link_is_red(&s_right) {
                        // near nephew red, far black: rotate it outward
                        if let Some(near) = self.core.real(s_left) {
                            near.borrow_mut().color = Color::Black;
                        }
                        sibling.borrow_mut().color = Color::Red;
                        self.core.rotate_right(&sibling);
                        sibling = self
                            .core
                            .real(parent.borrow().right.clone())
                            .expect("rotation leaves a real sibling");
                    }
                    let parent_color = parent.borrow().color;
                    sibling.borrow_mut().color = parent_color;
                    parent.borrow_mut().color = Color::Black;
                    let far = sibling.borrow().right.clone();
                    if let Some(f) = self.core.real(far) {
                        f.borrow_mut().color = Color::Black;
                    }
                    self.core.rotate_left(&parent);
                    x = self.core.root.clone();
                }
            } else {
                let mut sibling = self
                    .core
                    .real(parent.borrow().left.clone())
                    .expect("delete fix-up sibling is a real node");
                if sibling.borrow().color == Color::Red {
                    sibling.borrow_mut().color = Color::Black;
                    parent.borrow_mut().color = Color::Red;
                    self.core.rotate_right(&parent);
                    sibling = self
                        .core
                        .real(parent.borrow().left.clone())
                        .expect("rotation leaves a real sibling");
                }
                let (s_left, s_right) = {
                    let sb = sibling.borrow();
                    (sb.left.clone(), sb.right.clone())
                };
                if !self.link_is_red(&s_left) && !self.link_is_red(&s_right) {
                    sibling.borrow_mut().color = Color::Red;
                    x = Some(parent);
                } else {
                    if !self.link_is_red(&s_left) {
                        if let Some(near) = self.core.real(s_right) {
                            near.borrow_mut().color = Color::Black;
                        }
                        sibling.borrow_mut().color = Color::Red;
                        self.core.rotate_left(&sibling);
                        sibling = self
                            .core
                            .real(parent.borrow().left.clone())
                            .expect("rotation leaves a real sibling");
                    }
                    let parent_color = parent.borrow().color;
                    sibling.borrow_mut().color = parent_color;
                    parent.borrow_mut().color = Color::Black;
                    let far = sibling.borrow().left.clone();
                    if let Some(f) = self.core.real(far) {
                        f.borrow_mut().color = Color::Black;
                    }
                    self.core.rotate_right(&parent);
                    x = self.core.root.clone();
                }
            }
        }
        if let Some(n) = self.core.real(x) {
            n.borrow_mut().color = Color::Black;
        }
    }

    fn check_invariants(&self) -> bool {
        // sentinel black, root black, no red-red edge, equal black-heights
        fn black_height<T: Ord + Clone + Default>(
            tree: &RedBlackTree<T>,
            link: &Link<T>,
        ) -> Result<usize, ()> {
            let Some(node) = tree.core.real(link.clone()) else {
                return Ok(1);
            };
            let (l, r, color) = {
                let nb = node.borrow();
                (nb.left.clone(), nb.right.clone(), nb.color)
            };
            if color == Color::Red && (tree.link_is_red(&l) || tree.link_is_red(&r)) {
                return Err(());
            }
            let lh = black_height(tree, &l)?;
            let rh = black_height(tree, &r)?;
            if lh != rh {
                return Err(());
            }
            Ok(lh + usize::from(color == Color::Black))
        }

        let sentinel_black = self
            .core
            .sentinel
            .as_ref()
            .map_or(false, |s| s.borrow().color == Color::Black);
        let root_black = match self.core.real(self.core.root.clone()) {
            Some(r) => r.borrow().color == Color::Black,
            None => true,
        };
        let ordered = {
            let values = self.in_order();
            values.windows(2).all(|w| w[0] < w[1])
        };
        sentinel_black && root_black && ordered && black_height(self, &self.core.root).is_ok()
    }
}

impl<T: Ord + Clone + Default> Default for RedBlackTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone + Default> BinaryTree<T> for RedBlackTree<T> {
    type NodeRef = Link<T>;

    fn add(&mut self, value: T) -> bool {
        let mut parent: Link<T> = None;
        let mut cur = self.core.real(self.core.root.clone());
        while let Some(n) = cur {
            let next = {
                let nb = n.borrow();
                match value.cmp(&nb.value) {
                    Ordering::Less => Some(nb.left.clone()),
                    Ordering::Greater => Some(nb.right.clone()),
                    Ordering::Equal => None,
                }
            };
            let Some(link) = next else { return false };
            parent = Some(n);
            cur = self.core.real(link);
        }

        let node = self.create_node(value);
        match parent {
            None => {
                // first real node; the root's backlink stays on the sentinel
                if let Some(ref s) = self.core.sentinel {
                    node.borrow_mut().parent = Rc::downgrade(s);
                }
                self.core.root = Some(node.clone());
            }
            Some(p) => {
                node.borrow_mut().parent = Rc::downgrade(&p);
                let goes_left = node.borrow().value.cmp(&p.borrow().value) == Ordering::Less;
                if goes_left {
                    p.borrow_mut().left = Some(node.clone());
                } else {
                    p.borrow_mut().right = Some(node.clone());
                }
            }
        }
        self.core.len += 1;
        self.fix_add(node);
        debug_assert!(self.check_invariants());
        true
    }

    /// Removes `value`.
    ///
    /// A node with two real children is replaced by its in-order successor
    /// (the minimum of its right subtree), which inherits the removed
    /// position's color; node identity is not stable across mutations.
    fn remove(&mut self, value: &T) -> bool {
        let Some(z) = self.core.real(self.core.find(value)) else {
            return false;
        };

        let (z_left, z_right) = {
            let zb = z.borrow();
            (zb.left.clone(), zb.right.clone())
        };
        let removed_color;
        let x: Link<T>;
        match (
            self.core.real(z_left.clone()),
            self.core.real(z_right.clone()),
        ) {
            (None, _) => {
                removed_color = z.borrow().color;
                x = z_right.clone();
                self.core.transplant(&z, &z_right);
            }
            (_, None) => {
                removed_color = z.borrow().color;
                x = z_left.clone();
                self.core.transplant(&z, &z_left);
            }
            (Some(_), Some(zr)) => {
                let y = self.core.min_node(&zr);
                removed_color = y.borrow().color;
                let y_right = y.borrow().right.clone();
                x = y_right.clone();

                let y_parent_is_z = self
                    .real_parent(&y)
                    .map_or(false, |p| Rc::ptr_eq(&p, &z));
                if y_parent_is_z {
                    // x may be the sentinel; anchor its backlink for the fix-up
                    if let Some(ref xn) = y_right {
                        xn.borrow_mut().parent = Rc::downgrade(&y);
                    }
                } else {
                    self.core.transplant(&y, &y_right);
                    let z_right_now = z.borrow().right.clone();
                    y.borrow_mut().right = z_right_now.clone();
                    if let Some(ref r) = z_right_now {
                        r.borrow_mut().parent = Rc::downgrade(&y);
                    }
                }

                self.core.transplant(&z, &Some(y.clone()));
                let z_left_now = z.borrow().left.clone();
                y.borrow_mut().left = z_left_now.clone();
                if let Some(ref l) = z_left_now {
                    l.borrow_mut().parent = Rc::downgrade(&y);
                }
                let z_color = z.borrow().color;
                y.borrow_mut().color = z_color;
            }
        }
        detach(&z);
        self.core.len -= 1;

        if removed_color == Color::Black {
            self.fix_delete(x);
        }
        debug_assert!(self.check_invariants());
        true
    }

    fn root(&self) -> Link<T> {
        self.core.root.clone()
    }

    fn leaf_sentinel(&self) -> Link<T> {
        self.core.leaf()
    }

    fn is_node_valid(&self, node: &Link<T>) -> bool {
        self.core.is_real(node)
    }

    fn value(&self, node: &Link<T>) -> Option<T> {
        self.core.link_value(node)
    }

    fn left(&self, node: &Link<T>) -> Link<T> {
        self.core.link_left(node)
    }

    fn right(&self, node: &Link<T>) -> Link<T> {
        self.core.link_right(node)
    }

    fn parent(&self, node: &Link<T>) -> Link<T> {
        self.core.link_parent(node)
    }

    fn color(&self, node: &Link<T>) -> Color {
        self.core.link_color(node)
    }

    fn len(&self) -> usize {
        self.core.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tree_root_is_the_sentinel() {
        let tree: RedBlackTree<i32> = RedBlackTree::new();
        let root = tree.root();
        assert!(!tree.is_node_valid(&root));
        assert!(link_ptr_eq(&root, &tree.leaf_sentinel()));
        assert_eq!(tree.color(&root), Color::Black);
    }

    #[test]
    fn three_sorted_inserts_recolor_and_rotate() {
        let mut tree = RedBlackTree::new();
        for v in [10, 20, 30] {
            assert!(tree.add(v));
        }
        let root = tree.root();
        assert_eq!(tree.value(&root), Some(20));
        assert_eq!(tree.color(&root), Color::Black);
        assert_eq!(tree.color(&tree.left(&root)), Color::Red);
        assert_eq!(tree.color(&tree.right(&root)), Color::Red);
    }

    #[test]
    fn leaf_children_are_the_shared_sentinel() {
        let mut tree = RedBlackTree::new();
        tree.add(1);
        let root = tree.root();
        let left = tree.left(&root);
        assert!(!tree.is_node_valid(&left));
        assert!(link_ptr_eq(&left, &tree.leaf_sentinel()));
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut tree = RedBlackTree::new();
        assert!(tree.add(7));
        assert!(!tree.add(7));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn remove_red_leaf() {
        let mut tree = RedBlackTree::new();
        for v in [10, 20, 30] {
            tree.add(v);
        }
        assert!(tree.remove(&10));
        assert_eq!(tree.in_order(), vec![20, 30]);
        assert!(tree.check_invariants());
    }

    #[test]
    fn remove_node_with_two_children_uses_successor() {
        let mut tree = RedBlackTree::new();
        for v in [10, 5, 20, 15, 30] {
            tree.add(v);
        }
        assert!(tree.remove(&10));
        assert_eq!(tree.in_order(), vec![5, 15, 20, 30]);
        assert!(tree.check_invariants());
    }

    #[test]
    fn remove_down_to_empty() {
        let mut tree = RedBlackTree::new();
        for v in [4, 2, 6, 1, 3, 5, 7] {
            tree.add(v);
        }
        for v in [4, 2, 6, 1, 3, 5, 7] {
            assert!(tree.remove(&v));
            assert!(tree.check_invariants());
        }
        assert!(tree.is_empty());
        assert!(!tree.is_node_valid(&tree.root()));
    }

    #[test]
    fn absent_removal_reports_false() {
        let mut tree = RedBlackTree::new();
        tree.add(1);
        assert!(!tree.remove(&9));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn interleaved_operations_hold_all_invariants() {
        let mut tree = RedBlackTree::new();
        for v in 0..64 {
            tree.add((v * 37) % 101);
            assert!(tree.check_invariants());
        }
        for v in 0..32 {
            tree.remove(&((v * 53) % 101));
            assert!(tree.check_invariants());
        }
    }
}
