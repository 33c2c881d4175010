//! Shared engine for the pointer-based tree variants.
//!
//! [`TreeCore`] owns the root slot and (for the red-black variant) the
//! per-tree sentinel, and provides the structural utilities every variant
//! builds on: ordered search, min/max descent, the two rotation primitives,
//! `transplant`, and the height/balance-factor helpers.
//!
//! A link is "real" when it is present and not the sentinel; all descent
//! logic filters through [`TreeCore::real`] so the same code serves trees
//! that terminate in `None` and trees that terminate in the nil node.

use std::cmp::Ordering;
use std::rc::Rc;

use crate::node::{Link, NodeRef};
use crate::traits::Color;

pub(crate) struct TreeCore<T> {
    pub(crate) root: Link<T>,
    pub(crate) sentinel: Link<T>,
    pub(crate) len: usize,
}

impl<T> TreeCore<T> {
    /// Core for a variant whose leaves are absent links.
    pub(crate) fn new() -> Self {
        TreeCore {
            root: None,
            sentinel: None,
            len: 0,
        }
    }

    /// Core for a variant whose leaves all point at one shared nil node.
    /// The empty tree's root is the sentinel itself.
    pub(crate) fn with_sentinel(sentinel: NodeRef<T>) -> Self {
        TreeCore {
            root: Some(sentinel.clone()),
            sentinel: Some(sentinel),
            len: 0,
        }
    }

    /// The uniform "no node here" link: the sentinel if this tree has one,
    /// otherwise the absent link.
    pub(crate) fn leaf(&self) -> Link<T> {
        self.sentinel.clone()
    }

    /// Filters the sentinel out of a link, leaving only real nodes.
    pub(crate) fn real(&self, link: Link<T>) -> Option<NodeRef<T>> {
        link.filter(|n| match &self.sentinel {
            Some(s) => !Rc::ptr_eq(n, s),
            None => true,
        })
    }

    pub(crate) fn is_real(&self, link: &Link<T>) -> bool {
        self.real(link.clone()).is_some()
    }

    /// Ordered descent; returns the node holding `value`, or the leaf link.
    pub(crate) fn find(&self, value: &T) -> Link<T>
    where
        T: Ord,
    {
        let mut cur = self.real(self.root.clone());
        while let Some(n) = cur {
            let next = {
                let nb = n.borrow();
                match value.cmp(&nb.value) {
                    Ordering::Less => Some(nb.left.clone()),
                    Ordering::Greater => Some(nb.right.clone()),
                    Ordering::Equal => None,
                }
            };
            match next {
                None => return Some(n),
                Some(link) => cur = self.real(link),
            }
        }
        self.leaf()
    }

    /// Leftmost real node of the subtree rooted at `from`.
    pub(crate) fn min_node(&self, from: &NodeRef<T>) -> NodeRef<T> {
        let mut cur = from.clone();
        loop {
            let next = self.real(cur.borrow().left.clone());
            match next {
                Some(n) => cur = n,
                None => return cur,
            }
        }
    }

    /// Rightmost real node of the subtree rooted at `from`.
    pub(crate) fn max_node(&self, from: &NodeRef<T>) -> NodeRef<T> {
        let mut cur = from.clone();
        loop {
            let next = self.real(cur.borrow().right.clone());
            match next {
                Some(n) => cur = n,
                None => return cur,
            }
        }
    }

    /// `-1` for an absent/sentinel link, else `1 + max(child heights)`.
    pub(crate) fn height(&self, link: &Link<T>) -> i32 {
        match self.real(link.clone()) {
            None => -1,
            Some(n) => {
                let (l, r) = {
                    let nb = n.borrow();
                    (nb.left.clone(), nb.right.clone())
                };
                1 + self.height(&l).max(self.height(&r))
            }
        }
    }

    pub(crate) fn balance_factor(&self, node: &NodeRef<T>) -> i32 {
        let (l, r) = {
            let nb = node.borrow();
            (nb.left.clone(), nb.right.clone())
        };
        self.height(&l) - self.height(&r)
    }

    /// Left rotation at `x`: `x`'s right child becomes the subtree root,
    /// `x` becomes its left child, and the middle subtree moves under `x`.
    /// Updates every affected parent backlink; updates the tree root when
    /// `x` was the root.
    pub(crate) fn rotate_left(&mut self, x: &NodeRef<T>) {
        let y = self
            .real(x.borrow().right.clone())
            .expect("rotate_left pivot has a real right child");

        let y_left = y.borrow_mut().left.take();
        if let Some(yl) = self.real(y_left.clone()) {
            yl.borrow_mut().parent = Rc::downgrade(x);
        }
        x.borrow_mut().right = y_left;

        self.replace_under_parent(x, &y);

        y.borrow_mut().left = Some(x.clone());
        x.borrow_mut().parent = Rc::downgrade(&y);
    }

    /// Mirror image of [`TreeCore::rotate_left`].
    pub(crate) fn rotate_right(&mut self, x: &NodeRef<T>) {
        let y = self
            .real(x.borrow().left.clone())
            .expect("rotate_right pivot has a real left child");

        let y_right = y.borrow_mut().right.take();
        if let Some(yr) = self.real(y_right.clone()) {
            yr.borrow_mut().parent = Rc::downgrade(x);
        }
        x.borrow_mut().left = y_right;

        self.replace_under_parent(x, &y);

        y.borrow_mut().right = Some(x.clone());
        x.borrow_mut().parent = Rc::downgrade(&y);
    }

    /// Moves `y` into `x`'s slot under `x`'s parent (or the root slot),
    /// carrying over the parent backlink.
    fn replace_under_parent(&mut self, x: &NodeRef<T>, y: &NodeRef<T>) {
        let parent_weak = x.borrow().parent.clone();
        y.borrow_mut().parent = parent_weak.clone();
        match self.real(parent_weak.upgrade()) {
            None => self.root = Some(y.clone()),
            Some(p) => {
                let x_is_left = p
                    .borrow()
                    .left
                    .as_ref()
                    .map_or(false, |l| Rc::ptr_eq(l, x));
                if x_is_left {
                    p.borrow_mut().left = Some(y.clone());
                } else {
                    p.borrow_mut().right = Some(y.clone());
                }
            }
        }
    }

    /// Relinks `v` into `u`'s parent slot (or the root slot). `v`'s parent
    /// backlink is set even when `v` is the sentinel; the delete fix-up
    /// depends on that anchor.
    pub(crate) fn transplant(&mut self, u: &NodeRef<T>, v: &Link<T>) {
        let parent_weak = u.borrow().parent.clone();
        match self.real(parent_weak.upgrade()) {
            None => self.root = v.clone(),
            Some(p) => {
                let u_is_left = p
                    .borrow()
                    .left
                    .as_ref()
                    .map_or(false, |l| Rc::ptr_eq(l, u));
                if u_is_left {
                    p.borrow_mut().left = v.clone();
                } else {
                    p.borrow_mut().right = v.clone();
                }
            }
        }
        if let Some(ref vn) = v {
            vn.borrow_mut().parent = parent_weak;
        }
    }

    // Accessor plumbing shared by the pointer-tree `BinaryTree` impls.

    pub(crate) fn link_value(&self, link: &Link<T>) -> Option<T>
    where
        T: Clone,
    {
        self.real(link.clone()).map(|n| n.borrow().value.clone())
    }

    pub(crate) fn link_left(&self, link: &Link<T>) -> Link<T> {
        match self.real(link.clone()) {
            Some(n) => n.borrow().left.clone(),
            None => self.leaf(),
        }
    }

    pub(crate) fn link_right(&self, link: &Link<T>) -> Link<T> {
        match self.real(link.clone()) {
            Some(n) => n.borrow().right.clone(),
            None => self.leaf(),
        }
    }

    pub(crate) fn link_parent(&self, link: &Link<T>) -> Link<T> {
        match self.real(link.clone()) {
            Some(n) => n.borrow().parent.upgrade().or_else(|| self.leaf()),
            None => self.leaf(),
        }
    }

    pub(crate) fn link_color(&self, link: &Link<T>) -> Color {
        link.as_ref().map_or(Color::Black, |n| n.borrow().color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{set_left, set_right, Node};

    // Builds 10 -> (5, 15) with parent links wired.
    fn small_tree() -> (TreeCore<i32>, NodeRef<i32>, NodeRef<i32>, NodeRef<i32>) {
        let root = Node::new(10);
        let l = Node::new(5);
        let r = Node::new(15);
        set_left(&root, Some(l.clone()));
        set_right(&root, Some(r.clone()));
        let mut core = TreeCore::new();
        core.root = Some(root.clone());
        core.len = 3;
        (core, root, l, r)
    }

    #[test]
    fn rotate_left_promotes_right_child() {
        let (mut core, root, l, r) = small_tree();
        core.rotate_left(&root);

        let new_root = core.root.clone().unwrap();
        assert!(Rc::ptr_eq(&new_root, &r));
        assert!(new_root.borrow().parent.upgrade().is_none());

        let left = new_root.borrow().left.clone().unwrap();
        assert!(Rc::ptr_eq(&left, &root));
        let up = left.borrow().parent.upgrade().unwrap();
        assert!(Rc::ptr_eq(&up, &new_root));

        // the old left child stays under the demoted node
        let ll = left.borrow().left.clone().unwrap();
        assert!(Rc::ptr_eq(&ll, &l));
    }

    #[test]
    fn rotate_right_reattaches_middle_subtree() {
        let (mut core, root, l, _r) = small_tree();
        let middle = Node::new(7);
        set_right(&l, Some(middle.clone()));

        core.rotate_right(&root);

        let new_root = core.root.clone().unwrap();
        assert!(Rc::ptr_eq(&new_root, &l));

        // the middle subtree becomes the demoted node's left child
        let demoted = new_root.borrow().right.clone().unwrap();
        assert!(Rc::ptr_eq(&demoted, &root));
        let mid = demoted.borrow().left.clone().unwrap();
        assert!(Rc::ptr_eq(&mid, &middle));
        let up = mid.borrow().parent.upgrade().unwrap();
        assert!(Rc::ptr_eq(&up, &demoted));
    }

    #[test]
    fn height_and_balance_factor() {
        let (core, root, _l, _r) = small_tree();
        assert_eq!(core.height(&core.root), 1);
        assert_eq!(core.balance_factor(&root), 0);
        assert_eq!(core.height(&None), -1);
    }

    #[test]
    fn find_descends_by_order() {
        let (core, _root, l, r) = small_tree();
        assert!(Rc::ptr_eq(&core.find(&5).unwrap(), &l));
        assert!(Rc::ptr_eq(&core.find(&15).unwrap(), &r));
        assert!(core.find(&42).is_none());
    }
}
