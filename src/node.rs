//! Node storage for the pointer-based tree variants.
//!
//! Nodes are owned through `Rc<RefCell<..>>` links held by their parent's
//! child slot (or the tree's root slot); the parent backlink is a `Weak`
//! reference so that dropping the owning link releases the whole subtree.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::traits::Color;

/// Strong, owning reference to a node.
pub type NodeRef<T> = Rc<RefCell<Node<T>>>;
/// Non-owning backlink used for parent pointers.
pub type WeakNodeRef<T> = Weak<RefCell<Node<T>>>;
/// A child slot: absent, a real node, or (red-black only) the tree's sentinel.
pub type Link<T> = Option<NodeRef<T>>;

/// A single tree element.
///
/// The `color` field is meaningful only inside a red-black tree; the other
/// variants leave it at its default.
pub struct Node<T> {
    pub(crate) value: T,
    pub(crate) parent: WeakNodeRef<T>,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
    pub(crate) color: Color,
}

impl<T> Node<T> {
    /// Allocates a detached black node holding `value`.
    pub(crate) fn new(value: T) -> NodeRef<T> {
        Rc::new(RefCell::new(Node {
            value,
            parent: Weak::new(),
            left: None,
            right: None,
            color: Color::Black,
        }))
    }
}

/// Identity comparison over links.
pub(crate) fn link_ptr_eq<T>(a: &Link<T>, b: &Link<T>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// Wires `child` into `parent`'s left slot, fixing the backlink.
pub(crate) fn set_left<T>(parent: &NodeRef<T>, child: Link<T>) {
    if let Some(ref c) = child {
        c.borrow_mut().parent = Rc::downgrade(parent);
    }
    parent.borrow_mut().left = child;
}

/// Wires `child` into `parent`'s right slot, fixing the backlink.
pub(crate) fn set_right<T>(parent: &NodeRef<T>, child: Link<T>) {
    if let Some(ref c) = child {
        c.borrow_mut().parent = Rc::downgrade(parent);
    }
    parent.borrow_mut().right = child;
}

/// Clears every link of a node that has been unlinked from its tree, so the
/// removed node is unreachable through any backlink and owns nothing.
pub(crate) fn detach<T>(node: &NodeRef<T>) {
    let mut n = node.borrow_mut();
    n.parent = Weak::new();
    n.left = None;
    n.right = None;
}
