//! An ordered map backed by an unbalanced binary search tree.
//!
//! Nodes are kept in an arena and refer to their parent and children by index, so the parent
//! back-links used to splice nodes out on removal are plain indices rather than pointers.
//!
//! The tree is never rebalanced. Lookups, insertions and removals take _O(depth)_ time, which is
//! _O(n)_ in the worst case (e.g. keys inserted in sorted order). Every descent is a loop, so
//! degenerate trees cost time but never stack.

// Terminology used in comments:
// - The successor of a node `x` is the least node in `x`'s right subtree.
// - To splice out a node `x` with at most one child `c` is to make `c` take `x`'s place under
//   `x`'s parent (or as the root), leaving `x` unlinked.
//
// The invariants maintained by every operation are:
// 1. For every node `x`, all keys in `x`'s left subtree are less than `x`'s key, and all keys in
//    its right subtree are greater.
// 2. Each child's parent link names the node it hangs from. The root's parent link is empty.
// 3. Every live arena slot is reachable from the root.

use core::{borrow::Borrow, cmp::Ordering, mem};

use tracing::trace;

mod arena;
mod debug;
mod entry;
mod error;
mod iter;
mod map;

#[cfg(any(test, feature = "model"))]
pub mod model;

#[cfg(test)]
mod tests;

use crate::arena::{Arena, NodeId};

pub use crate::{
    entry::{Entry, OccupiedEntry, VacantEntry},
    error::{Error, Result},
    iter::{Iter, Keys, Values},
};

/// An ordered map based on an unbalanced binary search tree.
pub struct OrderedMap<K, V> {
    nodes: Arena<Node<K, V>>,
    root: Link,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Dir {
    Left = 0,
    Right = 1,
}

struct Node<K, V> {
    links: Links,
    key: K,
    value: V,
}

#[derive(Copy, Clone, Debug, Default)]
struct Links {
    parent: Link,
    children: [Link; 2],
}

type Link = Option<NodeId>;

// Where a key that is not in the tree would be attached.
#[derive(Copy, Clone, Debug)]
enum InsertAs {
    Root,
    Child { parent: NodeId, dir: Dir },
}

enum Search {
    Found(NodeId),
    Vacant(InsertAs),
}

impl<K, V> OrderedMap<K, V> {
    /// Returns a new empty map.
    pub const fn new() -> OrderedMap<K, V> {
        OrderedMap {
            nodes: Arena::new(),
            root: None,
        }
    }

    /// Returns `true` if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        let empty = self.len() == 0;
        debug_assert_eq!(empty, self.root.is_none());
        empty
    }

    /// Returns the number of elements in the map.
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Clears the map, removing all elements.
    pub fn clear(&mut self) {
        trace!(len = self.len(), "clear");
        self.nodes.clear();
        self.root = None;
    }

    #[inline]
    fn links(&self, node: NodeId) -> &Links {
        &self.nodes[node].links
    }

    #[inline]
    fn links_mut(&mut self, node: NodeId) -> &mut Links {
        &mut self.nodes[node].links
    }

    // Returns the minimum node in the subtree rooted at `root`.
    #[inline]
    fn min_in_subtree(&self, root: NodeId) -> NodeId {
        let mut cur = root;

        while let Some(left) = self.links(cur).left() {
            cur = left;
        }

        cur
    }

    // Returns the maximum node in the subtree rooted at `root`.
    #[inline]
    fn max_in_subtree(&self, root: NodeId) -> NodeId {
        let mut cur = root;

        while let Some(right) = self.links(cur).right() {
            cur = right;
        }

        cur
    }

    fn which_child(&self, parent: NodeId, child: NodeId) -> Dir {
        if self.links(parent).left() == Some(child) {
            Dir::Left
        } else {
            debug_assert_eq!(self.links(parent).right(), Some(child));
            Dir::Right
        }
    }

    fn maybe_set_parent(&mut self, opt_node: Link, parent: Link) {
        let Some(node) = opt_node else {
            return;
        };

        self.links_mut(node).set_parent(parent);
    }

    // Replaces the child link of `parent` naming `old_child` with `new_child`. If `parent` is
    // `None`, `old_child` is the root and the root is replaced instead.
    //
    // `new_child`'s parent link is not updated.
    #[inline]
    fn replace_child_or_set_root(&mut self, parent: Link, old_child: NodeId, new_child: Link) {
        match parent {
            Some(parent) => {
                let dir = self.which_child(parent, old_child);
                self.links_mut(parent).set_child(dir, new_child);
            }
            None => {
                debug_assert_eq!(self.root, Some(old_child));
                self.root = new_child;
            }
        }
    }

    // Unlinks `node`, which must have at most one child, moving that child (if any) into its place.
    fn splice_out(&mut self, node: NodeId) {
        let links = *self.links(node);
        debug_assert!(links.left().is_none() || links.right().is_none());

        let child = links.left().or(links.right());
        self.replace_child_or_set_root(links.parent(), node, child);
        self.maybe_set_parent(child, links.parent());
    }

    // Stores `key` and `value` as the root of an empty tree.
    fn insert_as_root(&mut self, key: K, value: V) -> NodeId {
        debug_assert!(self.root.is_none());

        let node = self.nodes.alloc(Node {
            links: Links::new(),
            key,
            value,
        });
        self.root = Some(node);
        trace!(%node, "insert: new root");
        node
    }

    // Attaches a new leaf in the empty `dir` slot of `parent`.
    fn insert_as_child(&mut self, parent: NodeId, dir: Dir, key: K, value: V) -> NodeId {
        debug_assert!(self.links(parent).child(dir).is_none());

        let mut links = Links::new();
        links.set_parent(Some(parent));

        let node = self.nodes.alloc(Node { links, key, value });
        self.links_mut(parent).set_child(dir, Some(node));
        trace!(%node, %parent, ?dir, "insert: attached leaf");
        node
    }

    fn insert_at(&mut self, at: InsertAs, key: K, value: V) -> NodeId {
        match at {
            InsertAs::Root => self.insert_as_root(key, value),
            InsertAs::Child { parent, dir } => self.insert_as_child(parent, dir, key, value),
        }
    }

    /// Removes the node `node` from the tree, returning its key and value.
    fn remove_at(&mut self, node: NodeId) -> (K, V) {
        // There are three possible cases:
        //
        // 1. `node` is a leaf. It is detached from its parent, or the tree becomes empty.
        //
        // 2. `node` has one child. The child is spliced into `node`'s place.
        //
        // 3. `node` has two children. `node` and its successor exchange keys and values, and the
        //    successor's node is spliced out instead. The successor has no left child, so this is
        //    case 1 or 2 at the successor's position. The freed node then holds the pair that was
        //    stored under the removed key.
        let links = *self.links(node);

        let unlinked = match (links.left(), links.right()) {
            (Some(_), Some(right)) => {
                let successor = self.min_in_subtree(right);
                trace!(%node, %successor, "remove: two children");

                let (target, succ) = self.nodes.pair_mut(node, successor);
                mem::swap(&mut target.key, &mut succ.key);
                mem::swap(&mut target.value, &mut succ.value);

                self.splice_out(successor);
                successor
            }

            (Some(_), None) | (None, Some(_)) => {
                trace!(%node, "remove: one child");
                self.splice_out(node);
                node
            }

            (None, None) => {
                trace!(%node, "remove: leaf");
                self.splice_out(node);
                node
            }
        };

        let Node { key, value, .. } = self.nodes.free(unlinked);
        (key, value)
    }

    #[doc(hidden)]
    pub fn assert_invariants(&self)
    where
        K: Ord,
    {
        let Some(root) = self.root else {
            assert_eq!(self.len(), 0, "empty tree must have no live nodes");
            return;
        };

        assert_eq!(self.links(root).parent(), None, "root must not have a parent");

        // Each entry carries the exclusive key bounds inherited from its ancestors.
        let mut stack: Vec<(NodeId, Option<&K>, Option<&K>)> = vec![(root, None, None)];
        let mut visited = 0;

        while let Some((node, lower, upper)) = stack.pop() {
            visited += 1;
            let key = &self.nodes[node].key;

            if let Some(lower) = lower {
                assert!(lower < key, "node {node:?} is not greater than an ancestor");
            }

            if let Some(upper) = upper {
                assert!(key < upper, "node {node:?} is not less than an ancestor");
            }

            for dir in [Dir::Left, Dir::Right] {
                if let Some(child) = self.links(node).child(dir) {
                    // Ensure child's parent link points to this node.
                    let parent = self
                        .links(child)
                        .parent()
                        .expect("child parent link not set");
                    assert_eq!(node, parent);

                    match dir {
                        Dir::Left => stack.push((child, lower, Some(key))),
                        Dir::Right => stack.push((child, Some(key), upper)),
                    }
                }
            }
        }

        assert_eq!(visited, self.len(), "arena holds unreachable nodes");
    }
}

impl<K: Ord, V> OrderedMap<K, V> {
    fn search<Q>(&self, key: &Q) -> Search
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(mut cur) = self.root else {
            return Search::Vacant(InsertAs::Root);
        };

        loop {
            let dir = match key.cmp(self.nodes[cur].key.borrow()) {
                Ordering::Less => Dir::Left,
                Ordering::Equal => return Search::Found(cur),
                Ordering::Greater => Dir::Right,
            };

            match self.links(cur).child(dir) {
                Some(child) => cur = child,
                None => return Search::Vacant(InsertAs::Child { parent: cur, dir }),
            }
        }
    }

    fn get_raw<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.search(key) {
            Search::Found(node) => Some(node),
            Search::Vacant(_) => None,
        }
    }

    /// Inserts `value` under `key`.
    ///
    /// If the map already holds `key`, its value is overwritten in place and the old value is
    /// returned. The stored key is left untouched.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.entry(key) {
            Entry::Occupied(mut entry) => Some(entry.insert(value)),
            Entry::Vacant(entry) => {
                entry.insert(value);
                None
            }
        }
    }

    /// Inserts `value` under `key` unless `key` is already present.
    ///
    /// Returns [`Error::DuplicateKey`] and leaves the map unchanged if it is.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<&mut V> {
        match self.entry(key) {
            Entry::Occupied(_) => Err(Error::DuplicateKey),
            Entry::Vacant(entry) => Ok(entry.insert(value)),
        }
    }

    /// Gets the entry for `key`, for in-place inspection or insertion.
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        match self.search(&key) {
            Search::Found(node) => Entry::occupied(self, node),
            Search::Vacant(insert_as) => Entry::vacant(self, key, insert_as),
        }
    }

    /// Returns a reference to the value stored under `key`.
    ///
    /// Fails with [`Error::KeyNotFound`] if the map does not contain `key`.
    pub fn find<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.get_raw(key).ok_or(Error::KeyNotFound)?;
        Ok(&self.nodes[node].value)
    }

    /// Removes `key` from the map, returning the value that was stored under it.
    ///
    /// Fails with [`Error::KeyNotFound`] if the map does not contain `key`.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes `key` from the map, returning the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Result<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.get_raw(key).ok_or(Error::KeyNotFound)?;
        Ok(self.remove_at(node))
    }
}

impl Links {
    #[must_use]
    const fn new() -> Self {
        Links {
            parent: None,
            children: [None; 2],
        }
    }

    #[inline]
    fn parent(&self) -> Link {
        self.parent
    }

    #[inline]
    fn child(&self, dir: Dir) -> Link {
        self.children[dir as usize]
    }

    #[inline]
    fn left(&self) -> Link {
        self.child(Dir::Left)
    }

    #[inline]
    fn right(&self) -> Link {
        self.child(Dir::Right)
    }

    #[inline]
    fn set_parent(&mut self, parent: Link) -> Link {
        mem::replace(&mut self.parent, parent)
    }

    #[inline]
    fn set_child(&mut self, dir: Dir, child: Link) -> Link {
        mem::replace(&mut self.children[dir as usize], child)
    }
}
