use core::iter::FusedIterator;

use crate::{Dir, Link, OrderedMap};

#[derive(Copy, Clone)]
enum CameFrom {
    Parent,
    LeftChild,
    Here,
    RightChild,
}

/// An in-order iterator over the entries of an [`OrderedMap`].
///
/// Walks the tree through its parent links, so it needs no stack regardless of depth.
pub struct Iter<'map, K, V> {
    map: &'map OrderedMap<K, V>,

    front_cur: Link,
    front_from: CameFrom,

    len: usize,
}

impl<'map, K, V> Iter<'map, K, V> {
    pub(crate) fn new(map: &'map OrderedMap<K, V>) -> Self {
        Iter {
            map,

            front_cur: map.root,
            front_from: CameFrom::Parent,
            len: map.len(),
        }
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            map: self.map,
            front_cur: self.front_cur,
            front_from: self.front_from,
            len: self.len,
        }
    }
}

impl<'map, K, V> Iterator for Iter<'map, K, V> {
    type Item = (&'map K, &'map V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        let map = self.map;
        let mut cur = self.front_cur?;

        loop {
            match self.front_from {
                CameFrom::Parent => {
                    // Upon entering a new subtree, find the minimum element.
                    cur = map.min_in_subtree(cur);

                    // Once the minimum is found, its (empty) left subtree has been exhausted.
                    self.front_from = CameFrom::LeftChild;
                }

                CameFrom::LeftChild => {
                    // The left subtree has been exhausted, so this node is up next.
                    self.front_cur = Some(cur);
                    self.front_from = CameFrom::Here;
                    self.len -= 1;

                    let node = &map.nodes[cur];
                    return Some((&node.key, &node.value));
                }

                CameFrom::Here => {
                    // The current node was just yielded.
                    if let Some(right) = map.links(cur).right() {
                        self.front_from = CameFrom::Parent;
                        cur = right;
                    } else {
                        // An empty right subtree is the same as one that has been exhausted.
                        self.front_from = CameFrom::RightChild;
                    }
                }

                CameFrom::RightChild => {
                    // This subtree is done. Ascend one level.
                    let parent = map
                        .links(cur)
                        .parent()
                        .expect("iterator ran past the root with elements remaining");

                    self.front_from = match map.which_child(parent, cur) {
                        Dir::Left => CameFrom::LeftChild,
                        Dir::Right => CameFrom::RightChild,
                    };

                    cur = parent;
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// An iterator over the keys of an [`OrderedMap`], in ascending order.
pub struct Keys<'map, K, V> {
    pub(crate) inner: Iter<'map, K, V>,
}

impl<'map, K, V> Iterator for Keys<'map, K, V> {
    type Item = &'map K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// An iterator over the values of an [`OrderedMap`], in ascending key order.
pub struct Values<'map, K, V> {
    pub(crate) inner: Iter<'map, K, V>,
}

impl<'map, K, V> Iterator for Values<'map, K, V> {
    type Item = &'map V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}
