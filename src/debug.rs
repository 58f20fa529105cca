use std::{collections::VecDeque, fmt};

use crate::{Dir, NodeId, OrderedMap};

impl<K, V> OrderedMap<K, V> {
    /// Returns the number of levels in the tree.
    ///
    /// An empty map has height 0 and a map with a single element has height 1. Since the tree is
    /// never rebalanced, this ranges from about _log2(n)_ up to _n_.
    pub fn height(&self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };

        let mut queue = VecDeque::new();
        queue.push_back(root);

        let mut height = 0;
        while !queue.is_empty() {
            height += 1;

            for _ in 0..queue.len() {
                let Some(node) = queue.pop_front() else {
                    break;
                };

                let links = self.links(node);
                queue.extend(links.left());
                queue.extend(links.right());
            }
        }

        height
    }

    /// Writes the shape of the tree to `w` as a Graphviz digraph.
    ///
    /// Missing children are drawn as points so that left and right children can be told apart.
    pub fn dotgraph<W>(&self, name: &str, mut w: W) -> fmt::Result
    where
        W: fmt::Write,
        K: fmt::Display,
    {
        let root = match self.root {
            Some(r) => r,
            None => return write!(w, "digraph \"graph-{name}\" {{}}"),
        };

        enum Item {
            Node(NodeId),
            Missing(u32),
        }

        let mut queue = VecDeque::new();
        queue.push_back(Item::Node(root));

        write!(
            w,
            "digraph \"graph-{name}\" {{\n subgraph \"subgraph-{name}\" {{"
        )?;

        let mut missing = 0;
        let mut links = String::new();

        while !queue.is_empty() {
            use fmt::Write;

            write!(w, "{{rank=same; ")?;

            for _ in 0..queue.len() {
                let node = match queue.pop_front() {
                    Some(Item::Node(node)) => node,
                    Some(Item::Missing(id)) => {
                        write!(w, "\"graph{name}-missing{id}\" [shape=point]; ")?;
                        continue;
                    }
                    None => break,
                };

                let key = &self.nodes[node].key;
                write!(w, "\"graph{name}-{node}\" [label=\"{key}\"]; ")?;

                for dir in [Dir::Left, Dir::Right] {
                    if let Some(child) = self.links(node).child(dir) {
                        queue.push_back(Item::Node(child));
                        writeln!(links, "\"graph{name}-{node}\" -> \"graph{name}-{child}\";")?;
                    } else {
                        queue.push_back(Item::Missing(missing));
                        writeln!(
                            links,
                            "\"graph{name}-{node}\" -> \"graph{name}-missing{missing}\";"
                        )?;
                        missing += 1;
                    }
                }
            }

            writeln!(w, "}}")?;
        }

        w.write_str(&links)?;

        w.write_str(" }\n}")
    }
}
