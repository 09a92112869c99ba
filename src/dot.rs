use std::{collections::VecDeque, fmt};

use crate::{node::NodeId, OrderedTree};

impl<T, C> OrderedTree<T, C>
where
    T: fmt::Display,
{
    /// Writes the tree to `w` as a Graphviz `digraph` named `name`.
    ///
    /// Each level of the tree is laid out on one rank. Nodes are labelled `value x count`, and
    /// missing children are drawn as points.
    pub fn dotgraph<W>(&self, name: &str, mut w: W) -> fmt::Result
    where
        W: fmt::Write,
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

                // Formatted values need not be unique, so vertices are keyed by arena slot.
                let id = node.index();
                let n = self.nodes.get(node);
                write!(
                    w,
                    "\"graph{name}-{id}\" [label=\"{} x {}\"]; ",
                    n.value, n.count
                )?;

                for child in [n.left(), n.right()] {
                    match child {
                        Some(child) => {
                            queue.push_back(Item::Node(child));
                            writeln!(
                                links,
                                "\"graph{name}-{id}\" -> \"graph{name}-{}\";",
                                child.index()
                            )?;
                        }
                        None => {
                            queue.push_back(Item::Missing(missing));
                            writeln!(
                                links,
                                "\"graph{name}-{id}\" -> \"graph{name}-missing{missing}\";"
                            )?;
                            missing += 1;
                        }
                    }
                }
            }

            writeln!(w, "}}")?;
        }

        w.write_str(&links)?;

        w.write_str(" }\n}")
    }
}

#[cfg(test)]
mod tests {
    use crate::OrderedTree;

    #[test]
    fn single_node() {
        let mut tree = OrderedTree::new(7);
        tree.add(7).unwrap();

        let mut out = String::new();
        tree.dotgraph("t", &mut out).unwrap();

        assert_eq!(
            out,
            "digraph \"graph-t\" {\n subgraph \"subgraph-t\" {\
             {rank=same; \"grapht-0\" [label=\"7 x 2\"]; }\n\
             {rank=same; \"grapht-missing0\" [shape=point]; \"grapht-missing1\" [shape=point]; }\n\
             \"grapht-0\" -> \"grapht-missing0\";\n\
             \"grapht-0\" -> \"grapht-missing1\";\n \
             }\n}"
        );
    }

    #[test]
    fn links_follow_structure() {
        let mut tree = OrderedTree::new(2);
        tree.add(1).unwrap();
        tree.add(3).unwrap();

        let mut out = String::new();
        tree.dotgraph("t", &mut out).unwrap();

        assert!(out.contains("\"grapht-0\" [label=\"2 x 1\"]"));
        assert!(out.contains("\"grapht-0\" -> \"grapht-1\";"));
        assert!(out.contains("\"grapht-0\" -> \"grapht-2\";"));
        assert_eq!(out.matches("[shape=point]").count(), 4);
    }

    #[test]
    fn empty() {
        let mut tree = OrderedTree::new(1);
        tree.remove(&1).unwrap();

        let mut out = String::new();
        tree.dotgraph("t", &mut out).unwrap();
        assert_eq!(out, "digraph \"graph-t\" {}");
    }
}
