//! Pre-order tree walk with enter/leave hooks.
//!
//! The walk snapshots each node's child list before descending, so visitors
//! may mutate attributes of the visited node but must not change tree shape;
//! structural edits belong in a deferred phase after the walk completes.

use markup5ever_rcdom::Handle;

/// Visitor for [`walk`]. `leave` fires after a node's whole subtree has been
/// entered and left, which is where ancestor-scoped state gets cleared.
pub trait Visitor {
    fn enter(&mut self, node: &Handle);
    fn leave(&mut self, _node: &Handle) {}
}

/// Walk `node` and its subtree in pre-order.
pub fn walk<V: Visitor>(node: &Handle, visitor: &mut V) {
    visitor.enter(node);
    let children = node.children.borrow().clone();
    for child in &children {
        walk(child, visitor);
    }
    visitor.leave(node);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;

    struct Recorder {
        entered: Vec<String>,
        left: Vec<String>,
    }

    impl Visitor for Recorder {
        fn enter(&mut self, node: &Handle) {
            if let Some(name) = dom::element_name(node) {
                self.entered.push(name);
            }
        }

        fn leave(&mut self, node: &Handle) {
            if let Some(name) = dom::element_name(node) {
                self.left.push(name);
            }
        }
    }

    #[test]
    fn test_walk_order() {
        let nodes = dom::parse_fragment_nodes("<div><p><b>x</b></p><i>y</i></div>").unwrap();
        let mut recorder = Recorder {
            entered: Vec::new(),
            left: Vec::new(),
        };
        walk(&nodes[0], &mut recorder);

        assert_eq!(recorder.entered, ["div", "p", "b", "i"]);
        // Leave order is post-order: subtree first, then the node.
        assert_eq!(recorder.left, ["b", "p", "i", "div"]);
    }
}
