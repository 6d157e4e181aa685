//! Depth-first traversal over the node tree

use crate::node::{FieldSink, Node};

/// Callbacks for [`walk`]. Every method has a no-op default.
///
/// For each node the walk calls, in order: `pre_visit`, `visit_start`,
/// `visit` (children follow when it returns `true`), `visit_end`,
/// `post_visit`. A node vetoed by `pre_visit` receives no further calls and
/// its subtree is skipped.
pub trait Visitor<'a> {
    fn pre_visit(&mut self, _node: Node<'a>) -> bool {
        true
    }

    fn visit_start(&mut self, _name: &str, _index: Option<usize>, _node: Node<'a>) {}

    /// Returns whether the children of `node` should be visited.
    fn visit(&mut self, _name: &str, _index: Option<usize>, _node: Node<'a>) -> bool {
        true
    }

    fn visit_end(&mut self, _name: &str, _index: Option<usize>, _node: Node<'a>) {}

    fn post_visit(&mut self, _node: Node<'a>) {}

    /// Called before the items of a non-empty repeated field.
    fn visit_list_start(&mut self, _name: &str, _len: usize) {}

    fn visit_list_end(&mut self, _name: &str, _len: usize) {}
}

/// Visits `node` and, unless pruned, its subtree.
///
/// `index` is `Some` when the node is an item of a repeated field.
pub fn walk<'a, V: Visitor<'a> + ?Sized>(
    name: &str,
    index: Option<usize>,
    node: Node<'a>,
    visitor: &mut V,
) {
    if !visitor.pre_visit(node) {
        return;
    }
    visitor.visit_start(name, index, node);
    if visitor.visit(name, index, node) {
        node.fields(&mut Walker {
            visitor: &mut *visitor,
        });
    }
    visitor.visit_end(name, index, node);
    visitor.post_visit(node);
}

struct Walker<'v, V: ?Sized> {
    visitor: &'v mut V,
}

impl<'a, V: Visitor<'a> + ?Sized> FieldSink<'a> for Walker<'_, V> {
    fn field(&mut self, name: &'static str, index: Option<usize>, node: Node<'a>) {
        walk(name, index, node, &mut *self.visitor);
    }

    fn list_start(&mut self, name: &'static str, len: usize) {
        self.visitor.visit_list_start(name, len);
    }

    fn list_end(&mut self, name: &'static str, len: usize) {
        self.visitor.visit_list_end(name, len);
    }
}

/// Collects every node accepted by a predicate, in pre-order.
pub struct CollectingVisitor<'a, P> {
    predicate: P,
    nodes: Vec<Node<'a>>,
}

impl<'a, P> CollectingVisitor<'a, P>
where
    P: FnMut(&Node<'a>) -> bool,
{
    pub fn new(predicate: P) -> Self {
        Self {
            predicate,
            nodes: Vec::new(),
        }
    }

    /// Walks `root` and returns the matching nodes, `root` included.
    pub fn collect(root: Node<'a>, predicate: P) -> Vec<Node<'a>> {
        let mut visitor = Self::new(predicate);
        walk(root.type_name(), None, root, &mut visitor);
        visitor.into_nodes()
    }

    pub fn nodes(&self) -> &[Node<'a>] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Node<'a>> {
        self.nodes
    }
}

impl<'a, P> Visitor<'a> for CollectingVisitor<'a, P>
where
    P: FnMut(&Node<'a>) -> bool,
{
    fn visit(&mut self, _name: &str, _index: Option<usize>, node: Node<'a>) -> bool {
        if (self.predicate)(&node) {
            self.nodes.push(node);
        }
        true
    }
}
