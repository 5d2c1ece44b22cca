//! Scene graph nodes.
//!
//! A [`SceneTree`] owns every [`SceneNode`] in an arena and hands out [`NodeId`]s.
//! Parents list their children in insertion order, which is also draw order;
//! each child keeps its parent's id as a lookup-only back-reference.
//!
//! # Traversal
//!
//! - [`SceneTree::update`] runs the node's own behavior first, then recurses into
//!   children whose `active` flag is set.
//! - [`SceneTree::draw`] skips the whole subtree when the node itself is hidden;
//!   otherwise it draws the node's primitive and recurses into every child, each
//!   child applying its own visibility check.
//! - [`SceneTree::destroy`] marks a subtree inactive. It neither detaches the
//!   node from its parent nor frees storage; pair it with
//!   [`SceneTree::remove_child`] for real removal.
//!
//! # Example
//!
//! ```ignore
//! let mut tree = SceneTree::new();
//! let root = tree.insert(SceneNode::new_group());
//! let body = tree.insert(SceneNode::new_rect(10.0, 10.0, 32.0, 32.0).with_color(Color::RED));
//! tree.add_child(root, body)?;
//! tree.update(root, dt);
//! tree.draw(root, &mut ctx.draw);
//! ```

use std::fmt;

use log::trace;
use smallvec::SmallVec;

use crate::error::SceneError;
use crate::math::{Color, Vector2};
use crate::resources::drawqueue::DrawQueue;

/// Handle to a node inside a [`SceneTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Which primitive a node draws.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Draws nothing itself; only its children.
    Group,
    /// Rectangle of `size`, top-left at `position`.
    Rect,
    /// Circle centered at `position`.
    Circle { radius: f32 },
    /// Text with its top-left at `position`.
    Label { text: String },
}

/// Per-node update logic, run before the node's children are updated.
pub type NodeBehavior = Box<dyn FnMut(&mut SceneNode, f32)>;

/// Transform, style, and tree links of one node.
pub struct SceneNode {
    pub kind: NodeKind,
    pub position: Vector2,
    pub size: Vector2,
    /// Degrees. Stored for game code; the host primitives do not rotate.
    pub rotation: f32,
    pub scale: Vector2,
    pub visible: bool,
    pub active: bool,
    pub color: Color,
    children: SmallVec<[NodeId; 4]>,
    parent: Option<NodeId>,
    behavior: Option<NodeBehavior>,
}

impl SceneNode {
    fn with_kind(kind: NodeKind) -> Self {
        SceneNode {
            kind,
            position: Vector2::ZERO,
            size: Vector2::ZERO,
            rotation: 0.0,
            scale: Vector2::ONE,
            visible: true,
            active: true,
            color: Color::WHITE,
            children: SmallVec::new(),
            parent: None,
            behavior: None,
        }
    }

    pub fn new_group() -> Self {
        Self::with_kind(NodeKind::Group)
    }

    pub fn new_rect(x: f32, y: f32, w: f32, h: f32) -> Self {
        let mut node = Self::with_kind(NodeKind::Rect);
        node.position = Vector2::new(x, y);
        node.size = Vector2::new(w, h);
        node
    }

    pub fn new_circle(x: f32, y: f32, radius: f32) -> Self {
        let mut node = Self::with_kind(NodeKind::Circle { radius });
        node.position = Vector2::new(x, y);
        node.size = Vector2::new(radius * 2.0, radius * 2.0);
        node
    }

    pub fn new_label(text: impl Into<String>, x: f32, y: f32) -> Self {
        let mut node = Self::with_kind(NodeKind::Label { text: text.into() });
        node.position = Vector2::new(x, y);
        node
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_scale(mut self, scale: Vector2) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Attach update logic that runs before the children update.
    pub fn with_behavior(mut self, behavior: impl FnMut(&mut SceneNode, f32) + 'static) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    pub fn set_behavior(&mut self, behavior: impl FnMut(&mut SceneNode, f32) + 'static) {
        self.behavior = Some(Box::new(behavior));
    }

    pub fn has_behavior(&self) -> bool {
        self.behavior.is_some()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Issue this node's own primitive.
    fn draw_self(&self, draw: &mut DrawQueue) {
        let Vector2 { x, y } = self.position;
        match &self.kind {
            NodeKind::Group => {}
            NodeKind::Rect => {
                let size = self.size.mul(self.scale);
                draw.rect(x, y, size.x, size.y, self.color);
            }
            NodeKind::Circle { radius } => {
                draw.circle(x, y, radius * self.scale.x, self.color);
            }
            NodeKind::Label { text } => {
                draw.text(text.clone(), x, y);
            }
        }
    }
}

impl fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneNode")
            .field("kind", &self.kind)
            .field("position", &self.position)
            .field("size", &self.size)
            .field("rotation", &self.rotation)
            .field("scale", &self.scale)
            .field("visible", &self.visible)
            .field("active", &self.active)
            .field("color", &self.color)
            .field("children", &self.children)
            .field("parent", &self.parent)
            .field("behavior", &self.behavior.is_some())
            .finish()
    }
}

/// Arena owning a forest of scene nodes.
#[derive(Debug, Default)]
pub struct SceneTree {
    nodes: Vec<SceneNode>,
}

impl SceneTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a detached node.
    pub fn insert(&mut self, mut node: SceneNode) -> NodeId {
        node.parent = None;
        node.children.clear();
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    fn node(&self, id: NodeId) -> Result<&SceneNode, SceneError> {
        self.get(id).ok_or(SceneError::UnknownNode(id))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children()).unwrap_or(&[])
    }

    /// Whether `ancestor` appears on the parent chain of `id` (or is `id`).
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Append `child` to `parent`'s children and point its back-reference at
    /// `parent`. A child that already has a parent is detached from it first.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.node(parent)?;
        self.node(child)?;
        if parent == child {
            return Err(SceneError::SelfParent(child));
        }
        if self.is_ancestor(child, parent) {
            return Err(SceneError::Cycle { parent, child });
        }
        if let Some(old_parent) = self.nodes[child.0].parent {
            self.remove_child(old_parent, child);
        }
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        trace!("Attached {:?} under {:?}", child, parent);
        Ok(())
    }

    /// Remove `child` from `parent`'s children and clear its back-reference.
    /// Returns `false` if `child` was not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(parent_node) = self.nodes.get_mut(parent.0) else {
            return false;
        };
        let Some(pos) = parent_node.children.iter().position(|c| *c == child) else {
            return false;
        };
        parent_node.children.remove(pos);
        if let Some(child_node) = self.nodes.get_mut(child.0) {
            child_node.parent = None;
        }
        trace!("Detached {:?} from {:?}", child, parent);
        true
    }

    /// Run `id`'s behavior, then recurse into its active children. An inactive
    /// node does nothing.
    pub fn update(&mut self, id: NodeId, dt: f32) {
        let Some(node) = self.nodes.get_mut(id.0) else {
            return;
        };
        if !node.active {
            return;
        }
        if let Some(mut behavior) = node.behavior.take() {
            behavior(node, dt);
            // The behavior may have installed a replacement; keep that one.
            if node.behavior.is_none() {
                node.behavior = Some(behavior);
            }
        }
        let children = node.children.clone();
        for child in children {
            self.update(child, dt);
        }
    }

    /// Draw `id` and its subtree in insertion order.
    pub fn draw(&self, id: NodeId, draw: &mut DrawQueue) {
        let Some(node) = self.get(id) else {
            return;
        };
        if !node.visible {
            return;
        }
        node.draw_self(draw);
        for child in node.children.iter() {
            self.draw(*child, draw);
        }
    }

    /// Mark `id` and every descendant inactive.
    pub fn destroy(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(current.0) {
                node.active = false;
                stack.extend(node.children.iter().copied());
            }
        }
    }

    /// Every descendant of `id` in depth-first, insertion order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(id, &mut out);
        out
    }

    fn collect_descendants(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for child in self.children(id) {
            out.push(*child);
            self.collect_descendants(*child, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::drawqueue::DrawCommand;

    #[test]
    fn test_factories() {
        let r = SceneNode::new_rect(1.0, 2.0, 3.0, 4.0);
        assert_eq!(r.kind, NodeKind::Rect);
        assert_eq!(r.size, Vector2::new(3.0, 4.0));
        assert!(r.visible && r.active);

        let c = SceneNode::new_circle(0.0, 0.0, 5.0);
        assert_eq!(c.kind, NodeKind::Circle { radius: 5.0 });

        let l = SceneNode::new_label("hp", 8.0, 8.0);
        assert!(matches!(l.kind, NodeKind::Label { ref text } if text == "hp"));
    }

    #[test]
    fn test_add_child_sets_parent() {
        let mut tree = SceneTree::new();
        let root = tree.insert(SceneNode::new_group());
        let child = tree.insert(SceneNode::new_rect(0.0, 0.0, 1.0, 1.0));
        tree.add_child(root, child).unwrap();
        assert_eq!(tree.children(root), &[child]);
        assert_eq!(tree.parent(child), Some(root));
    }

    #[test]
    fn test_remove_child_clears_parent() {
        let mut tree = SceneTree::new();
        let root = tree.insert(SceneNode::new_group());
        let child = tree.insert(SceneNode::new_group());
        tree.add_child(root, child).unwrap();
        assert!(tree.remove_child(root, child));
        assert!(tree.children(root).is_empty());
        assert_eq!(tree.parent(child), None);
        assert!(!tree.remove_child(root, child));
    }

    #[test]
    fn test_reparenting_detaches_from_old_parent() {
        let mut tree = SceneTree::new();
        let a = tree.insert(SceneNode::new_group());
        let b = tree.insert(SceneNode::new_group());
        let c = tree.insert(SceneNode::new_group());
        tree.add_child(a, c).unwrap();
        tree.add_child(b, c).unwrap();
        assert!(tree.children(a).is_empty());
        assert_eq!(tree.children(b), &[c]);
        assert_eq!(tree.parent(c), Some(b));
    }

    #[test]
    fn test_cycles_rejected() {
        let mut tree = SceneTree::new();
        let a = tree.insert(SceneNode::new_group());
        let b = tree.insert(SceneNode::new_group());
        tree.add_child(a, b).unwrap();
        assert_eq!(tree.add_child(a, a), Err(SceneError::SelfParent(a)));
        assert_eq!(
            tree.add_child(b, a),
            Err(SceneError::Cycle {
                parent: b,
                child: a
            })
        );
    }

    #[test]
    fn test_unknown_node_rejected() {
        let mut tree = SceneTree::new();
        let a = tree.insert(SceneNode::new_group());
        let ghost = NodeId(42);
        assert_eq!(tree.add_child(a, ghost), Err(SceneError::UnknownNode(ghost)));
    }

    #[test]
    fn test_destroy_marks_subtree_inactive_but_keeps_links() {
        let mut tree = SceneTree::new();
        let root = tree.insert(SceneNode::new_group());
        let mid = tree.insert(SceneNode::new_group());
        let leaf = tree.insert(SceneNode::new_group());
        tree.add_child(root, mid).unwrap();
        tree.add_child(mid, leaf).unwrap();

        tree.destroy(mid);
        assert!(tree.get(root).unwrap().active);
        assert!(!tree.get(mid).unwrap().active);
        assert!(!tree.get(leaf).unwrap().active);
        assert_eq!(tree.children(root), &[mid]);
        assert_eq!(tree.parent(mid), Some(root));
    }

    #[test]
    fn test_update_runs_behavior_before_children_and_skips_inactive() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let order = Rc::new(RefCell::new(Vec::new()));
        let mut tree = SceneTree::new();
        let o = order.clone();
        let root = tree.insert(SceneNode::new_group().with_behavior(move |_, _| {
            o.borrow_mut().push("root")
        }));
        let o = order.clone();
        let on = tree.insert(SceneNode::new_group().with_behavior(move |_, _| {
            o.borrow_mut().push("on")
        }));
        let o = order.clone();
        let off = tree.insert(SceneNode::new_group().with_behavior(move |_, _| {
            o.borrow_mut().push("off")
        }));
        tree.add_child(root, on).unwrap();
        tree.add_child(root, off).unwrap();
        tree.get_mut(off).unwrap().active = false;

        tree.update(root, 0.1);
        assert_eq!(*order.borrow(), vec!["root", "on"]);
    }

    #[test]
    fn test_behavior_moves_node() {
        let mut tree = SceneTree::new();
        let n = tree.insert(
            SceneNode::new_rect(0.0, 0.0, 1.0, 1.0)
                .with_behavior(|node, dt| node.position = node.position.add(Vector2::new(10.0 * dt, 0.0))),
        );
        tree.update(n, 0.5);
        tree.update(n, 0.5);
        assert!((tree.get(n).unwrap().position.x - 10.0).abs() < 1e-6);
        assert!(tree.get(n).unwrap().has_behavior());
    }

    #[test]
    fn test_draw_order_is_parent_then_children_in_insertion_order() {
        let mut tree = SceneTree::new();
        let root = tree.insert(SceneNode::new_rect(0.0, 0.0, 100.0, 100.0));
        let a = tree.insert(SceneNode::new_circle(1.0, 1.0, 2.0));
        let b = tree.insert(SceneNode::new_label("b", 3.0, 3.0));
        tree.add_child(root, a).unwrap();
        tree.add_child(root, b).unwrap();

        let mut q = DrawQueue::new();
        tree.draw(root, &mut q);
        let cmds = q.commands();
        assert_eq!(cmds.len(), 3);
        assert!(matches!(cmds[0], DrawCommand::Rect { .. }));
        assert!(matches!(cmds[1], DrawCommand::Circle { .. }));
        assert!(matches!(cmds[2], DrawCommand::Text { .. }));
    }

    #[test]
    fn test_hidden_node_hides_subtree_but_hidden_child_only_hides_itself() {
        let mut tree = SceneTree::new();
        let root = tree.insert(SceneNode::new_group());
        let hidden = tree.insert(SceneNode::new_rect(0.0, 0.0, 1.0, 1.0).with_visible(false));
        let under_hidden = tree.insert(SceneNode::new_rect(0.0, 0.0, 1.0, 1.0));
        let shown = tree.insert(SceneNode::new_circle(0.0, 0.0, 1.0));
        tree.add_child(root, hidden).unwrap();
        tree.add_child(hidden, under_hidden).unwrap();
        tree.add_child(root, shown).unwrap();

        let mut q = DrawQueue::new();
        tree.draw(root, &mut q);
        assert_eq!(q.len(), 1);
        assert!(matches!(q.commands()[0], DrawCommand::Circle { .. }));

        tree.get_mut(root).unwrap().visible = false;
        q.clear();
        tree.draw(root, &mut q);
        assert!(q.is_empty());
    }

    #[test]
    fn test_rect_draw_applies_scale_and_color() {
        let mut tree = SceneTree::new();
        let n = tree.insert(
            SceneNode::new_rect(5.0, 6.0, 10.0, 20.0)
                .with_scale(Vector2::new(2.0, 0.5))
                .with_color(Color::GREEN),
        );
        let mut q = DrawQueue::new();
        tree.draw(n, &mut q);
        assert_eq!(
            q.commands()[0],
            DrawCommand::Rect {
                x: 5.0,
                y: 6.0,
                w: 20.0,
                h: 10.0,
                color: Color::GREEN
            }
        );
    }

    #[test]
    fn test_descendants_depth_first() {
        let mut tree = SceneTree::new();
        let r = tree.insert(SceneNode::new_group());
        let a = tree.insert(SceneNode::new_group());
        let a1 = tree.insert(SceneNode::new_group());
        let b = tree.insert(SceneNode::new_group());
        tree.add_child(r, a).unwrap();
        tree.add_child(a, a1).unwrap();
        tree.add_child(r, b).unwrap();
        assert_eq!(tree.descendants(r), vec![a, a1, b]);
    }
}
