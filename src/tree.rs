//! The layout tree: an arena of split and view nodes.
//!
//! Nodes form a tree where:
//! - Split nodes arrange their children along one axis and own the
//!   proportional sizing math.
//! - View nodes are leaves binding one host view; they translate a node
//!   rectangle into the view's staged target rectangle.
//!
//! The tree lives in a slotmap so that structural changes (including
//! flattening) never invalidate keys held elsewhere. Parent links are plain
//! keys next to the owning parent→child edges, which keeps upward traversal
//! cheap without reference cycles.

use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use tracing::warn;

use crate::gaps::GapSpec;
use crate::geometry::Rect;
use crate::transaction::Transaction;
use crate::{LayoutView, Options};

new_key_type! {
    /// Key of a node in the layout tree.
    pub struct NodeKey;
}

/// Geometry deltas at or below this many logical pixels are applied without
/// a crossfade.
const CROSSFADE_EPSILON: i32 = 1;

/// Axis along which a split arranges its children.
///
/// The convention, used by every sizing computation in this module: a
/// `Vertical` split places children side by side along the width (its
/// splittable extent is the width), a `Horizontal` split stacks children
/// along the height (its splittable extent is the height).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitDirection {
    Horizontal,
    Vertical,
}

// ============================================================================
// Node storage
// ============================================================================

/// State shared by both node variants plus the variant payload.
#[derive(Debug)]
pub struct Node<V: LayoutView> {
    parent: Option<NodeKey>,
    geometry: Rect,
    gaps: GapSpec,
    kind: NodeKind<V>,
}

#[derive(Debug)]
enum NodeKind<V: LayoutView> {
    Split(SplitData),
    View(ViewData<V>),
}

#[derive(Debug)]
pub struct SplitData {
    direction: SplitDirection,
    children: Vec<NodeKey>,
}

#[derive(Debug)]
pub struct ViewData<V: LayoutView> {
    view: V,
    /// Whether a crossfade is currently attached to the view on the host
    /// side. A new geometry change retargets the attached crossfade instead
    /// of stacking another one.
    crossfade_attached: bool,
}

impl<V: LayoutView> Node<V> {
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    pub fn gaps(&self) -> GapSpec {
        self.gaps
    }

    /// The split payload, or `None` if this node is a view.
    pub fn split(&self) -> Option<&SplitData> {
        match &self.kind {
            NodeKind::Split(split) => Some(split),
            NodeKind::View(_) => None,
        }
    }

    /// The view payload, or `None` if this node is a split.
    pub fn view(&self) -> Option<&ViewData<V>> {
        match &self.kind {
            NodeKind::View(view) => Some(view),
            NodeKind::Split(_) => None,
        }
    }
}

impl SplitData {
    pub fn direction(&self) -> SplitDirection {
        self.direction
    }

    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

impl<V: LayoutView> ViewData<V> {
    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn crossfade_attached(&self) -> bool {
        self.crossfade_attached
    }
}

// ============================================================================
// TileTree
// ============================================================================

/// The layout tree for one workspace.
///
/// The root is always a split node and is never removed, even when it has no
/// children. All geometry changes are staged into a [`Transaction`]; nothing
/// is applied to views directly.
#[derive(Debug)]
pub struct TileTree<V: LayoutView> {
    nodes: SlotMap<NodeKey, Node<V>>,
    root: NodeKey,
    /// Reverse lookup from a bound view to its node.
    view_to_node: HashMap<V::Id, NodeKey>,
    /// Whether a continuous interactive resize is in flight. Suppresses
    /// crossfades so resizing stays responsive.
    interactive_resize: bool,
    options: Rc<Options>,
}

impl<V: LayoutView> TileTree<V> {
    pub fn new(direction: SplitDirection, options: Rc<Options>) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node {
            parent: None,
            geometry: Rect::default(),
            gaps: options.gaps,
            kind: NodeKind::Split(SplitData {
                direction,
                children: Vec::new(),
            }),
        });

        Self {
            nodes,
            root,
            view_to_node: HashMap::new(),
            interactive_resize: false,
            options,
        }
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    pub fn options(&self) -> &Rc<Options> {
        &self.options
    }

    pub fn update_options(&mut self, options: Rc<Options>) {
        self.options = options;
    }

    pub fn get(&self, key: NodeKey) -> Option<&Node<V>> {
        self.nodes.get(key)
    }

    /// View the node as a split. `None` if it is gone or a view node.
    pub fn split(&self, key: NodeKey) -> Option<&SplitData> {
        self.nodes.get(key)?.split()
    }

    /// View the node as a view node. `None` if it is gone or a split.
    pub fn view(&self, key: NodeKey) -> Option<&ViewData<V>> {
        self.nodes.get(key)?.view()
    }

    /// The node a view is bound to, if any.
    pub fn node_for_view(&self, id: &V::Id) -> Option<NodeKey> {
        self.view_to_node.get(id).copied()
    }

    /// Walks parent links up to the root of the tree containing `node`.
    pub fn root_of(&self, node: NodeKey) -> NodeKey {
        let mut current = node;
        while let Some(parent) = self.nodes.get(current).and_then(|n| n.parent) {
            current = parent;
        }
        current
    }

    /// Whether any view node is reachable from the root.
    pub fn has_views(&self) -> bool {
        self.subtree_has_views(self.root)
    }

    fn subtree_has_views(&self, key: NodeKey) -> bool {
        match self.nodes.get(key).map(|n| &n.kind) {
            Some(NodeKind::View(_)) => true,
            Some(NodeKind::Split(split)) => {
                split.children.iter().any(|&c| self.subtree_has_views(c))
            }
            None => false,
        }
    }

    // ========================================================================
    // Node lifecycle
    // ========================================================================

    /// Wraps a view entering the tiled layout into a new detached node.
    pub fn make_view_node(&mut self, view: V) -> NodeKey {
        let id = view.id().clone();
        let key = self.nodes.insert(Node {
            parent: None,
            geometry: Rect::default(),
            gaps: GapSpec::default(),
            kind: NodeKind::View(ViewData {
                view,
                crossfade_attached: false,
            }),
        });

        if self.view_to_node.insert(id, key).is_some() {
            warn!("view was already bound to a node, rebinding to the new one");
        }
        key
    }

    /// Creates a new detached split node, for callers that need a sibling
    /// container.
    pub fn make_split_node(&mut self, direction: SplitDirection) -> NodeKey {
        self.nodes.insert(Node {
            parent: None,
            geometry: Rect::default(),
            gaps: GapSpec::default(),
            kind: NodeKind::Split(SplitData {
                direction,
                children: Vec::new(),
            }),
        })
    }

    /// Removes a node and its whole subtree from the tree.
    ///
    /// Detaches it from its parent first (restaging the siblings), clears any
    /// crossfades attached to views in the subtree, and unbinds the views.
    pub fn destroy_node(&mut self, node: NodeKey, tx: &mut Transaction<V::Id>) {
        if node == self.root {
            warn!("attempted to destroy the tree root");
            return;
        }

        if let Some(parent) = self.nodes.get(node).and_then(|n| n.parent) {
            self.remove_child(parent, node, tx);
        }
        self.remove_subtree(node, tx);
    }

    fn remove_subtree(&mut self, node: NodeKey, tx: &mut Transaction<V::Id>) {
        let Some(removed) = self.nodes.remove(node) else {
            return;
        };

        match removed.kind {
            NodeKind::View(data) => {
                if data.crossfade_attached {
                    tx.clear_crossfade(data.view.id().clone());
                }
                if self.view_to_node.get(data.view.id()) == Some(&node) {
                    self.view_to_node.remove(data.view.id());
                }
            }
            NodeKind::Split(split) => {
                for child in split.children {
                    self.remove_subtree(child, tx);
                }
            }
        }
    }

    // ========================================================================
    // Structural operations
    // ========================================================================

    /// Inserts `child` into the split's child list at `index` (or at the end).
    ///
    /// With N existing children the new child receives at most 1/(N+1) of the
    /// splittable extent; the existing children shrink proportionally. Every
    /// child is restaged through `set_geometry` into `tx`.
    pub fn add_child(
        &mut self,
        split: NodeKey,
        child: NodeKey,
        index: Option<usize>,
        tx: &mut Transaction<V::Id>,
    ) {
        let Some(node) = self.nodes.get(split) else {
            warn!("add_child on a node that is no longer in the tree");
            return;
        };
        let NodeKind::Split(data) = &node.kind else {
            warn!("add_child on a view node");
            return;
        };
        match self.nodes.get(child) {
            None => {
                warn!("add_child with a node that is no longer in the tree");
                return;
            }
            Some(c) if c.parent.is_some() => {
                warn!("add_child with a node that already has a parent");
                return;
            }
            Some(_) => {}
        }
        // Attaching a node inside its own subtree would create a cycle.
        let mut cursor = Some(split);
        while let Some(k) = cursor {
            if k == child {
                warn!("add_child with a node that contains the split");
                return;
            }
            cursor = self.nodes.get(k).and_then(|n| n.parent);
        }

        let count = data.children.len();
        let mut idx = index.unwrap_or(count);
        if idx > count {
            warn!(index = idx, "add_child index out of range, clamping");
            idx = count;
        }

        let rect = node.geometry;
        let direction = data.direction;
        let internal = node.gaps.internal;
        // Previous extents, captured before the insertion changes anything.
        let old_extents: Vec<i32> = data
            .children
            .iter()
            .map(|&c| self.node_extent(c, direction))
            .collect();
        let mut children = data.children.clone();
        children.insert(idx, child);

        if let Some(n) = self.nodes.get_mut(split) {
            if let NodeKind::Split(d) = &mut n.kind {
                d.children.insert(idx, child);
            }
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(split);
        }

        // Sibling adjacency changed; re-derive the children's gap specs.
        self.propagate_gaps(split);

        let new_count = (count + 1) as i32;
        let available = (splittable_extent(rect, direction) - (new_count - 1) * internal).max(0);
        let sizes = if count == 0 {
            // First child gets the full splittable extent.
            vec![available]
        } else {
            let newcomer = available / new_count;
            let mut sizes = distribute(available - newcomer, &old_extents);
            sizes.insert(idx, newcomer);
            sizes
        };

        self.apply_child_sizes(rect, direction, internal, &children, &sizes, tx);
    }

    /// Detaches `child` from the split and returns its key; the caller
    /// decides its fate (reattach elsewhere, or [`Self::destroy_node`]).
    ///
    /// The freed extent is redistributed proportionally among the remaining
    /// children, which are restaged into `tx`. Does not flatten; call
    /// [`Self::flatten`] separately when desired.
    ///
    /// Returns `None` without mutating anything if `child` is not actually a
    /// child of `split`.
    pub fn remove_child(
        &mut self,
        split: NodeKey,
        child: NodeKey,
        tx: &mut Transaction<V::Id>,
    ) -> Option<NodeKey> {
        let Some(node) = self.nodes.get(split) else {
            warn!("remove_child on a node that is no longer in the tree");
            return None;
        };
        let NodeKind::Split(data) = &node.kind else {
            warn!("remove_child on a view node");
            return None;
        };
        let Some(pos) = data.children.iter().position(|&c| c == child) else {
            warn!("remove_child with a node that is not a child of the split");
            return None;
        };

        let rect = node.geometry;
        let direction = data.direction;
        let internal = node.gaps.internal;
        let mut children = data.children.clone();
        children.remove(pos);

        if let Some(n) = self.nodes.get_mut(split) {
            if let NodeKind::Split(d) = &mut n.kind {
                d.children.remove(pos);
            }
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = None;
        }

        self.propagate_gaps(split);

        if !children.is_empty() {
            let weights: Vec<i32> = children
                .iter()
                .map(|&c| self.node_extent(c, direction))
                .collect();
            let count = children.len() as i32;
            let available = (splittable_extent(rect, direction) - (count - 1) * internal).max(0);
            let sizes = distribute(available, &weights);
            self.apply_child_sizes(rect, direction, internal, &children, &sizes, tx);
        }

        Some(child)
    }

    /// Removes structurally redundant splits, until none remain:
    ///
    /// - a non-root split with no children disappears;
    /// - a non-root split with exactly one child is replaced by that child in
    ///   its parent, preserving order;
    /// - the root, whose only child is a split, absorbs that child's
    ///   children. The root itself is never replaced.
    ///
    /// Purely structural: callers re-apply gaps and geometry afterwards.
    /// Returns whether any view node remains reachable from the root.
    pub fn flatten(&mut self) -> bool {
        loop {
            let mut changed = false;

            // Pull a lone split child's contents up into the root.
            let root_children = self
                .split(self.root)
                .map(|s| s.children.clone())
                .unwrap_or_default();
            if root_children.len() == 1 {
                let only = root_children[0];
                if let Some(grandchildren) = self.split(only).map(|s| s.children.clone()) {
                    for &gc in &grandchildren {
                        if let Some(n) = self.nodes.get_mut(gc) {
                            n.parent = Some(self.root);
                        }
                    }
                    if let Some(n) = self.nodes.get_mut(self.root) {
                        if let NodeKind::Split(d) = &mut n.kind {
                            d.children = grandchildren;
                        }
                    }
                    self.nodes.remove(only);
                    changed = true;
                }
            }

            // Collapse non-root splits with fewer than two children.
            let keys: Vec<NodeKey> = self.nodes.keys().collect();
            for key in keys {
                if key == self.root {
                    continue;
                }
                let Some(node) = self.nodes.get(key) else {
                    continue;
                };
                let Some(parent) = node.parent else {
                    continue;
                };
                let NodeKind::Split(data) = &node.kind else {
                    continue;
                };

                match data.children.len() {
                    0 => {
                        if let Some(p) = self.nodes.get_mut(parent) {
                            if let NodeKind::Split(d) = &mut p.kind {
                                d.children.retain(|&c| c != key);
                            }
                        }
                        self.nodes.remove(key);
                        changed = true;
                    }
                    1 => {
                        let only = data.children[0];
                        if let Some(p) = self.nodes.get_mut(parent) {
                            if let NodeKind::Split(d) = &mut p.kind {
                                if let Some(pos) = d.children.iter().position(|&c| c == key) {
                                    d.children[pos] = only;
                                }
                            }
                        }
                        if let Some(c) = self.nodes.get_mut(only) {
                            c.parent = Some(parent);
                        }
                        self.nodes.remove(key);
                        changed = true;
                    }
                    _ => {}
                }
            }

            if !changed {
                break;
            }
        }

        self.has_views()
    }

    // ========================================================================
    // Geometry and gaps
    // ========================================================================

    /// Sets the geometry available to the node and its subtree, staging the
    /// resulting view rectangles into `tx`.
    ///
    /// For a split, children are resized proportionally to their previous
    /// share of the previous splittable extent, with `(count - 1)` internal
    /// gaps subtracted from the distributable total.
    pub fn set_geometry(&mut self, node: NodeKey, rect: Rect, tx: &mut Transaction<V::Id>) {
        if !self.nodes.contains_key(node) {
            warn!("set_geometry on a node that is no longer in the tree");
            return;
        }
        self.apply_geometry(node, rect, tx);
    }

    fn apply_geometry(&mut self, key: NodeKey, rect: Rect, tx: &mut Transaction<V::Id>) {
        let Some(node) = self.nodes.get_mut(key) else {
            return;
        };
        node.geometry = rect;
        let internal = node.gaps.internal;
        // Copy out what the recursion needs; it will re-borrow the arena.
        let info = match &node.kind {
            NodeKind::View(_) => None,
            NodeKind::Split(split) => Some((split.children.clone(), split.direction)),
        };

        let Some((children, direction)) = info else {
            self.stage_view(key, tx);
            return;
        };
        if children.is_empty() {
            return;
        }

        let weights: Vec<i32> = children
            .iter()
            .map(|&c| self.node_extent(c, direction))
            .collect();
        let count = children.len() as i32;
        let available = (splittable_extent(rect, direction) - (count - 1) * internal).max(0);
        let sizes = distribute(available, &weights);
        self.apply_child_sizes(rect, direction, internal, &children, &sizes, tx);
    }

    /// Helper: lay the children out at the given sizes along the split axis.
    ///
    /// Each child's running position advances by its size plus one internal
    /// gap; the non-split dimension spans the parent's full extent.
    fn apply_child_sizes(
        &mut self,
        rect: Rect,
        direction: SplitDirection,
        internal: i32,
        children: &[NodeKey],
        sizes: &[i32],
        tx: &mut Transaction<V::Id>,
    ) {
        let mut pos = match direction {
            SplitDirection::Vertical => rect.x,
            SplitDirection::Horizontal => rect.y,
        };

        for (&child, &size) in children.iter().zip(sizes) {
            let child_rect = match direction {
                SplitDirection::Vertical => Rect::new(pos, rect.y, size, rect.height),
                SplitDirection::Horizontal => Rect::new(rect.x, pos, rect.width, size),
            };
            self.apply_geometry(child, child_rect, tx);
            pos += size + internal;
        }
    }

    /// Stages the view's target rectangle, with a crossfade when the change
    /// warrants one.
    ///
    /// A fullscreen view targets the whole output, ignoring node geometry and
    /// gaps. Otherwise the target is the node rectangle shrunk by the node's
    /// gap spec. The change is animated unless animations are off, an
    /// interactive resize is in flight, or the delta is within
    /// [`CROSSFADE_EPSILON`].
    fn stage_view(&mut self, key: NodeKey, tx: &mut Transaction<V::Id>) {
        let animate = !self.interactive_resize
            && !self.options.disable_animations
            && !self.options.animation_duration.is_zero();
        let duration = self.options.animation_duration;

        let Some(node) = self.nodes.get_mut(key) else {
            return;
        };
        let geometry = node.geometry;
        let gaps = node.gaps;
        let NodeKind::View(data) = &mut node.kind else {
            return;
        };

        let target = if data.view.is_fullscreen() {
            data.view.output_geometry()
        } else {
            gaps.shrink(geometry)
        };

        let current = data.view.geometry();
        let id = data.view.id().clone();

        if animate && current.max_delta(&target) > CROSSFADE_EPSILON {
            // Attach a crossfade, or retarget the one already attached.
            data.crossfade_attached = true;
            tx.stage_crossfade(id.clone(), current, target, duration);
        } else if data.crossfade_attached {
            data.crossfade_attached = false;
            tx.clear_crossfade(id.clone());
        }
        tx.stage_geometry(id, target);
    }

    /// Sets the node's gap spec. For a split, every child receives a derived
    /// spec whose sibling-facing edges are overridden by `gaps.internal`, so
    /// views only see the outer values on edges that face the workspace
    /// boundary.
    ///
    /// Does not restage geometry; callers follow up with
    /// [`Self::set_geometry`] when a visual update is wanted.
    pub fn set_gaps(&mut self, node: NodeKey, gaps: GapSpec) {
        let Some(n) = self.nodes.get_mut(node) else {
            warn!("set_gaps on a node that is no longer in the tree");
            return;
        };
        n.gaps = gaps;
        if matches!(n.kind, NodeKind::Split(_)) {
            self.propagate_gaps(node);
        }
    }

    /// Helper: re-derive the children's gap specs from the split's own.
    fn propagate_gaps(&mut self, split: NodeKey) {
        let Some(node) = self.nodes.get(split) else {
            return;
        };
        let NodeKind::Split(data) = &node.kind else {
            return;
        };
        let gaps = node.gaps;
        let direction = data.direction;
        let children = data.children.clone();

        let count = children.len();
        for (i, &child) in children.iter().enumerate() {
            let mut derived = gaps;
            match direction {
                SplitDirection::Vertical => {
                    if i > 0 {
                        derived.left = gaps.internal;
                    }
                    if i + 1 < count {
                        derived.right = gaps.internal;
                    }
                }
                SplitDirection::Horizontal => {
                    if i > 0 {
                        derived.top = gaps.internal;
                    }
                    if i + 1 < count {
                        derived.bottom = gaps.internal;
                    }
                }
            }
            self.set_gaps(child, derived);
        }
    }

    // ========================================================================
    // Interactive resize
    // ========================================================================

    /// Marks the start of a continuous interactive resize. Until
    /// [`Self::interactive_resize_end`], geometry changes apply without
    /// crossfades so the resize stays responsive.
    pub fn interactive_resize_begin(&mut self) {
        self.interactive_resize = true;
    }

    pub fn interactive_resize_end(&mut self) {
        self.interactive_resize = false;
    }

    pub fn interactive_resize_ongoing(&self) -> bool {
        self.interactive_resize
    }

    // ========================================================================
    // Debugging
    // ========================================================================

    /// Structural dump of the tree, one node per line.
    pub fn draw_tree(&self) -> String {
        fn write_node<V: LayoutView>(
            tree: &TileTree<V>,
            key: NodeKey,
            out: &mut String,
            indent: usize,
        ) {
            for _ in 0..indent {
                out.push_str("  ");
            }
            let Some(node) = tree.nodes.get(key) else {
                return;
            };
            let g = node.geometry;
            match &node.kind {
                NodeKind::View(data) => {
                    out.push_str(&format!(
                        "view {:?} [{}, {}, {}x{}]\n",
                        data.view.id(),
                        g.x,
                        g.y,
                        g.width,
                        g.height
                    ));
                }
                NodeKind::Split(split) => {
                    out.push_str(&format!(
                        "split {:?} [{}, {}, {}x{}]\n",
                        split.direction, g.x, g.y, g.width, g.height
                    ));
                    for &child in &split.children {
                        write_node(tree, child, out, indent + 1);
                    }
                }
            }
        }

        let mut out = String::new();
        write_node(self, self.root, &mut out, 0);
        out
    }

    /// Asserts the tree's structural invariants. Tests call this after every
    /// operation that leaves the tree in a laid-out state.
    pub fn verify_invariants(&self) {
        let root = self.nodes.get(self.root).expect("root must exist");
        assert!(root.parent.is_none(), "root must not have a parent");
        assert!(root.split().is_some(), "root must be a split node");
        self.verify_subtree(self.root);

        for (id, &key) in &self.view_to_node {
            let node = self
                .nodes
                .get(key)
                .expect("view map entry must point to a live node");
            let data = node.view().expect("view map entry must point to a view node");
            assert_eq!(
                data.view.id(),
                id,
                "view map entry must match the bound view"
            );
        }
    }

    fn verify_subtree(&self, key: NodeKey) {
        let node = &self.nodes[key];
        let NodeKind::Split(data) = &node.kind else {
            return;
        };

        for &child in &data.children {
            let child_node = self.nodes.get(child).expect("child must be in the arena");
            assert_eq!(
                child_node.parent,
                Some(key),
                "child's parent link must point back at the split"
            );
            assert_eq!(
                data.children.iter().filter(|&&c| c == child).count(),
                1,
                "a child must be listed exactly once"
            );
            self.verify_subtree(child);
        }

        // Sum invariant: child extents plus internal gaps fill the
        // splittable extent exactly.
        let splittable = splittable_extent(node.geometry, data.direction);
        let internal_total = data.children.len().saturating_sub(1) as i32 * node.gaps.internal;
        if !data.children.is_empty() && splittable >= internal_total {
            let sum: i32 = data
                .children
                .iter()
                .map(|&c| self.node_extent(c, data.direction))
                .sum();
            assert_eq!(
                sum + internal_total,
                splittable,
                "children must fill the splittable extent"
            );
        }
    }

    fn node_extent(&self, key: NodeKey, direction: SplitDirection) -> i32 {
        self.nodes
            .get(key)
            .map_or(0, |n| splittable_extent(n.geometry, direction))
    }
}

/// Size of `rect` along the axis in which the split happens.
fn splittable_extent(rect: Rect, direction: SplitDirection) -> i32 {
    match direction {
        SplitDirection::Vertical => rect.width,
        SplitDirection::Horizontal => rect.height,
    }
}

/// Distributes `available` among children proportionally to `weights`.
///
/// Integer sizes with an exact sum: the rounding remainder goes to the last
/// child. A zero weight total falls back to equal shares.
fn distribute(available: i32, weights: &[i32]) -> Vec<i32> {
    let count = weights.len();
    if count == 0 {
        return Vec::new();
    }

    let total: i64 = weights.iter().map(|&w| w.max(0) as i64).sum();
    let mut sizes = Vec::with_capacity(count);
    let mut used = 0;
    for (i, &weight) in weights.iter().enumerate() {
        let size = if i + 1 == count {
            available - used
        } else if total > 0 {
            (available as i64 * weight.max(0) as i64 / total) as i32
        } else {
            available / count as i32
        };
        let size = size.max(0);
        used += size;
        sizes.push(size);
    }
    sizes
}
