//! Tree-based tiling layout core.
//!
//! This crate maintains a tree of rectangular views inside a bounded
//! workspace area. Internal nodes are axis-aligned splits, leaves bind one
//! host view each, and every change to the tree's shape, available space or
//! gaps recomputes the affected subtree's rectangles.
//!
//! The core never applies geometry itself: operations stage `(view, target)`
//! instructions into a [`Transaction`], and the host commits them atomically
//! so sibling views are never observed mid-resize relative to each other.
//! Whether a change should run as an animated crossfade is decided here; the
//! frame-by-frame interpolation is the host's animation facility.
//!
//! Placement policy (which view goes where) is the host's business. This
//! crate only maps a fixed tree onto a fixed rectangle.

use std::fmt;
use std::hash::Hash;
use std::time::Duration;

mod gaps;
mod geometry;
mod transaction;
mod tree;
mod workspace;


pub use gaps::GapSpec;
pub use geometry::{Point, Rect, Size};
pub use transaction::{StagedChange, Transaction};
pub use tree::{Node, NodeKey, SplitData, SplitDirection, TileTree, ViewData};
pub use workspace::{
    effective_resolution, wset_local_point, wset_local_rect, WorkspaceSet,
    DEFAULT_OUTPUT_RESOLUTION,
};

/// A window-like object the tree can lay out.
///
/// Implemented by the host's view handle. The tree queries current state
/// through this trait and requests changes only by staging into a
/// [`Transaction`]; it never mutates the view directly.
pub trait LayoutView {
    /// Unique id of the view. A view is bound to at most one node at a time.
    type Id: fmt::Debug + Clone + PartialEq + Eq + Hash;

    fn id(&self) -> &Self::Id;

    /// The view's current rectangle, in tree-local coordinates.
    fn geometry(&self) -> Rect;

    /// Whether the view is fullscreen. A fullscreen view targets the whole
    /// output rectangle regardless of its node's geometry and gaps.
    fn is_fullscreen(&self) -> bool;

    /// Rectangle of the output the view is on.
    fn output_geometry(&self) -> Rect;
}

/// Configurable properties of the layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Gap spec applied to the root of new trees.
    pub gaps: GapSpec,
    /// Duration of the crossfade staged for animated geometry changes.
    pub animation_duration: Duration,
    /// Disables crossfades entirely; every change applies immediately.
    pub disable_animations: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            gaps: GapSpec::default(),
            animation_duration: Duration::from_millis(200),
            disable_animations: false,
        }
    }
}

impl Options {
    pub fn from_config(config: &tessel_config::Config) -> Self {
        Self {
            gaps: config.layout.gaps.into(),
            animation_duration: Duration::from_millis(u64::from(config.animations.duration_ms)),
            disable_animations: config.animations.off,
        }
    }
}
