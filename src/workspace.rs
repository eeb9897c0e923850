//! Coordinate conversion between the tiling tree and a workspace set.
//!
//! Trees are laid out in a coordinate space where the workspace at grid cell
//! `(i, j)` occupies `(i * W, j * H)`, with `W x H` the resolution of the
//! output the workspace set is attached to. Workspace-set-local coordinates
//! put the active workspace's cell at the origin.

use crate::geometry::{Point, Rect, Size};

/// Resolution used to lay out trees of a workspace set that has not been
/// attached to any output yet. The host relays out with the real resolution
/// once the set attaches.
pub const DEFAULT_OUTPUT_RESOLUTION: Size = Size {
    width: 1920,
    height: 1080,
};

/// The workspace set a tree belongs to, as seen by the layout core.
pub trait WorkspaceSet {
    /// Resolution of the attached output, or `None` while unattached.
    fn output_resolution(&self) -> Option<Size>;

    /// Grid coordinates of the currently active workspace.
    fn active_workspace(&self) -> Point;
}

/// Resolution to lay out against, falling back to
/// [`DEFAULT_OUTPUT_RESOLUTION`] for unattached sets.
pub fn effective_resolution(wset: &impl WorkspaceSet) -> Size {
    wset.output_resolution()
        .unwrap_or(DEFAULT_OUTPUT_RESOLUTION)
}

/// Translates a rectangle from tree-local to workspace-set-local coordinates.
pub fn wset_local_rect(wset: &impl WorkspaceSet, rect: Rect) -> Rect {
    let offset = active_offset(wset);
    Rect {
        x: rect.x - offset.x,
        y: rect.y - offset.y,
        ..rect
    }
}

/// Translates a point from tree-local to workspace-set-local coordinates.
pub fn wset_local_point(wset: &impl WorkspaceSet, point: Point) -> Point {
    let offset = active_offset(wset);
    Point {
        x: point.x - offset.x,
        y: point.y - offset.y,
    }
}

fn active_offset(wset: &impl WorkspaceSet) -> Point {
    let resolution = effective_resolution(wset);
    let active = wset.active_workspace();
    Point {
        x: active.x * resolution.width,
        y: active.y * resolution.height,
    }
}
