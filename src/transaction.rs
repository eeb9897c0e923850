//! Staging buffer for geometry changes.
//!
//! The tree never applies geometry directly. Every operation appends
//! instructions to a [`Transaction`], which the host commits so that all
//! staged changes become visible together. The tree appends in a fixed
//! traversal order (parents before children, children in list order), and
//! the host is responsible for the atomicity of the actual apply.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// One staged instruction for the host's commit machinery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StagedChange<Id> {
    /// Set the view's geometry when the transaction is committed.
    Geometry { view: Id, target: Rect },
    /// Attach a crossfade to the view, or retarget the one already attached.
    ///
    /// The host's animation facility interpolates from `from` to `to` over
    /// `duration` on top of the committed geometry; the layout math is not
    /// affected.
    Crossfade {
        view: Id,
        from: Rect,
        to: Rect,
        duration: Duration,
    },
    /// Drop any crossfade attached to the view.
    ClearCrossfade { view: Id },
}

impl<Id> StagedChange<Id> {
    pub fn view(&self) -> &Id {
        match self {
            StagedChange::Geometry { view, .. } => view,
            StagedChange::Crossfade { view, .. } => view,
            StagedChange::ClearCrossfade { view } => view,
        }
    }
}

/// An append-only batch of staged changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction<Id> {
    changes: Vec<StagedChange<Id>>,
}

impl<Id> Default for Transaction<Id> {
    fn default() -> Self {
        Self {
            changes: Vec::new(),
        }
    }
}

impl<Id: PartialEq> Transaction<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage_geometry(&mut self, view: Id, target: Rect) {
        self.changes.push(StagedChange::Geometry { view, target });
    }

    pub fn stage_crossfade(&mut self, view: Id, from: Rect, to: Rect, duration: Duration) {
        self.changes.push(StagedChange::Crossfade {
            view,
            from,
            to,
            duration,
        });
    }

    pub fn clear_crossfade(&mut self, view: Id) {
        self.changes.push(StagedChange::ClearCrossfade { view });
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn changes(&self) -> &[StagedChange<Id>] {
        &self.changes
    }

    pub fn into_changes(self) -> Vec<StagedChange<Id>> {
        self.changes
    }

    /// The geometry the view will have after commit, if one was staged.
    ///
    /// Later instructions supersede earlier ones for the same view.
    pub fn staged_geometry(&self, view: &Id) -> Option<Rect> {
        self.changes.iter().rev().find_map(|change| match change {
            StagedChange::Geometry { view: v, target } if v == view => Some(*target),
            _ => None,
        })
    }

    /// The crossfade the view will run after commit, if one was staged and
    /// not cleared afterwards.
    pub fn staged_crossfade(&self, view: &Id) -> Option<(Rect, Rect, Duration)> {
        for change in self.changes.iter().rev() {
            match change {
                StagedChange::Crossfade {
                    view: v,
                    from,
                    to,
                    duration,
                } if v == view => return Some((*from, *to, *duration)),
                StagedChange::ClearCrossfade { view: v } if v == view => return None,
                _ => {}
            }
        }
        None
    }
}
