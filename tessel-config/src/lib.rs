//! Configuration for the tessel layout core.
//!
//! The configuration is a KDL document. Only layout-related settings live
//! here: gap sizes and the geometry-change animation. Everything else
//! (keybindings, outputs, window rules) belongs to the host.

use std::ffi::OsStr;
use std::path::Path;

use miette::{Context, IntoDiagnostic};

#[derive(knuffel::Decode, Debug, Default, Clone, PartialEq)]
pub struct Config {
    #[knuffel(child, default)]
    pub layout: Layout,
    #[knuffel(child, default)]
    pub animations: Animations,
}

#[derive(knuffel::Decode, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    #[knuffel(child, default)]
    pub gaps: Gaps,
}

/// Gap sizes in logical pixels.
///
/// The four edge values apply where a view touches the workspace boundary;
/// `internal` applies between sibling views.
#[derive(knuffel::Decode, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Gaps {
    #[knuffel(child, unwrap(argument), default)]
    pub left: i32,
    #[knuffel(child, unwrap(argument), default)]
    pub right: i32,
    #[knuffel(child, unwrap(argument), default)]
    pub top: i32,
    #[knuffel(child, unwrap(argument), default)]
    pub bottom: i32,
    #[knuffel(child, unwrap(argument), default)]
    pub internal: i32,
}

#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animations {
    /// Disables geometry-change animations entirely.
    #[knuffel(child)]
    pub off: bool,
    /// Duration of the crossfade played when a view's geometry changes.
    #[knuffel(child, unwrap(argument), default = 200)]
    pub duration_ms: u32,
}

impl Default for Animations {
    fn default() -> Self {
        Self {
            off: false,
            duration_ms: 200,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> miette::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .with_context(|| format!("error reading {path:?}"))?;

        let filename = path
            .file_name()
            .and_then(OsStr::to_str)
            .unwrap_or("config.kdl");
        let config = Self::parse(filename, &contents)?;
        Ok(config)
    }

    pub fn parse(filename: &str, text: &str) -> Result<Self, knuffel::Error> {
        knuffel::parse(filename, text)
    }
}
