//! Configuration for the endlesswm grid layout.
//!
//! The config is a KDL document. Every section is optional and falls back to the values in
//! `resources/default-config.kdl`.

#[macro_use]
extern crate tracing;

use std::ffi::OsStr;
use std::path::Path;

use miette::{Context, IntoDiagnostic};

pub mod binds;

pub use crate::binds::{Action, Bind, Binds, Key, ModKey, Modifiers, Trigger};

/// Gap between neighbouring windows and rows, in logical pixels.
pub const DEFAULT_WINDOW_SPACING: u16 = 10;

#[derive(knuffel::Decode, Debug, PartialEq)]
pub struct Config {
    #[knuffel(child, default)]
    pub input: Input,
    #[knuffel(child, default)]
    pub grid: Grid,
    #[knuffel(child, default)]
    pub behavior: Behavior,
    #[knuffel(child, default)]
    pub binds: Binds,
}

#[derive(knuffel::Decode, Debug, Default, Clone, Copy, PartialEq)]
pub struct Input {
    #[knuffel(child, unwrap(argument), default)]
    pub mod_key: ModKey,
}

#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    /// Stack rows along the X axis instead of the Y axis.
    #[knuffel(child)]
    pub horizontal: bool,
    /// Always scale windows so that every row is filled edge to edge.
    #[knuffel(child)]
    pub minimize_empty_space: bool,
    /// Keep modal dialogs out of the grid.
    #[knuffel(child)]
    pub floating_dialogs: bool,
    #[knuffel(child, unwrap(argument), default = DEFAULT_WINDOW_SPACING)]
    pub window_spacing: u16,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            horizontal: false,
            minimize_empty_space: false,
            floating_dialogs: false,
            window_spacing: DEFAULT_WINDOW_SPACING,
        }
    }
}

#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq)]
pub struct Behavior {
    /// Multiplier applied to wheel amounts when scrolling the grid.
    #[knuffel(child, unwrap(argument), default = 1.)]
    pub scroll_mult: f64,
}

impl Default for Behavior {
    fn default() -> Self {
        Self { scroll_mult: 1. }
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
        let config = Self::parse(filename, &contents).context("error parsing")?;
        debug!("loaded config from {path:?}");
        Ok(config)
    }

    pub fn parse(filename: &str, text: &str) -> Result<Self, knuffel::Error> {
        knuffel::parse(filename, text)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::parse(
            "default-config.kdl",
            include_str!("../../resources/default-config.kdl"),
        )
        .unwrap()
    }
}
