// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Build configuration, optionally loaded from environment variables.

use crate::measurement::is_valid_length;
use std::fmt;
use std::str::FromStr;

/// Fallback roof height in meters when a roof model gives none
pub const DEFAULT_ROOF_HEIGHT: f64 = 2.5;

/// Fewest profile segments a dome can be built from
pub const MIN_DOME_CROSS_SPLITS: usize = 1;

/// Fewest angular sections a dome can be swept in
pub const MIN_DOME_SECTIONS: usize = 3;

/// Roof build configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RoofConfig {
    /// Height used when the roof model has no usable height.
    pub default_height: f64,
    /// Segments of the dome quarter-circle profile.
    pub dome_cross_splits: usize,
    /// Angular sections of the dome sweep.
    pub dome_sections: usize,
    /// Smooth shading for domes.
    pub dome_soft_normals: bool,
    /// Convergence tolerance of the inscribed circle search, in meters.
    pub circle_tolerance: f64,
    /// Straight skeleton snapping tolerance, in meters.
    pub skeleton_tolerance: f64,
}

impl Default for RoofConfig {
    fn default() -> Self {
        Self {
            default_height: DEFAULT_ROOF_HEIGHT,
            dome_cross_splits: 5,
            dome_sections: 9,
            dome_soft_normals: true,
            circle_tolerance: 0.01,
            skeleton_tolerance: roofmesh_geometry::skeleton::DEFAULT_TOLERANCE,
        }
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

/// Like [`parse_or`], also rejecting parsed values that fail `valid`
fn parse_valid<T: FromStr + Copy + fmt::Display>(
    name: &str,
    value: Option<String>,
    default: T,
    valid: impl Fn(T) -> bool,
) -> T {
    let parsed = parse_or(value, default);
    if valid(parsed) {
        parsed
    } else {
        tracing::warn!(name, value = %parsed, default = %default, "ignoring out-of-range setting");
        default
    }
}

impl RoofConfig {
    /// Load configuration from `ROOFMESH_*` environment variables.
    ///
    /// Missing, unparsable or out-of-range variables keep their default.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        let var = |name: &'static str| (name, lookup(name));
        let positive = |v: f64| v.is_finite() && v > 0.0;

        let (name, value) = var("ROOFMESH_DEFAULT_HEIGHT");
        let default_height = parse_valid(name, value, d.default_height, is_valid_length);
        let (name, value) = var("ROOFMESH_DOME_CROSS_SPLITS");
        let dome_cross_splits =
            parse_valid(name, value, d.dome_cross_splits, |v| v >= MIN_DOME_CROSS_SPLITS);
        let (name, value) = var("ROOFMESH_DOME_SECTIONS");
        let dome_sections = parse_valid(name, value, d.dome_sections, |v| v >= MIN_DOME_SECTIONS);
        let (name, value) = var("ROOFMESH_CIRCLE_TOLERANCE");
        let circle_tolerance = parse_valid(name, value, d.circle_tolerance, positive);
        let (name, value) = var("ROOFMESH_SKELETON_TOLERANCE");
        let skeleton_tolerance = parse_valid(name, value, d.skeleton_tolerance, positive);

        Self {
            default_height,
            dome_cross_splits,
            dome_sections,
            dome_soft_normals: parse_or(lookup("ROOFMESH_DOME_SOFT_NORMALS"), d.dome_soft_normals),
            circle_tolerance,
            skeleton_tolerance,
        }
    }

    /// Dome profile splits and sweep sections, each replaced by its default
    /// when below the minimum a dome can be built from
    pub fn dome_resolution(&self) -> (usize, usize) {
        let d = Self::default();
        let cross_splits = if self.dome_cross_splits >= MIN_DOME_CROSS_SPLITS {
            self.dome_cross_splits
        } else {
            d.dome_cross_splits
        };
        let sections = if self.dome_sections >= MIN_DOME_SECTIONS {
            self.dome_sections
        } else {
            d.dome_sections
        };
        (cross_splits, sections)
    }
}
