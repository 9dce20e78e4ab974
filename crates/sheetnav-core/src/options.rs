#![forbid(unsafe_code)]

//! Per-route presentation options.
//!
//! Every route carries a [`SheetOptions`] value. Fields have fixed defaults so
//! a screen registered without options still presents as a full-height,
//! opaque-black sheet that opens to a single snap point.

use core::fmt;
use core::str::FromStr;

use crate::color::Rgba;
use crate::error::SheetError;

/// A size along one axis: absolute cells or a percentage of the container.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum SizeSpec {
    /// Fixed number of cells.
    Cells(u16),
    /// Percentage of the available extent, `0.0..=100.0`.
    Percent(f32),
}

impl SizeSpec {
    /// The whole available extent.
    pub const FULL: Self = Self::Percent(100.0);

    /// Resolve against the available extent. Never exceeds `total`.
    #[must_use]
    pub fn resolve(self, total: u16) -> u16 {
        match self {
            Self::Cells(cells) => cells.min(total),
            Self::Percent(pct) => {
                let pct = if pct.is_nan() { 0.0 } else { pct.clamp(0.0, 100.0) };
                ((f32::from(total) * pct / 100.0).round() as u16).min(total)
            }
        }
    }
}

impl Default for SizeSpec {
    fn default() -> Self {
        Self::FULL
    }
}

impl FromStr for SizeSpec {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || SheetError::InvalidSize(s.to_owned());
        if let Some(pct) = trimmed.strip_suffix('%') {
            let pct: f32 = pct.trim().parse().map_err(|_| invalid())?;
            if !(0.0..=100.0).contains(&pct) {
                return Err(invalid());
            }
            return Ok(Self::Percent(pct));
        }
        trimmed.parse().map(Self::Cells).map_err(|_| invalid())
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cells(cells) => write!(f, "{cells}"),
            Self::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

impl TryFrom<String> for SizeSpec {
    type Error = SheetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SizeSpec> for String {
    fn from(value: SizeSpec) -> Self {
        value.to_string()
    }
}

/// Presentation options for one sheet route.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SheetOptions {
    /// Sheet background color. Default: opaque black.
    pub background_color: Rgba,
    /// Opacity of the background when fully open, `0.0..=1.0`. Default: `1.0`.
    pub target_opacity: f32,
    /// Height of the content area, anchored to the bottom. Default: fill.
    pub height: SizeSpec,
    /// Open positions, lowest first. Default: a single full-size point.
    pub snap_points: Vec<SizeSpec>,
    /// Whether the user may drag the sheet closed. Default: `true`.
    pub gesture_enabled: bool,
    /// Whether open/close transitions animate. Default: `true`.
    pub animation_enabled: bool,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            background_color: Rgba::BLACK,
            target_opacity: 1.0,
            height: SizeSpec::FULL,
            snap_points: vec![SizeSpec::FULL],
            gesture_enabled: true,
            animation_enabled: true,
        }
    }
}

impl SheetOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn background_color(mut self, color: Rgba) -> Self {
        self.background_color = color;
        self
    }

    /// Set the open opacity (clamped to `[0, 1]`).
    #[must_use]
    pub fn target_opacity(mut self, opacity: f32) -> Self {
        self.target_opacity = opacity;
        self.normalized()
    }

    #[must_use]
    pub fn height(mut self, height: SizeSpec) -> Self {
        self.height = height;
        self
    }

    /// Set the snap points. An empty list falls back to the default.
    #[must_use]
    pub fn snap_points(mut self, points: impl IntoIterator<Item = SizeSpec>) -> Self {
        self.snap_points = points.into_iter().collect();
        self.normalized()
    }

    #[must_use]
    pub fn gesture_enabled(mut self, enabled: bool) -> Self {
        self.gesture_enabled = enabled;
        self
    }

    #[must_use]
    pub fn animation_enabled(mut self, enabled: bool) -> Self {
        self.animation_enabled = enabled;
        self
    }

    /// Clamp opacity and restore the default snap list if it is empty.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.target_opacity = if self.target_opacity.is_nan() {
            1.0
        } else {
            self.target_opacity.clamp(0.0, 1.0)
        };
        if self.snap_points.is_empty() {
            self.snap_points = vec![SizeSpec::FULL];
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn defaults_match_documented_values() {
        let o = SheetOptions::default();
        assert_eq!(o.background_color, Rgba::BLACK);
        assert_eq!(o.target_opacity, 1.0);
        assert_eq!(o.height, SizeSpec::FULL);
        assert_eq!(o.snap_points, vec![SizeSpec::FULL]);
        assert!(o.gesture_enabled);
        assert!(o.animation_enabled);
    }

    #[test]
    fn empty_snap_points_fall_back() {
        let o = SheetOptions::new().snap_points([]);
        assert_eq!(o.snap_points, vec![SizeSpec::FULL]);
    }

    #[test]
    fn opacity_is_clamped() {
        assert_eq!(SheetOptions::new().target_opacity(3.0).target_opacity, 1.0);
        assert_eq!(SheetOptions::new().target_opacity(-1.0).target_opacity, 0.0);
    }

    #[test]
    fn parse_sizes() {
        assert_eq!("50%".parse::<SizeSpec>().unwrap(), SizeSpec::Percent(50.0));
        assert_eq!(" 12 ".parse::<SizeSpec>().unwrap(), SizeSpec::Cells(12));
        assert!("150%".parse::<SizeSpec>().is_err());
        assert!("tall".parse::<SizeSpec>().is_err());
    }

    #[test]
    fn resolve_percent_and_cells() {
        assert_eq!(SizeSpec::Percent(50.0).resolve(24), 12);
        assert_eq!(SizeSpec::FULL.resolve(24), 24);
        assert_eq!(SizeSpec::Cells(40).resolve(24), 24);
    }

    proptest! {
        #[test]
        fn resolve_never_exceeds_total(total in 0u16..2000, pct in -50.0f32..200.0, cells in 0u16..4000) {
            prop_assert!(SizeSpec::Percent(pct).resolve(total) <= total);
            prop_assert!(SizeSpec::Cells(cells).resolve(total) <= total);
        }
    }
}
