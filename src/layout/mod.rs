//! Layout vocabulary and per-frame layout context.
//!
//! Elements are authored against a design-time reference size (the layer's
//! `layout_size`). During `refresh_layout` each element's configured position
//! is pinned to its container according to its horizontal and vertical
//! [`Anchor`], and the display scale selected by its [`MajorAxis`] is recorded.
//! The resolved size is always the configured size.

mod resolve;

use std::fmt;
use std::str::FromStr;

use crate::error::LayoutError;
use crate::rect::Size;

pub(crate) use resolve::{anchor_position, scale_factors, Container};

/// Which display axis drives an element's size when the display is resized.
///
/// - `None`: the element does not resize with the display.
/// - `Horizontal`: both dimensions scale with the display width, keeping the
///   aspect ratio.
/// - `Vertical`: both dimensions scale with the display height, keeping the
///   aspect ratio.
/// - `Both`: width follows the display width and height follows the display
///   height independently. The aspect ratio is not kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MajorAxis {
    None,
    Horizontal,
    Vertical,
    #[default]
    Both,
}

impl MajorAxis {
    pub fn as_str(self) -> &'static str {
        match self {
            MajorAxis::None => "none",
            MajorAxis::Horizontal => "horz",
            MajorAxis::Vertical => "vert",
            MajorAxis::Both => "both",
        }
    }
}

impl FromStr for MajorAxis {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(MajorAxis::None),
            "horz" | "horizontal" => Ok(MajorAxis::Horizontal),
            "vert" | "vertical" => Ok(MajorAxis::Vertical),
            "both" => Ok(MajorAxis::Both),
            other => Err(LayoutError::InvalidMajorAxis(other.to_string())),
        }
    }
}

impl fmt::Display for MajorAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an element keeps its distance to its container along one axis.
///
/// `Near` is the left edge horizontally and the top edge vertically, `Far` is
/// the right or bottom edge, and `Middle` is the container's center. `None`
/// leaves the element floating at its configured position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    None,
    Near,
    Middle,
    Far,
}

impl FromStr for Anchor {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Anchor::None),
            "near" => Ok(Anchor::Near),
            "middle" => Ok(Anchor::Middle),
            "far" => Ok(Anchor::Far),
            other => Err(LayoutError::InvalidAnchor(other.to_string())),
        }
    }
}

/// Alignment of text content inside an element. Not used by layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Right,
    Center,
}

impl FromStr for Alignment {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Alignment::Left),
            "right" => Ok(Alignment::Right),
            "center" => Ok(Alignment::Center),
            other => Err(LayoutError::InvalidAlignment(other.to_string())),
        }
    }
}

/// Per-frame inputs to a layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutContext {
    display: Size,
}

impl LayoutContext {
    /// Fails unless both display extents are finite and positive.
    pub fn new(display: Size) -> Result<Self, LayoutError> {
        let valid = |extent: f32| extent.is_finite() && extent > 0.0;
        if !valid(display.width) || !valid(display.height) {
            return Err(LayoutError::InvalidDisplaySize {
                width: display.width,
                height: display.height,
            });
        }
        Ok(Self { display })
    }

    pub fn from_display(width: f32, height: f32) -> Result<Self, LayoutError> {
        Self::new(Size::new(width, height))
    }

    /// Size of the display surface the layer is presented on.
    pub fn display(&self) -> Size {
        self.display
    }
}
