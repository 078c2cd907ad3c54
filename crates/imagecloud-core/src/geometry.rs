//! Integer geometry for canvas placement.
//!
//! All coordinates are canvas cells. A [`Bounds`] is half-open: it covers
//! columns `left..right` and rows `upper..lower`.

use crate::errors::ConfigError;
use crate::resize::ResizePolicy;
use std::fmt;
use std::str::FromStr;

/// A top-left coordinate on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub left: i32,
    pub upper: i32,
}

impl Position {
    pub fn new(left: i32, upper: i32) -> Self {
        Self { left, upper }
    }

    /// Move the position diagonally by `step` on both axes.
    pub fn adjust(&self, step: i32) -> Self {
        Self::new(self.left + step, self.upper + step)
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self::new(
            (self.left as f64 * factor).round() as i32,
            (self.upper as f64 * factor).round() as i32,
        )
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.left, self.upper)
    }
}

/// Width and height in canvas cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// True if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Grow (positive step) or shrink (negative step) under the given policy.
    pub fn adjust(&self, step: i32, policy: ResizePolicy) -> Self {
        policy.adjust(*self, step)
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self::new(
            (self.width as f64 * factor).round().max(0.0) as u32,
            (self.height as f64 * factor).round().max(0.0) as u32,
        )
    }

    /// Swap width and height, as for a quarter-turn rotation.
    pub fn transpose(&self) -> Self {
        Self::new(self.height, self.width)
    }

    /// Size with `margin` added to both dimensions.
    pub fn add_margin(&self, margin: u32) -> Self {
        Self::new(
            self.width.saturating_add(margin),
            self.height.saturating_add(margin),
        )
    }

    /// Size with `margin` removed from both dimensions, saturating at zero.
    pub fn remove_margin(&self, margin: u32) -> Self {
        Self::new(
            self.width.saturating_sub(margin),
            self.height.saturating_sub(margin),
        )
    }

    /// True if either dimension is below the corresponding dimension of `min`.
    pub fn is_smaller_than(&self, min: &Size) -> bool {
        self.width < min.width || self.height < min.height
    }

    /// True if both dimensions fit inside `other`.
    pub fn fits_in(&self, other: &Size) -> bool {
        self.width <= other.width && self.height <= other.height
    }

    /// Scale down, keeping the aspect ratio, until the size fits inside `cap`.
    ///
    /// Sizes that already fit are returned unchanged. The result never has
    /// a zero dimension unless the input did.
    pub fn fit_within(&self, cap: &Size) -> Self {
        if self.fits_in(cap) || self.is_empty() {
            return *self;
        }
        let (width, height) = (self.width as u64, self.height as u64);
        let (cap_width, cap_height) = (cap.width as u64, cap.height as u64);
        // Compare cap_width / width against cap_height / height exactly.
        if cap_width * height <= cap_height * width {
            Self::new(cap.width, ((height * cap_width / width) as u32).max(1))
        } else {
            Self::new(((width * cap_height / height) as u32).max(1), cap.height)
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Size {
    type Err = ConfigError;

    /// Parse `"width,height"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidSize {
            value: s.to_string(),
        };
        let (width, height) = s.split_once(',').ok_or_else(invalid)?;
        let width = width.trim().parse::<u32>().map_err(|_| invalid())?;
        let height = height.trim().parse::<u32>().map_err(|_| invalid())?;
        Ok(Self::new(width, height))
    }
}

/// An axis-aligned rectangle on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub left: i32,
    pub upper: i32,
    pub right: i32,
    pub lower: i32,
}

impl Bounds {
    pub fn new(position: Position, size: Size) -> Self {
        Self {
            left: position.left,
            upper: position.upper,
            right: position.left + size.width as i32,
            lower: position.upper + size.height as i32,
        }
    }

    pub fn from_edges(left: i32, upper: i32, right: i32, lower: i32) -> Self {
        Self {
            left,
            upper,
            right,
            lower,
        }
    }

    /// Bounds of the given size anchored at the origin.
    pub fn from_size(size: Size) -> Self {
        Self::new(Position::default(), size)
    }

    pub fn position(&self) -> Position {
        Position::new(self.left, self.upper)
    }

    pub fn width(&self) -> u32 {
        (self.right - self.left).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.lower - self.upper).max(0) as u32
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn area(&self) -> u64 {
        self.size().area()
    }

    pub fn is_empty(&self) -> bool {
        self.right <= self.left || self.lower <= self.upper
    }

    /// Check if `other` lies entirely inside these bounds.
    pub fn contains(&self, other: &Bounds) -> bool {
        self.left <= other.left
            && self.upper <= other.upper
            && self.right >= other.right
            && self.lower >= other.lower
    }

    /// Check if the two rectangles share at least one cell.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.upper < other.lower
            && other.upper < self.lower
    }

    /// Outset by `margin / 2` on every side.
    pub fn add_margin(&self, margin: u32) -> Self {
        let padding = (margin / 2) as i32;
        Self::from_edges(
            self.left - padding,
            self.upper - padding,
            self.right + padding,
            self.lower + padding,
        )
    }

    /// Inset by `margin / 2` on every side, collapsing rather than inverting.
    pub fn remove_margin(&self, margin: u32) -> Self {
        let padding = (margin / 2) as i32;
        let left = self.left + padding;
        let upper = self.upper + padding;
        Self::from_edges(
            left,
            upper,
            (self.right - padding).max(left),
            (self.lower - padding).max(upper),
        )
    }

    /// The image box inside a reservation that carries `margin`: shifted by
    /// `margin / 2` and shrunk by the whole margin, so odd margins leave the
    /// extra cell on the right and lower side.
    pub fn image_box(&self, margin: u32) -> Self {
        Self::new(
            self.position().adjust((margin / 2) as i32),
            self.size().remove_margin(margin),
        )
    }

    pub fn scale(&self, factor: f64) -> Self {
        let edge = |v: i32| (v as f64 * factor).round() as i32;
        Self::from_edges(
            edge(self.left),
            edge(self.upper),
            edge(self.right),
            edge(self.lower),
        )
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bounds({}, {}, {}, {})",
            self.left, self.upper, self.right, self.lower
        )
    }
}

/// Whether an image is placed as-is or turned by a quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    #[default]
    Upright,
    Rotate90,
}

impl Orientation {
    /// The persisted name: `none` or `rotate90`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Upright => "none",
            Orientation::Rotate90 => "rotate90",
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            Orientation::Upright => Orientation::Rotate90,
            Orientation::Rotate90 => Orientation::Upright,
        }
    }

    /// Apply this orientation to an upright size.
    pub fn orient(&self, size: Size) -> Size {
        match self {
            Orientation::Upright => size,
            Orientation::Rotate90 => size.transpose(),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "upright" => Ok(Orientation::Upright),
            "rotate90" | "rotate_90" | "rotate-90" => Ok(Orientation::Rotate90),
            other => Err(ConfigError::UnknownOrientation(other.to_string())),
        }
    }
}
