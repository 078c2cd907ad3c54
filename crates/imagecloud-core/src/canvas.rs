//! Canvas specification and masks.

use crate::errors::ConfigError;
use crate::geometry::Size;
use std::fmt;
use std::str::FromStr;

/// Pixel format of the rendered canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorMode {
    /// 8-bit grayscale
    L,
    Rgb,
    #[default]
    Rgba,
}

impl ColorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::L => "L",
            ColorMode::Rgb => "RGB",
            ColorMode::Rgba => "RGBA",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(ColorMode::L),
            "RGB" => Ok(ColorMode::Rgb),
            "RGBA" => Ok(ColorMode::Rgba),
            _ => Err(ConfigError::UnknownColorMode(s.to_string())),
        }
    }
}

/// Cells of the canvas that can never be reserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasMask {
    size: Size,
    /// Row-major, `true` where the cell is masked out.
    blocked: Vec<bool>,
}

impl CanvasMask {
    /// Build a mask by asking `is_blocked(x, y)` for every cell.
    pub fn from_fn(size: Size, mut is_blocked: impl FnMut(u32, u32) -> bool) -> Self {
        let mut blocked = Vec::with_capacity(size.area() as usize);
        for y in 0..size.height {
            for x in 0..size.width {
                blocked.push(is_blocked(x, y));
            }
        }
        Self { size, blocked }
    }

    /// Build a mask from row-major cells. Returns `None` if the length is wrong.
    pub fn from_cells(size: Size, blocked: Vec<bool>) -> Option<Self> {
        (blocked.len() as u64 == size.area()).then_some(Self { size, blocked })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn is_blocked(&self, x: u32, y: u32) -> bool {
        x < self.size.width
            && y < self.size.height
            && self.blocked[(y * self.size.width + x) as usize]
    }

    pub fn cells(&self) -> &[bool] {
        &self.blocked
    }

    pub fn blocked_count(&self) -> usize {
        self.blocked.iter().filter(|&&b| b).count()
    }
}

/// The target surface of a layout.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasSpec {
    pub name: String,
    pub size: Size,
    pub mode: ColorMode,
    /// Background color name or hex string. `None` leaves the canvas transparent.
    pub background: Option<String>,
    pub mask: Option<CanvasMask>,
}

impl CanvasSpec {
    pub fn new(size: Size) -> Self {
        Self {
            name: "imagecloud".to_string(),
            size,
            mode: ColorMode::default(),
            background: None,
            mask: None,
        }
    }

    /// A canvas shaped by a mask. The mask's size becomes the canvas size.
    pub fn masked(mask: CanvasMask) -> Self {
        let mut canvas = Self::new(mask.size());
        canvas.mask = Some(mask);
        canvas
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_mode(mut self, mode: ColorMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self
    }

    pub fn with_mask(mut self, mask: CanvasMask) -> Self {
        self.size = mask.size();
        self.mask = Some(mask);
        self
    }
}

impl Default for CanvasSpec {
    fn default() -> Self {
        Self::new(Size::new(400, 200))
    }
}
