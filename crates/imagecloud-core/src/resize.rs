//! Resize policies for growing and shrinking image sizes by a step.

use crate::errors::ConfigError;
use crate::geometry::Size;
use std::fmt;
use std::str::FromStr;

/// How a size changes when adjusted by a step.
///
/// A single policy is used for an entire placement run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResizePolicy {
    /// Add the step to each dimension independently.
    NoResize,
    /// Add the step to the width and derive the height from the aspect ratio.
    #[default]
    MaintainAspectRatio,
    /// Scale both dimensions by the percentage the step represents of the width.
    MaintainPercentageChange,
}

impl ResizePolicy {
    pub const ALL: [ResizePolicy; 3] = [
        ResizePolicy::NoResize,
        ResizePolicy::MaintainAspectRatio,
        ResizePolicy::MaintainPercentageChange,
    ];

    /// Adjust `size` by `step` (negative to shrink). Dimensions saturate at zero.
    ///
    /// Degenerate sizes have no aspect ratio and fall back to [`ResizePolicy::NoResize`].
    pub fn adjust(self, size: Size, step: i32) -> Size {
        if size.is_empty() {
            return additive(size, step);
        }
        let width = size.width as f64;
        let height = size.height as f64;
        match self {
            ResizePolicy::NoResize => additive(size, step),
            ResizePolicy::MaintainAspectRatio => {
                let new_width = (width + step as f64).max(0.0);
                let new_height = (new_width / (width / height)).round();
                Size::new(new_width as u32, new_height as u32)
            }
            ResizePolicy::MaintainPercentageChange => {
                let percent = step as f64 / width;
                Size::new(
                    (width * (1.0 + percent)).round().max(0.0) as u32,
                    (height * (1.0 + percent)).round().max(0.0) as u32,
                )
            }
        }
    }

    /// Persisted name, matching the layout file format.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResizePolicy::NoResize => "NO_RESIZE_TYPE",
            ResizePolicy::MaintainAspectRatio => "MAINTAIN_ASPECT_RATIO",
            ResizePolicy::MaintainPercentageChange => "MAINTAIN_PERCENTAGE_CHANGE",
        }
    }
}

fn additive(size: Size, step: i32) -> Size {
    let apply = |v: u32| (v as i64 + step as i64).max(0) as u32;
    Size::new(apply(size.width), apply(size.height))
}

impl fmt::Display for ResizePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResizePolicy {
    type Err = ConfigError;

    /// Accepts the persisted names as well as snake and kebab case spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        match normalized.as_str() {
            "NO_RESIZE_TYPE" | "NO_RESIZE" | "NONE" => Ok(ResizePolicy::NoResize),
            "MAINTAIN_ASPECT_RATIO" | "ASPECT_RATIO" => Ok(ResizePolicy::MaintainAspectRatio),
            "MAINTAIN_PERCENTAGE_CHANGE" | "PERCENTAGE_CHANGE" => {
                Ok(ResizePolicy::MaintainPercentageChange)
            }
            _ => Err(ConfigError::UnknownResizePolicy(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_resize() {
        let size = Size::new(10, 4);
        assert_eq!(size.adjust(2, ResizePolicy::NoResize), Size::new(12, 6));
        assert_eq!(size.adjust(-5, ResizePolicy::NoResize), Size::new(5, 0));
    }

    #[test]
    fn test_maintain_aspect_ratio() {
        let size = Size::new(20, 10);
        assert_eq!(
            size.adjust(-2, ResizePolicy::MaintainAspectRatio),
            Size::new(18, 9)
        );
        assert_eq!(
            size.adjust(3, ResizePolicy::MaintainAspectRatio),
            Size::new(23, 12)
        );
    }

    #[test]
    fn test_maintain_percentage_change() {
        let size = Size::new(10, 30);
        // 1 of 10 is ten percent.
        assert_eq!(
            size.adjust(1, ResizePolicy::MaintainPercentageChange),
            Size::new(11, 33)
        );
        assert_eq!(
            size.adjust(-1, ResizePolicy::MaintainPercentageChange),
            Size::new(9, 27)
        );
    }

    #[test]
    fn test_shrink_always_narrows() {
        for policy in ResizePolicy::ALL {
            let mut size = Size::new(37, 13);
            while !size.is_empty() {
                let next = size.adjust(-1, policy);
                assert!(next.width < size.width, "{policy} stalled at {size}");
                size = next;
            }
        }
    }

    #[test]
    fn test_degenerate_size_falls_back() {
        let size = Size::new(0, 5);
        assert_eq!(
            size.adjust(1, ResizePolicy::MaintainAspectRatio),
            Size::new(1, 6)
        );
    }

    #[test]
    fn test_parse_policy() {
        assert_eq!(
            "NO_RESIZE_TYPE".parse::<ResizePolicy>().unwrap(),
            ResizePolicy::NoResize
        );
        assert_eq!(
            "maintain-aspect-ratio".parse::<ResizePolicy>().unwrap(),
            ResizePolicy::MaintainAspectRatio
        );
        for policy in ResizePolicy::ALL {
            assert_eq!(policy.as_str().parse::<ResizePolicy>().unwrap(), policy);
        }
        assert!(matches!(
            "stretch".parse::<ResizePolicy>(),
            Err(ConfigError::UnknownResizePolicy(_))
        ));
    }
}
