//! JSON summary of a generated layout.

use crate::error::Result;
use imagecloud_core::{Bounds, LayoutConfig};
use imagecloud_layout::{Layout, LayoutItem};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An axis-aligned box as `[left, upper, right, lower]`.
pub type BoxEdges = [i32; 4];

fn edges(bounds: &Bounds) -> BoxEdges {
    [bounds.left, bounds.upper, bounds.right, bounds.lower]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSummary {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub mode: String,
    pub background: Option<String>,
    pub masked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub name: String,
    pub weight: f64,
    pub reservation_id: u32,
    pub orientation: String,
    pub placement: BoxEdges,
    pub reservation: BoxEdges,
    pub attempts: usize,
}

impl From<&LayoutItem> for ItemSummary {
    fn from(item: &LayoutItem) -> Self {
        Self {
            name: item.image.name.clone(),
            weight: item.image.weight,
            reservation_id: item.reservation_id.0,
            orientation: item.orientation.as_str().to_string(),
            placement: edges(&item.placement),
            reservation: edges(&item.reservation),
            attempts: item.attempts,
        }
    }
}

/// Serializable overview of a [`Layout`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSummary {
    pub canvas: CanvasSummary,
    /// Settings the layout was generated with
    pub config: LayoutConfig,
    pub items: Vec<ItemSummary>,
    pub dropped: Vec<String>,
    pub expansion_rounds: u32,
    pub reserved_area: u64,
    /// Reserved share of the canvas area, in `0.0..=1.0`
    pub coverage: f64,
}

impl LayoutSummary {
    pub fn from_layout(layout: &Layout) -> Self {
        let canvas = &layout.canvas;
        let reserved_area = layout.reserved_area();
        let canvas_area = canvas.size.area();
        Self {
            canvas: CanvasSummary {
                name: canvas.name.clone(),
                width: canvas.size.width,
                height: canvas.size.height,
                mode: canvas.mode.as_str().to_string(),
                background: canvas.background.clone(),
                masked: canvas.mask.is_some(),
            },
            config: layout.config.clone(),
            items: layout.items.iter().map(ItemSummary::from).collect(),
            dropped: layout.dropped.iter().map(|image| image.name.clone()).collect(),
            expansion_rounds: layout.expansion_rounds,
            reserved_area,
            coverage: if canvas_area == 0 {
                0.0
            } else {
                reserved_area as f64 / canvas_area as f64
            },
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imagecloud_core::{CanvasSpec, ImageId, Orientation, Size, WeightedImage};
    use imagecloud_layout::ReservationId;

    #[test]
    fn test_summary_reports_items_and_drops() {
        let mut layout = Layout::new(CanvasSpec::new(Size::new(10, 10)), LayoutConfig::default());
        let reservation = Bounds::from_edges(0, 0, 5, 10);
        layout.grid.reserve(ReservationId(1), "a.png", reservation);
        layout.items.push(LayoutItem {
            image: WeightedImage::new(2.0, Size::new(4, 9), "a.png", ImageId(0)),
            placement: reservation.image_box(1),
            orientation: Orientation::Upright,
            reservation,
            reservation_id: ReservationId(1),
            attempts: 3,
        });
        layout
            .dropped
            .push(WeightedImage::new(1.0, Size::new(20, 20), "huge.png", ImageId(1)));

        let summary = LayoutSummary::from_layout(&layout);
        assert_eq!(summary.items.len(), 1);
        assert_eq!(summary.items[0].reservation, [0, 0, 5, 10]);
        assert_eq!(summary.items[0].orientation, "none");
        assert_eq!(summary.dropped, vec!["huge.png".to_string()]);
        assert_eq!(summary.reserved_area, 50);
        assert!((summary.coverage - 0.5).abs() < 1e-12);

        let json = summary.to_json().unwrap();
        assert!(json.contains(r#""margin": 1"#));
        let parsed: LayoutSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, summary);
    }
}
