//! Layout persistence.
//!
//! A layout is stored as a CSV with one row per placed item. The first row
//! also carries the run configuration and the canvas description. The
//! occupancy grid is written to a separate headerless CSV of reservation ids,
//! and each item's image is saved as a PNG beside the layout.
//!
//! Loading validates every reservation before committing it, so a damaged
//! file is reported as [`IoError::InvalidData`].

use crate::csv::{format_matrix, parse_matrix, CsvTable, CsvWriter};
use crate::error::{IoError, Result};
use crate::mask::{read_mask_csv, write_mask_csv};
use crate::paths::{resolve_recorded_path, stem_of, unused_filepath};
use crate::store::ImageCollaborator;
use image::ImageFormat;
use imagecloud_core::{
    Bounds, CanvasSpec, ColorMode, LayoutConfig, Orientation, Position, ResizePolicy, Size,
    WeightedImage,
};
use imagecloud_layout::{Layout, LayoutItem, ReservationGrid, ReservationId};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const MAX_IMAGES: &str = "layout_max_images";
pub const MIN_IMAGE_WIDTH: &str = "layout_min_image_size_width";
pub const MIN_IMAGE_HEIGHT: &str = "layout_min_image_size_height";
pub const MAX_IMAGE_WIDTH: &str = "layout_max_image_size_width";
pub const MAX_IMAGE_HEIGHT: &str = "layout_max_image_size_height";
pub const IMAGE_STEP: &str = "layout_image_step";
pub const RESIZE_TYPE: &str = "layout_resize_type";
pub const SCALE: &str = "layout_scale";
pub const MARGIN: &str = "layout_margin";
pub const NAME: &str = "layout_name";
pub const TOTAL_THREADS: &str = "layout_total_threads";
pub const PREFER_HORIZONTAL: &str = "layout_prefer_horizontal";

pub const CANVAS_NAME: &str = "layout_canvas_name";
pub const CANVAS_MODE: &str = "layout_canvas_mode";
pub const CANVAS_BACKGROUND: &str = "layout_canvas_background_color";
pub const CANVAS_WIDTH: &str = "layout_canvas_size_width";
pub const CANVAS_HEIGHT: &str = "layout_canvas_size_height";
pub const CANVAS_RESERVATION_MAP: &str = "layout_canvas_reservation_map_csv_filepath";
pub const CANVAS_MASK: &str = "layout_canvas_mask_csv_filepath";

pub const ITEM_IMAGE: &str = "layout_item_image_filepath";
pub const ITEM_WEIGHT: &str = "layout_item_image_weight";
pub const ITEM_X: &str = "layout_item_position_x";
pub const ITEM_Y: &str = "layout_item_position_y";
pub const ITEM_WIDTH: &str = "layout_item_size_width";
pub const ITEM_HEIGHT: &str = "layout_item_size_height";
pub const ITEM_ORIENTATION: &str = "layout_item_orientation";
pub const ITEM_RESERVED_X: &str = "layout_item_reserved_position_x";
pub const ITEM_RESERVED_Y: &str = "layout_item_reserved_position_y";
pub const ITEM_RESERVED_WIDTH: &str = "layout_item_reserved_size_width";
pub const ITEM_RESERVED_HEIGHT: &str = "layout_item_reserved_size_height";
pub const ITEM_RESERVATION_NO: &str = "layout_item_reservation_no";

const RUN_FIELDS: [&str; 12] = [
    MAX_IMAGES,
    MIN_IMAGE_WIDTH,
    MIN_IMAGE_HEIGHT,
    MAX_IMAGE_WIDTH,
    MAX_IMAGE_HEIGHT,
    IMAGE_STEP,
    RESIZE_TYPE,
    SCALE,
    MARGIN,
    NAME,
    TOTAL_THREADS,
    PREFER_HORIZONTAL,
];

const CANVAS_FIELDS: [&str; 7] = [
    CANVAS_NAME,
    CANVAS_MODE,
    CANVAS_BACKGROUND,
    CANVAS_WIDTH,
    CANVAS_HEIGHT,
    CANVAS_RESERVATION_MAP,
    CANVAS_MASK,
];

const ITEM_FIELDS: [&str; 12] = [
    ITEM_IMAGE,
    ITEM_WEIGHT,
    ITEM_X,
    ITEM_Y,
    ITEM_WIDTH,
    ITEM_HEIGHT,
    ITEM_ORIENTATION,
    ITEM_RESERVED_X,
    ITEM_RESERVED_Y,
    ITEM_RESERVED_WIDTH,
    ITEM_RESERVED_HEIGHT,
    ITEM_RESERVATION_NO,
];

/// Files written by [`save_layout`].
#[derive(Debug, Clone, PartialEq)]
pub struct SavedLayout {
    pub layout_csv: PathBuf,
    pub reservation_map_csv: PathBuf,
    pub mask_csv: Option<PathBuf>,
    /// One per item, in item order
    pub item_images: Vec<PathBuf>,
}

/// A layout read back from disk.
#[derive(Debug, Clone)]
pub struct LoadedLayout {
    /// Layout whose grid was rebuilt from the item reservations
    pub layout: Layout,
    /// Grid read from the reservation map file, if one was recorded
    pub stored_grid: Option<ReservationGrid>,
}

impl LoadedLayout {
    /// True unless a stored grid exists and differs from the rebuilt one.
    pub fn grid_round_trips(&self) -> bool {
        self.stored_grid
            .as_ref()
            .map_or(true, |stored| stored == &self.layout.grid)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn headers() -> Vec<&'static str> {
    RUN_FIELDS
        .iter()
        .chain(CANVAS_FIELDS.iter())
        .chain(ITEM_FIELDS.iter())
        .copied()
        .collect()
}

fn run_values(layout: &Layout, reservation_map: &str, mask: &str) -> Vec<String> {
    let config = &layout.config;
    let canvas = &layout.canvas;
    let optional = |value: Option<u32>| value.map(|v| v.to_string()).unwrap_or_default();
    vec![
        config.max_images.to_string(),
        config.min_image_size.width.to_string(),
        config.min_image_size.height.to_string(),
        optional(config.max_image_size.map(|s| s.width)),
        optional(config.max_image_size.map(|s| s.height)),
        config.step.to_string(),
        config.resize_policy.as_str().to_string(),
        config.scale.to_string(),
        config.margin.to_string(),
        canvas.name.clone(),
        config.parallelism.to_string(),
        config.prefer_horizontal.to_string(),
        canvas.name.clone(),
        canvas.mode.as_str().to_string(),
        canvas.background.clone().unwrap_or_default(),
        canvas.size.width.to_string(),
        canvas.size.height.to_string(),
        reservation_map.to_string(),
        mask.to_string(),
    ]
}

fn item_values(item: &LayoutItem, image_file: &str) -> Vec<String> {
    let placement = &item.placement;
    let reservation = &item.reservation;
    vec![
        image_file.to_string(),
        item.image.weight.to_string(),
        placement.left.to_string(),
        placement.upper.to_string(),
        placement.width().to_string(),
        placement.height().to_string(),
        item.orientation.as_str().to_string(),
        reservation.left.to_string(),
        reservation.upper.to_string(),
        reservation.width().to_string(),
        reservation.height().to_string(),
        item.reservation_id.0.to_string(),
    ]
}

/// Write `layout` into `directory`, never overwriting existing files.
///
/// Item images are fetched from `images` by handle and saved as PNG.
pub fn save_layout(
    layout: &Layout,
    images: &dyn ImageCollaborator,
    directory: &Path,
) -> Result<SavedLayout> {
    std::fs::create_dir_all(directory)?;
    let stem = stem_of(&layout.canvas.name);

    let reservation_map_csv = unused_filepath(&directory.join(format!("{stem}.reservation_map.csv")));
    std::fs::write(&reservation_map_csv, format_matrix(layout.grid.rows()))?;

    let mask_csv = match &layout.canvas.mask {
        Some(mask) => {
            let path = unused_filepath(&directory.join(format!("{stem}.mask.csv")));
            write_mask_csv(mask, &path)?;
            Some(path)
        }
        None => None,
    };

    let mut item_images = Vec::with_capacity(layout.items.len());
    for item in &layout.items {
        let path = unused_filepath(&directory.join(format!("{}.png", stem_of(&item.image.name))));
        images.save(item.image.handle, &path, ImageFormat::Png)?;
        item_images.push(path);
    }

    let mut writer = CsvWriter::new();
    writer.quoted_record(&headers());
    let mut run = run_values(
        layout,
        &file_name(&reservation_map_csv),
        &mask_csv.as_deref().map(file_name).unwrap_or_default(),
    );
    let blank_run = vec![String::new(); run.len()];
    if layout.items.is_empty() {
        run.extend(std::iter::repeat(String::new()).take(ITEM_FIELDS.len()));
        writer.record(&run);
    }
    for (index, (item, image)) in layout.items.iter().zip(&item_images).enumerate() {
        let mut row = if index == 0 { run.clone() } else { blank_run.clone() };
        row.extend(item_values(item, &file_name(image)));
        writer.record(&row);
    }

    let layout_csv = unused_filepath(&directory.join(format!("{stem}.layout.csv")));
    std::fs::write(&layout_csv, writer.finish())?;
    log::info!(
        "Saved layout with {} items to {}",
        layout.items.len(),
        layout_csv.display()
    );

    Ok(SavedLayout {
        layout_csv,
        reservation_map_csv,
        mask_csv,
        item_images,
    })
}

fn read_config(table: &CsvTable) -> Result<LayoutConfig> {
    let defaults = LayoutConfig::default();
    let mut config = defaults.clone();
    if table.rows.is_empty() {
        return Ok(config);
    }

    config.max_images = table.parse_field(0, MAX_IMAGES)?.unwrap_or(defaults.max_images);
    config.min_image_size = Size::new(
        table
            .parse_field(0, MIN_IMAGE_WIDTH)?
            .unwrap_or(defaults.min_image_size.width),
        table
            .parse_field(0, MIN_IMAGE_HEIGHT)?
            .unwrap_or(defaults.min_image_size.height),
    );
    config.max_image_size = match (
        table.parse_field::<u32>(0, MAX_IMAGE_WIDTH)?,
        table.parse_field::<u32>(0, MAX_IMAGE_HEIGHT)?,
    ) {
        (Some(width), Some(height)) => Some(Size::new(width, height)),
        _ => None,
    };
    config.step = table.parse_field(0, IMAGE_STEP)?.unwrap_or(defaults.step);
    if let Some(policy) = table.get(0, RESIZE_TYPE) {
        config.resize_policy = policy.parse::<ResizePolicy>()?;
    }
    config.scale = table.parse_field(0, SCALE)?.unwrap_or(defaults.scale);
    config.margin = table.parse_field(0, MARGIN)?.unwrap_or(defaults.margin);
    config.parallelism = table
        .parse_field(0, TOTAL_THREADS)?
        .unwrap_or(defaults.parallelism);
    config.prefer_horizontal = table
        .parse_field(0, PREFER_HORIZONTAL)?
        .unwrap_or(defaults.prefer_horizontal);
    config.validate()?;
    Ok(config)
}

fn read_canvas(table: &CsvTable, base_dir: &Path) -> Result<CanvasSpec> {
    let size = Size::new(
        table.require_field(0, CANVAS_WIDTH)?,
        table.require_field(0, CANVAS_HEIGHT)?,
    );
    let mut canvas = CanvasSpec::new(size);
    if let Some(name) = table.get(0, CANVAS_NAME).or_else(|| table.get(0, NAME)) {
        canvas = canvas.with_name(name);
    }
    if let Some(mode) = table.get(0, CANVAS_MODE) {
        canvas = canvas.with_mode(mode.parse::<ColorMode>()?);
    }
    if let Some(background) = table.get(0, CANVAS_BACKGROUND) {
        canvas = canvas.with_background(background);
    }
    if let Some(recorded) = table.get(0, CANVAS_MASK) {
        let mask = read_mask_csv(&resolve_recorded_path(recorded, base_dir))?;
        if mask.size() != size {
            return Err(IoError::invalid(format!(
                "mask is {} but the canvas is {size}",
                mask.size()
            )));
        }
        canvas = canvas.with_mask(mask);
    }
    Ok(canvas)
}

fn read_stored_grid(table: &CsvTable, canvas: &CanvasSpec, base_dir: &Path) -> Result<Option<ReservationGrid>> {
    let Some(recorded) = table.get(0, CANVAS_RESERVATION_MAP) else {
        return Ok(None);
    };
    let path = resolve_recorded_path(recorded, base_dir);
    if !path.exists() {
        return Err(IoError::MissingFile(path));
    }
    let rows = parse_matrix::<u32>(&std::fs::read_to_string(&path)?)?;
    let size = Size::new(
        rows.first().map_or(0, |row| row.len() as u32),
        rows.len() as u32,
    );
    if size != canvas.size {
        return Err(IoError::invalid(format!(
            "reservation map is {size} but the canvas is {}",
            canvas.size
        )));
    }
    let cells = rows.into_iter().flatten().collect();
    ReservationGrid::from_cells(size, cells, canvas.mask.clone())
        .map(Some)
        .ok_or_else(|| IoError::invalid("reservation map does not match the canvas"))
}

fn read_bounds(table: &CsvTable, row: usize, fields: [&str; 4]) -> Result<Option<Bounds>> {
    let [x, y, width, height] = fields;
    match (
        table.parse_field::<i32>(row, x)?,
        table.parse_field::<i32>(row, y)?,
        table.parse_field::<u32>(row, width)?,
        table.parse_field::<u32>(row, height)?,
    ) {
        (Some(x), Some(y), Some(width), Some(height)) => Ok(Some(Bounds::new(
            Position::new(x, y),
            Size::new(width, height),
        ))),
        _ => Ok(None),
    }
}

/// Read a layout written by [`save_layout`], loading item images into `images`.
///
/// Recorded files are looked up at their recorded path, then in the layout's
/// directory.
pub fn load_layout(path: &Path, images: &mut dyn ImageCollaborator) -> Result<LoadedLayout> {
    let table = CsvTable::read(path)?;
    table.require_columns(&[CANVAS_WIDTH, CANVAS_HEIGHT, ITEM_IMAGE, ITEM_X, ITEM_Y, ITEM_WIDTH, ITEM_HEIGHT])?;
    if table.rows.is_empty() {
        return Err(IoError::invalid("layout has no rows"));
    }
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

    let config = read_config(&table)?;
    let canvas = read_canvas(&table, base_dir)?;
    let stored_grid = read_stored_grid(&table, &canvas, base_dir)?;
    let mut layout = Layout::new(canvas, config);
    let mut seen = HashSet::new();

    for row in 0..table.rows.len() {
        let Some(recorded) = table.get(row, ITEM_IMAGE) else {
            continue;
        };
        let line = row + 2;
        let placement = read_bounds(&table, row, [ITEM_X, ITEM_Y, ITEM_WIDTH, ITEM_HEIGHT])?
            .ok_or_else(|| IoError::parse("incomplete placement box", line))?;
        let reservation = read_bounds(
            &table,
            row,
            [
                ITEM_RESERVED_X,
                ITEM_RESERVED_Y,
                ITEM_RESERVED_WIDTH,
                ITEM_RESERVED_HEIGHT,
            ],
        )?
        .unwrap_or(placement);
        let id = ReservationId(
            table
                .parse_field::<u32>(row, ITEM_RESERVATION_NO)?
                .unwrap_or(row as u32 + 1),
        );
        let orientation = match table.get(row, ITEM_ORIENTATION) {
            Some(value) => value.parse::<Orientation>()?,
            None => Orientation::Upright,
        };
        let weight = table.parse_field::<f64>(row, ITEM_WEIGHT)?.unwrap_or(1.0);

        if !id.is_reserved() {
            return Err(IoError::invalid(format!("line {line}: reservation number 0 is not allowed")));
        }
        if !seen.insert(id) {
            return Err(IoError::invalid(format!("line {line}: duplicate reservation {id}")));
        }
        if !layout.grid.is_free(&reservation) {
            return Err(IoError::invalid(format!(
                "line {line}: reservation {reservation} is outside the canvas or overlaps another"
            )));
        }

        let loaded = images.load(&resolve_recorded_path(recorded, base_dir))?;
        let image = WeightedImage::new(weight, orientation.orient(placement.size()), loaded.name, loaded.handle);
        layout.grid.reserve(id, image.name.clone(), reservation);
        layout.items.push(LayoutItem {
            image,
            placement,
            orientation,
            reservation,
            reservation_id: id,
            attempts: 0,
        });
    }

    log::info!(
        "Loaded layout with {} items from {}",
        layout.items.len(),
        path.display()
    );
    Ok(LoadedLayout { layout, stored_grid })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ImageStore;
    use image::{DynamicImage, Rgba, RgbaImage};
    use imagecloud_core::{CanvasMask, ImageId};

    fn solid(store: &mut ImageStore, width: u32, height: u32) -> ImageId {
        store.insert(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([200, 100, 50, 255]),
        )))
    }

    fn push_item(layout: &mut Layout, handle: ImageId, name: &str, reservation: Bounds, orientation: Orientation) {
        let id = layout.grid.next_id();
        let placement = reservation.image_box(layout.config.margin);
        layout.grid.reserve(id, name, reservation);
        layout.items.push(LayoutItem {
            image: WeightedImage::new(2.0, orientation.orient(placement.size()), name, handle),
            placement,
            orientation,
            reservation,
            reservation_id: id,
            attempts: 1,
        });
    }

    fn sample_layout(store: &mut ImageStore) -> Layout {
        let canvas = CanvasSpec::new(Size::new(20, 10))
            .with_name("trip")
            .with_background("#ffffff");
        let config = LayoutConfig::default()
            .with_margin(2)
            .with_max_image_size(Size::new(12, 8))
            .with_resize_policy(ResizePolicy::NoResize);
        let mut layout = Layout::new(canvas, config);
        let a = solid(store, 8, 6);
        let b = solid(store, 4, 6);
        push_item(&mut layout, a, "photos/cat.png", Bounds::from_edges(0, 0, 10, 8), Orientation::Upright);
        push_item(&mut layout, b, "dog.jpg", Bounds::from_edges(12, 0, 20, 6), Orientation::Rotate90);
        layout
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ImageStore::new();
        let layout = sample_layout(&mut store);

        let saved = save_layout(&layout, &store, dir.path()).unwrap();
        assert_eq!(saved.layout_csv, dir.path().join("trip.layout.csv"));
        assert_eq!(saved.item_images[0], dir.path().join("cat.png"));
        assert_eq!(saved.item_images[1], dir.path().join("dog.png"));
        assert!(saved.mask_csv.is_none());

        let mut reloaded_store = ImageStore::new();
        let loaded = load_layout(&saved.layout_csv, &mut reloaded_store).unwrap();
        assert!(loaded.grid_round_trips());
        assert!(loaded.layout.grid_matches_items());

        let reloaded = &loaded.layout;
        assert_eq!(reloaded.canvas.name, "trip");
        assert_eq!(reloaded.canvas.size, Size::new(20, 10));
        assert_eq!(reloaded.canvas.background.as_deref(), Some("#ffffff"));
        assert_eq!(reloaded.config.margin, 2);
        assert_eq!(reloaded.config.max_image_size, Some(Size::new(12, 8)));
        assert_eq!(reloaded.config.resize_policy, ResizePolicy::NoResize);
        assert_eq!(reloaded.items.len(), 2);
        for (before, after) in layout.items.iter().zip(&reloaded.items) {
            assert_eq!(before.placement, after.placement);
            assert_eq!(before.reservation, after.reservation);
            assert_eq!(before.orientation, after.orientation);
            assert_eq!(before.reservation_id, after.reservation_id);
            assert_eq!(before.image.weight, after.image.weight);
            assert_eq!(before.image.size, after.image.size);
        }
        assert_eq!(reloaded_store.size(reloaded.items[1].image.handle), Some(Size::new(4, 6)));
    }

    #[test]
    fn test_saving_twice_uses_fresh_names() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ImageStore::new();
        let layout = sample_layout(&mut store);
        save_layout(&layout, &store, dir.path()).unwrap();
        let second = save_layout(&layout, &store, dir.path()).unwrap();
        assert_eq!(second.layout_csv, dir.path().join("trip.layout_1.csv"));
        assert_eq!(second.item_images[0], dir.path().join("cat_1.png"));

        let mut reloaded = ImageStore::new();
        let loaded = load_layout(&second.layout_csv, &mut reloaded).unwrap();
        assert!(loaded.grid_round_trips());
    }

    #[test]
    fn test_masked_layout_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ImageStore::new();
        let mask = CanvasMask::from_fn(Size::new(6, 4), |x, _| x >= 4);
        let mut layout = Layout::new(CanvasSpec::masked(mask.clone()), LayoutConfig::default().with_margin(0));
        let handle = solid(&mut store, 4, 4);
        push_item(&mut layout, handle, "only.png", Bounds::from_edges(0, 0, 4, 4), Orientation::Upright);

        let saved = save_layout(&layout, &store, dir.path()).unwrap();
        assert!(saved.mask_csv.is_some());
        let loaded = load_layout(&saved.layout_csv, &mut ImageStore::new()).unwrap();
        assert_eq!(loaded.layout.canvas.mask.as_ref(), Some(&mask));
        assert!(loaded.grid_round_trips());
    }

    #[test]
    fn test_missing_reservation_columns_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ImageStore::new();
        let handle = solid(&mut store, 3, 3);
        store.save(handle, &dir.path().join("a.png"), ImageFormat::Png).unwrap();
        store.save(handle, &dir.path().join("b.png"), ImageFormat::Png).unwrap();
        let path = dir.path().join("minimal.csv");
        std::fs::write(
            &path,
            "layout_canvas_size_width,layout_canvas_size_height,layout_item_image_filepath,\
             layout_item_position_x,layout_item_position_y,layout_item_size_width,layout_item_size_height\n\
             10,10,a.png,0,0,3,3\n\
             ,,b.png,5,5,3,3\n",
        )
        .unwrap();

        let loaded = load_layout(&path, &mut ImageStore::new()).unwrap();
        let items = &loaded.layout.items;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].reservation, items[0].placement);
        assert_eq!(items[1].reservation_id, ReservationId(2));
        assert!(loaded.stored_grid.is_none());
        assert!(loaded.grid_round_trips());
    }

    #[test]
    fn test_rejects_overlapping_reservations() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ImageStore::new();
        let handle = solid(&mut store, 3, 3);
        store.save(handle, &dir.path().join("a.png"), ImageFormat::Png).unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(
            &path,
            "layout_canvas_size_width,layout_canvas_size_height,layout_item_image_filepath,\
             layout_item_position_x,layout_item_position_y,layout_item_size_width,layout_item_size_height\n\
             10,10,a.png,0,0,4,4\n\
             ,,a.png,2,2,4,4\n",
        )
        .unwrap();
        assert!(matches!(
            load_layout(&path, &mut ImageStore::new()),
            Err(IoError::InvalidData(_))
        ));

        std::fs::write(
            &path,
            "layout_canvas_size_width,layout_canvas_size_height,layout_item_image_filepath,\
             layout_item_position_x,layout_item_position_y,layout_item_size_width,layout_item_size_height\n\
             10,10,a.png,8,8,4,4\n",
        )
        .unwrap();
        assert!(matches!(
            load_layout(&path, &mut ImageStore::new()),
            Err(IoError::InvalidData(_))
        ));
    }

    #[test]
    fn test_detects_tampered_reservation_map() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ImageStore::new();
        let layout = sample_layout(&mut store);
        let saved = save_layout(&layout, &store, dir.path()).unwrap();

        let mut cells = vec![vec![0u32; 20]; 10];
        cells[9][19] = 7;
        std::fs::write(&saved.reservation_map_csv, format_matrix(cells.iter().map(Vec::as_slice))).unwrap();

        let loaded = load_layout(&saved.layout_csv, &mut ImageStore::new()).unwrap();
        assert!(!loaded.grid_round_trips());
    }
}
