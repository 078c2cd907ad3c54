//! Layout invariants checked over generated inputs, plus end-to-end scenarios.

use imagecloud_core::{
    CanvasSpec, ImageId, LayoutConfig, Orientation, ResizePolicy, Size, WeightedImage,
};
use imagecloud_layout::{
    expand, fit_proportionally, sample, CloudGenerator, Layout, ReservationGrid, ReservationId,
    SampleRequest, SequentialSearch,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn image(weight: f64, size: Size, id: u64) -> WeightedImage {
    WeightedImage::new(weight, size, format!("img-{id}"), ImageId(id))
}

fn policy_strategy() -> impl Strategy<Value = ResizePolicy> {
    prop_oneof![
        Just(ResizePolicy::NoResize),
        Just(ResizePolicy::MaintainAspectRatio),
        Just(ResizePolicy::MaintainPercentageChange),
    ]
}

fn images_strategy() -> impl Strategy<Value = Vec<WeightedImage>> {
    prop::collection::vec((0.0f64..10.0, 1u32..40, 1u32..40), 1..6).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (weight, w, h))| image(weight, Size::new(w, h), i as u64))
            .collect()
    })
}

fn generate(
    images: Vec<WeightedImage>,
    canvas: Size,
    config: LayoutConfig,
    seed: u64,
) -> Layout {
    let generator = CloudGenerator::new(config).unwrap();
    let mut rng = StdRng::seed_from_u64(seed);
    generator
        .generate(images, CanvasSpec::new(canvas), &mut rng)
        .unwrap()
}

fn assert_no_overlap(layout: &Layout) {
    for (i, a) in layout.items.iter().enumerate() {
        for b in &layout.items[i + 1..] {
            assert!(
                !a.reservation.intersects(&b.reservation),
                "{} overlaps {}",
                a.reservation,
                b.reservation
            );
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_layout_invariants(
        images in images_strategy(),
        width in 16u32..80,
        height in 16u32..80,
        margin in 0u32..4,
        policy in policy_strategy(),
        seed in any::<u64>(),
    ) {
        let input_count = images.len();
        let config = LayoutConfig::new()
            .with_margin(margin)
            .with_resize_policy(policy)
            .with_min_image_size(Size::new(2, 2));
        let layout = generate(images, Size::new(width, height), config, seed);

        assert_no_overlap(&layout);
        let canvas = layout.canvas_bounds();
        for item in &layout.items {
            prop_assert!(canvas.contains(&item.reservation));
            prop_assert!(item.reservation.contains(&item.placement));
            prop_assert_eq!(item.placement.size(), item.orientation.orient(item.image.size));
            prop_assert_eq!(item.reservation.size(), item.placement.size().add_margin(margin));
        }
        prop_assert_eq!(layout.items.len() + layout.dropped.len(), input_count);
        prop_assert!(layout.reconstruct_grid() == layout.grid);
    }

    #[test]
    fn prop_expansion_never_shrinks(
        images in images_strategy(),
        size in 16u32..64,
        margin in 0u32..3,
        seed in any::<u64>(),
    ) {
        let config = LayoutConfig::new().with_margin(margin).with_min_image_size(Size::new(2, 2));
        let layout = generate(images, Size::new(size, size), config, seed);

        let mut expanded = layout.clone();
        expand(&mut expanded);

        for (before, after) in layout.items.iter().zip(&expanded.items) {
            prop_assert_eq!(before.reservation_id, after.reservation_id);
            prop_assert!(after.reservation.contains(&before.reservation));
            prop_assert!(after.reservation.area() >= before.reservation.area());
        }
        assert_no_overlap(&expanded);
        prop_assert!(expanded.reconstruct_grid() == expanded.grid);
    }

    #[test]
    fn prop_fit_is_monotone_in_weight(
        heavy in 1.0f64..100.0,
        ratio in 0.01f64..0.99,
        width in 1u32..60,
        height in 1u32..60,
        canvas_area in 100u64..40_000,
        policy in policy_strategy(),
        margin in 0u32..3,
    ) {
        let size = Size::new(width, height);
        let images = vec![image(heavy, size, 0), image(heavy * ratio, size, 1)];
        let fitted = fit_proportionally(&images, canvas_area, policy, 1, margin);
        prop_assert!(fitted[0].image.size.area() >= fitted[1].image.size.area());
    }

    #[test]
    fn prop_sampler_stops_below_min(
        width in 1u32..10,
        height in 1u32..10,
        seed in any::<u64>(),
    ) {
        let grid = ReservationGrid::new(Size::new(50, 50));
        let request = SampleRequest {
            target: Size::new(width, height),
            min_size: Size::new(10, 10),
            margin: 1,
            policy: ResizePolicy::MaintainAspectRatio,
            step: 1,
            start: Orientation::Upright,
            allow_rotation: true,
        };
        let mut rng = StdRng::seed_from_u64(seed);
        let result = sample(&grid, &SequentialSearch, &request, &mut rng);
        prop_assert!(!result.found());
        prop_assert_eq!(result.attempts, 1);
    }
}

#[test]
fn test_three_weighted_images() {
    let images = vec![
        image(1.0, Size::new(10, 10), 0),
        image(3.0, Size::new(10, 10), 1),
        image(2.0, Size::new(10, 10), 2),
    ];
    let config = LayoutConfig::new()
        .with_margin(0)
        .with_min_image_size(Size::new(2, 2));
    let layout = generate(images, Size::new(100, 100), config, 7);

    assert_eq!(layout.items.len(), 3);
    assert!(layout.reserved_area() <= 10_000);
    let heaviest = &layout.items[0];
    assert_eq!(heaviest.image.weight, 3.0);
    for other in &layout.items[1..] {
        assert!(heaviest.reservation.area() >= other.reservation.area());
    }
    assert_no_overlap(&layout);
}

#[test]
fn test_single_image_fills_canvas() {
    let config = LayoutConfig::new()
        .with_margin(0)
        .with_prefer_horizontal(1.0);
    let layout = generate(
        vec![image(1.0, Size::new(10, 10), 0)],
        Size::new(50, 30),
        config,
        3,
    );

    assert_eq!(layout.items.len(), 1);
    let item = &layout.items[0];
    assert_eq!(item.reservation_id, ReservationId(1));
    assert_eq!(item.orientation, Orientation::Upright);
    assert_eq!(item.placement.height(), 30);
}

#[test]
fn test_oversized_images_need_canvas_growth() {
    let images = vec![
        image(1.0, Size::new(5, 5), 0),
        image(1.0, Size::new(5, 5), 1),
    ];
    let config = LayoutConfig::new()
        .with_margin(0)
        .with_min_image_size(Size::new(5, 5));

    let fixed = generate(images.clone(), Size::new(4, 4), config.clone(), 5);
    assert!(fixed.items.is_empty());
    assert_eq!(fixed.dropped.len(), 2);
    assert_eq!(fixed.expansion_rounds, 0);

    let grown = generate(images, Size::new(4, 4), config.with_cloud_expansion(4), 5);
    assert_eq!(grown.items.len(), 2);
    assert!(grown.dropped.is_empty());
    assert!(grown.expansion_rounds > 0);
    assert!(grown.canvas.size.width > 4);
    assert_no_overlap(&grown);
}

#[test]
fn test_growth_respects_round_cap() {
    let images = vec![image(1.0, Size::new(5, 5), 0)];
    let config = LayoutConfig::new()
        .with_margin(0)
        .with_min_image_size(Size::new(5, 5))
        .with_cloud_expansion(1)
        .with_max_expansion_rounds(0);
    let layout = generate(images, Size::new(4, 4), config, 1);
    assert!(layout.items.is_empty());
    assert_eq!(layout.expansion_rounds, 0);
}

#[test]
fn test_maximize_empty_space_grows_boxes() {
    let images: Vec<_> = (0..4)
        .map(|i| image(4.0 - i as f64, Size::new(8, 6), i))
        .collect();
    let base = LayoutConfig::new().with_margin(2);
    let plain = generate(images.clone(), Size::new(90, 60), base.clone(), 17);
    let maximized = generate(
        images,
        Size::new(90, 60),
        base.with_maximize_empty_space(true),
        17,
    );

    assert_eq!(plain.items.len(), maximized.items.len());
    assert!(maximized.reserved_area() >= plain.reserved_area());
    assert!(maximized.grid_matches_items());
}
