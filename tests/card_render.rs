mod common;

use cardgen::card::{self, CardRequest};
use cardgen::layout::{self, LayoutRequest, WrapPolicy};
use cardgen::resources::ResourceCache;
use cardgen::{qr, CardError};
use common::{test_config, SAMPLE_TEXT, SAMPLE_URL, TEMPLATE_COLORS};
use image::{Rgba, RgbaImage};

#[test]
fn card_has_fixed_dimensions_and_stays_under_the_cap() {
    let (cfg, _guard) = test_config();
    let res = ResourceCache::new();
    res.check(&cfg).unwrap();

    let png = card::render_png(&cfg, &res, &CardRequest::new(SAMPLE_TEXT, SAMPLE_URL)).unwrap();
    assert!(png.len() < 1024 * 1024);

    let img = image::load_from_memory(&png).unwrap();
    assert_eq!((img.width(), img.height()), (800, 1000));
}

#[test]
fn qr_band_matches_an_independent_render() {
    let (cfg, _guard) = test_config();
    let res = ResourceCache::new();

    let card_img = card::render(&cfg, &res, &CardRequest::new(SAMPLE_TEXT, SAMPLE_URL)).unwrap();
    let expected = qr::generate(SAMPLE_URL, cfg.qr_size).unwrap();

    let qr_x = (cfg.card_width - cfg.qr_size) / 2;
    let qr_y = cfg.card_height - cfg.qr_size - cfg.qr_margin;
    for y in 0..cfg.qr_size {
        for x in 0..cfg.qr_size {
            assert_eq!(
                card_img.get_pixel(qr_x + x, qr_y + y),
                expected.get_pixel(x, y),
                "qr pixel mismatch at ({x},{y})"
            );
        }
    }
}

#[test]
fn identical_requests_yield_identical_bytes() {
    let (cfg, _guard) = test_config();

    // fresh caches on both sides, so caching cannot mask a difference
    let first = card::render_png(&cfg, &ResourceCache::new(), &CardRequest::new(SAMPLE_TEXT, SAMPLE_URL)).unwrap();
    let second = card::render_png(&cfg, &ResourceCache::new(), &CardRequest::new(SAMPLE_TEXT, SAMPLE_URL)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn long_cjk_text_wraps_to_multiple_lines_within_the_band() {
    let (cfg, _guard) = test_config();
    let res = ResourceCache::new();
    let font = res.font(&cfg.font_path).unwrap();

    let text = SAMPLE_TEXT.repeat(5);
    let req = LayoutRequest {
        text: &text,
        max_width: cfg.card_width - 2 * cfg.text_margin,
        max_height: 670,
        default_font_size: cfg.default_font_size,
        min_font_size: cfg.min_font_size,
        font_step: cfg.font_step,
        policy: WrapPolicy::CharacterGreedy,
        max_lines: cfg.max_lines,
    };
    let fitted = layout::layout_text(&font, &req);
    assert!(fitted.lines.len() >= 2);
    assert!(fitted.lines.len() <= cfg.max_lines);
    assert!(fitted.width <= req.max_width);
}

#[test]
fn title_and_url_captions_leave_ink() {
    let (cfg, _guard) = test_config();
    let res = ResourceCache::new();

    let base = card::render(&cfg, &res, &CardRequest::new(SAMPLE_TEXT, SAMPLE_URL)).unwrap();

    let titled_req = CardRequest {
        title: Some("Example Domain"),
        ..CardRequest::new(SAMPLE_TEXT, SAMPLE_URL)
    };
    let titled = card::render(&cfg, &res, &titled_req).unwrap();
    assert_ne!(base.as_raw(), titled.as_raw());

    let mut no_url_cfg = cfg.clone();
    no_url_cfg.show_url = false;
    let no_url = card::render(&no_url_cfg, &res, &CardRequest::new(SAMPLE_TEXT, SAMPLE_URL)).unwrap();
    assert_ne!(base.as_raw(), no_url.as_raw());
}

#[test]
fn template_index_switches_the_background() {
    let (cfg, _guard) = test_config();
    let res = ResourceCache::new();

    for (i, color) in TEMPLATE_COLORS.iter().enumerate() {
        let req = CardRequest { template: i, ..CardRequest::new(SAMPLE_TEXT, SAMPLE_URL) };
        let img = card::render(&cfg, &res, &req).unwrap();
        // bottom-left corner is clear of icon, text, qr and captions
        assert_eq!(img.get_pixel(5, 990).0, *color);
    }
}

#[test]
fn invalid_requests_are_rejected_up_front() {
    let (cfg, _guard) = test_config();
    let res = ResourceCache::new();

    let long: String = "测".repeat(cfg.max_text_chars + 1);
    for req in [
        CardRequest::new("", SAMPLE_URL),
        CardRequest::new(&long, SAMPLE_URL),
        CardRequest::new(SAMPLE_TEXT, ""),
        CardRequest { template: 99, ..CardRequest::new(SAMPLE_TEXT, SAMPLE_URL) },
    ] {
        let err = card::render(&cfg, &res, &req).unwrap_err();
        assert!(matches!(err, CardError::InvalidInput(_)), "got {err:?}");
    }
}

#[test]
fn vanished_template_reports_resource_missing() {
    let (mut cfg, _guard) = test_config();
    cfg.templates[0] = cfg.templates[0].with_file_name("gone.png");
    let err = card::render(&cfg, &ResourceCache::new(), &CardRequest::new(SAMPLE_TEXT, SAMPLE_URL))
        .unwrap_err();
    assert!(matches!(err, CardError::ResourceMissing { .. }));
}

#[test]
fn oversized_cards_are_downscaled_exactly_once() {
    let (mut cfg, _guard) = test_config();

    // noise compresses so badly the first encode is guaranteed over 1 MiB
    let mut state = 0x9e3779b9u32;
    let noisy = RgbaImage::from_fn(800, 1000, |_, _| {
        state = state.wrapping_mul(1664525).wrapping_add(1013904223);
        let b = state.to_le_bytes();
        Rgba([b[0], b[1], b[2], 255])
    });
    let noisy_path = cfg.templates[0].with_file_name("noisy.png");
    noisy.save(&noisy_path).unwrap();
    cfg.templates[0] = noisy_path;

    let png = card::render_png(&cfg, &ResourceCache::new(), &CardRequest::new(SAMPLE_TEXT, SAMPLE_URL))
        .unwrap();
    let img = image::load_from_memory(&png).unwrap();
    // one 0.8x pass and no further iteration, even if still over the cap
    assert_eq!((img.width(), img.height()), (640, 800));
}
