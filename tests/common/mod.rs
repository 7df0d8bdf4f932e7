use cardgen::config::CardConfig;
use image::{Rgba, RgbaImage};
use tempfile::TempDir;

pub const SAMPLE_TEXT: &str = "这是一段测试文字,用于生成分享卡片。";
pub const SAMPLE_URL: &str = "https://example.com";

pub const TEMPLATE_COLORS: [[u8; 4]; 3] = [
    [255, 255, 255, 255],
    [247, 241, 227, 255],
    [234, 242, 248, 255],
];

/// Self-contained asset set in a temp dir: the repo font plus three
/// solid backgrounds and a flat icon. Keep the returned guard alive for
/// as long as the config is in use.
pub fn test_config() -> (CardConfig, TempDir) {
    let dir = tempfile::tempdir().unwrap();

    let font_src = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/fonts/DejaVuSans.ttf");
    let font_path = dir.path().join("font.ttf");
    std::fs::copy(font_src, &font_path).unwrap();

    let mut templates = Vec::new();
    for (i, color) in TEMPLATE_COLORS.iter().enumerate() {
        let path = dir.path().join(format!("bg{}.png", i + 1));
        RgbaImage::from_pixel(800, 1000, Rgba(*color)).save(&path).unwrap();
        templates.push(path);
    }

    let icon_path = dir.path().join("icon.png");
    RgbaImage::from_pixel(64, 64, Rgba([70, 70, 70, 200])).save(&icon_path).unwrap();

    let cfg = CardConfig {
        font_path,
        templates,
        icon_path: Some(icon_path),
        cards_dir: dir.path().join("cards"),
        ..CardConfig::default()
    };
    (cfg, dir)
}
