//! Single-line text measurement and rasterisation on top of rusttype.
//! Measurement and drawing share `Font::layout`, so a line that measures
//! inside a box is guaranteed to paint inside it.

use image::{Rgba, RgbaImage};
use rusttype::{point, Font, Scale};

/// Ink width of one line in pixels at the given size.
pub fn line_width(font: &Font<'_>, px: f32, text: &str) -> u32 {
    let scale = Scale::uniform(px);
    let v_metrics = font.v_metrics(scale);
    let mut width = 0f32;
    for glyph in font.layout(text, scale, point(0.0, v_metrics.ascent)) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            width = width.max(bb.max.x as f32);
        }
    }
    width.max(0.0).ceil() as u32
}

/// Vertical space one line occupies, ascent to descent plus the font's
/// own line gap.
pub fn line_height(font: &Font<'_>, px: f32) -> u32 {
    let v_metrics = font.v_metrics(Scale::uniform(px));
    (v_metrics.ascent - v_metrics.descent + v_metrics.line_gap).ceil() as u32
}

/// Paint one line with `(x, y)` as the top-left corner of its line box.
/// Glyph coverage is alpha-blended onto the canvas.
pub fn draw_line(img: &mut RgbaImage, font: &Font<'_>, px: f32, x: i32, y: i32, color: Rgba<u8>, text: &str) {
    let scale = Scale::uniform(px);
    let v_metrics = font.v_metrics(scale);
    let origin = point(x as f32, y as f32 + v_metrics.ascent);
    let (w, h) = (img.width() as i32, img.height() as i32);
    for glyph in font.layout(text, scale, origin) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px_x = bb.min.x + gx as i32;
                let px_y = bb.min.y + gy as i32;
                if px_x < 0 || px_y < 0 || px_x >= w || px_y >= h {
                    return;
                }
                let alpha = (v * color.0[3] as f32 / 255.0).clamp(0.0, 1.0);
                if alpha <= 0.0 {
                    return;
                }
                let dst = img.get_pixel_mut(px_x as u32, px_y as u32);
                for c in 0..3 {
                    dst.0[c] = (color.0[c] as f32 * alpha + dst.0[c] as f32 * (1.0 - alpha)).round() as u8;
                }
            });
        }
    }
}

/// Shorten `text` with a trailing ellipsis until it fits `max_width`.
/// Used for the single-line title and URL captions.
pub fn truncate_to_width(font: &Font<'_>, px: f32, text: &str, max_width: u32) -> String {
    if line_width(font, px, text) <= max_width {
        return text.to_string();
    }
    let chars: Vec<char> = text.chars().collect();
    let mut keep = chars.len();
    while keep > 0 {
        keep -= 1;
        let mut candidate: String = chars[..keep].iter().collect();
        candidate.push('\u{2026}');
        if line_width(font, px, &candidate) <= max_width {
            return candidate;
        }
    }
    "\u{2026}".to_string()
}

/// The font shipped with the repo, for unit tests across the crate.
#[cfg(test)]
pub fn test_font() -> Font<'static> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/fonts/DejaVuSans.ttf");
    let bytes = std::fs::read(path).unwrap();
    Font::try_from_vec(bytes).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_line_has_zero_width() {
        let font = test_font();
        assert_eq!(line_width(&font, 32.0, ""), 0);
    }

    #[test]
    fn width_grows_with_text_and_size() {
        let font = test_font();
        let short = line_width(&font, 32.0, "hi");
        let long = line_width(&font, 32.0, "hi there, longer line");
        assert!(long > short);
        let small = line_width(&font, 24.0, "measure me");
        let big = line_width(&font, 48.0, "measure me");
        assert!(big > small);
    }

    #[test]
    fn line_height_is_positive_and_monotonic() {
        let font = test_font();
        let h24 = line_height(&font, 24.0);
        let h48 = line_height(&font, 48.0);
        assert!(h24 > 0);
        assert!(h48 > h24);
    }

    #[test]
    fn draw_leaves_ink_on_canvas() {
        let font = test_font();
        let mut img = RgbaImage::from_pixel(200, 80, Rgba([255, 255, 255, 255]));
        draw_line(&mut img, &font, 32.0, 10, 10, Rgba([0, 0, 0, 255]), "ink");
        let touched = img.pixels().any(|p| p.0[0] < 250);
        assert!(touched);
    }

    #[test]
    fn draw_clips_at_canvas_edges() {
        let font = test_font();
        let mut img = RgbaImage::from_pixel(20, 20, Rgba([255, 255, 255, 255]));
        // mostly off-canvas, must not panic
        draw_line(&mut img, &font, 32.0, -15, -15, Rgba([0, 0, 0, 255]), "wide line");
        draw_line(&mut img, &font, 32.0, 15, 15, Rgba([0, 0, 0, 255]), "wide line");
    }

    #[test]
    fn truncate_keeps_short_text_intact() {
        let font = test_font();
        assert_eq!(truncate_to_width(&font, 28.0, "short", 10_000), "short");
    }

    #[test]
    fn truncate_fits_and_ends_with_ellipsis() {
        let font = test_font();
        let long = "a considerably longer caption that cannot fit";
        let max = line_width(&font, 28.0, "a consid");
        let cut = truncate_to_width(&font, 28.0, long, max);
        assert!(cut.ends_with('\u{2026}'));
        assert!(line_width(&font, 28.0, &cut) <= max);
    }
}
