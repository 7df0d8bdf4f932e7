//! Card composition: background template, corner icon, fitted quote
//! text, optional title, QR code and URL caption, then PNG encoding
//! with a one-shot size fallback.

use crate::config::CardConfig;
use crate::error::CardError;
use crate::layout::{self, FittedText, LayoutRequest, VerticalAnchor};
use crate::qr;
use crate::resources::ResourceCache;
use crate::text;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{ImageEncoder, Rgba, RgbaImage};
use rusttype::Font;
use tracing::debug;

const TEXT_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);
const URL_COLOR: Rgba<u8> = Rgba([102, 102, 102, 255]);

/// Applied once when the first encode exceeds the byte cap. The second
/// encode is final whatever its size.
const SHRINK_FACTOR: f32 = 0.8;

/// Everything needed to render one card.
#[derive(Debug, Clone)]
pub struct CardRequest<'a> {
    pub text: &'a str,
    pub url: &'a str,
    pub title: Option<&'a str>,
    pub template: usize,
}

impl<'a> CardRequest<'a> {
    pub fn new(text: &'a str, url: &'a str) -> Self {
        CardRequest { text, url, title: None, template: 0 }
    }
}

/// Compose the card. Deterministic: the same request against the same
/// resources yields the same pixels.
pub fn render(
    cfg: &CardConfig,
    resources: &ResourceCache,
    req: &CardRequest<'_>,
) -> Result<RgbaImage, CardError> {
    validate(cfg, req)?;

    let bg = resources.template(&cfg.templates[req.template], cfg.card_width, cfg.card_height)?;
    let mut canvas = (*bg).clone();

    if let Some(icon_path) = &cfg.icon_path {
        let icon = resources.icon(icon_path, cfg.icon_size)?;
        overlay_alpha(&mut canvas, &icon, cfg.icon_margin as i32, cfg.icon_margin as i32);
    }

    let font = resources.font(&cfg.font_path)?;

    let qr_img = qr::generate(req.url, cfg.qr_size)?;
    let qr_x = layout::center_x(cfg.qr_size, cfg.card_width);
    let qr_y = (cfg.card_height - cfg.qr_size - cfg.qr_margin) as i32;
    overlay(&mut canvas, &qr_img, qr_x, qr_y);

    // the quote band ends where the title (or, without one, the QR) begins
    let mut band_limit = qr_y;
    if let Some(title) = req.title {
        let title_h = text::line_height(&font, cfg.title_font_size as f32) as i32;
        let title_y = qr_y - cfg.title_gap as i32 - title_h;
        draw_caption(cfg, &font, &mut canvas, cfg.title_font_size, title_y, TEXT_COLOR, title);
        band_limit = title_y;
    }

    let fitted = draw_quote(cfg, &font, &mut canvas, req.text, band_limit);
    debug!(
        font_size = fitted.font_size,
        lines = fitted.lines.len(),
        truncated = fitted.truncated,
        "quote laid out"
    );

    if cfg.show_url {
        let url_y = qr_y + cfg.qr_size as i32 + cfg.url_gap as i32;
        draw_caption(cfg, &font, &mut canvas, cfg.url_font_size, url_y, URL_COLOR, req.url);
    }

    Ok(canvas)
}

/// Render and encode in one step.
pub fn render_png(
    cfg: &CardConfig,
    resources: &ResourceCache,
    req: &CardRequest<'_>,
) -> Result<Vec<u8>, CardError> {
    let img = render(cfg, resources, req)?;
    encode_png_bounded(cfg, &img)
}

/// PNG bytes for the canvas, with the two-tier size policy: one encode,
/// and if that overshoots `max_png_bytes`, one 0.8x downscale and a
/// final encode. No further iteration.
pub fn encode_png_bounded(cfg: &CardConfig, img: &RgbaImage) -> Result<Vec<u8>, CardError> {
    let png = encode_png(img)?;
    if png.len() <= cfg.max_png_bytes {
        return Ok(png);
    }
    let w = ((img.width() as f32 * SHRINK_FACTOR) as u32).max(1);
    let h = ((img.height() as f32 * SHRINK_FACTOR) as u32).max(1);
    debug!(from = png.len(), "png over cap, downscaling to {w}x{h}");
    let shrunk = image::imageops::resize(img, w, h, FilterType::Lanczos3);
    encode_png(&shrunk)
}

pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, CardError> {
    let mut png = Vec::new();
    let encoder = PngEncoder::new(&mut png);
    encoder
        .write_image(img.as_raw(), img.width(), img.height(), image::ExtendedColorType::Rgba8)
        .map_err(|e| CardError::Render(format!("png encode failed: {e}")))?;
    Ok(png)
}

fn validate(cfg: &CardConfig, req: &CardRequest<'_>) -> Result<(), CardError> {
    if req.text.trim().is_empty() {
        return Err(CardError::InvalidInput("text is required".into()));
    }
    if req.text.chars().count() > cfg.max_text_chars {
        return Err(CardError::InvalidInput(format!(
            "text too long, max length is {}",
            cfg.max_text_chars
        )));
    }
    if req.url.trim().is_empty() {
        return Err(CardError::InvalidInput("url is required".into()));
    }
    if req.template >= cfg.templates.len() {
        return Err(CardError::InvalidInput("invalid background template index".into()));
    }
    Ok(())
}

/// Lay the quote out inside the band above `band_limit` and paint it,
/// every line centered on its own.
fn draw_quote(
    cfg: &CardConfig,
    font: &Font<'_>,
    canvas: &mut RgbaImage,
    quote: &str,
    band_limit: i32,
) -> FittedText {
    let band = band_limit.max(0) as u32;
    let req = LayoutRequest {
        text: quote,
        max_width: cfg.card_width.saturating_sub(2 * cfg.text_margin),
        max_height: band.saturating_sub(2 * cfg.text_margin),
        default_font_size: cfg.default_font_size,
        min_font_size: cfg.min_font_size,
        font_step: cfg.font_step,
        policy: cfg.wrap_policy,
        max_lines: cfg.max_lines,
    };
    let fitted = layout::layout_text(font, &req);

    let px = fitted.font_size as f32;
    let line_h = text::line_height(font, px);
    let y0 = match cfg.vertical_anchor {
        VerticalAnchor::Center => layout::center_x(fitted.height, band),
        VerticalAnchor::TopMargin => cfg.text_top_offset as i32,
    };
    for (i, line) in fitted.lines.iter().enumerate() {
        let lx = layout::center_x(text::line_width(font, px, line), cfg.card_width);
        let ly = y0 + (i as u32 * line_h) as i32;
        text::draw_line(canvas, font, px, lx, ly, TEXT_COLOR, line);
    }
    fitted
}

/// Single centered line, ellipsised to the text band width.
fn draw_caption(
    cfg: &CardConfig,
    font: &Font<'_>,
    canvas: &mut RgbaImage,
    font_size: u32,
    y: i32,
    color: Rgba<u8>,
    content: &str,
) {
    let px = font_size as f32;
    let max_w = cfg.card_width.saturating_sub(2 * cfg.text_margin);
    let line = text::truncate_to_width(font, px, content, max_w);
    let x = layout::center_x(text::line_width(font, px, &line), cfg.card_width);
    text::draw_line(canvas, font, px, x, y, color, &line);
}

fn overlay(base: &mut RgbaImage, over: &RgbaImage, x: i32, y: i32) {
    for oy in 0..over.height() {
        for ox in 0..over.width() {
            let bx = x + ox as i32;
            let by = y + oy as i32;
            if bx < 0 || by < 0 || bx >= base.width() as i32 || by >= base.height() as i32 {
                continue;
            }
            base.put_pixel(bx as u32, by as u32, *over.get_pixel(ox, oy));
        }
    }
}

fn overlay_alpha(base: &mut RgbaImage, over: &RgbaImage, x: i32, y: i32) {
    for oy in 0..over.height() {
        for ox in 0..over.width() {
            let p = over.get_pixel(ox, oy);
            let a = p.0[3] as f32 / 255.0;
            if a <= 0.0 {
                continue;
            }
            let bx = x + ox as i32;
            let by = y + oy as i32;
            if bx < 0 || by < 0 || bx >= base.width() as i32 || by >= base.height() as i32 {
                continue;
            }
            let dst = base.get_pixel_mut(bx as u32, by as u32);
            let inv = 1.0 - a;
            dst.0[0] = (p.0[0] as f32 * a + dst.0[0] as f32 * inv) as u8;
            dst.0[1] = (p.0[1] as f32 * a + dst.0[1] as f32 * inv) as u8;
            dst.0[2] = (p.0[2] as f32 * a + dst.0[2] as f32 * inv) as u8;
            dst.0[3] = 255;
        }
    }
}
