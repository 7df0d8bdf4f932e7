//! QR generation for the card's link. Error correction stays at L so
//! modules stay coarse and scannable at 200px.

use crate::error::CardError;
use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};
use qrcode::{EcLevel, QrCode};

/// Quiet zone width in modules on each side.
const QUIET_ZONE: u32 = 4;

const DARK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const LIGHT: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Encode `url` and rasterise it to an exact `size` x `size` square.
pub fn generate(url: &str, size: u32) -> Result<RgbaImage, CardError> {
    let code = QrCode::with_error_correction_level(url.as_bytes(), EcLevel::L)
        .map_err(|_| CardError::Render("failed to build qr code".into()))?;
    Ok(render_modules(&code, size, QUIET_ZONE))
}

fn render_modules(code: &QrCode, size: u32, margin: u32) -> RgbaImage {
    let width_modules = code.width() as u32;
    let total_modules = width_modules + 2 * margin;
    let pixels_per_module = (size / total_modules).max(1);
    let actual_size = total_modules * pixels_per_module;

    let mut img = RgbaImage::from_pixel(actual_size, actual_size, LIGHT);
    for y in 0..width_modules {
        for x in 0..width_modules {
            if matches!(code[(x as usize, y as usize)], qrcode::Color::Dark) {
                let px0 = (x + margin) * pixels_per_module;
                let py0 = (y + margin) * pixels_per_module;
                for py in py0..(py0 + pixels_per_module) {
                    for px in px0..(px0 + pixels_per_module) {
                        img.put_pixel(px, py, DARK);
                    }
                }
            }
        }
    }

    // integer module blocks rarely land on the target exactly
    if actual_size != size {
        DynamicImage::ImageRgba8(img)
            .resize_exact(size, size, FilterType::Lanczos3)
            .to_rgba8()
    } else {
        img
    }
}
