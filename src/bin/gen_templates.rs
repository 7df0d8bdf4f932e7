//! Writes the default background templates and the corner quote icon
//! under the assets directory. Run once before first launch:
//!
//!     cargo run --bin gen_templates

use image::{Rgba, RgbaImage};
use std::env;
use std::fs;
use std::path::PathBuf;

const CARD_W: u32 = 800;
const CARD_H: u32 = 1000;
const ICON_SIZE: u32 = 64;

const BACKGROUNDS: [(&str, [u8; 3]); 3] = [
    ("bg1.png", [255, 255, 255]),
    ("bg2.png", [247, 241, 227]),
    ("bg3.png", [234, 242, 248]),
];

fn main() {
    let assets = PathBuf::from(env::var("CARDGEN_ASSETS").unwrap_or_else(|_| "assets".into()));
    let templates = assets.join("templates");
    let icons = assets.join("icons");
    fs::create_dir_all(&templates).expect("create templates dir");
    fs::create_dir_all(&icons).expect("create icons dir");

    for (name, [r, g, b]) in BACKGROUNDS {
        let img = RgbaImage::from_pixel(CARD_W, CARD_H, Rgba([r, g, b, 255]));
        let path = templates.join(name);
        img.save(&path).expect("write template");
        println!("wrote {}", path.display());
    }

    let path = icons.join("quote.png");
    quote_icon(ICON_SIZE).save(&path).expect("write icon");
    println!("wrote {}", path.display());
}

/// Opening quotation mark built from two comma shapes. Drawn
/// geometrically so the icon does not depend on any font file.
fn quote_icon(size: u32) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(size, size, Rgba([0, 0, 0, 0]));
    let s = size as f32;
    draw_comma(&mut img, 0.26 * s, 0.34 * s, 0.15 * s);
    draw_comma(&mut img, 0.66 * s, 0.34 * s, 0.15 * s);
    img
}

fn draw_comma(img: &mut RgbaImage, cx: f32, cy: f32, r: f32) {
    let color = Rgba([70, 70, 70, 230]);
    let (w, h) = img.dimensions();
    for y in 0..h {
        for x in 0..w {
            let fx = x as f32 + 0.5;
            let fy = y as f32 + 0.5;
            let dx = fx - cx;
            let dy = fy - cy;
            let in_head = dx * dx + dy * dy <= r * r;
            let in_tail = fy > cy
                && fy <= cy + 2.2 * r
                && fx >= cx - r
                && fx <= cx + r - (fy - cy) * 0.8;
            if in_head || in_tail {
                img.put_pixel(x, y, color);
            }
        }
    }
}
