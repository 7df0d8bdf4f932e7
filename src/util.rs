use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sha2::{Digest, Sha256};

/// Inline data URI for a PNG, the shape the extension drops straight
/// into an `<img src>`.
pub fn png_data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", BASE64.encode(png))
}

/// Content-addressed file name for a saved card. Identical bytes map to
/// the same name, so repeated requests overwrite rather than pile up.
pub fn card_file_name(png: &[u8]) -> String {
    let digest = Sha256::digest(png);
    format!("{}.png", hex::encode(&digest[..8]))
}

/// Only names we could have produced ourselves are served back. Keeps
/// `/cards/<name>` from ever walking the filesystem.
pub fn is_safe_card_name(name: &str) -> bool {
    if name.len() > 64 || !name.ends_with(".png") {
        return false;
    }
    let stem = &name[..name.len() - 4];
    !stem.is_empty() && stem.chars().all(|c| c.is_ascii_hexdigit())
}
