//! Card geometry, typography and serving policy. Built once at startup
//! and shared read-only; nothing here changes while the server runs.

use crate::error::CardError;
use crate::layout::{VerticalAnchor, WrapPolicy};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// How `/generate` hands the finished PNG back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Inline `data:image/png;base64,...` URI in the JSON response.
    Base64,
    /// Written under `cards_dir`, response carries a `/cards/<name>` path.
    File,
}

#[derive(Debug, Clone)]
pub struct CardConfig {
    pub card_width: u32,
    pub card_height: u32,

    pub qr_size: u32,
    pub qr_margin: u32,

    pub text_margin: u32,
    pub max_text_chars: usize,
    pub default_font_size: u32,
    pub min_font_size: u32,
    pub max_font_size: u32,
    pub font_step: u32,
    pub max_lines: usize,
    pub wrap_policy: WrapPolicy,
    pub vertical_anchor: VerticalAnchor,
    /// Top edge of the quote block when `vertical_anchor` is `TopMargin`.
    pub text_top_offset: u32,

    pub title_font_size: u32,
    pub title_gap: u32,
    pub url_font_size: u32,
    pub url_gap: u32,
    pub show_url: bool,

    pub icon_size: u32,
    pub icon_margin: u32,

    pub font_path: PathBuf,
    pub templates: Vec<PathBuf>,
    pub icon_path: Option<PathBuf>,

    pub response_mode: ResponseMode,
    pub cards_dir: PathBuf,
    pub card_ttl: Duration,
    pub cleanup_interval: Duration,

    /// Encoded PNGs above this get one 0.8x downscale pass.
    pub max_png_bytes: usize,
}

impl Default for CardConfig {
    fn default() -> Self {
        let assets = PathBuf::from(env::var("CARDGEN_ASSETS").unwrap_or_else(|_| "assets".into()));
        let templates = ["bg1.png", "bg2.png", "bg3.png"]
            .iter()
            .map(|name| assets.join("templates").join(name))
            .collect();
        CardConfig {
            card_width: 800,
            card_height: 1000,
            qr_size: 200,
            qr_margin: 50,
            text_margin: 40,
            max_text_chars: 500,
            default_font_size: 32,
            min_font_size: 24,
            max_font_size: 48,
            font_step: 2,
            max_lines: 8,
            wrap_policy: WrapPolicy::CharacterGreedy,
            vertical_anchor: VerticalAnchor::Center,
            text_top_offset: 144,
            title_font_size: 28,
            title_gap: 24,
            url_font_size: 20,
            url_gap: 12,
            show_url: true,
            icon_size: 64,
            icon_margin: 40,
            font_path: assets.join("fonts").join("DejaVuSans.ttf"),
            templates,
            icon_path: Some(assets.join("icons").join("quote.png")),
            response_mode: ResponseMode::Base64,
            cards_dir: PathBuf::from("cards"),
            card_ttl: Duration::from_secs(24 * 60 * 60),
            cleanup_interval: Duration::from_secs(60 * 60),
            max_png_bytes: 1024 * 1024,
        }
    }
}

impl CardConfig {
    /// Default config with environment overrides applied, validated.
    pub fn from_env() -> Result<Self, CardError> {
        let mut cfg = CardConfig::default();
        if let Ok(mode) = env::var("CARDGEN_RESPONSE") {
            cfg.response_mode = match mode.as_str() {
                "base64" => ResponseMode::Base64,
                "file" => ResponseMode::File,
                other => {
                    return Err(CardError::InvalidInput(format!(
                        "CARDGEN_RESPONSE must be 'base64' or 'file', got '{other}'"
                    )))
                }
            };
        }
        if let Ok(policy) = env::var("CARDGEN_WRAP") {
            cfg.wrap_policy = match policy.as_str() {
                "char" => WrapPolicy::CharacterGreedy,
                "word" => WrapPolicy::WordGreedy,
                other => {
                    return Err(CardError::InvalidInput(format!(
                        "CARDGEN_WRAP must be 'char' or 'word', got '{other}'"
                    )))
                }
            };
        }
        if let Ok(anchor) = env::var("CARDGEN_ANCHOR") {
            cfg.vertical_anchor = match anchor.as_str() {
                "center" => VerticalAnchor::Center,
                "top" => VerticalAnchor::TopMargin,
                other => {
                    return Err(CardError::InvalidInput(format!(
                        "CARDGEN_ANCHOR must be 'center' or 'top', got '{other}'"
                    )))
                }
            };
        }
        if let Ok(dir) = env::var("CARDGEN_CARDS_DIR") {
            cfg.cards_dir = PathBuf::from(dir);
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), CardError> {
        if self.card_width == 0 || self.card_height == 0 {
            return Err(CardError::InvalidInput("card dimensions must be nonzero".into()));
        }
        if self.min_font_size == 0 || self.min_font_size > self.default_font_size {
            return Err(CardError::InvalidInput(
                "font sizes must satisfy 0 < min <= default".into(),
            ));
        }
        if self.default_font_size > self.max_font_size {
            return Err(CardError::InvalidInput(
                "default font size must not exceed max".into(),
            ));
        }
        if self.font_step == 0 {
            return Err(CardError::InvalidInput("font step must be nonzero".into()));
        }
        if self.max_lines == 0 {
            return Err(CardError::InvalidInput("max lines must be nonzero".into()));
        }
        if self.templates.is_empty() {
            return Err(CardError::InvalidInput("at least one template is required".into()));
        }
        if self.qr_size + self.qr_margin >= self.card_height {
            return Err(CardError::InvalidInput(
                "qr size plus margin must leave room for text".into(),
            ));
        }
        Ok(())
    }
}
