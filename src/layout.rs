//! Text-fit and layout engine. Picks a font size by linear descent,
//! wraps greedily under an explicit policy, and places blocks with
//! floor-division centering. All results are pure functions of the
//! inputs, so identical requests lay out identically.

use crate::text;
use rusttype::Font;

/// How a segment is broken into lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapPolicy {
    /// Break between any two characters. The right default for CJK text,
    /// which carries no spaces to break at.
    CharacterGreedy,
    /// Break at whitespace only, keeping words whole.
    WordGreedy,
}

/// Where the quote block sits vertically inside the text band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAnchor {
    /// Centered between the top edge and the QR band.
    Center,
    /// Fixed offset from the top edge.
    TopMargin,
}

/// One block of text plus the box it must fit into.
#[derive(Debug, Clone)]
pub struct LayoutRequest<'a> {
    pub text: &'a str,
    pub max_width: u32,
    pub max_height: u32,
    pub default_font_size: u32,
    pub min_font_size: u32,
    pub font_step: u32,
    pub policy: WrapPolicy,
    pub max_lines: usize,
}

/// Wrapped lines plus whether anything was dropped by the line cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedLines {
    pub lines: Vec<String>,
    pub truncated: bool,
}

/// Result of laying out a request: the chosen size, the final lines and
/// the ink bounding box of the whole block.
#[derive(Debug, Clone)]
pub struct FittedText {
    pub font_size: u32,
    pub lines: Vec<String>,
    pub width: u32,
    pub height: u32,
    pub truncated: bool,
}

/// Horizontal offset that centers a block in a container. Floor division,
/// so a block wider than its container gets a negative offset instead of
/// a lopsided positive one.
pub fn center_x(block: u32, container: u32) -> i32 {
    (container as i32 - block as i32).div_euclid(2)
}

/// Largest candidate size at which the text, measured as one line, fits
/// the box. Candidates descend from `default` in `step` decrements with
/// `min` always tried last. Never fails: an overflow at `min` is the
/// caller's to accept. A zero step descends by one.
pub fn fit(font: &Font<'_>, req: &LayoutRequest<'_>) -> u32 {
    let mut size = req.default_font_size;
    loop {
        let px = size as f32;
        let overflows = text::line_width(font, px, req.text) > req.max_width
            || text::line_height(font, px) > req.max_height;
        if !overflows || size <= req.min_font_size {
            return size;
        }
        size = size.saturating_sub(req.font_step.max(1)).max(req.min_font_size);
    }
}

/// Greedy wrap at a fixed size, truncated to `max_lines`. Explicit `\n`
/// always forces a break; blank segments survive as empty lines.
pub fn wrap(
    font: &Font<'_>,
    px: f32,
    text: &str,
    max_width: u32,
    policy: WrapPolicy,
    max_lines: usize,
) -> WrappedLines {
    let mut lines = wrap_uncapped(font, px, text, max_width, policy);
    let truncated = lines.len() > max_lines;
    lines.truncate(max_lines);
    WrappedLines { lines, truncated }
}

/// Full layout pass: fit the size, wrap at that size, measure the block.
pub fn layout_text(font: &Font<'_>, req: &LayoutRequest<'_>) -> FittedText {
    let font_size = fit(font, req);
    let px = font_size as f32;
    let wrapped = wrap(font, px, req.text, req.max_width, req.policy, req.max_lines);
    let width = wrapped
        .lines
        .iter()
        .map(|line| text::line_width(font, px, line))
        .max()
        .unwrap_or(0);
    let height = wrapped.lines.len() as u32 * text::line_height(font, px);
    FittedText {
        font_size,
        lines: wrapped.lines,
        width,
        height,
        truncated: wrapped.truncated,
    }
}

fn wrap_uncapped(font: &Font<'_>, px: f32, text: &str, max_width: u32, policy: WrapPolicy) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let mut lines = Vec::new();
    for segment in text.split('\n') {
        if segment.is_empty() {
            lines.push(String::new());
            continue;
        }
        match policy {
            WrapPolicy::CharacterGreedy => wrap_chars(font, px, segment, max_width, &mut lines),
            WrapPolicy::WordGreedy => wrap_words(font, px, segment, max_width, &mut lines),
        }
    }
    lines
}

fn wrap_chars(font: &Font<'_>, px: f32, segment: &str, max_width: u32, lines: &mut Vec<String>) {
    let mut current = String::new();
    for ch in segment.chars() {
        let mut candidate = current.clone();
        candidate.push(ch);
        // a lone character always starts a line, even one too wide for the box
        if current.is_empty() || text::line_width(font, px, &candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push(ch);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
}

fn wrap_words(font: &Font<'_>, px: f32, segment: &str, max_width: u32, lines: &mut Vec<String>) {
    let mut current: Vec<&str> = Vec::new();
    for word in segment.split_whitespace() {
        if current.is_empty() {
            current.push(word);
            continue;
        }
        let candidate = format!("{} {}", current.join(" "), word);
        if text::line_width(font, px, &candidate) <= max_width {
            current.push(word);
        } else {
            lines.push(current.join(" "));
            current = vec![word];
        }
    }
    if !current.is_empty() {
        lines.push(current.join(" "));
    }
}
