//! Nearest-color quantization of an RGBA grid onto a bead palette.
//!
//! Every cell is matched by plain Euclidean RGB distance with a linear scan of
//! the palette; the first entry at the minimum distance wins. An optional
//! color cap keeps only the most frequent matches and re-matches the rest
//! against those survivors with the same rule.

use std::cmp::Reverse;
use std::num::NonZeroUsize;

use palette::Srgb;
use serde::Serialize;

use crate::color::{ColorEntry, distance_squared};
use crate::error::{Error, Result};

/// Pixels with alpha below this are treated as background.
const ALPHA_THRESHOLD: u8 = 128;

/// Color substituted for transparent pixels.
const BACKGROUND: Srgb<u8> = Srgb::new(255, 255, 255);

/// A frozen per-cell color assignment for one quantization run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pattern {
    width: u32,
    height: u32,
    /// Entries referenced by at least one cell, in input palette order.
    palette_in_use: Vec<ColorEntry>,
    /// Row-major indices into `palette_in_use`.
    cells: Vec<usize>,
}

impl Pattern {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn palette_in_use(&self) -> &[ColorEntry] {
        &self.palette_in_use
    }

    /// Row-major indices into [`Pattern::palette_in_use`].
    pub fn cell_indices(&self) -> &[usize] {
        &self.cells
    }

    /// Colors of all cells in row-major order (`y * width + x`).
    pub fn cells(&self) -> impl ExactSizeIterator<Item = &ColorEntry> + '_ {
        self.cells.iter().map(|&i| &self.palette_in_use[i])
    }

    pub fn cell(&self, x: u32, y: u32) -> Option<&ColorEntry> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.cells.get(idx).map(|&i| &self.palette_in_use[i])
    }

    /// Grid positions `(x, y)` of every cell with the given code.
    pub fn positions_of(&self, code: &str) -> Vec<(u32, u32)> {
        let Some(target) = self.palette_in_use.iter().position(|c| c.code() == code) else {
            return Vec::new();
        };
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &i)| i == target)
            .map(|(idx, _)| {
                let idx = idx as u32;
                (idx % self.width, idx / self.width)
            })
            .collect()
    }

    fn from_choices(width: u32, height: u32, palette: &[ColorEntry], choices: &[usize]) -> Self {
        let mut used = vec![false; palette.len()];
        for &c in choices {
            used[c] = true;
        }

        let mut remap = vec![0usize; palette.len()];
        let mut palette_in_use = Vec::new();
        for (i, entry) in palette.iter().enumerate() {
            if used[i] {
                remap[i] = palette_in_use.len();
                palette_in_use.push(entry.clone());
            }
        }

        Self {
            width,
            height,
            palette_in_use,
            cells: choices.iter().map(|&c| remap[c]).collect(),
        }
    }
}

/// Quantize every pixel against the whole palette.
pub fn quantize(pixels: &[u8], width: u32, height: u32, palette: &[ColorEntry]) -> Result<Pattern> {
    quantize_capped(pixels, width, height, palette, None)
}

/// Quantize, optionally limiting the result to the `max_colors` most frequent
/// matches.
///
/// With a cap, pass 1 matches against the full palette and counts how often
/// each entry was chosen. The most frequent entries survive (equal counts
/// favor the entry that reached its count first in row-major order) and pass
/// 2 re-matches only
/// the cells whose pass-1 entry was dropped. The result is identical to
/// quantizing directly against the surviving entries.
pub fn quantize_capped(
    pixels: &[u8],
    width: u32,
    height: u32,
    palette: &[ColorEntry],
    max_colors: Option<NonZeroUsize>,
) -> Result<Pattern> {
    if width == 0 || height == 0 {
        return Err(Error::ZeroDimension { width, height });
    }
    if palette.is_empty() {
        return Err(Error::EmptyPalette);
    }
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4));
    if expected != Some(pixels.len()) {
        return Err(Error::DimensionMismatch {
            width,
            height,
            len: pixels.len(),
        });
    }

    let colors: Vec<Srgb<u8>> = pixels.chunks_exact(4).map(effective_color).collect();

    let everything: Vec<usize> = (0..palette.len()).collect();
    let mut choices: Vec<usize> = colors
        .iter()
        .map(|&c| nearest(c, palette, &everything))
        .collect();

    if let Some(cap) = max_colors {
        let keep = most_frequent(&choices, palette.len(), cap.get());
        let survivors: Vec<usize> = (0..palette.len()).filter(|&i| keep[i]).collect();

        if survivors.len() < palette.len() {
            let mut rematched = 0usize;
            for (choice, &color) in choices.iter_mut().zip(&colors) {
                if !keep[*choice] {
                    *choice = nearest(color, palette, &survivors);
                    rematched += 1;
                }
            }
            tracing::debug!(cap = cap.get(), rematched, "applied palette size cap");
        }
    }

    let pattern = Pattern::from_choices(width, height, palette, &choices);
    tracing::debug!(
        width,
        height,
        palette = palette.len(),
        in_use = pattern.palette_in_use.len(),
        "quantized pattern"
    );
    Ok(pattern)
}

/// The color a pixel is matched with: its RGB, or white when mostly transparent.
#[inline]
fn effective_color(px: &[u8]) -> Srgb<u8> {
    if px[3] < ALPHA_THRESHOLD {
        BACKGROUND
    } else {
        Srgb::new(px[0], px[1], px[2])
    }
}

/// Index of the closest candidate; `candidates` must be non-empty and in
/// palette order so the earliest entry wins ties.
#[inline]
fn nearest(color: Srgb<u8>, palette: &[ColorEntry], candidates: &[usize]) -> usize {
    let mut best_idx = candidates[0];
    let mut best_dist = u32::MAX;

    for &idx in candidates {
        let dist = distance_squared(color, palette[idx].rgb());
        if dist < best_dist {
            best_dist = dist;
            best_idx = idx;
        }
    }

    best_idx
}

/// Mask over palette indices of the `k` most frequent choices.
///
/// Equal counts are ordered by the cell at which each entry reached its final
/// count, i.e. its last occurrence.
fn most_frequent(choices: &[usize], palette_len: usize, k: usize) -> Vec<bool> {
    let mut counts = vec![0usize; palette_len];
    let mut reached = vec![0usize; palette_len];
    for (i, &c) in choices.iter().enumerate() {
        counts[c] += 1;
        reached[c] = i;
    }

    let mut ranked: Vec<usize> = (0..palette_len).filter(|&c| counts[c] > 0).collect();
    ranked.sort_by_key(|&c| (Reverse(counts[c]), reached[c]));

    let mut keep = vec![false; palette_len];
    for &c in ranked.iter().take(k) {
        keep[c] = true;
    }
    keep
}
