//! Color allocation for lines without an explicit color.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashSet;
use stockchart_core::Color;
use tracing::debug;

/// Default line colors, in allocation order.
pub const PALETTE: [&str; 12] = [
    "#FF0000", "#00FF00", "#0000FF", "#FFA500", "#800080", "#00FFFF", "#FF00FF", "#FFFF00",
    "#FF6B35", "#004E89", "#32CD32", "#DC143C",
];

/// Hands out palette colors, avoiding those already in use.
///
/// One allocator lives for one invocation. Once every palette entry is used
/// it falls back to a random palette entry.
#[derive(Debug)]
pub struct ColorAllocator {
    palette: Vec<Color>,
    used: HashSet<Color>,
    rng: StdRng,
}

impl ColorAllocator {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic allocator for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let palette = PALETTE.iter().filter_map(|hex| Color::parse(hex).ok()).collect();
        Self {
            palette,
            used: HashSet::new(),
            rng,
        }
    }

    /// Record a color as taken.
    pub fn mark_used(&mut self, color: &Color) {
        self.used.insert(color.clone());
    }

    pub fn is_used(&self, color: &Color) -> bool {
        self.used.contains(color)
    }

    /// First unused palette color, or a random one once all are used.
    pub fn next_color(&mut self) -> Color {
        let color = match self.palette.iter().find(|c| !self.used.contains(*c)) {
            Some(color) => color.clone(),
            None => {
                debug!("Palette exhausted, picking a random color");
                self.palette
                    .choose(&mut self.rng)
                    .cloned()
                    .unwrap_or_else(|| Color::from_rgb(0xFF, 0x00, 0x00))
            }
        };
        self.used.insert(color.clone());
        color
    }
}

impl Default for ColorAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocates_in_palette_order() {
        let mut allocator = ColorAllocator::with_seed(7);

        assert_eq!(allocator.next_color().as_str(), "#FF0000");
        assert_eq!(allocator.next_color().as_str(), "#00FF00");
        assert_eq!(allocator.next_color().as_str(), "#0000FF");
    }

    #[test]
    fn test_skips_used_colors() {
        let mut allocator = ColorAllocator::with_seed(7);
        allocator.mark_used(&Color::parse("red").unwrap());
        allocator.mark_used(&Color::parse("blue").unwrap());

        assert_eq!(allocator.next_color().as_str(), "#00FF00");
        assert_eq!(allocator.next_color().as_str(), "#FFA500");
    }

    #[test]
    fn test_exhausted_palette_stays_in_palette() {
        let mut allocator = ColorAllocator::with_seed(42);
        let first: Vec<Color> = (0..PALETTE.len()).map(|_| allocator.next_color()).collect();
        assert_eq!(first.len(), 12);

        for _ in 0..20 {
            let color = allocator.next_color();
            assert!(PALETTE.contains(&color.as_str()));
        }
    }

    #[test]
    fn test_seeded_allocators_agree() {
        let mut a = ColorAllocator::with_seed(3);
        let mut b = ColorAllocator::with_seed(3);
        let colors_a: Vec<Color> = (0..30).map(|_| a.next_color()).collect();
        let colors_b: Vec<Color> = (0..30).map(|_| b.next_color()).collect();

        assert_eq!(colors_a, colors_b);
    }
}
