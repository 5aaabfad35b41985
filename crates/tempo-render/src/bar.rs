//! Plain-text progress bars.

/// Default bar width in glyphs.
pub const DEFAULT_BAR_WIDTH: usize = 20;

/// A fixed-width text progress bar.
///
/// The bar is made of plain Unicode glyphs so it survives being sent as a
/// plain-text chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBar {
    width: usize,
    filled: char,
    empty: char,
}

impl Default for TextBar {
    fn default() -> Self {
        Self {
            width: DEFAULT_BAR_WIDTH,
            filled: '█',
            empty: '░',
        }
    }
}

impl TextBar {
    /// Create a bar with the default width and glyphs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the width in glyphs.
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Set the (filled, empty) glyphs.
    pub fn glyphs(mut self, filled: char, empty: char) -> Self {
        self.filled = filled;
        self.empty = empty;
        self
    }

    /// Number of filled glyphs for a percentage.
    ///
    /// Half steps round to even, so 2.5 glyphs become 2 and 3.5 become 4.
    pub fn filled_count(&self, percentage: f64) -> usize {
        let pct = if percentage.is_nan() {
            0.0
        } else {
            percentage.clamp(0.0, 100.0)
        };
        let filled = (self.width as f64 * pct / 100.0).round_ties_even() as usize;
        filled.min(self.width)
    }

    /// Render the bar for a percentage in `[0, 100]`.
    pub fn render(&self, percentage: f64) -> String {
        let filled = self.filled_count(percentage);
        let mut bar = String::with_capacity(self.width * self.filled.len_utf8());
        bar.extend(std::iter::repeat_n(self.filled, filled));
        bar.extend(std::iter::repeat_n(self.empty, self.width - filled));
        bar
    }
}
