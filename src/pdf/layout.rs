use crate::fonts::{COURIER_ADVANCE_1000, winansi_glyph_count};
use crate::model::Word;
use crate::options::{AxisOrigin, RenderOptions};

/// Output page size in points. One source pixel maps to one point, so word
/// boxes need no scaling, only the axis flip.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
}

impl PageGeometry {
    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }
}

/// Where and how large one word's text is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WordPlacement {
    /// Baseline start, page space (origin bottom-left).
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    /// Horizontal scaling in percent (`Tz`), set only when fitting word widths.
    pub horizontal_scale: Option<f32>,
}

#[derive(Clone, Copy, Debug)]
pub struct LayoutEngine {
    origin: AxisOrigin,
    min_font_size: f32,
    fit_width: bool,
}

impl LayoutEngine {
    pub fn new(options: &RenderOptions) -> Self {
        Self {
            origin: options.origin,
            min_font_size: options.min_font_size,
            fit_width: options.fit_width,
        }
    }

    /// Font size reproducing the box height. Courier at this size spans
    /// roughly the same vertical band as the scanned glyphs; widths are not
    /// matched unless `fit_width` is on.
    pub fn font_size(&self, word: &Word) -> f32 {
        (word.bbox.height() as f32).max(self.min_font_size)
    }

    pub fn place(&self, word: &Word, page: PageGeometry) -> WordPlacement {
        let bb = word.bbox;
        let bb_height = bb.height() as f32;
        let y = match self.origin {
            AxisOrigin::TopLeft => page.height - bb.ymin as f32 - bb_height,
            AxisOrigin::BottomLeft => bb.ymin as f32,
        };
        let font_size = self.font_size(word);
        WordPlacement {
            x: bb.xmin as f32,
            y,
            font_size,
            horizontal_scale: self
                .fit_width
                .then(|| fit_scale(word, font_size))
                .flatten(),
        }
    }
}

/// Only characters that reach the text layer count towards the width.
fn fit_scale(word: &Word, font_size: f32) -> Option<f32> {
    let glyphs = winansi_glyph_count(&word.text);
    let natural = glyphs as f32 * COURIER_ADVANCE_1000 * font_size / 1000.0;
    let target = word.bbox.width() as f32;
    (natural > 0.0 && target > 0.0).then(|| target / natural * 100.0)
}
