use std::path::PathBuf;

/// Axis-aligned word box in source-image pixels (origin top-left, y down,
/// unless the page is laid out with a bottom-left origin).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub xmin: i32,
    pub ymin: i32,
    pub xmax: i32,
    pub ymax: i32,
}

impl BoundingBox {
    pub fn new(xmin: i32, ymin: i32, xmax: i32, ymax: i32) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Box width; inverted boxes collapse to zero.
    pub fn width(&self) -> i32 {
        self.xmax.saturating_sub(self.xmin).max(0)
    }

    /// Box height; inverted boxes collapse to zero.
    pub fn height(&self) -> i32 {
        self.ymax.saturating_sub(self.ymin).max(0)
    }

    pub fn is_degenerate(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Word {
    pub bbox: BoundingBox,
    pub text: String,
}

impl Word {
    pub fn new(bbox: BoundingBox, text: impl Into<String>) -> Self {
        Self {
            bbox,
            text: text.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    pub name: Option<String>,
    /// Unprocessed scan, kept for reference only.
    pub raw_image: PathBuf,
    /// Cleaned/deskewed scan drawn as the page background; sizes the page.
    pub processed_image: PathBuf,
    /// OCR words in parse order.
    pub words: Vec<Word>,
    /// Full recognized text as recorded by the OCR step, if any.
    pub full_text: String,
}

impl Page {
    pub fn new(raw_image: impl Into<PathBuf>, processed_image: impl Into<PathBuf>) -> Self {
        Self {
            name: None,
            raw_image: raw_image.into(),
            processed_image: processed_image.into(),
            words: Vec::new(),
            full_text: String::new(),
        }
    }

    pub fn with_words(mut self, words: Vec<Word>) -> Self {
        self.words = words;
        self
    }

    /// The recorded full text, or the words joined by spaces when the OCR step
    /// left no full text behind.
    pub fn text(&self) -> String {
        if !self.full_text.trim().is_empty() {
            return self.full_text.clone();
        }
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub name: String,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn new(name: impl Into<String>, pages: Vec<Page>) -> Self {
        Self {
            name: name.into(),
            pages,
        }
    }

    pub fn word_count(&self) -> usize {
        self.pages.iter().map(|p| p.words.len()).sum()
    }
}
