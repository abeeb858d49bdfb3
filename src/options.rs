/// Where the OCR bounding boxes put their origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AxisOrigin {
    /// Pixel space: origin top-left, y grows downward. Needs a vertical flip.
    #[default]
    TopLeft,
    /// Already in page space: origin bottom-left, y grows upward.
    BottomLeft,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextVisibility {
    /// Text render mode 3: selectable and searchable, no ink.
    #[default]
    Invisible,
    /// Filled text drawn over the scan, for checking alignment by eye.
    Visible,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderOptions {
    pub origin: AxisOrigin,
    pub visibility: TextVisibility,
    /// Floor for the per-word font size, in points. Zero-height boxes use it.
    pub min_font_size: f32,
    /// Stretch each word horizontally so its advance matches the box width.
    pub fit_width: bool,
    /// zlib level (0-10) for page content streams and decoded images.
    pub compression_level: u8,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            origin: AxisOrigin::TopLeft,
            visibility: TextVisibility::Invisible,
            min_font_size: 1.0,
            fit_width: false,
            compression_level: 6,
        }
    }
}

impl RenderOptions {
    pub fn with_origin(mut self, origin: AxisOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_visibility(mut self, visibility: TextVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_min_font_size(mut self, size: f32) -> Self {
        self.min_font_size = size.max(0.0);
        self
    }

    pub fn with_fit_width(mut self, fit: bool) -> Self {
        self.fit_width = fit;
        self
    }

    pub fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = level.min(10);
        self
    }
}
