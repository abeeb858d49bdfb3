mod background;
pub(crate) mod layout;

use std::collections::VecDeque;

use pdf_writer::types::TextRenderingMode;
use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::error::Error;
use crate::fonts::{FontEntry, register_text_layer_font, to_winansi_bytes};
use crate::model::{Document, Page, Word};
use crate::options::{RenderOptions, TextVisibility};

use background::BackgroundImage;
use layout::{LayoutEngine, PageGeometry};

const IMAGE_NAME: &[u8] = b"Im1";

/// Anything that can draw itself into a [`RenderContext`]: a word onto the
/// current page, a page into the document, a document into the output.
pub trait Renderable {
    fn render(&self, ctx: &mut RenderContext) -> Result<(), Error>;
}

/// The state threaded through rendering: the PDF being built, the content
/// surface of the page in progress, its size, and the layout parameters.
pub struct RenderContext {
    pdf: Pdf,
    next_id: i32,
    catalog_id: Ref,
    pages_id: Ref,
    font: FontEntry,
    layout: LayoutEngine,
    options: RenderOptions,
    surface: Content,
    page: PageGeometry,
    page_image: Option<Ref>,
    page_ids: Vec<Ref>,
    preloaded: VecDeque<BackgroundImage>,
    dropped_chars: usize,
}

impl RenderContext {
    pub fn new(options: RenderOptions) -> Self {
        let mut pdf = Pdf::new();
        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let font = register_text_layer_font(&mut pdf, Ref::new(3));
        Self {
            pdf,
            next_id: 4,
            catalog_id,
            pages_id,
            font,
            layout: LayoutEngine::new(&options),
            options,
            surface: Content::new(),
            page: PageGeometry::default(),
            page_image: None,
            page_ids: Vec::new(),
            preloaded: VecDeque::new(),
            dropped_chars: 0,
        }
    }

    fn alloc(&mut self) -> Ref {
        let r = Ref::new(self.next_id);
        self.next_id += 1;
        r
    }

    /// Size of the page currently being drawn.
    pub fn page_geometry(&self) -> PageGeometry {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Load every page background up front on the rayon pool. Results are
    /// kept in page order; the earliest failing page is the one reported.
    #[cfg(feature = "parallel")]
    fn preload(&mut self, pages: &[Page]) -> Result<(), Error> {
        use rayon::prelude::*;

        let level = self.options.compression_level;
        let loaded: Vec<Result<BackgroundImage, Error>> = pages
            .par_iter()
            .map(|p| BackgroundImage::load(&p.processed_image, level))
            .collect();
        self.preloaded = loaded.into_iter().collect::<Result<VecDeque<_>, _>>()?;
        Ok(())
    }

    #[cfg(not(feature = "parallel"))]
    fn preload(&mut self, _pages: &[Page]) -> Result<(), Error> {
        Ok(())
    }

    fn background_for(&mut self, page: &Page) -> Result<BackgroundImage, Error> {
        match self.preloaded.pop_front() {
            Some(bg) => Ok(bg),
            None => BackgroundImage::load(&page.processed_image, self.options.compression_level),
        }
    }

    fn begin_page(&mut self, geometry: PageGeometry) {
        self.page = geometry;
        self.page_image = None;
        self.surface = Content::new();
    }

    /// Draw the background stretched over the whole page. At one point per
    /// pixel this is the image at its native size.
    fn draw_background(&mut self, bg: &BackgroundImage) {
        let xobj_ref = self.alloc();
        bg.write_xobject(&mut self.pdf, xobj_ref);
        self.page_image = Some(xobj_ref);

        self.surface.save_state();
        self.surface
            .transform([self.page.width, 0.0, 0.0, self.page.height, 0.0, 0.0]);
        self.surface.x_object(Name(IMAGE_NAME));
        self.surface.restore_state();
    }

    fn show_word(&mut self, word: &Word) {
        let placement = self.layout.place(word, self.page);
        if word.bbox.is_degenerate() {
            log::debug!(
                "Degenerate box {:?} for {:?}, font size {}",
                word.bbox,
                word.text,
                placement.font_size
            );
        }
        let (text, dropped) = to_winansi_bytes(&word.text);
        self.dropped_chars += dropped;
        if text.is_empty() {
            return;
        }

        let mode = match self.options.visibility {
            TextVisibility::Invisible => TextRenderingMode::Invisible,
            TextVisibility::Visible => TextRenderingMode::Fill,
        };

        let content = &mut self.surface;
        content.begin_text();
        content.set_font(Name(self.font.pdf_name.as_bytes()), placement.font_size);
        content.set_text_rendering_mode(mode);
        if self.options.fit_width {
            // Tz outlives ET, so every word resets it.
            content.set_horizontal_scaling(placement.horizontal_scale.unwrap_or(100.0));
        }
        content.next_line(placement.x, placement.y);
        content.show(Str(&text));
        content.end_text();
    }

    /// Flush the page in progress: compress its content stream and write the
    /// page object sized to the background image.
    fn finish_page(&mut self) {
        let content = std::mem::replace(&mut self.surface, Content::new());
        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            raw.as_slice(),
            self.options.compression_level,
        );

        let content_id = self.alloc();
        let page_id = self.alloc();
        self.pdf
            .stream(content_id, &compressed)
            .filter(Filter::FlateDecode);

        {
            let mut page = self.pdf.page(page_id);
            page.media_box(Rect::new(0.0, 0.0, self.page.width, self.page.height))
                .parent(self.pages_id)
                .contents(content_id);
            let mut resources = page.resources();
            resources
                .fonts()
                .pair(Name(self.font.pdf_name.as_bytes()), self.font.font_ref);
            if let Some(xobj_ref) = self.page_image {
                resources.x_objects().pair(Name(IMAGE_NAME), xobj_ref);
            }
        }

        self.page_ids.push(page_id);
    }

    /// Write the page tree, catalog and document info, and return the bytes.
    pub fn finish(mut self, title: &str) -> Vec<u8> {
        if self.dropped_chars > 0 {
            log::warn!(
                "{} characters have no WinAnsi code and were left out of the text layer",
                self.dropped_chars
            );
        }

        let info_id = self.alloc();
        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        self.pdf
            .pages(self.pages_id)
            .kids(self.page_ids.iter().copied())
            .count(self.page_ids.len() as i32);

        {
            let mut info = self.pdf.document_info(info_id);
            if !title.is_empty() {
                info.title(TextStr(title));
            }
            info.producer(TextStr(env!("CARGO_PKG_NAME")));
        }

        self.pdf.finish()
    }
}

impl Renderable for Word {
    fn render(&self, ctx: &mut RenderContext) -> Result<(), Error> {
        ctx.show_word(self);
        Ok(())
    }
}

impl Renderable for Page {
    fn render(&self, ctx: &mut RenderContext) -> Result<(), Error> {
        let bg = ctx.background_for(self)?;
        ctx.begin_page(PageGeometry::from_pixels(bg.pixel_width, bg.pixel_height));
        ctx.draw_background(&bg);
        for word in &self.words {
            word.render(ctx)?;
        }
        ctx.finish_page();

        log::debug!(
            "Rendered page {} ({}): {}x{}pt, {} words",
            ctx.page_count(),
            self.processed_image.display(),
            ctx.page.width,
            ctx.page.height,
            self.words.len(),
        );
        Ok(())
    }
}

impl Renderable for Document {
    fn render(&self, ctx: &mut RenderContext) -> Result<(), Error> {
        if self.pages.is_empty() {
            return Err(Error::EmptyDocument {
                name: self.name.clone(),
            });
        }
        ctx.preload(&self.pages)?;
        for page in &self.pages {
            page.render(ctx)?;
        }
        Ok(())
    }
}

/// Render a whole document to PDF bytes. Nothing is returned unless every
/// page rendered.
pub fn render(doc: &Document, options: &RenderOptions) -> Result<Vec<u8>, Error> {
    let t0 = std::time::Instant::now();
    let mut ctx = RenderContext::new(options.clone());
    doc.render(&mut ctx)?;
    let t_pages = t0.elapsed();

    let bytes = ctx.finish(&doc.name);
    let t_total = t0.elapsed();

    log::info!(
        "Render phases: pages={:.1}ms, assembly={:.1}ms ({} pages, {} words)",
        t_pages.as_secs_f64() * 1000.0,
        (t_total - t_pages).as_secs_f64() * 1000.0,
        doc.pages.len(),
        doc.word_count(),
    );

    Ok(bytes)
}
