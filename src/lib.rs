mod error;
mod fonts;
mod options;
mod pdf;

pub mod export;
pub mod metadata;
pub mod model;

pub use error::Error;
pub use model::{BoundingBox, Document, Page, Word};
pub use options::{AxisOrigin, RenderOptions, TextVisibility};
pub use pdf::layout::{LayoutEngine, PageGeometry, WordPlacement};
pub use pdf::{RenderContext, Renderable, render};

use std::io::Write;
use std::path::Path;
use std::time::Instant;

/// Read a document descriptor and write the searchable PDF to `output`.
pub fn convert_descriptor_to_pdf(input: &Path, output: &Path) -> Result<(), Error> {
    convert_descriptor_to_pdf_with(input, output, &RenderOptions::default())
}

pub fn convert_descriptor_to_pdf_with(
    input: &Path,
    output: &Path,
    options: &RenderOptions,
) -> Result<(), Error> {
    let t0 = Instant::now();

    let doc = metadata::parse(input)?;
    let t_parse = t0.elapsed();

    write_document_pdf(&doc, output, options)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, render+write={:.1}ms, total={:.1}ms",
        t_parse.as_secs_f64() * 1000.0,
        (t_total - t_parse).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
    );

    Ok(())
}

/// Render an already parsed document and write it to `output`.
pub fn write_document_pdf(
    doc: &Document,
    output: &Path,
    options: &RenderOptions,
) -> Result<(), Error> {
    let t0 = Instant::now();

    let bytes = pdf::render(doc, options)?;
    let t_render = t0.elapsed();

    write_atomically(output, &bytes)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: render={:.1}ms, write={:.1}ms (output {} bytes)",
        t_render.as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        bytes.len(),
    );

    Ok(())
}

/// Stage the bytes in a temp file beside `output` and rename it into place,
/// so `output` only ever holds a complete PDF.
fn write_atomically(output: &Path, bytes: &[u8]) -> Result<(), Error> {
    let dir = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(output).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
