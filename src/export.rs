use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::Error;
use crate::model::Document;

/// Write every page's recognized text to a plain-text file, one
/// `PAGE n` / `==` block per page in document order.
pub fn export_text(doc: &Document, output: &Path) -> Result<(), Error> {
    let mut out = BufWriter::new(fs::File::create(output)?);
    write_text(doc, &mut out)?;
    out.flush()?;
    Ok(())
}

pub fn write_text(doc: &Document, out: &mut impl Write) -> io::Result<()> {
    for (i, page) in doc.pages.iter().enumerate() {
        write!(out, "PAGE {}\n==\n{}\n\n", i + 1, page.text())?;
    }
    Ok(())
}

/// Copy each page's processed image into a newly created directory, keeping
/// the original file names. The directory must not exist yet.
pub fn export_images(doc: &Document, out_dir: &Path) -> Result<(), Error> {
    fs::create_dir(out_dir).map_err(|e| {
        Error::Io(io::Error::new(
            e.kind(),
            format!("could not make output directory {}: {e}", out_dir.display()),
        ))
    })?;

    for page in &doc.pages {
        let src = &page.processed_image;
        let file_name = src.file_name().ok_or_else(|| {
            Error::image(src.as_path(), "processed image path has no file name")
        })?;
        let dest = out_dir.join(file_name);
        fs::copy(src, &dest).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::image(src.as_path(), e),
            _ => Error::Io(e),
        })?;
        log::debug!("Copied {} -> {}", src.display(), dest.display());
    }
    Ok(())
}
