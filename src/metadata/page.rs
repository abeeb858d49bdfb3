use std::path::Path;

use crate::error::Error;
use crate::model::{BoundingBox, Page, Word};

use super::{child, children, coord_attr, parent_dir, read_descriptor, required_attr, resolve};

/// Parse one page sub-descriptor. Image paths resolve against its directory.
pub fn parse_page(path: &Path) -> Result<Page, Error> {
    let xml = read_descriptor(path)?;
    parse_page_xml(&xml, parent_dir(path), path)
}

pub fn parse_page_str(xml: &str, base: &Path) -> Result<Page, Error> {
    parse_page_xml(xml, base, Path::new("<memory>"))
}

fn parse_word(node: roxmltree::Node, source: &Path) -> Result<Word, Error> {
    let bbox = BoundingBox::new(
        coord_attr(node, "xmin", source)?,
        coord_attr(node, "ymin", source)?,
        coord_attr(node, "xmax", source)?,
        coord_attr(node, "ymax", source)?,
    );
    let text = node.attribute("value").unwrap_or_default();
    Ok(Word::new(bbox, text))
}

fn parse_page_xml(xml: &str, base: &Path, source: &Path) -> Result<Page, Error> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| Error::malformed(source, e.to_string()))?;
    let root = doc.root_element();

    let img = child(root, "IMG").ok_or_else(|| Error::malformed(source, "missing <IMG> element"))?;
    let raw = resolve(base, required_attr(img, "path", source)?);
    let processed = resolve(base, required_attr(img, "processed", source)?);

    let mut page = Page::new(raw, processed);
    page.name = root.attribute("name").map(str::to_string);

    let Some(text_el) = child(root, "TEXT") else {
        log::warn!("{}: page has no <TEXT>, text layer will be empty", source.display());
        return Ok(page);
    };

    if let Some(full) = child(text_el, "FULLTEXT") {
        page.full_text = full.text().unwrap_or_default().to_string();
    }

    let positions = child(text_el, "POSITIONS")
        .ok_or_else(|| Error::malformed(source, "<TEXT> has no <POSITIONS>"))?;
    page.words = children(positions, "WORD")
        .map(|w| parse_word(w, source))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(page)
}
