mod page;

use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::model::Document;

pub use page::{parse_page, parse_page_str};

pub(super) fn child<'a>(
    node: roxmltree::Node<'a, 'a>,
    name: &str,
) -> Option<roxmltree::Node<'a, 'a>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

pub(super) fn children<'a>(
    node: roxmltree::Node<'a, 'a>,
    name: &'a str,
) -> impl Iterator<Item = roxmltree::Node<'a, 'a>> {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

/// Required attribute; missing is a structural error.
pub(super) fn required_attr<'a>(
    node: roxmltree::Node<'a, 'a>,
    attr: &str,
    source: &Path,
) -> Result<&'a str, Error> {
    node.attribute(attr).ok_or_else(|| {
        Error::malformed(
            source,
            format!("<{}> is missing the '{attr}' attribute", node.tag_name().name()),
        )
    })
}

pub(super) fn int_attr(node: roxmltree::Node, attr: &str, source: &Path) -> Result<i32, Error> {
    let raw = required_attr(node, attr, source)?;
    raw.trim().parse::<i32>().map_err(|_| {
        Error::malformed(
            source,
            format!(
                "<{}> attribute '{attr}' is not an integer: {raw:?}",
                node.tag_name().name()
            ),
        )
    })
}

/// Pixel coordinate: a non-negative integer.
pub(super) fn coord_attr(node: roxmltree::Node, attr: &str, source: &Path) -> Result<i32, Error> {
    let value = int_attr(node, attr, source)?;
    if value < 0 {
        return Err(Error::malformed(
            source,
            format!(
                "<{}> attribute '{attr}' is negative: {value}",
                node.tag_name().name()
            ),
        ));
    }
    Ok(value)
}

/// Relative paths in a descriptor are relative to the descriptor's directory.
pub(super) fn resolve(base: &Path, value: &str) -> PathBuf {
    let p = Path::new(value.trim());
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

pub(super) fn read_descriptor(path: &Path) -> Result<String, Error> {
    std::fs::read_to_string(path).map_err(|e| Error::malformed(path, format!("cannot read: {e}")))
}

fn parent_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new(""))
}

/// Parse a document descriptor and every page sub-descriptor it references.
pub fn parse(path: &Path) -> Result<Document, Error> {
    let xml = read_descriptor(path)?;
    parse_document_xml(&xml, parent_dir(path), path)
}

/// Parse a document descriptor held in memory. `base` is the directory that
/// relative `metafile` paths are resolved against.
pub fn parse_document_str(xml: &str, base: &Path) -> Result<Document, Error> {
    parse_document_xml(xml, base, Path::new("<memory>"))
}

fn parse_document_xml(xml: &str, base: &Path, source: &Path) -> Result<Document, Error> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| Error::malformed(source, e.to_string()))?;
    let root = doc.root_element();

    let name = root.attribute("name").unwrap_or_default().to_string();
    let pages_el = child(root, "PAGES")
        .ok_or_else(|| Error::malformed(source, "missing <PAGES> element"))?;

    let mut pages = Vec::new();
    for page_el in children(pages_el, "PAGE") {
        if page_el.attribute("order").is_some() {
            // Declaration order wins; the attribute only has to be well formed.
            int_attr(page_el, "order", source)?;
        }
        let metafile = resolve(base, required_attr(page_el, "metafile", source)?);
        let mut page = parse_page(&metafile)?;
        if let Some(n) = page_el.attribute("name") {
            page.name.get_or_insert_with(|| n.to_string());
        }
        pages.push(page);
    }

    if pages.is_empty() {
        return Err(Error::EmptyDocument { name });
    }

    log::debug!(
        "Parsed document '{}': {} pages from {}",
        name,
        pages.len(),
        source.display()
    );

    Ok(Document { name, pages })
}
