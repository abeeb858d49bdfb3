#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use lopdf::Object;
use tempfile::TempDir;

/// A scratch directory holding images and descriptors for one test.
pub struct Fixture {
    pub dir: TempDir,
}

pub type WordSpec<'a> = (i32, i32, i32, i32, &'a str);

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    fn ensure_parent(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture dir");
        }
    }

    /// RGB PNG with a light gradient, so the decode path has real data.
    pub fn write_png(&self, rel: &str, width: u32, height: u32) -> PathBuf {
        let path = self.path(rel);
        Self::ensure_parent(&path);
        image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([200 + (x % 50) as u8, 200 + (y % 50) as u8, 230])
        })
        .save(&path)
        .expect("write png");
        path
    }

    /// Grayscale JPEG, which embeds without re-encoding.
    pub fn write_gray_jpeg(&self, rel: &str, width: u32, height: u32) -> PathBuf {
        let path = self.path(rel);
        Self::ensure_parent(&path);
        image::GrayImage::from_fn(width, height, |x, y| image::Luma([((x + y) % 256) as u8]))
            .save(&path)
            .expect("write jpeg");
        path
    }

    pub fn write_file(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.path(rel);
        Self::ensure_parent(&path);
        fs::write(&path, contents).expect("write fixture file");
        path
    }

    pub fn page_xml(image: &str, full_text: Option<&str>, words: &[WordSpec]) -> String {
        let mut xml = format!(
            "<PAGE name=\"{image}\">\n  <IMG path=\"{image}\" processed=\"{image}\"/>\n  <TEXT>\n"
        );
        if let Some(t) = full_text {
            xml.push_str(&format!("    <FULLTEXT>{}</FULLTEXT>\n", xml_escape(t)));
        }
        xml.push_str("    <POSITIONS>\n");
        for (xmin, ymin, xmax, ymax, value) in words {
            xml.push_str(&format!(
                "      <WORD xmin=\"{xmin}\" ymin=\"{ymin}\" xmax=\"{xmax}\" ymax=\"{ymax}\" value=\"{}\"/>\n",
                xml_escape(value)
            ));
        }
        xml.push_str("    </POSITIONS>\n  </TEXT>\n</PAGE>\n");
        xml
    }

    /// Page descriptor next to its image; the image path is relative.
    pub fn write_page(&self, rel: &str, image: &str, words: &[WordSpec]) -> PathBuf {
        self.write_file(rel, &Self::page_xml(image, None, words))
    }

    pub fn document_xml(name: &str, metafiles: &[&str]) -> String {
        let mut xml = format!("<DOCUMENT name=\"{}\">\n  <PAGES>\n", xml_escape(name));
        for (i, m) in metafiles.iter().enumerate() {
            xml.push_str(&format!(
                "    <PAGE order=\"{}\" name=\"page{}\" metafile=\"{m}\"/>\n",
                i + 1,
                i + 1
            ));
        }
        xml.push_str("  </PAGES>\n</DOCUMENT>\n");
        xml
    }

    pub fn write_document(&self, rel: &str, name: &str, metafiles: &[&str]) -> PathBuf {
        self.write_file(rel, &Self::document_xml(name, metafiles))
    }

    /// One 800x600 page with the word "Hello" at (10,10)-(60,30).
    pub fn hello_document(&self) -> PathBuf {
        self.write_png("p1.png", 800, 600);
        self.write_page("p1.xml", "p1.png", &[(10, 10, 60, 30, "Hello")]);
        self.write_document("doc.xml", "Hello doc", &["p1.xml"])
    }
}

pub fn load_pdf(path: &Path) -> lopdf::Document {
    lopdf::Document::load(path).expect("generated PDF should load")
}

pub fn num(obj: &Object) -> f32 {
    match obj {
        Object::Integer(i) => *i as f32,
        Object::Real(r) => *r as f32,
        other => panic!("expected a number, got {other:?}"),
    }
}

fn page_id(doc: &lopdf::Document, page_no: u32) -> lopdf::ObjectId {
    *doc.get_pages().get(&page_no).expect("page exists")
}

/// (width, height) of a page's MediaBox, 1-based page number.
pub fn media_box(doc: &lopdf::Document, page_no: u32) -> (f32, f32) {
    let page = doc
        .get_object(page_id(doc, page_no))
        .and_then(Object::as_dict)
        .expect("page dict");
    let mb = page
        .get(b"MediaBox")
        .and_then(Object::as_array)
        .expect("MediaBox");
    let v: Vec<f32> = mb.iter().map(num).collect();
    (v[2] - v[0], v[3] - v[1])
}

pub fn operations(doc: &lopdf::Document, page_no: u32) -> Vec<lopdf::content::Operation> {
    let bytes = doc
        .get_page_content(page_id(doc, page_no))
        .expect("page content");
    lopdf::content::Content::decode(&bytes)
        .expect("decode content")
        .operations
}

/// One shown string with the text state in force when it was shown.
#[derive(Debug, Clone, PartialEq)]
pub struct ShownText {
    pub text: Vec<u8>,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub render_mode: i64,
    pub horizontal_scale: f32,
}

pub fn shown_text(doc: &lopdf::Document, page_no: u32) -> Vec<ShownText> {
    let mut out = Vec::new();
    let (mut x, mut y, mut size, mut mode, mut scale) = (0.0f32, 0.0f32, 0.0f32, 0i64, 100.0f32);
    for op in operations(doc, page_no) {
        match op.operator.as_str() {
            "BT" => (x, y) = (0.0, 0.0),
            "Tf" => size = num(&op.operands[1]),
            "Tr" => mode = num(&op.operands[0]) as i64,
            "Tz" => scale = num(&op.operands[0]),
            "Td" => {
                x += num(&op.operands[0]);
                y += num(&op.operands[1]);
            }
            "Tj" => {
                if let Object::String(bytes, _) = &op.operands[0] {
                    out.push(ShownText {
                        text: bytes.clone(),
                        x,
                        y,
                        font_size: size,
                        render_mode: mode,
                        horizontal_scale: scale,
                    });
                }
            }
            _ => {}
        }
    }
    out
}

/// Operands of the first `cm` on the page (the background placement).
pub fn image_matrix(doc: &lopdf::Document, page_no: u32) -> Vec<f32> {
    operations(doc, page_no)
        .into_iter()
        .find(|op| op.operator == "cm")
        .map(|op| op.operands.iter().map(num).collect())
        .expect("background cm")
}

pub fn info_title(doc: &lopdf::Document) -> Option<Vec<u8>> {
    let info_ref = doc.trailer.get(b"Info").ok()?.as_reference().ok()?;
    let info = doc.get_object(info_ref).ok()?.as_dict().ok()?;
    match info.get(b"Title").ok()? {
        Object::String(bytes, _) => Some(bytes.clone()),
        _ => None,
    }
}
