mod common;

use common::Fixture;
use scan2pdf::{Error, export, metadata};

#[test]
fn text_export_writes_one_block_per_page() {
    let fx = Fixture::new();
    fx.write_file(
        "p1.xml",
        &Fixture::page_xml("p1.png", Some("First page text"), &[(0, 0, 5, 5, "ignored")]),
    );
    fx.write_file(
        "p2.xml",
        &Fixture::page_xml("p2.png", None, &[(0, 0, 5, 5, "from"), (6, 0, 9, 5, "words")]),
    );
    let input = fx.write_document("doc.xml", "Text", &["p1.xml", "p2.xml"]);
    let doc = metadata::parse(&input).expect("parse");
    let out = fx.path("doc.txt");

    export::export_text(&doc, &out).expect("export text");

    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "PAGE 1\n==\nFirst page text\n\nPAGE 2\n==\nfrom words\n\n"
    );
}

#[test]
fn image_export_copies_processed_images() {
    let fx = Fixture::new();
    fx.write_png("scans/a.png", 10, 10);
    fx.write_gray_jpeg("scans/b.jpg", 12, 8);
    fx.write_page("scans/a.xml", "a.png", &[]);
    fx.write_page("scans/b.xml", "b.jpg", &[]);
    let input = fx.write_document("doc.xml", "Images", &["scans/a.xml", "scans/b.xml"]);
    let doc = metadata::parse(&input).expect("parse");
    let out_dir = fx.path("exported");

    export::export_images(&doc, &out_dir).expect("export images");

    for name in ["a.png", "b.jpg"] {
        assert_eq!(
            std::fs::read(out_dir.join(name)).unwrap(),
            std::fs::read(fx.path("scans").join(name)).unwrap()
        );
    }
}

#[test]
fn image_export_refuses_an_existing_directory() {
    let fx = Fixture::new();
    let input = fx.hello_document();
    let doc = metadata::parse(&input).expect("parse");
    std::fs::create_dir(fx.path("exported")).unwrap();

    let err = export::export_images(&doc, &fx.path("exported")).unwrap_err();
    assert!(matches!(err, Error::Io(_)), "got {err:?}");
}
