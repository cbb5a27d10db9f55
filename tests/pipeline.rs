use std::io::{Cursor, Read, Write};

use memorycards::{
    CardRenderer, FontChoice, GenerateError, GenerateOptions, TermPair, build_package,
    generate_package,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

const TEMPLATE_MANIFEST: &str = r#"{
  "cards": [
    {"image": {"path": "images/old-a.png"}, "match": {"path": "images/old-b.png"}, "description": "old"}
  ],
  "behaviour": {"allowRetry": true, "isSolutionsAvailable": false},
  "l10n": {"checkAnswer": "Controleer", "tryAgain": "Opnieuw"},
  "taskDescription": "<p>Zoek de paren</p>"
}"#;

fn template() -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let files: [(&str, &[u8]); 4] = [
        ("h5p.json", br#"{"title":"Memory","mainLibrary":"H5P.ImagePair"}"#),
        ("content/content.json", TEMPLATE_MANIFEST.as_bytes()),
        ("content/images/old-a.png", b"old"),
        ("H5P.ImagePair-1.4/library.json", b"{}"),
    ];
    for (name, bytes) in files {
        writer.start_file(name, SimpleFileOptions::default()).unwrap();
        writer.write_all(bytes).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn bitmap_options() -> GenerateOptions {
    GenerateOptions {
        font: FontChoice::Bitmap,
        ..GenerateOptions::default()
    }
}

fn read_entry(bytes: &[u8], name: &str) -> Vec<u8> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut out = Vec::new();
    entry.read_to_end(&mut out).unwrap();
    out
}

fn manifest_of(bytes: &[u8]) -> Value {
    serde_json::from_slice(&read_entry(bytes, "content/content.json")).unwrap()
}

fn names_of(bytes: &[u8]) -> Vec<String> {
    let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    archive.file_names().map(str::to_string).collect()
}

#[test]
fn three_pairs_become_three_entries_in_order() {
    let package = generate_package(&template(), "hond;dog\nkat;cat\nhuis;house", &bitmap_options())
        .unwrap();
    assert_eq!(package.file_name, "memory_from_text.h5p");
    assert_eq!(package.pair_count, 3);
    assert!(package.warnings.is_empty());

    let manifest = manifest_of(&package.bytes);
    let descriptions: Vec<&str> = manifest["cards"]
        .as_array()
        .unwrap()
        .iter()
        .map(|card| card["description"].as_str().unwrap())
        .collect();
    assert_eq!(descriptions, vec!["hond ↔ dog", "kat ↔ cat", "huis ↔ house"]);
    assert_eq!(
        manifest["cards"][1],
        json!({
            "image": {"path": "images/pair02_a_kat.png", "mime": "image/png", "copyright": {"license": "U"}},
            "match": {"path": "images/pair02_b_cat.png", "mime": "image/png", "copyright": {"license": "U"}},
            "description": "kat ↔ cat"
        })
    );
}

#[test]
fn undelimited_line_is_warned_and_skipped() {
    let package = generate_package(&template(), "a-b\nc;d", &bitmap_options()).unwrap();
    assert_eq!(package.warnings.len(), 1);
    assert_eq!(package.warnings[0].content, "a-b");
    let manifest = manifest_of(&package.bytes);
    assert_eq!(manifest["cards"].as_array().unwrap().len(), 1);
    assert_eq!(manifest["cards"][0]["description"], "c ↔ d");
}

#[test]
fn empty_input_fails_without_package() {
    for text in ["", "\n  \n\t"] {
        let err = generate_package(&template(), text, &bitmap_options()).unwrap_err();
        assert!(matches!(err, GenerateError::NoPairs));
    }
    let err = generate_package(&template(), "no delimiters here", &bitmap_options()).unwrap_err();
    assert!(matches!(err, GenerateError::NoPairs));
}

#[test]
fn corrupt_template_is_an_archive_error() {
    let err = generate_package(b"PK\x03\x04 truncated", "a;b", &bitmap_options()).unwrap_err();
    assert!(matches!(err, GenerateError::Archive(_)), "got {err:?}");
}

#[test]
fn template_without_manifest_fails() {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer.start_file("h5p.json", SimpleFileOptions::default()).unwrap();
    writer.write_all(b"{}").unwrap();
    let bytes = writer.finish().unwrap().into_inner();

    let err = generate_package(&bytes, "a;b", &bitmap_options()).unwrap_err();
    assert!(matches!(err, GenerateError::ManifestMissing { .. }));
}

#[test]
fn package_contains_two_new_images_per_pair() {
    let template = template();
    let pairs = vec![
        TermPair::new("hond", "dog"),
        TermPair::new("kat", "cat"),
        TermPair::new("hond", "dog"),
    ];
    let package = build_package(&template, &pairs, &CardRenderer::Bitmap, "out.h5p").unwrap();

    let before = names_of(&template);
    let after = names_of(&package.bytes);
    let new_images: Vec<&String> = after
        .iter()
        .filter(|name| name.starts_with("content/images/") && !before.contains(name))
        .collect();
    assert_eq!(new_images.len(), 2 * pairs.len());
    for name in &before {
        assert!(after.contains(name), "{name} was dropped");
    }

    let png = read_entry(&package.bytes, "content/images/pair03_b_dog.png");
    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (300, 180));
}

#[test]
fn non_card_fields_pass_through_unchanged() {
    let package = generate_package(&template(), "x;y", &bitmap_options()).unwrap();
    let original: Value = serde_json::from_str(TEMPLATE_MANIFEST).unwrap();
    let updated = manifest_of(&package.bytes);

    let original = original.as_object().unwrap();
    let updated = updated.as_object().unwrap();
    let original_keys: Vec<&String> = original.keys().collect();
    let updated_keys: Vec<&String> = updated.keys().collect();
    assert_eq!(original_keys, updated_keys);
    for (key, value) in original {
        if key != "cards" {
            assert_eq!(&updated[key], value, "field {key} changed");
        }
    }
    assert_eq!(
        read_entry(&package.bytes, "h5p.json"),
        br#"{"title":"Memory","mainLibrary":"H5P.ImagePair"}"#.to_vec()
    );
}

#[test]
fn hostile_labels_stay_inside_images_dir() {
    let package = generate_package(&template(), "../../evil;a/b\\c", &bitmap_options()).unwrap();
    let names = names_of(&package.bytes);
    assert!(names.contains(&"content/images/pair01_a_evil.png".to_string()));
    assert!(names.contains(&"content/images/pair01_b_a_b_c.png".to_string()));
    assert!(names.iter().all(|name| !name.contains("..")));

    let manifest = manifest_of(&package.bytes);
    assert_eq!(manifest["cards"][0]["description"], "../../evil ↔ a/b\\c");
}

#[test]
fn concurrent_builds_share_the_template() {
    let template = template();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|n| {
                let template = &template;
                scope.spawn(move || {
                    let text = format!("left{n};right{n}");
                    generate_package(template, &text, &bitmap_options()).unwrap()
                })
            })
            .collect();
        for (n, handle) in handles.into_iter().enumerate() {
            let package = handle.join().unwrap();
            let manifest = manifest_of(&package.bytes);
            assert_eq!(
                manifest["cards"][0]["description"],
                format!("left{n} ↔ right{n}")
            );
        }
    });
}
