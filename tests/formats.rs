use bioc::*;

mod common;
use common::*;

#[test]
fn json_roundtrip() {
    let collection = everything();
    let json = json::dumps(&collection, &Config::default()).unwrap();
    let decoded = json::loads(&json, &Config::default()).unwrap();
    assert_everything(&decoded);
    assert_eq!(decoded, collection);
}

#[test]
fn json_compact() {
    let collection = everything();
    let config = Config::default().with_dataformat(DataFormat::Json { compact: true });
    let json = json::dumps(&collection, &config).unwrap();
    assert!(!json.contains('\n'));
    assert!(json.starts_with(r#"{"source":"source","date":"date","key":"key","infons":{"collection-infon-key":"collection-infon-value"},"documents":["#));
}

#[test]
fn json_layout() {
    let json = r#"{
        "source": "PubMed",
        "date": "20240101",
        "key": "key",
        "infons": {},
        "documents": [{
            "id": "1",
            "infons": {"type": "abstract"},
            "passages": [{
                "offset": 0,
                "infons": {},
                "text": "Hello world",
                "sentences": [],
                "annotations": [{
                    "id": "A1",
                    "infons": {"type": "word"},
                    "text": "world",
                    "locations": [{"offset": 6, "length": 5}]
                }],
                "relations": [{
                    "id": "R1",
                    "infons": {},
                    "nodes": [{"refid": "A1", "role": "only"}]
                }]
            }],
            "annotations": [],
            "relations": []
        }]
    }"#;
    let collection = json::loads(json, &Config::default()).unwrap();
    let document = &collection.documents[0];
    assert_eq!(document.infon("type"), Some("abstract"));
    let passage = &document.passages[0];
    assert_eq!(passage.annotations[0].locations[0], Location::new(6, 5));
    assert_eq!(passage.relations[0].node("only").unwrap().refid, "A1");
    validate(&collection).unwrap();
}

#[test]
fn json_missing_lists_default_to_empty() {
    let json = r#"{"source": "s", "date": "d", "key": "k", "documents": [{"id": "1", "passages": [{"offset": 3, "text": null}]}]}"#;
    let collection = json::loads(json, &Config::default()).unwrap();
    let passage = &collection.documents[0].passages[0];
    assert_eq!(passage.offset, 3);
    assert_eq!(passage.text, None);
    assert!(passage.sentences.is_empty());
}

#[test]
fn json_error_has_path() {
    let json = r#"{"documents": [{"id": "1", "passages": [{"offset": "zero"}]}]}"#;
    match json::loads(json, &Config::default()) {
        Err(BiocError::JsonError(e, _, _)) => {
            assert_eq!(e.path().to_string(), "documents[0].passages[0].offset")
        }
        other => panic!("expected a JSON error, got {:?}", other),
    }
}

#[test]
fn json_v2() {
    let collection = v2_collection();
    let v2 = Config::default().with_version(BiocVersion::V2);
    let json = json::dumps(&collection, &v2).unwrap();
    assert!(json.contains(r#""version": "2.0""#));
    assert_eq!(json::loads(&json, &v2).unwrap(), collection);

    assert!(matches!(
        json::loads(&json, &Config::default()),
        Err(BiocError::VersionError(..))
    ));
    assert!(matches!(
        json::dumps(&collection, &Config::default()),
        Err(BiocError::VersionError(..))
    ));

    let skip = Config::default().with_shape_policy(ShapePolicy::Skip);
    let decoded = json::loads(&json, &skip).unwrap();
    assert_eq!(decoded.version, None);
    assert!(decoded.documents[0].sentences.is_empty());
    let written = json::dumps(&collection, &skip).unwrap();
    assert!(!written.contains("version"));
}

#[test]
fn json_lines_roundtrip() {
    let collection = everything();
    let mut writer = JsonLinesWriter::new(Vec::new(), Config::default());
    writer.write_collection_info(&collection).unwrap();
    for document in collection.documents.iter() {
        writer.write_document(document).unwrap();
    }
    let output = String::from_utf8(writer.into_inner()).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with(r#"{"bioctype":"BioCCollection""#));
    assert!(lines[1].starts_with(r#"{"bioctype":"BioCDocument","id":"1""#));

    let objects: Vec<BiocObject> = JsonLinesReader::new(output.as_bytes(), Config::default())
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(objects.len(), 3);
    match &objects[0] {
        BiocObject::Collection(info) => {
            assert_eq!(info.source, "source");
            assert!(info.documents.is_empty());
        }
        other => panic!("expected collection information, got {:?}", other),
    }
    assert_eq!(objects[2], BiocObject::Document(collection.documents[1].clone()));
}

#[test]
fn json_lines_passages_and_sentences() {
    let passage = everything().documents[1].passages[0].clone();
    let mut writer = JsonLinesWriter::new(Vec::new(), Config::default());
    writer.write_passage(&passage).unwrap();
    for sentence in passage.sentences.iter() {
        writer
            .write(&BiocObject::Sentence(sentence.clone()))
            .unwrap();
    }
    let output = writer.into_inner();
    let mut reader = JsonLinesReader::new(output.as_slice(), Config::default());
    assert_eq!(
        reader.next_object().unwrap(),
        Some(BiocObject::Passage(passage.clone()))
    );
    match reader.next_object().unwrap() {
        Some(BiocObject::Sentence(sentence)) => assert_eq!(sentence.text, "abcdefg"),
        other => panic!("expected a sentence, got {:?}", other),
    }
    assert_eq!(reader.next().unwrap().unwrap().typeinfo(), Type::Sentence);
    assert!(reader.next_object().unwrap().is_none());
}

#[test]
fn json_lines_errors_name_the_line() {
    let input = "{\"bioctype\":\"BioCDocument\",\"id\":\"1\"}\n\n{\"id\":\"2\"}\n";
    let mut reader = JsonLinesReader::new(input.as_bytes(), Config::default());
    assert!(reader.next_object().unwrap().is_some());
    match reader.next_object() {
        Err(BiocError::JsonError(_, line, _)) => assert_eq!(line, "line 3"),
        other => panic!("expected a JSON error, got {:?}", other),
    }
}

#[test]
fn dataformat_from_extension() {
    let config = Config::default();
    assert_eq!(dataformat_for("corpus.bioc.xml", &config), DataFormat::Xml);
    assert_eq!(
        dataformat_for("corpus.JSON", &config),
        DataFormat::Json { compact: false }
    );
    assert_eq!(dataformat_for("corpus.jsonl", &config), DataFormat::JsonLines);
    assert_eq!(dataformat_for("-", &config), DataFormat::Xml);
    let compact = Config::default().with_dataformat(DataFormat::Json { compact: true });
    assert_eq!(
        dataformat_for("corpus.json", &compact),
        DataFormat::Json { compact: true }
    );
    assert_eq!(strip_known_extension("corpus.bioc.json"), "corpus");
    assert_eq!(strip_known_extension("corpus.txt"), "corpus.txt");
}

#[test]
fn save_and_load_files() {
    let dir = tempfile::tempdir().unwrap();
    let collection = everything();
    for name in ["everything.xml", "everything.json", "everything.jsonl"] {
        let path = dir.path().join(name);
        let filename = path.to_str().unwrap();
        save_file(&collection, filename, &Config::default()).unwrap();
        let loaded = load_file(filename, &Config::default()).unwrap();
        assert_eq!(loaded, collection, "roundtrip through {}", name);
    }
}

#[test]
fn workdir_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default().with_workdir(dir.path());
    save_file(&everything(), "relative.bioc.xml", &config).unwrap();
    assert!(dir.path().join("relative.bioc.xml").is_file());
    let loaded = load_file("relative.bioc.xml", &config).unwrap();
    assert_everything(&loaded);
}

#[test]
fn collection_to_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("collection.json");
    let filename = path.to_str().unwrap();
    let collection = everything();
    collection.to_json_file(filename, &Config::default()).unwrap();
    let loaded = Collection::from_json_file(filename, &Config::default()).unwrap();
    assert_eq!(loaded, collection);

    let document = Document::from_json_str(
        &collection.documents[0].to_json_string(&Config::default()).unwrap(),
        &Config::default(),
    )
    .unwrap();
    assert_eq!(document, collection.documents[0]);
}
