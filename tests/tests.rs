use bioc::*;

mod common;
use common::*;

#[test]
fn instantiation_with_builder_pattern() {
    let collection = Collection::new()
        .with_source("PubMed")
        .with_key("collection.key")
        .with_document(
            Document::new("D1").with_passage(
                Passage::new(0).with_text("Hello world").with_annotation(
                    Annotation::new("A1", "world").with_location(Location::new(6, 5)),
                ),
            ),
        );
    assert_eq!(collection.source, "PubMed");
    assert_eq!(collection.documents.len(), 1);
    let document = collection.document("D1").unwrap();
    let passage = document.passage(0).unwrap();
    assert_eq!(passage.annotation("A1").unwrap().text, "world");
    assert!(collection.document("D2").is_none());
}

#[test]
fn default_collection_is_dated_today() {
    let collection = Collection::default();
    assert_eq!(collection.date.len(), 10);
    assert_eq!(&collection.date[4..5], "-");
    assert_eq!(&collection.date[7..8], "-");
}

#[test]
fn infons_replace_and_clear() {
    let mut document = Document::new("D1");
    document.set_infon("type", "abstract");
    document.set_infon("type", "title");
    assert_eq!(document.infon("type"), Some("title"));
    assert_eq!(document.infons().len(), 1);
    document.set_infon("lang", "en");
    let keys: Vec<&str> = document.infons().iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["lang", "type"]);
    document.clear_infons();
    assert!(document.infons().is_empty());
}

#[test]
fn total_span_merges_discontinuous_locations() {
    let annotation = Annotation::new("A1", "ab ef")
        .with_location(Location::new(5, 2))
        .with_location(Location::new(1, 2));
    let span = annotation.total_span().unwrap();
    assert_eq!(span, Location::new(1, 6));
    assert_eq!(span.end().unwrap(), 7);
}

#[test]
fn total_span_without_locations() {
    let annotation = Annotation::new("A1", "x");
    assert!(matches!(
        annotation.total_span(),
        Err(BiocError::SpanError(_))
    ));
}

#[test]
fn annotation_contains() {
    let outer = Annotation::new("A1", "").with_location(Location::new(0, 10));
    let inner = Annotation::new("A2", "").with_location(Location::new(2, 3));
    assert!(outer.contains(&inner).unwrap());
    assert!(!inner.contains(&outer).unwrap());
    assert!(outer.contains(&Annotation::new("A3", "")).is_err());
}

#[test]
fn relation_node_by_role() {
    let relation = Relation::new("R1")
        .with_node(Node::new("T1", "cause"))
        .with_node(Node::new("T2", "effect"));
    assert_eq!(relation.node("effect").unwrap().refid, "T2");
    assert!(relation.node("other").is_none());
    assert_eq!(
        relation.nodes[0].to_string(),
        "Node[refid=T1,role=cause]"
    );
}

#[test]
fn constructors_from_children() {
    let passage = Passage::of_sentences(vec![
        Sentence::new(20, "Second."),
        Sentence::new(10, "First."),
    ])
    .unwrap();
    assert_eq!(passage.offset, 10);
    assert_eq!(passage.sentence(20).unwrap().text, "Second.");

    let document = Document::of_passages(vec![passage]).unwrap();
    assert_eq!(document.passages.len(), 1);

    let collection = Collection::of_documents(vec![document]).unwrap();
    assert_eq!(collection.documents.len(), 1);

    assert!(Passage::of_sentences(Vec::new()).is_err());
    assert!(Document::of_passages(Vec::new()).is_err());
    assert!(Collection::of_documents(Vec::new()).is_err());
}

#[test]
fn document_of_text() {
    let document = Document::of_text("Hello world");
    let (offset, text) = document.text_with_offset().unwrap();
    assert_eq!(offset, 0);
    assert_eq!(text, "Hello world");
}

#[test]
fn passage_text_from_sentences() {
    let passage = Passage::new(10)
        .with_sentence(Sentence::new(10, "abc"))
        .with_sentence(Sentence::new(15, "def"));
    let (offset, text) = passage.text_with_offset().unwrap();
    assert_eq!(offset, 10);
    assert_eq!(text, "abc\n\ndef");
}

#[test]
fn document_text_fills_gaps() {
    let document = Document::new("D1")
        .with_passage(Passage::new(0).with_text("Title"))
        .with_passage(Passage::new(7).with_text("Body"));
    let (_, text) = document.text_with_offset().unwrap();
    assert_eq!(text, "Title\n\nBody");
}

#[test]
fn document_text_overlap_is_an_error() {
    let document = Document::new("D1")
        .with_passage(Passage::new(0).with_text("Title"))
        .with_passage(Passage::new(3).with_text("Body"));
    assert!(matches!(
        document.text_with_offset(),
        Err(BiocError::SpanError(_))
    ));
}

#[test]
fn node_count() {
    let collection = everything();
    // document, passage, 2 annotations with 1 location each, relation with 2 nodes, relation with 2 nodes
    assert_eq!(collection.documents[0].node_count(), 1 + 1 + 4 + 3 + 3);
}

#[test]
fn annotations_by_level() {
    let collection = everything();
    let ids: Vec<&str> = collection
        .all_annotations()
        .map(|found| found.item.id.as_str())
        .collect();
    assert_eq!(ids, vec!["1", "2", "3", "4"]);

    let found: Vec<_> = collection
        .annotations_at(&[Level::Sentence])
        .unwrap()
        .collect();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].item.id, "3");
    assert_eq!(found[0].document.unwrap().id, "2");
    assert_eq!(found[0].passage.unwrap().offset, 27);
    assert_eq!(found[0].sentence.unwrap().offset, 27);
    assert_eq!(found[0].level(), Some(Level::Sentence));

    let found: Vec<_> = collection
        .annotations_at(&[Level::Passage])
        .unwrap()
        .collect();
    assert_eq!(found.len(), 2);
    assert_eq!(found[1].level(), Some(Level::Passage));
}

#[test]
fn relations_by_level() {
    let collection = everything();
    let ids: Vec<&str> = collection
        .relations_at(&[Level::Document, Level::Sentence])
        .unwrap()
        .map(|found| found.item.id.as_str())
        .collect();
    assert_eq!(ids, vec!["R2", "R3"]);
}

#[test]
fn invalid_level() {
    let collection = everything();
    let passage = &collection.documents[0].passages[0];
    assert!(matches!(
        passage.annotations_at(&[Level::Document]),
        Err(BiocError::LevelError(_))
    ));
    assert!(matches!(
        passage.relations_at(&[]),
        Err(BiocError::LevelError(_))
    ));
    assert_eq!(passage.annotations_at(&[Level::Passage]).unwrap().count(), 2);
}

#[test]
fn all_sentences() {
    let collection = everything();
    let offsets: Vec<usize> = sentences(&collection)
        .map(|found| found.item.offset)
        .collect();
    assert_eq!(offsets, vec![27, 34]);

    let collection = v2_collection();
    let found: Vec<_> = sentences(&collection).collect();
    assert_eq!(found.len(), 1);
    assert!(found[0].passage.is_none());
    assert_eq!(found[0].document.unwrap().id, "D1");
}

#[test]
fn v2_shapes() {
    let collection = v2_collection();
    assert!(collection.has_v2_shapes());
    assert!(collection.documents[0].has_v2_shapes());
    assert!(!everything().has_v2_shapes());
}

#[test]
fn info_leaves_out_documents() {
    let info = everything().info();
    assert!(info.documents.is_empty());
    assert_eq!(info.source, "source");
}

#[test]
fn config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{ "debug": false, "version": "V2", "shape_policy": "Skip", "encoding": "Ascii" }"#,
    )
    .unwrap();
    let config = Config::from_file(path.to_str().unwrap()).unwrap();
    assert_eq!(config.version(), BiocVersion::V2);
    assert_eq!(config.shape_policy(), ShapePolicy::Skip);
    assert_eq!(config.encoding(), TextEncoding::Ascii);
    assert!(config.standalone());
}

#[test]
fn config_from_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "version": "V3" }"#).unwrap();
    match Config::from_file(path.to_str().unwrap()) {
        Err(BiocError::JsonError(e, _, _)) => assert_eq!(e.path().to_string(), "version"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn error_display() {
    let error = BiocError::UsageError("can not write after close");
    assert_eq!(
        error.to_string(),
        "[BiocError] UsageError: can not write after close"
    );
}
