#[cfg(test)]
use crate::*;

#[cfg(test)]
use crate::text::{document_layout_with, TextIssue, TextLayout};

#[test]
fn parse_json_annotation() {
    let json = r#"{
        "id": "T1",
        "infons": { "type": "Chemical" },
        "text": "aspirin",
        "locations": [ { "offset": 22, "length": 7 } ]
    }"#;

    let annotation: Annotation = serde_json::from_str(json).unwrap();
    assert_eq!(annotation.id, "T1");
    assert_eq!(annotation.infon("type"), Some("Chemical"));
    assert_eq!(annotation.locations.len(), 1);
    assert_eq!(annotation.total_span().unwrap(), Location::new(22, 7));
}

#[test]
fn parse_json_relation_without_role() {
    let json = r#"{ "id": "R1", "nodes": [ { "refid": "T1" } ] }"#;
    let relation: Relation = serde_json::from_str(json).unwrap();
    assert_eq!(relation.nodes[0].refid, "T1");
    assert_eq!(relation.nodes[0].role, "");
    assert!(relation.infons.is_empty());
}

#[test]
fn serialize_json_passage_without_text() {
    let passage = Passage::new(5).with_sentence(Sentence::new(5, "Hi."));
    let json = serde_json::to_string(&passage).unwrap();
    assert!(!json.contains(r#""text":null"#));
    assert!(json.starts_with(r#"{"offset":5,"infons":{},"sentences":[{"#));
}

#[test]
fn infons_are_sorted() {
    let infons: Infons = vec![("b", "2"), ("a", "1"), ("c", "3")].into_iter().collect();
    let json = serde_json::to_string(&infons).unwrap();
    assert_eq!(json, r#"{"a":"1","b":"2","c":"3"}"#);
}

#[test]
fn layout_slices_count_codepoints() {
    let layout = TextLayout::of_text("héllo wörld");
    assert_eq!(layout.len(), 11);
    assert_eq!(layout.slice(6, 11), "wörld");
    assert_eq!(layout.slice(1, 100), "éllo wörld");
    assert_eq!(layout.slice(15, 20), "");
    assert_eq!(layout.slice(2, 1), "");
    assert!(layout.matches(0, 5, "héllo"));
    assert!(!layout.matches(0, 5, "hello"));
    assert!(!layout.matches(0, 11, "héllo"));
}

#[test]
fn layout_slices_long_text() {
    let text: String = (0..1000)
        .map(|i| match i % 3 {
            0 => 'a',
            1 => 'ö',
            _ => '語',
        })
        .collect();
    let layout = TextLayout::of_text(&text);
    assert_eq!(layout.len(), 1000);
    for (begin, end) in [(0, 1), (63, 65), (64, 128), (127, 640), (998, 1000), (500, 2000)] {
        let expected: String = text.chars().skip(begin).take(end - begin).collect();
        assert_eq!(layout.slice(begin, end), expected, "{}..{}", begin, end);
    }
}

#[test]
fn layout_keeps_gaps_sparse() {
    let mut layout = TextLayout::default();
    layout.push_at(0, "abc").unwrap();
    layout.push_at(1_000_000_000_000, "xyz").unwrap();
    assert_eq!(layout.push_at(5, "late"), Err(1_000_000_000_003));
    assert_eq!(layout.len(), 1_000_000_000_007);
    assert_eq!(layout.slice(1_000_000_000_000, 1_000_000_000_007), "xyzlate");
    assert_eq!(layout.slice(1, 5), "bc\n\n");
    assert_eq!(layout.slice(999_999_999_998, 1_000_000_000_001), "\n\nx");
    assert!(layout.matches(1_000_000_000_000, 1_000_000_000_003, "xyz"));
    assert!(!layout.matches(0, 1_000_000_000_000, "abc"));
}

#[test]
fn text_reconstruction_reports_every_issue() {
    let document = Document::new("D1").with_passage(
        Passage::new(0)
            .with_sentence(Sentence::new(0, "abc"))
            .with_sentence(Sentence::new(2, ""))
            .with_sentence(Sentence::new(10, "xyz")),
    );
    let mut issues = Vec::new();
    let (layout, passage_layouts) = document_layout_with(&document, &mut |issue| {
        issues.push(match issue {
            TextIssue::Overlap { offset, end, .. } => format!("overlap {} {}", offset, end),
            TextIssue::MissingText { sentence, .. } => format!("missing {}", sentence.offset),
        });
        Ok(())
    })
    .unwrap();
    assert_eq!(issues, vec!["overlap 2 3", "missing 2"]);
    assert_eq!(layout.to_text(), "abc\n\n\n\n\n\n\nxyz");
    assert_eq!(passage_layouts.len(), 1);
    assert_eq!(passage_layouts[0].to_text(), layout.to_text());
}

#[test]
fn shape_policy() {
    let describe = || "sentence in document".to_string();
    assert!(matches!(
        Config::default().allow_v2_shape(describe),
        Err(BiocError::VersionError(..))
    ));
    assert!(!Config::default()
        .with_shape_policy(ShapePolicy::Skip)
        .allow_v2_shape(describe)
        .unwrap());
    assert!(Config::default()
        .with_version(BiocVersion::V2)
        .allow_v2_shape(describe)
        .unwrap());
}

#[test]
fn config_to_json() {
    let config = Config::default().with_version(BiocVersion::V2);
    let json = config
        .to_json_string(&Config::default().with_dataformat(DataFormat::Json { compact: true }))
        .unwrap();
    assert!(json.contains(r#""version":"V2""#));
    assert!(json.contains(r#""standalone":true"#));
}

#[test]
fn typeinfo() {
    assert_eq!(Collection::typeinfo().to_string(), "BioCCollection");
    assert_eq!(Sentence::typeinfo().to_string(), "BioCSentence");
    assert_eq!(Location::typeinfo(), Type::Location);
}
