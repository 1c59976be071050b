#![allow(dead_code)]
use bioc::*;

/// A collection exercising every BioC v1 element
pub const EVERYTHING_XML: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<!DOCTYPE collection SYSTEM 'BioC.dtd'>
<collection>
  <source>source</source>
  <date>date</date>
  <key>key</key>
  <infon key="collection-infon-key">collection-infon-value</infon>
  <document>
    <id>1</id>
    <infon key="document-infon-key">document-infon-value</infon>
    <passage>
      <infon key="passage-infon-key">passage-infon-value</infon>
      <offset>0</offset>
      <text>abcdefghijklmnopqrstuvwxyz</text>
      <annotation id="1">
        <infon key="annotation-infon-key">annotation-infon-value</infon>
        <location offset="1" length="2"/>
        <text>bc</text>
      </annotation>
      <annotation id="2">
        <infon key="annotation-infon-key">annotation-infon-value</infon>
        <location offset="5" length="2"/>
        <text>fg</text>
      </annotation>
      <relation id="R1">
        <infon key="relation-infon-key">relation-infon-value</infon>
        <node refid="1" role="role1"/>
        <node refid="2" role="role2"/>
      </relation>
    </passage>
    <relation id="R2">
      <infon key="relation-infon-key">relation-infon-value</infon>
      <node refid="1" role="role1"/>
      <node refid="2" role="role2"/>
    </relation>
  </document>
  <document>
    <id>2</id>
    <infon key="document-infon-key">document-infon-value</infon>
    <passage>
      <infon key="passage-infon-key">passage-infon-value</infon>
      <offset>27</offset>
      <sentence>
        <infon key="sentence-infon-key">sentence-infon-value</infon>
        <offset>27</offset>
        <text>abcdefg</text>
        <annotation id="3">
          <infon key="annotation-infon-key">annotation-infon-value</infon>
          <location offset="28" length="2"/>
          <text>bc</text>
        </annotation>
        <relation id="R3">
          <infon key="relation-infon-key">relation-infon-value</infon>
          <node refid="3" role="role1"/>
          <node refid="4" role="role2"/>
        </relation>
      </sentence>
      <sentence>
        <infon key="sentence-infon-key">sentence-infon-value</infon>
        <offset>34</offset>
        <text>hijklm</text>
        <annotation id="4">
          <infon key="annotation-infon-key">annotation-infon-value</infon>
          <location offset="34" length="2"/>
          <text>hi</text>
        </annotation>
      </sentence>
    </passage>
  </document>
</collection>
"#;

/// Checks that a collection holds exactly what [`EVERYTHING_XML`] describes
pub fn assert_everything(collection: &Collection) {
    assert_eq!(collection.source, "source");
    assert_eq!(collection.date, "date");
    assert_eq!(collection.key, "key");
    assert_eq!(
        collection.infon("collection-infon-key"),
        Some("collection-infon-value")
    );
    assert_eq!(collection.documents.len(), 2);

    let document = &collection.documents[0];
    assert_eq!(document.id, "1");
    assert_eq!(
        document.infon("document-infon-key"),
        Some("document-infon-value")
    );
    let passage = &document.passages[0];
    assert_eq!(passage.offset, 0);
    assert_eq!(passage.infon("passage-infon-key"), Some("passage-infon-value"));
    assert_eq!(passage.text.as_deref(), Some("abcdefghijklmnopqrstuvwxyz"));
    assert_annotation(&passage.annotations[0], "1", "bc", 1, 2);
    assert_annotation(&passage.annotations[1], "2", "fg", 5, 2);
    assert_relation(&passage.relations[0], "R1", &[("1", "role1"), ("2", "role2")]);
    assert_relation(&document.relations[0], "R2", &[("1", "role1"), ("2", "role2")]);

    let document = &collection.documents[1];
    assert_eq!(document.id, "2");
    let passage = &document.passages[0];
    assert_eq!(passage.offset, 27);
    assert_eq!(passage.text, None);
    let sentence = &passage.sentences[0];
    assert_eq!(sentence.offset, 27);
    assert_eq!(
        sentence.infon("sentence-infon-key"),
        Some("sentence-infon-value")
    );
    assert_eq!(sentence.text, "abcdefg");
    assert_annotation(&sentence.annotations[0], "3", "bc", 28, 2);
    assert_relation(&sentence.relations[0], "R3", &[("3", "role1"), ("4", "role2")]);
    let sentence = &passage.sentences[1];
    assert_eq!(sentence.offset, 34);
    assert_eq!(sentence.text, "hijklm");
    assert_annotation(&sentence.annotations[0], "4", "hi", 34, 2);
}

pub fn assert_annotation(annotation: &Annotation, id: &str, text: &str, offset: usize, length: usize) {
    assert_eq!(annotation.id, id);
    assert_eq!(
        annotation.infon("annotation-infon-key"),
        Some("annotation-infon-value")
    );
    assert_eq!(annotation.text, text);
    let span = annotation.total_span().unwrap();
    assert_eq!(span.offset, offset);
    assert_eq!(span.length, length);
}

pub fn assert_relation(relation: &Relation, id: &str, nodes: &[(&str, &str)]) {
    assert_eq!(relation.id, id);
    assert_eq!(
        relation.infon("relation-infon-key"),
        Some("relation-infon-value")
    );
    assert_eq!(relation.nodes.len(), nodes.len());
    for (node, (refid, role)) in relation.nodes.iter().zip(nodes.iter()) {
        assert_eq!(node.refid, *refid);
        assert_eq!(node.role, *role);
    }
}

pub fn everything() -> Collection {
    xml::loads(EVERYTHING_XML, &Config::default()).unwrap()
}

/// A collection using the shapes of BioC v2
pub fn v2_collection() -> Collection {
    Collection::new()
        .with_source("source")
        .with_date("date")
        .with_key("key")
        .with_version("2.0")
        .with_document(
            Document::new("D1")
                .with_passage(Passage::new(0).with_text("Hello world"))
                .with_sentence(
                    Sentence::new(12, "A loose sentence").with_annotation(
                        Annotation::new("T1", "loose").with_location(Location::new(14, 5)),
                    ),
                ),
        )
}

/// A document of a fixed size, used to check that streaming memory does not grow with the input
pub fn sized_document(id: usize) -> Document {
    let text = "The patient was given aspirin. No adverse events were reported.";
    let mut document = Document::new(id.to_string());
    for p in 0..3 {
        let offset = p * 100;
        let mut passage = Passage::new(offset).with_text(text);
        passage.add_annotation(
            Annotation::new(format!("{}.{}", id, p), "aspirin")
                .with_location(Location::new(offset + 22, 7)),
        );
        document.add_passage(passage);
    }
    document
}

/// Writes a collection of `count` sized documents
pub fn sized_collection_xml(count: usize) -> Vec<u8> {
    let mut writer = XmlDocumentWriter::new(Vec::new(), Config::default()).unwrap();
    writer
        .write_collection_info(&Collection::new().with_source("generated"))
        .unwrap();
    for i in 0..count {
        writer.write_document(&sized_document(i)).unwrap();
    }
    writer.into_inner().unwrap()
}
