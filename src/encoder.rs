/*
    BioC Library (BioC document interchange model)

        Licensed under the GNU General Public License v3
*/

//! This module contains the [`XmlDocumentWriter`], which writes BioC XML incrementally, one
//! document at a time.
//!
//! Every element is first serialised into a buffer and only then written to the sink and flushed,
//! so a failing element never leaves partial markup behind.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

use crate::annotation::Annotation;
use crate::collection::Collection;
use crate::config::{Config, Configurable};
use crate::document::Document;
use crate::error::BiocError;
use crate::file::open_file_writer;
use crate::infons::Infons;
use crate::passage::Passage;
use crate::relation::Relation;
use crate::sentence::Sentence;
use crate::types::*;

/// Writes BioC XML one document at a time.
///
/// ```
/// use bioc::{Collection, Config, Document, XmlDocumentWriter};
///
/// let mut writer = XmlDocumentWriter::new(Vec::new(), Config::default()).unwrap();
/// writer.write_collection_info(&Collection::new().with_source("PubMed")).unwrap();
/// writer.write_document(&Document::of_text("Hello world")).unwrap();
/// let xml = String::from_utf8(writer.into_inner().unwrap()).unwrap();
/// assert!(xml.ends_with("</collection>\n"));
/// ```
pub struct XmlDocumentWriter<W: Write> {
    sink: Option<W>,
    config: Config,
    buf: Vec<u8>,
    info_written: bool,
    documents_written: usize,
    closed: bool,
}

impl XmlDocumentWriter<Box<dyn Write>> {
    /// Creates a file (or `-` for standard output) and starts writing to it
    pub fn create(filename: &str, config: Config) -> Result<Self, BiocError> {
        debug(&config, || {
            format!("XmlDocumentWriter::create: filename={:?}", filename)
        });
        let writer = open_file_writer(filename, &config)?;
        Self::new(writer, config)
    }
}

impl<W: Write> XmlDocumentWriter<W> {
    /// Creates a writer, this immediately writes the XML declaration and opens the collection
    pub fn new(sink: W, config: Config) -> Result<Self, BiocError> {
        let mut slf = Self {
            sink: Some(sink),
            config,
            buf: Vec::new(),
            info_written: false,
            documents_written: 0,
            closed: false,
        };
        let standalone = if slf.config.standalone() { "yes" } else { "no" };
        let mut markup = Markup::new(&mut slf.buf, &slf.config);
        markup.event(Event::Decl(BytesDecl::new(
            "1.0",
            Some(slf.config.encoding().label()),
            Some(standalone),
        )))?;
        markup.newline()?;
        markup.start("collection", &[])?;
        markup.newline()?;
        slf.flush_element()?;
        Ok(slf)
    }

    /// Writes the collection information (source, date, key, infons and, in BioC v2,
    /// version and collection-level sentences). Documents in the collection are ignored.
    /// This may be called at most once, before any document.
    pub fn write_collection_info(&mut self, collection: &Collection) -> Result<(), BiocError> {
        self.check_open()?;
        if self.documents_written > 0 {
            return Err(BiocError::UsageError(
                "collection information must be written before the first document",
            ));
        }
        if self.info_written {
            return Err(BiocError::UsageError(
                "collection information can only be written once",
            ));
        }
        let mut markup = Markup::new(&mut self.buf, &self.config);
        let result = markup.collection_info(collection);
        if result.is_err() {
            self.buf.clear();
        }
        result?;
        self.info_written = true;
        self.flush_element()
    }

    /// Writes one document
    pub fn write_document(&mut self, document: &Document) -> Result<(), BiocError> {
        self.check_open()?;
        let mut markup = Markup::new(&mut self.buf, &self.config);
        let result = markup.document(document).and_then(|_| markup.newline());
        if result.is_err() {
            self.buf.clear();
        }
        result?;
        debug(&self.config, || {
            format!(
                "XmlDocumentWriter: document {} ({} bytes)",
                document.id,
                self.buf.len()
            )
        });
        self.documents_written += 1;
        self.flush_element()
    }

    /// The number of documents written so far
    pub fn documents_written(&self) -> usize {
        self.documents_written
    }

    /// Closes the collection and flushes the sink. Closing twice has no effect.
    pub fn close(&mut self) -> Result<(), BiocError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let mut markup = Markup::new(&mut self.buf, &self.config);
        markup.end("collection")?;
        markup.newline()?;
        self.flush_element()
    }

    /// Closes the writer (if needed) and returns the underlying sink
    pub fn into_inner(mut self) -> Result<W, BiocError> {
        self.close()?;
        self.sink
            .take()
            .ok_or(BiocError::UsageError("the sink was already taken"))
    }

    fn check_open(&self) -> Result<(), BiocError> {
        if self.closed {
            Err(BiocError::UsageError("can not write after close"))
        } else {
            Ok(())
        }
    }

    /// Writes the element buffer to the sink and flushes it
    fn flush_element(&mut self) -> Result<(), BiocError> {
        let sink = self
            .sink
            .as_mut()
            .ok_or(BiocError::UsageError("the sink was already taken"))?;
        let result = sink.write_all(&self.buf).and_then(|_| sink.flush());
        self.buf.clear();
        result.map_err(|e| BiocError::IOError(e, String::new(), "Writing BioC XML"))
    }
}

impl<W: Write> Drop for XmlDocumentWriter<W> {
    fn drop(&mut self) {
        if !self.closed && self.sink.is_some() {
            if let Err(e) = self.close() {
                warn(|| format!("closing the BioC XML writer failed: {}", e));
            }
        }
    }
}

impl<W: Write> Configurable for XmlDocumentWriter<W> {
    fn config(&self) -> &Config {
        &self.config
    }

    fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    fn set_config(&mut self, config: Config) -> &mut Self {
        self.config = config;
        self
    }
}

/// Is this character allowed in XML 1.0?
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

/// Serialises BioC structures as XML into an element buffer
struct Markup<'a> {
    writer: Writer<&'a mut Vec<u8>>,
    config: &'a Config,
}

impl<'a> Markup<'a> {
    fn new(buf: &'a mut Vec<u8>, config: &'a Config) -> Self {
        Self {
            writer: Writer::new(buf),
            config,
        }
    }

    fn event(&mut self, event: Event) -> Result<(), BiocError> {
        self.writer
            .write_event(event)
            .map_err(|e| BiocError::SerializationError(e.to_string()))
    }

    fn newline(&mut self) -> Result<(), BiocError> {
        self.event(Event::Text(BytesText::from_escaped("\n")))
    }

    /// Fails if the value contains characters that can not be written
    fn check(&self, value: &str) -> Result<(), BiocError> {
        let encoding = self.config.encoding();
        match value
            .chars()
            .find(|c| !is_xml_char(*c) || !encoding.can_encode(*c))
        {
            Some(c) if !is_xml_char(c) => Err(BiocError::EncodeError(
                format!("character U+{:04X} in {:?}", c as u32, value),
                "character is not allowed in XML 1.0",
            )),
            Some(c) => Err(BiocError::EncodeError(
                format!("character U+{:04X} in {:?}", c as u32, value),
                "character can not be represented in the output encoding",
            )),
            None => Ok(()),
        }
    }

    fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), BiocError> {
        for (_, value) in attributes {
            self.check(value)?;
        }
        let start = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.event(Event::Start(start))
    }

    fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), BiocError> {
        for (_, value) in attributes {
            self.check(value)?;
        }
        let start = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.event(Event::Empty(start))
    }

    fn end(&mut self, name: &str) -> Result<(), BiocError> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn text(&mut self, text: &str) -> Result<(), BiocError> {
        self.check(text)?;
        if text.is_empty() {
            Ok(())
        } else {
            self.event(Event::Text(BytesText::new(text)))
        }
    }

    /// Writes `<name>text</name>`
    fn text_element(&mut self, name: &str, text: &str) -> Result<(), BiocError> {
        self.start(name, &[])?;
        self.text(text)?;
        self.end(name)
    }

    fn infons(&mut self, infons: &Infons) -> Result<(), BiocError> {
        for (key, value) in infons.iter() {
            self.start("infon", &[("key", key)])?;
            self.text(value)?;
            self.end("infon")?;
        }
        Ok(())
    }

    /// Writes the children of the collection up to the first document, each on its own line
    fn collection_info(&mut self, collection: &Collection) -> Result<(), BiocError> {
        self.text_element("source", &collection.source)?;
        self.newline()?;
        self.text_element("date", &collection.date)?;
        self.newline()?;
        self.text_element("key", &collection.key)?;
        self.newline()?;
        if let Some(version) = collection.version.as_deref() {
            if self
                .config
                .allow_v2_shape(|| "<version> in <collection>".to_string())?
            {
                self.text_element("version", version)?;
                self.newline()?;
            }
        }
        for (key, value) in collection.infons.iter() {
            self.start("infon", &[("key", key)])?;
            self.text(value)?;
            self.end("infon")?;
            self.newline()?;
        }
        if !collection.sentences.is_empty()
            && self
                .config
                .allow_v2_shape(|| "<sentence> directly in <collection>".to_string())?
        {
            for sentence in collection.sentences.iter() {
                self.sentence(sentence)?;
                self.newline()?;
            }
        }
        Ok(())
    }

    fn document(&mut self, document: &Document) -> Result<(), BiocError> {
        self.start("document", &[])?;
        self.text_element("id", &document.id)?;
        self.infons(&document.infons)?;
        for passage in document.passages.iter() {
            self.passage(passage)?;
        }
        if !document.sentences.is_empty()
            && self.config.allow_v2_shape(|| {
                format!("<sentence> directly in <document> {}", document.id)
            })?
        {
            for sentence in document.sentences.iter() {
                self.sentence(sentence)?;
            }
        }
        self.annotations(&document.annotations, &document.relations)?;
        self.end("document")
    }

    fn passage(&mut self, passage: &Passage) -> Result<(), BiocError> {
        self.start("passage", &[])?;
        self.infons(&passage.infons)?;
        self.text_element("offset", &passage.offset.to_string())?;
        if let Some(text) = passage.text.as_deref() {
            self.text_element("text", text)?;
        }
        for sentence in passage.sentences.iter() {
            self.sentence(sentence)?;
        }
        self.annotations(&passage.annotations, &passage.relations)?;
        self.end("passage")
    }

    fn sentence(&mut self, sentence: &Sentence) -> Result<(), BiocError> {
        self.start("sentence", &[])?;
        self.infons(&sentence.infons)?;
        self.text_element("offset", &sentence.offset.to_string())?;
        if !sentence.text.is_empty() {
            self.text_element("text", &sentence.text)?;
        }
        self.annotations(&sentence.annotations, &sentence.relations)?;
        self.end("sentence")
    }

    fn annotations(
        &mut self,
        annotations: &[Annotation],
        relations: &[Relation],
    ) -> Result<(), BiocError> {
        for annotation in annotations.iter() {
            self.annotation(annotation)?;
        }
        for relation in relations.iter() {
            self.relation(relation)?;
        }
        Ok(())
    }

    fn annotation(&mut self, annotation: &Annotation) -> Result<(), BiocError> {
        self.start("annotation", &[("id", annotation.id.as_str())])?;
        self.infons(&annotation.infons)?;
        for location in annotation.locations.iter() {
            let offset = location.offset.to_string();
            let length = location.length.to_string();
            self.empty("location", &[("offset", offset.as_str()), ("length", length.as_str())])?;
        }
        self.text_element("text", &annotation.text)?;
        self.end("annotation")
    }

    fn relation(&mut self, relation: &Relation) -> Result<(), BiocError> {
        self.start("relation", &[("id", relation.id.as_str())])?;
        self.infons(&relation.infons)?;
        for node in relation.nodes.iter() {
            self.empty("node", &[("refid", node.refid.as_str()), ("role", node.role.as_str())])?;
        }
        self.end("relation")
    }
}
