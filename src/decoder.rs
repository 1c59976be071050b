/*
    BioC Library (BioC document interchange model)

        Licensed under the GNU General Public License v3
*/

//! This module contains the [`XmlDocumentReader`], which reads BioC XML incrementally, one
//! document at a time. Only the collection information and the document currently being read are
//! held in memory.

use datasize::data_size;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;
use std::io::BufRead;

use crate::annotation::{Annotation, HasAnnotations, Location};
use crate::collection::Collection;
use crate::config::{Config, Configurable};
use crate::document::Document;
use crate::error::BiocError;
use crate::file::open_file_reader;
use crate::infons::Infons;
use crate::passage::Passage;
use crate::relation::{Node, Relation};
use crate::sentence::Sentence;
use crate::types::*;

/// Where the reader is in the BioC structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    BeforeCollection,
    InCollection,
    InDocument,
    InPassage,
    InSentence,
}

/// A structure that has been opened but not closed yet
#[derive(Debug)]
enum Open {
    Document(Document),
    Passage(Passage),
    Sentence(Sentence),
}

impl Open {
    fn state(&self) -> State {
        match self {
            Self::Document(_) => State::InDocument,
            Self::Passage(_) => State::InPassage,
            Self::Sentence(_) => State::InSentence,
        }
    }

    fn infons_mut(&mut self) -> &mut Infons {
        match self {
            Self::Document(document) => &mut document.infons,
            Self::Passage(passage) => &mut passage.infons,
            Self::Sentence(sentence) => &mut sentence.infons,
        }
    }

    fn target(&mut self) -> &mut dyn HasAnnotations {
        match self {
            Self::Document(document) => document,
            Self::Passage(passage) => passage,
            Self::Sentence(sentence) => sentence,
        }
    }

    fn node_count(&self) -> usize {
        match self {
            Self::Document(document) => document.node_count(),
            Self::Passage(passage) => passage.node_count(),
            Self::Sentence(sentence) => sentence.node_count(),
        }
    }
}

/// The outcome of processing one event
enum Step {
    Continue,
    DocumentOpened,
    Document(Document),
    EndOfCollection,
    EndOfInput,
}

/// Reads BioC XML one document at a time.
///
/// ```
/// use bioc::{Config, XmlDocumentReader};
///
/// let xml = "<collection><source>PubMed</source><document><id>1</id></document></collection>";
/// let mut reader = XmlDocumentReader::new(xml.as_bytes(), Config::default()).unwrap();
/// assert_eq!(reader.collection_info().source, "PubMed");
/// while let Some(document) = reader.next_document().unwrap() {
///     assert_eq!(document.id, "1");
/// }
/// ```
pub struct XmlDocumentReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    config: Config,
    state: State,
    open: Vec<Open>,
    collection: Collection,
    /// Text content of the element being read
    text: String,
    infon_key: Option<String>,
    peeked: Option<Document>,
    seen_collection: bool,
    done: bool,
    peak_node_count: usize,
}

impl XmlDocumentReader<Box<dyn BufRead>> {
    /// Opens a file (or `-` for standard input) for reading
    pub fn from_file(filename: &str, config: Config) -> Result<Self, BiocError> {
        debug(&config, || {
            format!("XmlDocumentReader::from_file: filename={:?}", filename)
        });
        let reader = open_file_reader(filename, &config)?;
        Self::new(reader, config)
    }
}

impl<R: BufRead> XmlDocumentReader<R> {
    /// Creates a reader and reads the collection information up to the first document
    pub fn new(source: R, config: Config) -> Result<Self, BiocError> {
        let mut reader = Reader::from_reader(source);
        reader.config_mut().expand_empty_elements = true;
        let mut slf = Self {
            reader,
            buf: Vec::new(),
            config,
            state: State::BeforeCollection,
            open: Vec::new(),
            collection: Collection {
                date: String::new(),
                ..Collection::default()
            },
            text: String::new(),
            infon_key: None,
            peeked: None,
            seen_collection: false,
            done: false,
            peak_node_count: 0,
        };
        loop {
            match slf.step()? {
                Step::Continue => {}
                Step::DocumentOpened => break,
                Step::Document(document) => {
                    slf.peeked = Some(document);
                    slf.measure();
                    break;
                }
                Step::EndOfCollection | Step::EndOfInput => {
                    slf.done = true;
                    break;
                }
            }
        }
        Ok(slf)
    }

    /// Returns the collection information read so far (without documents)
    pub fn collection_info(&self) -> &Collection {
        &self.collection
    }

    /// Are there more documents? This may read ahead one document.
    pub fn has_next(&mut self) -> Result<bool, BiocError> {
        if self.peeked.is_none() {
            self.peeked = self.next_document()?;
            self.measure();
        }
        Ok(self.peeked.is_some())
    }

    /// Reads the next document, returns `None` at the end of the collection.
    /// After an error, the reader must not be used anymore.
    pub fn next_document(&mut self) -> Result<Option<Document>, BiocError> {
        if let Some(document) = self.peeked.take() {
            return Ok(Some(document));
        }
        while !self.done {
            match self.step() {
                Ok(Step::Document(document)) => return Ok(Some(document)),
                Ok(Step::EndOfCollection) | Ok(Step::EndOfInput) => self.done = true,
                Ok(_) => {}
                Err(e) => {
                    self.done = true;
                    return Err(e);
                }
            }
        }
        Ok(None)
    }

    /// The largest number of nodes (see [`Document::node_count()`]) held by the reader at once so
    /// far: the structures being read, a document read ahead by [`Self::has_next()`] and the
    /// sentences directly under the collection. Documents already returned do not count.
    pub fn peak_node_count(&self) -> usize {
        self.peak_node_count
    }

    /// Number of nodes currently held by the reader
    fn retained(&self) -> usize {
        self.open.iter().map(Open::node_count).sum::<usize>()
            + self.peeked.as_ref().map_or(0, Document::node_count)
            + self
                .collection
                .sentences
                .iter()
                .map(Sentence::node_count)
                .sum::<usize>()
    }

    fn measure(&mut self) {
        self.peak_node_count = self.peak_node_count.max(self.retained());
    }

    fn next_event(&mut self) -> Result<Event<'static>, BiocError> {
        let event = self
            .reader
            .read_event_into(&mut self.buf)
            .map_err(|e| BiocError::XmlError(e, "Reading BioC XML"))?
            .into_owned();
        self.buf.clear();
        Ok(event)
    }

    fn step(&mut self) -> Result<Step, BiocError> {
        let event = self.next_event()?;
        match &event {
            Event::Start(start) => self.on_start(start),
            Event::End(end) => self.on_end(end.name().as_ref()),
            Event::Eof => self.on_eof(),
            _ => {
                if let Some(text) = text_content(&event)? {
                    self.text.push_str(&text);
                }
                Ok(Step::Continue)
            }
        }
    }

    fn on_start(&mut self, start: &BytesStart) -> Result<Step, BiocError> {
        self.text.clear();
        match (self.state, start.name().as_ref()) {
            (State::BeforeCollection, b"collection") => {
                debug(&self.config, || "XmlDocumentReader: collection".to_string());
                self.seen_collection = true;
                self.state = State::InCollection;
            }
            (State::InCollection, b"version") => {
                if !self.config.allow_v2_shape(|| "<version> in <collection>".to_string())? {
                    self.skip(start)?;
                }
            }
            (State::InCollection, b"document") => {
                self.open.push(Open::Document(Document::default()));
                self.state = State::InDocument;
                return Ok(Step::DocumentOpened);
            }
            (State::InCollection, b"sentence") | (State::InDocument, b"sentence") => {
                let parent = if self.state == State::InCollection {
                    "collection"
                } else {
                    "document"
                };
                if self
                    .config
                    .allow_v2_shape(|| format!("<sentence> directly in <{}>", parent))?
                {
                    self.open.push(Open::Sentence(Sentence::default()));
                    self.state = State::InSentence;
                } else {
                    self.skip(start)?;
                }
            }
            (State::InDocument, b"passage") => {
                self.open.push(Open::Passage(Passage::default()));
                self.state = State::InPassage;
            }
            (State::InPassage, b"sentence") => {
                self.open.push(Open::Sentence(Sentence::default()));
                self.state = State::InSentence;
            }
            (State::InDocument | State::InPassage | State::InSentence, b"annotation") => {
                let annotation = self.read_annotation(start)?;
                self.current()?.target().add_annotation(annotation);
            }
            (State::InDocument | State::InPassage | State::InSentence, b"relation") => {
                let relation = self.read_relation(start)?;
                self.current()?.target().add_relation(relation);
            }
            (State::BeforeCollection, _) => {}
            (_, b"infon") => {
                self.infon_key = Some(required_attribute(start, "key")?);
            }
            _ => {}
        }
        Ok(Step::Continue)
    }

    fn on_end(&mut self, name: &[u8]) -> Result<Step, BiocError> {
        let text = std::mem::take(&mut self.text);
        match (self.state, name) {
            (State::BeforeCollection, _) => {}
            (_, b"infon") => {
                let key = self.infon_key.take().unwrap_or_default();
                match self.open.last_mut() {
                    Some(open) => open.infons_mut().insert(key, text),
                    None => self.collection.infons.insert(key, text),
                };
            }
            (State::InCollection, b"source") => self.collection.source = text,
            (State::InCollection, b"date") => self.collection.date = text,
            (State::InCollection, b"key") => self.collection.key = text,
            (State::InCollection, b"version") => self.collection.version = Some(text),
            (State::InCollection, b"collection") => {
                self.state = State::BeforeCollection;
                return Ok(Step::EndOfCollection);
            }
            (State::InDocument, b"id") => {
                if let Some(Open::Document(document)) = self.open.last_mut() {
                    document.id = text;
                }
            }
            (State::InDocument, b"document") => {
                self.measure();
                if let Some(Open::Document(document)) = self.open.pop() {
                    self.state = State::InCollection;
                    self.yielded(&document);
                    return Ok(Step::Document(document));
                }
                return Err(self.structure_error("</document> without open document"));
            }
            (State::InPassage, b"offset") => {
                if let Some(Open::Passage(passage)) = self.open.last_mut() {
                    passage.offset = parse_number(&text, "passage offset")?;
                }
            }
            (State::InPassage, b"text") => {
                if let Some(Open::Passage(passage)) = self.open.last_mut() {
                    passage.text = Some(text);
                }
            }
            (State::InPassage, b"passage") => {
                if let Some(Open::Passage(passage)) = self.open.pop() {
                    match self.open.last_mut() {
                        Some(Open::Document(document)) => document.add_passage(passage),
                        _ => return Err(self.structure_error("<passage> outside <document>")),
                    }
                    self.state = State::InDocument;
                } else {
                    return Err(self.structure_error("</passage> without open passage"));
                }
            }
            (State::InSentence, b"offset") => {
                if let Some(Open::Sentence(sentence)) = self.open.last_mut() {
                    sentence.offset = parse_number(&text, "sentence offset")?;
                }
            }
            (State::InSentence, b"text") => {
                if let Some(Open::Sentence(sentence)) = self.open.last_mut() {
                    sentence.text = text;
                }
            }
            (State::InSentence, b"sentence") => {
                if let Some(Open::Sentence(sentence)) = self.open.pop() {
                    match self.open.last_mut() {
                        Some(Open::Passage(passage)) => passage.add_sentence(sentence),
                        Some(Open::Document(document)) => document.sentences.push(sentence),
                        Some(Open::Sentence(_)) => {
                            return Err(self.structure_error("<sentence> inside <sentence>"))
                        }
                        None => {
                            self.collection.sentences.push(sentence);
                            self.measure();
                        }
                    }
                    self.state = self
                        .open
                        .last()
                        .map(|open| open.state())
                        .unwrap_or(State::InCollection);
                } else {
                    return Err(self.structure_error("</sentence> without open sentence"));
                }
            }
            _ => {}
        }
        Ok(Step::Continue)
    }

    fn on_eof(&mut self) -> Result<Step, BiocError> {
        if self.state != State::BeforeCollection {
            Err(BiocError::ParseError(
                format!(
                    "input ends inside the {:?} state at byte {}",
                    self.state,
                    self.reader.buffer_position()
                ),
                "unexpected end of input",
            ))
        } else if !self.seen_collection {
            Err(BiocError::ParseError(
                "no <collection> element found".to_string(),
                "not a BioC XML document",
            ))
        } else {
            Ok(Step::EndOfInput)
        }
    }

    /// Reads a whole annotation, the start tag has just been read
    fn read_annotation(&mut self, start: &BytesStart) -> Result<Annotation, BiocError> {
        let mut annotation = Annotation::new(attribute(start, "id")?.unwrap_or_default(), "");
        let mut text = String::new();
        let mut key = None;
        loop {
            let event = self.next_event()?;
            match &event {
                Event::Start(e) => {
                    text.clear();
                    match e.name().as_ref() {
                        b"infon" => key = Some(required_attribute(e, "key")?),
                        b"location" => annotation.add_location(Location::new(
                            parse_number(&required_attribute(e, "offset")?, "location offset")?,
                            parse_number(&required_attribute(e, "length")?, "location length")?,
                        )),
                        _ => {}
                    }
                }
                Event::End(e) => match e.name().as_ref() {
                    b"text" => annotation.text = std::mem::take(&mut text),
                    b"infon" => {
                        annotation
                            .infons
                            .insert(key.take().unwrap_or_default(), std::mem::take(&mut text));
                    }
                    b"annotation" => return Ok(annotation),
                    _ => {}
                },
                Event::Eof => {
                    return Err(BiocError::ParseError(
                        format!("annotation {:?} is truncated", annotation.id),
                        "unexpected end of input",
                    ))
                }
                _ => {
                    if let Some(content) = text_content(&event)? {
                        text.push_str(&content);
                    }
                }
            }
        }
    }

    /// Reads a whole relation, the start tag has just been read
    fn read_relation(&mut self, start: &BytesStart) -> Result<Relation, BiocError> {
        let id = match attribute(start, "id")? {
            Some(id) => id,
            None if self.config.generate_ids() => format!("R{}", nanoid::nanoid!()),
            None => String::new(),
        };
        let mut relation = Relation::new(id);
        let mut text = String::new();
        let mut key = None;
        loop {
            let event = self.next_event()?;
            match &event {
                Event::Start(e) => {
                    text.clear();
                    match e.name().as_ref() {
                        b"infon" => key = Some(required_attribute(e, "key")?),
                        b"node" => relation.add_node(Node::new(
                            required_attribute(e, "refid")?,
                            attribute(e, "role")?.unwrap_or_default(),
                        )),
                        _ => {}
                    }
                }
                Event::End(e) => match e.name().as_ref() {
                    b"infon" => {
                        relation
                            .infons
                            .insert(key.take().unwrap_or_default(), std::mem::take(&mut text));
                    }
                    b"relation" => return Ok(relation),
                    _ => {}
                },
                Event::Eof => {
                    return Err(BiocError::ParseError(
                        format!("relation {:?} is truncated", relation.id),
                        "unexpected end of input",
                    ))
                }
                _ => {
                    if let Some(content) = text_content(&event)? {
                        text.push_str(&content);
                    }
                }
            }
        }
    }

    /// Skips the rest of the element whose start tag has just been read
    fn skip(&mut self, start: &BytesStart) -> Result<(), BiocError> {
        self.reader
            .read_to_end_into(start.name(), &mut self.buf)
            .map_err(|e| BiocError::XmlError(e, "Skipping element"))?;
        self.buf.clear();
        Ok(())
    }

    /// The structure currently open
    fn current(&mut self) -> Result<&mut Open, BiocError> {
        let position = self.reader.buffer_position();
        self.open.last_mut().ok_or_else(|| {
            BiocError::ParseError(
                format!("no open structure at byte {}", position),
                "invalid BioC structure",
            )
        })
    }

    fn structure_error(&self, detail: &str) -> BiocError {
        BiocError::ParseError(
            format!("{} at byte {}", detail, self.reader.buffer_position()),
            "invalid BioC structure",
        )
    }

    fn yielded(&self, document: &Document) {
        let nodes = document.node_count();
        debug(&self.config, || {
            format!(
                "XmlDocumentReader: document {} ({} nodes, ~{} bytes)",
                document.id,
                nodes,
                data_size(document)
            )
        });
    }
}

impl<R: BufRead> Iterator for XmlDocumentReader<R> {
    type Item = Result<Document, BiocError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_document().transpose()
    }
}

impl<R: BufRead> Configurable for XmlDocumentReader<R> {
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

/// Returns the (unescaped) text of a text or CDATA event
fn text_content<'a>(event: &'a Event<'a>) -> Result<Option<Cow<'a, str>>, BiocError> {
    match event {
        Event::Text(text) => Ok(Some(
            text.unescape()
                .map_err(|e| BiocError::XmlError(e.into(), "Reading text"))?,
        )),
        Event::CData(cdata) => Ok(Some(Cow::Borrowed(std::str::from_utf8(cdata).map_err(
            |e| BiocError::ParseError(e.to_string(), "CDATA is not valid UTF-8"),
        )?))),
        _ => Ok(None),
    }
}

fn attribute(start: &BytesStart, name: &str) -> Result<Option<String>, BiocError> {
    for attr in start.attributes() {
        let attr = attr.map_err(|e| BiocError::XmlError(e.into(), "Reading attribute"))?;
        if attr.key.as_ref() == name.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|e| BiocError::XmlError(e.into(), "Reading attribute value"))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn required_attribute(start: &BytesStart, name: &str) -> Result<String, BiocError> {
    attribute(start, name)?.ok_or_else(|| {
        BiocError::ParseError(
            format!(
                "<{}> has no {} attribute",
                String::from_utf8_lossy(start.name().as_ref()),
                name
            ),
            "missing attribute",
        )
    })
}

fn parse_number(text: &str, what: &str) -> Result<usize, BiocError> {
    text.trim().parse().map_err(|_| {
        BiocError::ParseError(
            format!("invalid {}: {:?}", what, text),
            "expected a non-negative integer",
        )
    })
}
