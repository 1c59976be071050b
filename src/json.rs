/*
    BioC Library (BioC document interchange model)

        Licensed under the GNU General Public License v3
*/

//! This module contains the [`ToJson`] and [`FromJson`] traits that are used in serialisation
//! to/from BioC JSON, the batch functions [`load`], [`loads`], [`dump`] and [`dumps`], and
//! the [`JsonLinesReader`] and [`JsonLinesWriter`] for the JSON lines variant, in which every line
//! holds one object tagged with its `bioctype`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::io::{BufRead, Write};

use crate::collection::Collection;
use crate::config::Config;
use crate::document::Document;
use crate::error::BiocError;
use crate::file::*;
use crate::passage::Passage;
use crate::sentence::Sentence;
use crate::types::*;

pub trait ToJson
where
    Self: TypeInfo + serde::Serialize,
{
    /// Writes a serialisation to any writer
    /// Lower-level function, this does not take the BioC version into account.
    fn to_json_writer<W>(&self, writer: W, compact: bool) -> Result<(), BiocError>
    where
        W: std::io::Write,
    {
        match compact {
            false => serde_json::to_writer_pretty(writer, &self),
            true => serde_json::to_writer(writer, &self),
        }
        .map_err(|e| {
            BiocError::SerializationError(format!("Writing {}: {}", Self::typeinfo(), e))
        })
    }

    /// Returns the structure as it should be written in the configured BioC version.
    /// Structures without version-dependent shapes are returned as they are.
    fn for_version(&self, _config: &Config) -> Result<Cow<'_, Self>, BiocError>
    where
        Self: Clone,
    {
        Ok(Cow::Borrowed(self))
    }

    /// Writes this structure to a file (or `-` for standard output)
    fn to_json_file(&self, filename: &str, config: &Config) -> Result<(), BiocError>
    where
        Self: Clone,
    {
        debug(config, || {
            format!("{}.to_json_file: filename={:?}", Self::typeinfo(), filename)
        });
        let value = self.for_version(config)?;
        let writer = open_file_writer(filename, config)?;
        value.to_json_writer(writer, compact(config))
    }

    /// Serializes this structure to one string.
    fn to_json_string(&self, config: &Config) -> Result<String, BiocError>
    where
        Self: Clone,
    {
        let value = self.for_version(config)?;
        match compact(config) {
            false => serde_json::to_string_pretty(value.as_ref()),
            true => serde_json::to_string(value.as_ref()),
        }
        .map_err(|e| {
            BiocError::SerializationError(format!(
                "Writing {} to string: {}",
                Self::typeinfo(),
                e
            ))
        })
    }
}

pub trait FromJson
where
    Self: TypeInfo + DeserializeOwned + Sized,
{
    /// Brings a freshly read structure in line with the configured BioC version
    fn apply_version(&mut self, _config: &Config) -> Result<(), BiocError> {
        Ok(())
    }

    /// Reads this structure from any reader
    fn from_json_reader<R>(reader: R, config: &Config) -> Result<Self, BiocError>
    where
        R: std::io::Read,
    {
        let deserializer = &mut serde_json::Deserializer::from_reader(reader);
        let mut value: Self = serde_path_to_error::deserialize(deserializer).map_err(|e| {
            BiocError::JsonError(e, String::new(), "Reading BioC JSON")
        })?;
        value.apply_version(config)?;
        Ok(value)
    }

    fn from_json_file(filename: &str, config: &Config) -> Result<Self, BiocError> {
        debug(config, || {
            format!("{}::from_json_file: filename={:?}", Self::typeinfo(), filename)
        });
        let reader = open_file_reader(filename, config)?;
        let deserializer = &mut serde_json::Deserializer::from_reader(reader);
        let mut value: Self = serde_path_to_error::deserialize(deserializer).map_err(|e| {
            BiocError::JsonError(e, filename.to_string(), "Reading BioC JSON from file")
        })?;
        value.apply_version(config)?;
        Ok(value)
    }

    fn from_json_str(string: &str, config: &Config) -> Result<Self, BiocError> {
        let deserializer = &mut serde_json::Deserializer::from_str(string);
        let mut value: Self = serde_path_to_error::deserialize(deserializer).map_err(|e| {
            BiocError::JsonError(e, String::new(), "Reading BioC JSON from string")
        })?;
        value.apply_version(config)?;
        Ok(value)
    }
}

fn compact(config: &Config) -> bool {
    matches!(
        config.dataformat(),
        DataFormat::Json { compact: true } | DataFormat::JsonLines
    )
}

impl ToJson for Collection {
    fn for_version(&self, config: &Config) -> Result<Cow<'_, Self>, BiocError> {
        if config.version() == BiocVersion::V2
            || !(self.has_v2_shapes() || self.documents.iter().any(|d| d.has_v2_shapes()))
        {
            return Ok(Cow::Borrowed(self));
        }
        let mut collection = self.clone();
        collection.apply_version(config)?;
        Ok(Cow::Owned(collection))
    }
}

impl FromJson for Collection {
    fn apply_version(&mut self, config: &Config) -> Result<(), BiocError> {
        if self.version.is_some()
            && !config.allow_v2_shape(|| "version in collection".to_string())?
        {
            self.version = None;
        }
        if !self.sentences.is_empty()
            && !config.allow_v2_shape(|| "sentences directly in collection".to_string())?
        {
            self.sentences.clear();
        }
        for document in self.documents.iter_mut() {
            document.apply_version(config)?;
        }
        Ok(())
    }
}

impl ToJson for Document {
    fn for_version(&self, config: &Config) -> Result<Cow<'_, Self>, BiocError> {
        if config.version() == BiocVersion::V2 || !self.has_v2_shapes() {
            return Ok(Cow::Borrowed(self));
        }
        let mut document = self.clone();
        document.apply_version(config)?;
        Ok(Cow::Owned(document))
    }
}

impl FromJson for Document {
    fn apply_version(&mut self, config: &Config) -> Result<(), BiocError> {
        if !self.sentences.is_empty()
            && !config.allow_v2_shape(|| format!("sentences directly in document {}", self.id))?
        {
            self.sentences.clear();
        }
        Ok(())
    }
}

impl ToJson for Passage {}
impl FromJson for Passage {}
impl ToJson for Sentence {}
impl FromJson for Sentence {}

/// Reads a collection from BioC JSON
pub fn load<R: BufRead>(reader: R, config: &Config) -> Result<Collection, BiocError> {
    Collection::from_json_reader(reader, config)
}

/// Reads a collection from a string holding BioC JSON
pub fn loads(string: &str, config: &Config) -> Result<Collection, BiocError> {
    Collection::from_json_str(string, config)
}

/// Writes a collection as BioC JSON. Output is compact if the dataformat in the configuration says so.
pub fn dump<W: Write>(collection: &Collection, writer: W, config: &Config) -> Result<(), BiocError> {
    collection
        .for_version(config)?
        .to_json_writer(writer, compact(config))
}

/// Writes a collection as a BioC JSON string
pub fn dumps(collection: &Collection, config: &Config) -> Result<String, BiocError> {
    collection.to_json_string(config)
}

/// One line in a BioC JSON lines file
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "bioctype")]
pub enum BiocObject {
    /// Collection information, the documents are normally on the lines that follow
    #[serde(rename = "BioCCollection")]
    Collection(Collection),
    #[serde(rename = "BioCDocument")]
    Document(Document),
    #[serde(rename = "BioCPassage")]
    Passage(Passage),
    #[serde(rename = "BioCSentence")]
    Sentence(Sentence),
}

impl BiocObject {
    pub fn typeinfo(&self) -> Type {
        match self {
            Self::Collection(_) => Type::Collection,
            Self::Document(_) => Type::Document,
            Self::Passage(_) => Type::Passage,
            Self::Sentence(_) => Type::Sentence,
        }
    }
}

/// Borrowed counterpart of [`BiocObject`], used for writing
#[derive(Serialize)]
#[serde(tag = "bioctype")]
enum BiocObjectRef<'a> {
    #[serde(rename = "BioCCollection")]
    Collection(&'a Collection),
    #[serde(rename = "BioCDocument")]
    Document(&'a Document),
    #[serde(rename = "BioCPassage")]
    Passage(&'a Passage),
    #[serde(rename = "BioCSentence")]
    Sentence(&'a Sentence),
}

/// Reads BioC JSON lines, one object per line. Empty lines are skipped.
pub struct JsonLinesReader<R: BufRead> {
    reader: R,
    config: Config,
    line: String,
    lineno: usize,
    done: bool,
}

impl JsonLinesReader<Box<dyn BufRead>> {
    /// Opens a file (or `-` for standard input) for reading
    pub fn from_file(filename: &str, config: Config) -> Result<Self, BiocError> {
        let reader = open_file_reader(filename, &config)?;
        Ok(Self::new(reader, config))
    }
}

impl<R: BufRead> JsonLinesReader<R> {
    pub fn new(reader: R, config: Config) -> Self {
        Self {
            reader,
            config,
            line: String::new(),
            lineno: 0,
            done: false,
        }
    }

    /// Reads the next object, returns `None` at the end of the input
    pub fn next_object(&mut self) -> Result<Option<BiocObject>, BiocError> {
        while !self.done {
            self.line.clear();
            let read = self.reader.read_line(&mut self.line).map_err(|e| {
                self.done = true;
                BiocError::IOError(e, format!("line {}", self.lineno + 1), "Reading JSON lines")
            })?;
            if read == 0 {
                self.done = true;
                break;
            }
            self.lineno += 1;
            if self.line.trim().is_empty() {
                continue;
            }
            let deserializer = &mut serde_json::Deserializer::from_str(&self.line);
            let result: Result<BiocObject, _> = serde_path_to_error::deserialize(deserializer);
            let mut object = result.map_err(|e| {
                BiocError::JsonError(e, format!("line {}", self.lineno), "Reading JSON lines")
            })?;
            match &mut object {
                BiocObject::Collection(collection) => collection.apply_version(&self.config)?,
                BiocObject::Document(document) => document.apply_version(&self.config)?,
                _ => {}
            }
            debug(&self.config, || {
                format!("JsonLinesReader: line {}: {}", self.lineno, object.typeinfo())
            });
            return Ok(Some(object));
        }
        Ok(None)
    }

    /// The number of lines read so far
    pub fn lineno(&self) -> usize {
        self.lineno
    }
}

impl<R: BufRead> Iterator for JsonLinesReader<R> {
    type Item = Result<BiocObject, BiocError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_object().transpose()
    }
}

/// Writes BioC JSON lines, one object per line
pub struct JsonLinesWriter<W: Write> {
    writer: W,
    config: Config,
}

impl JsonLinesWriter<Box<dyn Write>> {
    /// Creates a file (or `-` for standard output) for writing
    pub fn create(filename: &str, config: Config) -> Result<Self, BiocError> {
        let writer = open_file_writer(filename, &config)?;
        Ok(Self::new(writer, config))
    }
}

impl<W: Write> JsonLinesWriter<W> {
    pub fn new(writer: W, config: Config) -> Self {
        Self { writer, config }
    }

    pub fn write(&mut self, object: &BiocObject) -> Result<(), BiocError> {
        match object {
            BiocObject::Collection(collection) => self.write_collection_info(collection),
            BiocObject::Document(document) => self.write_document(document),
            BiocObject::Passage(passage) => self.write_line(BiocObjectRef::Passage(passage)),
            BiocObject::Sentence(sentence) => self.write_line(BiocObjectRef::Sentence(sentence)),
        }
    }

    /// Writes the collection information without its documents
    pub fn write_collection_info(&mut self, collection: &Collection) -> Result<(), BiocError> {
        let mut info = collection.info();
        info.apply_version(&self.config)?;
        self.write_line(BiocObjectRef::Collection(&info))
    }

    pub fn write_document(&mut self, document: &Document) -> Result<(), BiocError> {
        let document = document.for_version(&self.config)?;
        self.write_line(BiocObjectRef::Document(document.as_ref()))
    }

    pub fn write_passage(&mut self, passage: &Passage) -> Result<(), BiocError> {
        self.write_line(BiocObjectRef::Passage(passage))
    }

    pub fn write_sentence(&mut self, sentence: &Sentence) -> Result<(), BiocError> {
        self.write_line(BiocObjectRef::Sentence(sentence))
    }

    fn write_line(&mut self, object: BiocObjectRef) -> Result<(), BiocError> {
        let line = serde_json::to_string(&object)
            .map_err(|e| BiocError::SerializationError(format!("Writing JSON line: {}", e)))?;
        writeln!(self.writer, "{}", line)
            .and_then(|_| self.writer.flush())
            .map_err(|e| BiocError::IOError(e, String::new(), "Writing JSON lines"))
    }

    /// Returns the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}
