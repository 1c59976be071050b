/*
    BioC Library (BioC document interchange model)

        Licensed under the GNU General Public License v3
*/

//! Batch functions to read and write a whole collection as BioC XML. These are thin
//! wrappers around the [`XmlDocumentReader`] and [`XmlDocumentWriter`].

use std::io::{BufRead, Write};

use crate::collection::Collection;
use crate::config::Config;
use crate::decoder::XmlDocumentReader;
use crate::encoder::XmlDocumentWriter;
use crate::error::BiocError;
use crate::types::*;

/// Reads a whole collection from BioC XML
pub fn load<R: BufRead>(reader: R, config: &Config) -> Result<Collection, BiocError> {
    let mut reader = XmlDocumentReader::new(reader, config.clone())?;
    let mut documents = Vec::new();
    while let Some(document) = reader.next_document()? {
        documents.push(document);
    }
    let mut collection = reader.collection_info().clone();
    collection.documents = documents;
    debug(config, || {
        format!(
            "xml::load: {} documents, peak node count {}",
            collection.documents.len(),
            reader.peak_node_count()
        )
    });
    Ok(collection)
}

/// Reads a whole collection from a string holding BioC XML
pub fn loads(string: &str, config: &Config) -> Result<Collection, BiocError> {
    load(string.as_bytes(), config)
}

/// Writes a whole collection as BioC XML
pub fn dump<W: Write>(collection: &Collection, writer: W, config: &Config) -> Result<(), BiocError> {
    let mut writer = XmlDocumentWriter::new(writer, config.clone())?;
    writer.write_collection_info(collection)?;
    for document in collection.documents.iter() {
        writer.write_document(document)?;
    }
    writer.close()
}

/// Writes a whole collection as a BioC XML string
pub fn dumps(collection: &Collection, config: &Config) -> Result<String, BiocError> {
    let mut buffer = Vec::new();
    dump(collection, &mut buffer, config)?;
    String::from_utf8(buffer).map_err(|e| BiocError::SerializationError(e.to_string()))
}
