/*
    BioC Library (BioC document interchange model)

        Licensed under the GNU General Public License v3
*/

//! This module contains some common helper functions for dealing with file I/O, and
//! [`load_file`] and [`save_file`] which pick the dataformat from the file name.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::collection::Collection;
use crate::config::Config;
use crate::error::BiocError;
use crate::json::{BiocObject, JsonLinesReader, JsonLinesWriter};
use crate::types::*;

const KNOWN_EXTENSIONS: &[(&str, DataFormat); 6] = &[
    (".bioc.xml", DataFormat::Xml),
    (".bioc.json", DataFormat::Json { compact: false }),
    (".bioc.jsonl", DataFormat::JsonLines),
    (".xml", DataFormat::Xml),
    (".json", DataFormat::Json { compact: false }),
    (".jsonl", DataFormat::JsonLines),
];

/// Get a file for reading or writing, this resolves relative files more intelligently
pub(crate) fn get_filepath(filename: &str, workdir: Option<&Path>) -> Result<PathBuf, BiocError> {
    if filename == "-" {
        //designates stdin or stdout
        return Ok(filename.into());
    }
    if filename.starts_with("https://") || filename.starts_with("http://") {
        return Err(BiocError::OtherError("Loading URLs is not supported"));
    }
    let path = match filename.strip_prefix("file://") {
        Some(stripped) => PathBuf::from(stripped),
        None => PathBuf::from(filename),
    };
    if path.is_absolute() {
        Ok(path)
    } else {
        //check whether we can find one in our workdir first
        if let Some(workdir) = workdir {
            let path = workdir.join(&path);
            if path.is_file() {
                return Ok(path);
            }
        }

        //final fallback is simply relative to the current working directory
        Ok(path)
    }
}

/// Auxiliary function to help open files
pub(crate) fn open_file(filename: &str, config: &Config) -> Result<File, BiocError> {
    let found_filename = get_filepath(filename, config.workdir())?;
    debug(config, || format!("open_file: {:?}", found_filename));
    File::open(found_filename.as_path()).map_err(|e| {
        BiocError::IOError(
            e,
            found_filename.to_string_lossy().into_owned(),
            "Opening file for reading failed",
        )
    })
}

/// Auxiliary function to help create files
pub(crate) fn create_file(filename: &str, config: &Config) -> Result<File, BiocError> {
    let mut found_filename = get_filepath(filename, None)?;
    if let (Some(workdir), false) = (config.workdir(), found_filename.is_absolute()) {
        found_filename = workdir.join(found_filename);
    }
    debug(config, || format!("create_file: {:?}", found_filename));
    File::create(found_filename.as_path()).map_err(|e| {
        BiocError::IOError(
            e,
            found_filename.to_string_lossy().into_owned(),
            "Opening file for writing failed",
        )
    })
}

/// Auxiliary function to help open files, `-` is standard input
pub(crate) fn open_file_reader(
    filename: &str,
    config: &Config,
) -> Result<Box<dyn BufRead>, BiocError> {
    if filename == "-" {
        //read from stdin
        Ok(Box::new(std::io::stdin().lock()))
    } else {
        Ok(Box::new(BufReader::new(open_file(filename, config)?)))
    }
}

/// Auxiliary function to help open files, `-` is standard output
pub(crate) fn open_file_writer(
    filename: &str,
    config: &Config,
) -> Result<Box<dyn Write>, BiocError> {
    if filename == "-" {
        Ok(Box::new(std::io::stdout()))
    } else {
        Ok(Box::new(BufWriter::new(create_file(filename, config)?)))
    }
}

/// Determines the dataformat from the extension of a file name.
/// Falls back to the dataformat in the configuration for unknown extensions (and standard input/output).
/// For JSON, the compact flag is taken from the configuration.
pub fn dataformat_for(filename: &str, config: &Config) -> DataFormat {
    let lowercase = filename.to_lowercase();
    for (extension, dataformat) in KNOWN_EXTENSIONS.iter() {
        if lowercase.ends_with(extension) {
            return match (dataformat, config.dataformat()) {
                (DataFormat::Json { .. }, DataFormat::Json { compact }) => {
                    DataFormat::Json { compact }
                }
                (dataformat, _) => *dataformat,
            };
        }
    }
    config.dataformat()
}

/// Returns the filename without (known!) extension.
pub fn strip_known_extension(s: &str) -> &str {
    for (extension, _) in KNOWN_EXTENSIONS.iter() {
        let split = s.len().saturating_sub(extension.len());
        if let (Some(stem), Some(tail)) = (s.get(..split), s.get(split..)) {
            if tail.eq_ignore_ascii_case(extension) {
                return stem;
            }
        }
    }
    s
}

/// Loads a collection from a file (or `-` for standard input) in BioC XML, BioC JSON or BioC JSON lines,
/// see [`dataformat_for()`].
///
/// A JSON lines file is expected to hold documents, optionally preceded by the collection information.
pub fn load_file(filename: &str, config: &Config) -> Result<Collection, BiocError> {
    let dataformat = dataformat_for(filename, config);
    debug(config, || {
        format!("load_file: filename={:?}, dataformat={}", filename, dataformat)
    });
    let reader = open_file_reader(filename, config)?;
    match dataformat {
        DataFormat::Xml => crate::xml::load(reader, config),
        DataFormat::Json { .. } => crate::json::load(reader, config),
        DataFormat::JsonLines => {
            let mut collection = Collection {
                date: String::new(),
                ..Collection::default()
            };
            for object in JsonLinesReader::new(reader, config.clone()) {
                match object? {
                    BiocObject::Collection(info) => {
                        let documents = std::mem::take(&mut collection.documents);
                        collection = info;
                        collection.documents.extend(documents);
                    }
                    BiocObject::Document(document) => collection.add_document(document),
                    BiocObject::Passage(_) | BiocObject::Sentence(_) => {
                        return Err(BiocError::ParseError(
                            format!("{} holds passages or sentences", filename),
                            "only documents can be loaded into a collection",
                        ))
                    }
                }
            }
            Ok(collection)
        }
    }
}

/// Saves a collection to a file (or `-` for standard output), see [`dataformat_for()`].
///
/// In JSON lines, the collection information is written on the first line and every document on a line of its own.
pub fn save_file(collection: &Collection, filename: &str, config: &Config) -> Result<(), BiocError> {
    let dataformat = dataformat_for(filename, config);
    debug(config, || {
        format!("save_file: filename={:?}, dataformat={}", filename, dataformat)
    });
    let mut writer = open_file_writer(filename, config)?;
    match dataformat {
        DataFormat::Xml => crate::xml::dump(collection, writer, config),
        DataFormat::Json { compact } => {
            let config = config.clone().with_dataformat(DataFormat::Json { compact });
            crate::json::dump(collection, &mut writer, &config)?;
            writer
                .flush()
                .map_err(|e| BiocError::IOError(e, filename.to_string(), "Writing BioC JSON"))
        }
        DataFormat::JsonLines => {
            let mut writer = JsonLinesWriter::new(writer, config.clone());
            writer.write_collection_info(collection)?;
            for document in collection.documents.iter() {
                writer.write_document(document)?;
            }
            Ok(())
        }
    }
}
