/*
    BioC Library (BioC document interchange model)

        Licensed under the GNU General Public License v3
*/

//! This module defines the [`BiocError`] type that is used throughout the library.

use std::error::Error;
use std::fmt;

use crate::validator::Violation;

// ------------------------------ ERROR DEFINITIONS & IMPLEMENTATIONS -------------------------------------------------------------

#[derive(Debug)]
pub enum BiocError {
    /// Input/output error (wrapped), with the filename (if any) and a context message
    IOError(std::io::Error, String, &'static str),

    /// The XML tokenizer failed (malformed or unbalanced markup)
    XmlError(quick_xml::Error, &'static str),

    /// Deserialisation of JSON failed, includes the path to the offending value
    JsonError(
        serde_path_to_error::Error<serde_json::Error>,
        String,
        &'static str,
    ),

    SerializationError(String),

    /// The input is well-formed markup but not a valid BioC structure, or it ends prematurely
    ParseError(String, &'static str),

    /// A shape that only exists in BioC v2 was found while working in v1 mode
    VersionError(String, &'static str),

    /// The API was used in a way that is not allowed (e.g. writing after close)
    UsageError(&'static str),

    /// A value can not be represented in the output encoding
    EncodeError(String, &'static str),

    /// A span can not be computed (e.g. an annotation without locations)
    SpanError(String),

    /// The requested level does not exist below the given structure
    LevelError(&'static str),

    /// A consistency violation raised by the fail-fast validator
    ValidationError(Violation),

    OtherError(&'static str),
}

impl From<&BiocError> for String {
    /// Returns the error message as a String
    fn from(error: &BiocError) -> String {
        match error {
            BiocError::IOError(err, filename, msg) => {
                format!("IOError: {} ({}) {}", err, filename, msg)
            }
            BiocError::XmlError(err, msg) => format!("XmlError: {} ({})", err, msg),
            BiocError::JsonError(err, path, msg) => {
                format!("JsonError: Parsing JSON failed: {} ({}) {}", err, path, msg)
            }
            BiocError::SerializationError(msg) => {
                format!("SerializationError: Serialization failed: {}", msg)
            }
            BiocError::ParseError(detail, msg) => format!("ParseError: {} ({})", detail, msg),
            BiocError::VersionError(detail, msg) => {
                format!("VersionError: {} ({})", detail, msg)
            }
            BiocError::UsageError(msg) => format!("UsageError: {}", msg),
            BiocError::EncodeError(detail, msg) => format!("EncodeError: {} ({})", detail, msg),
            BiocError::SpanError(msg) => format!("SpanError: {}", msg),
            BiocError::LevelError(msg) => format!("LevelError: {}", msg),
            BiocError::ValidationError(violation) => {
                format!("ValidationError: {}", violation)
            }
            BiocError::OtherError(msg) => format!("OtherError: {}", msg),
        }
    }
}

impl fmt::Display for BiocError {
    /// Formats the error message for printing
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let errmsg: String = String::from(self);
        write!(f, "[BiocError] {}", errmsg)
    }
}

impl Error for BiocError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BiocError::IOError(err, ..) => Some(err),
            BiocError::XmlError(err, _) => Some(err),
            BiocError::JsonError(err, ..) => Some(err),
            _ => None,
        }
    }
}

impl From<quick_xml::Error> for BiocError {
    fn from(error: quick_xml::Error) -> Self {
        BiocError::XmlError(error, "")
    }
}
