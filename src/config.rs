/*
    BioC Library (BioC document interchange model)

        Licensed under the GNU General Public License v3
*/

use sealed::sealed;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::BiocError;
use crate::file::*;
use crate::json::ToJson;
use crate::types::*;

pub trait Configurable: Sized {
    //// Obtain the configuration
    fn config(&self) -> &Config;

    //// Obtain the configuration mutably
    fn config_mut(&mut self) -> &mut Config;

    ///Builder pattern to associate a configuration
    fn with_config(mut self, config: Config) -> Self {
        self.set_config(config);
        self
    }

    ///Setter to associate a configuration
    fn set_config(&mut self, config: Config) -> &mut Self;
}

/// This holds the configuration. It is shared by the readers, writers and batch functions.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    /// Debug mode
    pub(crate) debug: bool,

    /// The working directory
    pub(crate) workdir: Option<PathBuf>,

    /// Generate pseudo-random identifiers for relations that have none. Each will consist of 21 URL-friendly ASCII symbols after a prefix R.
    pub(crate) generate_ids: bool,

    /// The BioC schema version to read or write
    pub(crate) version: BiocVersion,

    /// What to do with v2-only shapes when working in v1 mode
    pub(crate) shape_policy: ShapePolicy,

    /// Output encoding for XML
    pub(crate) encoding: TextEncoding,

    /// Value of the standalone flag in the XML declaration
    pub(crate) standalone: bool,

    /// The chosen dataformat for serialisation when it can not be derived from a filename, defaults to BioC XML.
    pub(crate) dataformat: DataFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            workdir: None,
            generate_ids: false,
            version: BiocVersion::V1,
            shape_policy: ShapePolicy::Reject,
            encoding: TextEncoding::Utf8,
            standalone: true,
            dataformat: DataFormat::Xml,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable debug mode. In debug mode, verbose output will be printed to standard error output
    pub fn with_debug(mut self, value: bool) -> Self {
        self.debug = value;
        self
    }

    /// Is debug mode enabled or not?
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Sets the working directory, relative filenames are resolved against it first
    pub fn with_workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(workdir.into());
        self
    }

    ///  Return the working directory, if set
    pub fn workdir(&self) -> Option<&Path> {
        self.workdir.as_deref()
    }

    /// Generate identifiers for relations that have none.
    pub fn with_generate_ids(mut self, value: bool) -> Self {
        self.generate_ids = value;
        self
    }

    /// Is generation of relation identifiers enabled or not?
    pub fn generate_ids(&self) -> bool {
        self.generate_ids
    }

    /// Sets the BioC schema version
    pub fn with_version(mut self, version: BiocVersion) -> Self {
        self.version = version;
        self
    }

    pub fn version(&self) -> BiocVersion {
        self.version
    }

    /// Sets what happens to v2-only shapes in v1 mode, see [`ShapePolicy`]
    pub fn with_shape_policy(mut self, policy: ShapePolicy) -> Self {
        self.shape_policy = policy;
        self
    }

    pub fn shape_policy(&self) -> ShapePolicy {
        self.shape_policy
    }

    /// Sets the output encoding for XML
    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Sets the standalone flag written in the XML declaration
    pub fn with_standalone(mut self, value: bool) -> Self {
        self.standalone = value;
        self
    }

    pub fn standalone(&self) -> bool {
        self.standalone
    }

    /// Sets the dataformat used when it can not be derived from a filename
    pub fn with_dataformat(mut self, value: DataFormat) -> Self {
        self.dataformat = value;
        self
    }

    /// Returns the configured dataformat for serialisation.
    pub fn dataformat(&self) -> DataFormat {
        self.dataformat
    }

    /// Loads configuration from a JSON file
    pub fn from_file(filename: &str) -> Result<Self, BiocError> {
        let reader = open_file_reader(filename, &Config::default())?;
        let deserializer = &mut serde_json::Deserializer::from_reader(reader);
        let result: Result<Self, _> = serde_path_to_error::deserialize(deserializer);
        result
            .map_err(|e| BiocError::JsonError(e, filename.to_string(), "Reading config from file"))
    }

    /// Applies the shape policy to a v2-only shape found in v1 mode.
    /// Returns `Ok(true)` if the shape may be used, `Ok(false)` if it must be left out.
    pub(crate) fn allow_v2_shape<F>(&self, describe: F) -> Result<bool, BiocError>
    where
        F: FnOnce() -> String,
    {
        if self.version == BiocVersion::V2 {
            return Ok(true);
        }
        match self.shape_policy {
            ShapePolicy::Reject => Err(BiocError::VersionError(
                describe(),
                "shape is only valid in BioC v2",
            )),
            ShapePolicy::Warn => {
                warn(|| format!("{} is only valid in BioC v2, leaving it out", describe()));
                Ok(false)
            }
            ShapePolicy::Skip => Ok(false),
        }
    }
}

#[sealed]
impl TypeInfo for Config {
    fn typeinfo() -> Type {
        Type::Config
    }
}

impl ToJson for Config {}
