//! Loading of [`SessionParams`] from TOML files.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use ren_gateway_params::SessionParams;
use thiserror::Error;

/// Errors that can occur while loading session parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("could not read {}: {source}", path.display())]
    Read {
        /// The file that was requested.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The file is not valid TOML for [`SessionParams`].
    #[error("could not parse {}: {source}", path.display())]
    Parse {
        /// The file that was read.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: toml::de::Error,
    },
}

/// Loads session parameters from the TOML file at `path`.
///
/// Fields missing from the file take their default values.
pub fn load_params(path: impl AsRef<Path>) -> Result<SessionParams, ConfigError> {
    let path = path.as_ref();

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
