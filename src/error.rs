/*!
 * Errors produced while materializing certificates.
 */

use std::error::Error as StdError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/** Boxed error from the storage provider or its client library. */
pub type ProviderError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
    /* The message text is printed verbatim by the binary. */
    #[error("must provide CHAIN_S3URI and KEY_S3URI as environment variables.")]
    MissingConfig,

    #[error("invalid object URI \"{uri}\"")]
    InvalidUri {
        uri: String,
        #[source]
        source: url::ParseError,
    },

    #[error("create directory \"{}\"", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("write \"{}\"", .path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("set up storage client")]
    Client(#[source] ProviderError),

    #[error("fetch object \"{key}\" from bucket \"{bucket}\"")]
    Storage {
        bucket: String,
        key: String,
        #[source]
        source: ProviderError,
    },

    #[error("fetch parameter \"{name}\"")]
    Parameter {
        name: String,
        #[source]
        source: ProviderError,
    },
}
