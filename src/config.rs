/*!
 * Process configuration, read once from the environment at startup.
 */

use crate::Error;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

pub const CHAIN_URI_VAR: &str = "CHAIN_S3URI";
pub const KEY_URI_VAR: &str = "KEY_S3URI";
pub const CHAIN_PARAMETER_VAR: &str = "CHAIN_PARAMETER_STORE_NAME";
pub const KEY_PARAMETER_VAR: &str = "KEY_PARAMETER_STORE_NAME";
pub const OUTPUT_DIR_VAR: &str = "OUTPUT_DIR";

pub const DEFAULT_OUTPUT_DIR: &str = "/tmp/certificates";
pub const CHAIN_FILENAME: &str = "chain.pem";
pub const KEY_FILENAME: &str = "key.pem";

/** Where one of the two files comes from. */
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    /** an object named by an `s3://bucket/key` URI */
    S3Uri(String),
    /** an SSM Parameter Store parameter, fetched with decryption */
    Parameter(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub chain: Source,
    pub key: Source,
    /** local directory that receives both files */
    pub output_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Config, Error> {
        Config::from_lookup(|name: &str| env::var_os(name))
    }

    /**
     * Builds a Config from an arbitrary variable lookup.
     *
     * Each of the chain and the key needs either an S3 URI or a parameter
     * name; the URI wins when both are set.  Empty values count as unset,
     * and so do URIs and parameter names that are not valid UTF-8.
     * OUTPUT_DIR is taken as-is, whatever its encoding.
     */
    pub fn from_lookup<F>(lookup: F) -> Result<Config, Error>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let nonempty = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let text =
            |name: &str| nonempty(name).and_then(|v| v.into_string().ok());
        let source = |uri_var: &str, parameter_var: &str| {
            match (text(uri_var), text(parameter_var)) {
                (Some(uri), _) => Some(Source::S3Uri(uri)),
                (None, Some(name)) => Some(Source::Parameter(name)),
                (None, None) => None,
            }
        };

        let (chain, key) = match (
            source(CHAIN_URI_VAR, CHAIN_PARAMETER_VAR),
            source(KEY_URI_VAR, KEY_PARAMETER_VAR),
        ) {
            (Some(chain), Some(key)) => (chain, key),
            _ => return Err(Error::MissingConfig),
        };

        let output_dir = nonempty(OUTPUT_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        Ok(Config {
            chain,
            key,
            output_dir,
        })
    }

    pub fn chain_path(&self) -> PathBuf {
        self.output_dir.join(CHAIN_FILENAME)
    }

    pub fn key_path(&self) -> PathBuf {
        self.output_dir.join(KEY_FILENAME)
    }
}
