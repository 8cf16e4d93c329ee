/*!
 * Object locators: the bucket and key named by an `s3://bucket/key` URI.
 */

use crate::Error;
use std::fmt;
use std::str::FromStr;
use url::Url;

/**
 * Identifies a single object: the bucket it lives in and its key within that
 * bucket.  Built by [`ObjectLocator::parse`] and never modified afterwards.
 */
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectLocator {
    bucket: String,
    key: String,
    url: String,
}

impl ObjectLocator {
    /**
     * Parses `scheme://bucket/path[?query]`.
     *
     * The bucket is the URI's authority.  The key is the path with one
     * leading "/" removed.  A query string is not interpreted as parameters:
     * it is appended to the key verbatim as `path?query`, which lets keys that
     * contain "?" be expressed.  Fragments are not recognized either, so a
     * "#" and whatever follows it remain part of the key.
     *
     * The URI must be well-formed, but the pieces are taken from the text as
     * written: nothing is percent-encoded, decoded, or normalized, so spaces,
     * non-ASCII characters, and "." or ".." segments all reach the store
     * unchanged.
     *
     * The scheme is not checked.  An empty bucket or key is accepted here and
     * left for the storage service to reject.
     */
    pub fn parse(uri: &str) -> Result<ObjectLocator, Error> {
        Url::parse(uri).map_err(|source| Error::InvalidUri {
            uri: uri.to_string(),
            source,
        })?;

        let raw = uri.trim_matches(|c: char| c.is_ascii_control() || c == ' ');
        let after_scheme = raw.split_once(':').map_or(raw, |(_, rest)| rest);

        let (bucket, rest) = match after_scheme.strip_prefix("//") {
            Some(rest) => {
                let end = rest
                    .find(|c: char| matches!(c, '/' | '?' | '#'))
                    .unwrap_or(rest.len());
                rest.split_at(end)
            }
            None => ("", after_scheme),
        };

        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, query),
            None => (rest, ""),
        };

        let mut key = path.strip_prefix('/').unwrap_or(path).to_string();
        if !query.is_empty() {
            key.push('?');
            key.push_str(query);
        }

        Ok(ObjectLocator {
            bucket: bucket.to_string(),
            key,
            url: raw.to_string(),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /** The URI as given, for diagnostics. */
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl FromStr for ObjectLocator {
    type Err = Error;

    fn from_str(s: &str) -> Result<ObjectLocator, Error> {
        ObjectLocator::parse(s)
    }
}

impl fmt::Display for ObjectLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
