/*!
 * Downloading objects from the object store into local files.
 */

use crate::error::ProviderError;
use crate::Error;
use crate::ObjectLocator;
use rusoto_core::HttpClient;
use rusoto_core::Region;
use rusoto_credential::DefaultCredentialsProvider;
use rusoto_s3::GetObjectRequest;
use rusoto_s3::S3Client;
use rusoto_s3::S3;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/**
 * Something that can copy a remote object into a local file.  On success,
 * returns the number of bytes written.
 */
#[allow(async_fn_in_trait)]
pub trait ObjectFetcher {
    async fn download_to_file(
        &self,
        locator: &ObjectLocator,
        path: &Path,
    ) -> Result<u64, Error>;
}

/**
 * Fetches objects from S3.  Credentials, region, and retries all come from
 * the client's defaults (environment, profile, or instance metadata).
 */
pub struct S3Fetcher {
    client: S3Client,
}

impl S3Fetcher {
    pub fn new() -> Result<S3Fetcher, Error> {
        let (http_client, provider, region) = client_parts()?;
        Ok(S3Fetcher::with_client(S3Client::new_with(
            http_client,
            provider,
            region,
        )))
    }

    pub fn with_client(client: S3Client) -> S3Fetcher {
        S3Fetcher { client }
    }
}

impl ObjectFetcher for S3Fetcher {
    async fn download_to_file(
        &self,
        locator: &ObjectLocator,
        path: &Path,
    ) -> Result<u64, Error> {
        let object_output = self
            .client
            .get_object(GetObjectRequest {
                bucket: locator.bucket().to_string(),
                key: locator.key().to_string(),
                ..Default::default()
            })
            .await
            .map_err(|error| storage_error(locator, error))?;

        let body = object_output
            .body
            .ok_or_else(|| storage_error(locator, "object missing body"))?;

        /* Any existing file is truncated. */
        let mut outfile =
            tokio::fs::File::create(path).await.map_err(|source| {
                Error::WriteFile {
                    path: path.to_path_buf(),
                    source,
                }
            })?;

        /*
         * A failure here may come from the network or from the local disk.
         * Either way, whatever was written so far stays where it is.
         */
        let nbytes = tokio::io::copy(&mut body.into_async_read(), &mut outfile)
            .await
            .map_err(|error| storage_error(locator, error))?;

        outfile.flush().await.map_err(|source| Error::WriteFile {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(nbytes)
    }
}

/**
 * The pieces every AWS client here is built from: an HTTP client, the default
 * credential chain, and the default region.
 */
pub(crate) fn client_parts(
) -> Result<(HttpClient, DefaultCredentialsProvider, Region), Error> {
    let http_client =
        HttpClient::new().map_err(|error| Error::Client(Box::new(error)))?;
    let provider = DefaultCredentialsProvider::new()
        .map_err(|error| Error::Client(Box::new(error)))?;
    let region = Region::default();
    log::debug!("using AWS region {}", region.name());
    Ok((http_client, provider, region))
}

fn storage_error<E>(locator: &ObjectLocator, source: E) -> Error
where
    E: Into<ProviderError>,
{
    Error::Storage {
        bucket: locator.bucket().to_string(),
        key: locator.key().to_string(),
        source: source.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::ObjectFetcher;
    use super::S3Fetcher;
    use crate::Error;
    use crate::ObjectLocator;
    use rusoto_core::Region;
    use rusoto_mock::MockCredentialsProvider;
    use rusoto_mock::MockRequestDispatcher;
    use rusoto_s3::S3Client;

    fn fetcher(dispatcher: MockRequestDispatcher) -> S3Fetcher {
        S3Fetcher::with_client(S3Client::new_with(
            dispatcher,
            MockCredentialsProvider,
            Region::UsEast1,
        ))
    }

    #[tokio::test]
    async fn writes_object_body() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.pem");
        let contents = "-----BEGIN CERTIFICATE-----\nMIIB\n";
        let dispatcher = MockRequestDispatcher::default()
            .with_body(contents)
            .with_request_checker(|request| {
                assert_eq!(request.method, "GET");
                assert!(request.path.contains("chain.pem"), "{}", request.path);
            });

        let locator =
            ObjectLocator::parse("s3://mybucket/certs/chain.pem").unwrap();
        let nbytes = fetcher(dispatcher)
            .download_to_file(&locator, &path)
            .await
            .unwrap();

        assert_eq!(nbytes, contents.len() as u64);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), contents);
    }

    #[tokio::test]
    async fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.pem");
        std::fs::write(&path, "stale contents that are longer").unwrap();

        let dispatcher = MockRequestDispatcher::default().with_body("fresh");
        let locator = ObjectLocator::parse("s3://mybucket/key.pem").unwrap();
        fetcher(dispatcher)
            .download_to_file(&locator, &path)
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh");
    }

    #[tokio::test]
    async fn missing_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.pem");
        let dispatcher = MockRequestDispatcher::with_status(404).with_body(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <Error><Code>NoSuchKey</Code>\
             <Message>The specified key does not exist.</Message></Error>",
        );

        let locator =
            ObjectLocator::parse("s3://mybucket/certs/chain.pem").unwrap();
        let error = fetcher(dispatcher)
            .download_to_file(&locator, &path)
            .await
            .unwrap_err();

        match error {
            Error::Storage { bucket, key, .. } => {
                assert_eq!(bucket, "mybucket");
                assert_eq!(key, "certs/chain.pem");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(!path.exists());
    }
}
