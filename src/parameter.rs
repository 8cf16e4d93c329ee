/*!
 * Writing SSM Parameter Store parameters into local files.
 */

use crate::error::ProviderError;
use crate::fetch::client_parts;
use crate::Error;
use rusoto_ssm::GetParameterRequest;
use rusoto_ssm::Ssm;
use rusoto_ssm::SsmClient;
use std::path::Path;

/**
 * Something that can copy the value of a named parameter into a local file.
 * On success, returns the number of bytes written.
 */
#[allow(async_fn_in_trait)]
pub trait ParameterFetcher {
    async fn download_parameter(
        &self,
        name: &str,
        path: &Path,
    ) -> Result<u64, Error>;
}

/**
 * Fetches parameters from SSM Parameter Store.  SecureString parameters are
 * decrypted, so the caller needs permission to use their KMS key.
 */
pub struct SsmFetcher {
    client: SsmClient,
}

impl SsmFetcher {
    pub fn new() -> Result<SsmFetcher, Error> {
        let (http_client, provider, region) = client_parts()?;
        Ok(SsmFetcher::with_client(SsmClient::new_with(
            http_client,
            provider,
            region,
        )))
    }

    pub fn with_client(client: SsmClient) -> SsmFetcher {
        SsmFetcher { client }
    }
}

impl ParameterFetcher for SsmFetcher {
    async fn download_parameter(
        &self,
        name: &str,
        path: &Path,
    ) -> Result<u64, Error> {
        let result = self
            .client
            .get_parameter(GetParameterRequest {
                name: name.to_string(),
                with_decryption: Some(true),
                ..Default::default()
            })
            .await
            .map_err(|error| parameter_error(name, error))?;

        let value = result
            .parameter
            .and_then(|parameter| parameter.value)
            .ok_or_else(|| parameter_error(name, "parameter missing value"))?;

        tokio::fs::write(path, value.as_bytes()).await.map_err(|source| {
            Error::WriteFile {
                path: path.to_path_buf(),
                source,
            }
        })?;

        Ok(value.len() as u64)
    }
}

fn parameter_error<E>(name: &str, source: E) -> Error
where
    E: Into<ProviderError>,
{
    Error::Parameter {
        name: name.to_string(),
        source: source.into(),
    }
}
