/*!
 * certfetch: copies a TLS certificate chain and private key out of S3 into
 * local files.  This is meant to run once at instance or container startup.
 *
 * The objects are named by `s3://bucket/key` URIs (see [`ObjectLocator`]) or,
 * alternatively, by SSM Parameter Store parameter names, and land in
 * [`Config::output_dir`] as `chain.pem` and `key.pem`.  Files are
 * copied byte for byte; nothing here looks inside them.
 */

mod config;
mod error;
mod fetch;
mod locator;
mod parameter;

pub use config::Config;
pub use config::Source;
pub use config::CHAIN_FILENAME;
pub use config::CHAIN_PARAMETER_VAR;
pub use config::CHAIN_URI_VAR;
pub use config::DEFAULT_OUTPUT_DIR;
pub use config::KEY_FILENAME;
pub use config::KEY_PARAMETER_VAR;
pub use config::KEY_URI_VAR;
pub use config::OUTPUT_DIR_VAR;
pub use error::Error;
pub use error::ProviderError;
pub use fetch::ObjectFetcher;
pub use fetch::S3Fetcher;
pub use locator::ObjectLocator;
pub use parameter::ParameterFetcher;
pub use parameter::SsmFetcher;

use std::path::Path;

/**
 * Creates the output directory and downloads the chain and then the key into
 * it.  The first failure is returned immediately: in particular, the key is
 * never fetched if the chain could not be.
 */
pub async fn fetch_certificates<O, P>(
    config: &Config,
    objects: &O,
    parameters: &P,
) -> Result<(), Error>
where
    O: ObjectFetcher,
    P: ParameterFetcher,
{
    log::debug!("{:?}", config);

    tokio::fs::create_dir_all(&config.output_dir).await.map_err(|source| {
        Error::CreateDir {
            path: config.output_dir.clone(),
            source,
        }
    })?;

    download(objects, parameters, &config.chain, &config.chain_path()).await?;
    download(objects, parameters, &config.key, &config.key_path()).await?;

    Ok(())
}

async fn download<O, P>(
    objects: &O,
    parameters: &P,
    source: &Source,
    path: &Path,
) -> Result<(), Error>
where
    O: ObjectFetcher,
    P: ParameterFetcher,
{
    let nbytes = match source {
        Source::S3Uri(uri) => {
            let locator = ObjectLocator::parse(uri)?;
            log::info!("fetching {} to \"{}\"", locator, path.display());
            objects.download_to_file(&locator, path).await?
        }
        Source::Parameter(name) => {
            log::info!(
                "fetching parameter {} to \"{}\"",
                name,
                path.display()
            );
            parameters.download_parameter(name, path).await?
        }
    };
    log::info!("wrote {} bytes to \"{}\"", nbytes, path.display());
    Ok(())
}
