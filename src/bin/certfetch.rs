/*!
 * certfetch: fetches the certificate chain named by CHAIN_S3URI and the
 * private key named by KEY_S3URI into OUTPUT_DIR (default
 * "/tmp/certificates") as "chain.pem" and "key.pem".  Either file can come
 * from SSM Parameter Store instead, via CHAIN_PARAMETER_STORE_NAME or
 * KEY_PARAMETER_STORE_NAME.
 */

use anyhow::Context;
use certfetch::Config;
use certfetch::S3Fetcher;
use certfetch::SsmFetcher;
use std::process;

#[tokio::main]
async fn main() {
    let _ = env_logger::try_init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            println!("Error: {}\n", error);
            process::exit(1);
        }
    };

    if let Err(error) = run(&config).await {
        eprintln!("certfetch: {:#}", error);
        process::exit(1);
    }
}

async fn run(config: &Config) -> Result<(), anyhow::Error> {
    let objects = S3Fetcher::new().with_context(|| "creating S3 client")?;
    let parameters =
        SsmFetcher::new().with_context(|| "creating SSM client")?;
    certfetch::fetch_certificates(config, &objects, &parameters)
        .await
        .with_context(|| {
            format!(
                "fetching certificates into \"{}\"",
                config.output_dir.display()
            )
        })
}
