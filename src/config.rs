use anyhow::{Context, Result, bail};
use declarative::{Variant, VariantContext};
use srakit::ClientConfig;
use std::time::Duration;

use crate::cli::ConnectionArgs;

/// Validated connection settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub client: ClientConfig,
    pub variant: Variant,
    pub jobs: usize,
}

impl Settings {
    /// Build settings from command line arguments and the environment
    pub fn from_cli(args: &ConnectionArgs) -> Result<Self> {
        let host = args
            .host
            .as_deref()
            .filter(|h| !h.trim().is_empty())
            .context("No appliance host given (use --host or SRA_HOST)")?;
        let client_id = args
            .client_id
            .as_deref()
            .context("No client id given (use --client-id or SRA_CLIENT_ID)")?;
        let client_secret = args
            .client_secret
            .as_deref()
            .context("No client secret given (use --client-secret or SRA_CLIENT_SECRET)")?;
        if args.timeout == 0 {
            bail!("Timeout must be at least one second");
        }

        let client = ClientConfig::new(host, client_id, client_secret)
            .timeout(Duration::from_secs(args.timeout));
        client.validate().context("Invalid connection settings")?;

        Ok(Self {
            client,
            variant: args.product.into(),
            jobs: args.jobs.max(1),
        })
    }

    pub fn variant_context(&self) -> VariantContext {
        VariantContext::new(self.variant)
    }
}
