//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{PcoClient, QueryParams};
use crate::pagination::{IterateOptions, PageSequencer};
use serde::Serialize;
use serde_json::{json, Value};
use std::io::Write;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let client = PcoClient::new(self.load_config()?)?;
        let mut out = std::io::stdout();

        match &self.cli.command {
            Commands::Get { url, params } => {
                let body = client.get(url, to_query(params)).await?;
                self.emit(&mut out, &body)
            }
            Commands::Iterate {
                url,
                params,
                per_page,
                offset,
                max_records,
            } => {
                let mut options = IterateOptions::new().per_page(*per_page).offset(*offset);
                options.query.clone_from(params);

                let mut sequencer = client.iterate(url, options);
                let count = self
                    .drain(&mut out, &mut sequencer, *max_records)
                    .await?;
                info!(
                    "Read {} record(s) from {} page(s)",
                    count,
                    sequencer.pages_fetched()
                );
                Ok(())
            }
            Commands::Post { url, data } => {
                let body = client
                    .post(url, parse_payload(data.as_deref())?, QueryParams::new())
                    .await?;
                self.emit(&mut out, &body)
            }
            Commands::Patch { url, data } => {
                let body = client
                    .patch(url, parse_payload(data.as_deref())?, QueryParams::new())
                    .await?;
                self.emit(&mut out, &body)
            }
            Commands::Delete { url } => {
                let response = client.delete(url, QueryParams::new()).await?;
                self.emit(&mut out, &json!({"status": response.status.as_u16()}))
            }
        }
    }

    /// File config (if any) overlaid with PCO_* environment variables
    fn load_config(&self) -> Result<ClientConfig> {
        let Some(path) = &self.cli.config else {
            return Ok(ClientConfig::from_env());
        };
        let mut config = ClientConfig::from_yaml_file(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Emit records until the sequence ends or `max_records` are written
    async fn drain(
        &self,
        out: &mut impl Write,
        sequencer: &mut PageSequencer<'_>,
        max_records: Option<usize>,
    ) -> Result<usize> {
        let mut count = 0usize;
        while max_records.map_or(true, |max| count < max) {
            let Some(record) = sequencer.next_record().await else {
                break;
            };
            self.emit(out, &record?)?;
            count += 1;
        }
        Ok(count)
    }

    fn emit<T: Serialize>(&self, out: &mut impl Write, value: &T) -> Result<()> {
        let line = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        writeln!(out, "{line}")?;
        Ok(())
    }
}

fn to_query(params: &[(String, String)]) -> QueryParams {
    params.iter().cloned().collect()
}

fn parse_payload(data: Option<&str>) -> Result<Option<Value>> {
    data.map(serde_json::from_str)
        .transpose()
        .map_err(|e| Error::config(format!("Invalid JSON payload: {e}")))
}
