mod capital_increase;
mod client_type;
mod convert_date;
mod currency;
mod history;
mod intraday;

use std::time::Duration;

use serde_json::Value;
use tsefeed_core::{ClientConfig, ProviderId, SeriesOptions, Table, TseClient};

use crate::cli::{Cli, Command, SeriesArgs};
use crate::error::CliError;

#[derive(Debug)]
pub struct CommandResult {
    pub data: Value,
    /// Present for commands whose result is a table, for text and CSV rendering.
    pub table: Option<Table>,
    pub source_chain: Vec<ProviderId>,
}

impl CommandResult {
    pub fn table(table: Table, source: ProviderId) -> Result<Self, CliError> {
        Ok(Self {
            data: serde_json::to_value(&table)?,
            table: Some(table),
            source_chain: vec![source],
        })
    }

    pub fn value(data: Value) -> Self {
        Self {
            data,
            table: None,
            source_chain: Vec::new(),
        }
    }
}

pub async fn run(cli: &Cli) -> Result<CommandResult, CliError> {
    if let Command::ConvertDate(args) = &cli.command {
        return convert_date::run(args);
    }

    let client = TseClient::new(client_config(cli)?)?;
    match &cli.command {
        Command::History(args) => history::run(args, &client).await,
        Command::ClientType(args) => client_type::run(args, &client).await,
        Command::Intraday(args) => intraday::run(args, &client).await,
        Command::Currency(args) => currency::run(args, &client).await,
        Command::CapitalIncrease(args) => capital_increase::run(args, &client).await,
        Command::ConvertDate(args) => convert_date::run(args),
    }
}

/// Environment settings with the global flags applied on top.
pub fn client_config(cli: &Cli) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_timeout(Duration::from_millis(timeout_ms));
    }
    if let Some(retries) = cli.retries {
        config = config.with_max_retries(retries);
    }
    if let Some(rate_limit_ms) = cli.rate_limit_ms {
        config = config.with_rate_limit_delay(Duration::from_millis(rate_limit_ms));
    }
    if cli.insecure {
        config = config.with_ssl_verify(false);
    }
    Ok(config)
}

fn series_options(args: &SeriesArgs) -> SeriesOptions {
    SeriesOptions::default()
        .with_range(args.start.as_deref(), args.end.as_deref())
        .with_limit(args.limit)
        .with_date_format(args.date_format)
        .with_output_type(args.output_type)
        .with_drop_incomplete(!args.keep_incomplete)
        .with_ascending(!args.descending)
}
