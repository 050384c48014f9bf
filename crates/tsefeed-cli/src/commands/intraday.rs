use tsefeed_core::{IntradayRequest, ProviderId, TseClient};

use crate::cli::IntradayArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(args: &IntradayArgs, client: &TseClient) -> Result<CommandResult, CliError> {
    let request = IntradayRequest::new(args.symbol.as_str())
        .with_interval(args.interval)
        .with_range(args.start.as_deref(), args.end.as_deref());
    let table = client.try_intraday(&request).await?;
    CommandResult::table(table, ProviderId::Tsetmc)
}
