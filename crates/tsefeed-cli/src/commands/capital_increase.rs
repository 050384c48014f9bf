use tsefeed_core::{ProviderId, TseClient};

use crate::cli::CapitalIncreaseArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(args: &CapitalIncreaseArgs, client: &TseClient) -> Result<CommandResult, CliError> {
    let mut table = client.try_capital_increase(&args.symbol).await?;
    if args.descending {
        table = table.reversed();
    }
    CommandResult::table(table, ProviderId::Tsetmc)
}
