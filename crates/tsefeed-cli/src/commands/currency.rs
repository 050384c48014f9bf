use tsefeed_core::{CurrencyRequest, ProviderId, TseClient};

use crate::cli::CurrencyArgs;
use crate::error::CliError;

use super::{series_options, CommandResult};

pub async fn run(args: &CurrencyArgs, client: &TseClient) -> Result<CommandResult, CliError> {
    let mut request =
        CurrencyRequest::new(args.names.iter().cloned()).with_options(series_options(&args.series));
    if let Some(returns) = &args.returns {
        request = request.with_returns(returns.clone());
    }
    let table = client.try_currency(&request).await?;
    CommandResult::table(table, ProviderId::Tgju)
}
