use tsefeed_core::{HistoryRequest, ProviderId, TseClient};

use crate::cli::HistoryArgs;
use crate::error::CliError;

use super::{series_options, CommandResult};

pub async fn run(args: &HistoryArgs, client: &TseClient) -> Result<CommandResult, CliError> {
    let mut request = HistoryRequest::new(args.symbols.iter().cloned())?
        .with_options(series_options(&args.series))
        .with_raw(args.raw)
        .with_auto_adjust(!args.no_adjust)
        .with_adjust_volume(args.adjust_volume);
    if let Some(returns) = &args.returns {
        request = request.with_returns(returns.clone());
    }

    let table = client.try_history(&request).await?;
    CommandResult::table(table, ProviderId::Tsetmc)
}
