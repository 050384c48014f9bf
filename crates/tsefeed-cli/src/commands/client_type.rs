use tsefeed_core::{ClientTypeRequest, ProviderId, TseClient};

use crate::cli::ClientTypeArgs;
use crate::error::CliError;

use super::{series_options, CommandResult};

pub async fn run(args: &ClientTypeArgs, client: &TseClient) -> Result<CommandResult, CliError> {
    let request = ClientTypeRequest::new(args.symbols.iter().cloned())?
        .with_options(series_options(&args.series));
    let table = client.try_client_type(&request).await?;
    CommandResult::table(table, ProviderId::Tsetmc)
}
