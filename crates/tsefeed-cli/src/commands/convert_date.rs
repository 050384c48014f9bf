use serde::Serialize;
use tsefeed_core::calendar::{self, JalaliDate};
use tsefeed_core::ValidationError;

use crate::cli::ConvertDateArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct ConvertedDate {
    input: String,
    gregorian: String,
    jalali: String,
    weekday: &'static str,
    weekday_fa: &'static str,
}

pub fn run(args: &ConvertDateArgs) -> Result<CommandResult, CliError> {
    let gregorian = calendar::to_gregorian(&args.date).ok_or_else(|| ValidationError::InvalidDate {
        value: args.date.clone(),
    })?;
    let converted = ConvertedDate {
        input: args.date.clone(),
        gregorian: gregorian.to_string(),
        jalali: JalaliDate::from_gregorian(gregorian)?.to_string(),
        weekday: calendar::weekday_en(gregorian.weekday()),
        weekday_fa: calendar::weekday_fa(gregorian.weekday()),
    };
    Ok(CommandResult::value(serde_json::to_value(converted)?))
}
