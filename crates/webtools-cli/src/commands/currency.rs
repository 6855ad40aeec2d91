use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use webtools_core::currency::client::ExchangeRateClient;
use webtools_core::currency::{self, CurrencyCode, CurrencyConversionInput, RateSnapshot};
use webtools_core::currency::SUPPORTED_CURRENCIES;

use crate::config::WebToolsConfig;
use crate::input;

/// Arguments for converting between currencies
#[derive(Args)]
pub struct ConvertCurrencyArgs {
    /// Path to JSON input file with amount, currencies, and a rate snapshot
    #[arg(long)]
    pub input: Option<String>,

    /// Amount to convert
    #[arg(long, allow_hyphen_values = true)]
    pub amount: Option<Decimal>,

    /// Source currency (ISO code)
    #[arg(long)]
    pub from: Option<CurrencyCode>,

    /// Target currency (ISO code)
    #[arg(long)]
    pub to: Option<CurrencyCode>,

    /// Saved rate snapshot (output of `wt rates`) instead of a live fetch
    #[arg(long)]
    pub rates_file: Option<String>,
}

pub async fn run_convert_currency(
    args: ConvertCurrencyArgs,
    config: &WebToolsConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let conversion: CurrencyConversionInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let amount = args.amount.ok_or("--amount is required (or provide --input)")?;
        let from = args.from.ok_or("--from is required (or provide --input)")?;
        let to = args.to.ok_or("--to is required (or provide --input)")?;
        let snapshot: RateSnapshot = match args.rates_file {
            Some(ref path) => input::file::read_json(path)?,
            None => fetch_snapshot(config, None).await?,
        };
        CurrencyConversionInput {
            amount,
            from,
            to,
            snapshot,
        }
    };

    let result = currency::convert_currency(&conversion)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for fetching the latest exchange rates
#[derive(Args)]
pub struct RatesArgs {
    /// Quote currency for the snapshot (defaults to the configured base)
    #[arg(long)]
    pub base: Option<CurrencyCode>,

    /// Keep every currency the API returns, not just the common ones
    #[arg(long)]
    pub all: bool,
}

pub async fn run_rates(
    args: RatesArgs,
    config: &WebToolsConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut snapshot = fetch_snapshot(config, args.base).await?;
    if !args.all {
        snapshot
            .rates
            .retain(|code, _| SUPPORTED_CURRENCIES.contains(&code.as_str()));
    }
    Ok(serde_json::to_value(snapshot)?)
}

async fn fetch_snapshot(
    config: &WebToolsConfig,
    base: Option<CurrencyCode>,
) -> Result<RateSnapshot, Box<dyn std::error::Error>> {
    let settings = &config.exchange_rate;
    let base = match base {
        Some(code) => code,
        None => settings.base_currency.parse()?,
    };
    let client = ExchangeRateClient::new(settings.base_url.as_str(), settings.timeout())?;
    Ok(client.latest(&base).await?)
}
