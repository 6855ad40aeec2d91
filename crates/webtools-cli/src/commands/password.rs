use clap::Args;
use serde_json::Value;

use webtools_core::password::{self, PasswordOptions};

use crate::config::WebToolsConfig;
use crate::input;

/// Arguments for password generation
#[derive(Args)]
pub struct PasswordArgs {
    /// Path to JSON options file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Password length (8 to 64; defaults to the configured length)
    #[arg(long, short)]
    pub length: Option<u32>,

    /// Leave out uppercase letters
    #[arg(long)]
    pub no_uppercase: bool,

    /// Leave out lowercase letters
    #[arg(long)]
    pub no_lowercase: bool,

    /// Leave out digits
    #[arg(long)]
    pub no_digits: bool,

    /// Leave out symbols
    #[arg(long)]
    pub no_symbols: bool,

    /// Seed for a reproducible password
    #[arg(long)]
    pub seed: Option<u64>,
}

impl PasswordArgs {
    fn options(&self, config: &WebToolsConfig) -> PasswordOptions {
        PasswordOptions {
            length: self.length.unwrap_or(config.password.default_length),
            uppercase: !self.no_uppercase,
            lowercase: !self.no_lowercase,
            digits: !self.no_digits,
            symbols: !self.no_symbols,
            seed: self.seed,
        }
    }
}

pub fn run_password(
    args: PasswordArgs,
    config: &WebToolsConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let options: PasswordOptions = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        args.options(config)
    };

    let result = password::generate_password(&options)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> PasswordArgs {
        PasswordArgs {
            input: None,
            length: None,
            no_uppercase: false,
            no_lowercase: false,
            no_digits: false,
            no_symbols: false,
            seed: None,
        }
    }

    #[test]
    fn test_length_falls_back_to_config() {
        let mut config = WebToolsConfig::default();
        config.password.default_length = 30;
        assert_eq!(args().options(&config).length, 30);
    }

    #[test]
    fn test_flags_disable_classes() {
        let opts = PasswordArgs {
            no_symbols: true,
            no_digits: true,
            length: Some(12),
            ..args()
        }
        .options(&WebToolsConfig::default());
        assert_eq!(opts.length, 12);
        assert!(opts.uppercase && opts.lowercase);
        assert!(!opts.digits && !opts.symbols);
    }
}
