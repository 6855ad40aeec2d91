use clap::Args;
use serde_json::Value;

use webtools_core::calculator::{self, CalculationInput};

use crate::input;

/// Arguments for evaluating an arithmetic expression
#[derive(Args)]
pub struct CalcArgs {
    /// Path to JSON input file (overrides the expression argument)
    #[arg(long)]
    pub input: Option<String>,

    /// Expression to evaluate, e.g. "(12.5 + 7) * 3 / 2"
    #[arg(allow_hyphen_values = true)]
    pub expression: Vec<String>,
}

pub fn run_calc(args: CalcArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let calc_input: CalculationInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if !args.expression.is_empty() {
        CalculationInput {
            expression: args.expression.join(" "),
        }
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("an expression argument, --input <file.json>, or stdin is required".into());
    };

    let result = calculator::calculate(&calc_input)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquoted_words_are_joined() {
        let value = run_calc(CalcArgs {
            input: None,
            expression: vec!["2".into(), "+".into(), "3".into(), "*".into(), "4".into()],
        })
        .unwrap();
        assert_eq!(value["result"]["value"], "14");
        assert_eq!(value["result"]["expression"], "2 + 3 * 4");
    }
}
