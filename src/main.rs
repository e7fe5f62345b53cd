// Command line front end for transaction slip checks.
// Every subcommand prints its result as JSON on stdout.

use clap::{Parser, Subcommand};
use log::debug;
use serde::Serialize;
use serde_json::json;
use slipcheck::{
    models::{ExpectedValues, OcrDocument},
    processing::extract_candidates,
    utils::error::{Result, SlipError},
    Calendar, FixedCalendar, IdentifierParser, RiskScorer, ScoringPolicy, SlipFieldExtractor,
    SlipValidator, SystemCalendar, TimestampVerifier,
};
use std::fs;
use std::io::{self, Read};

#[derive(Parser, Debug)]
#[command(name = "slipcheck", version, about = "Check transaction slip references read by OCR")]
struct Cli {
    /// Reference year in the Buddhist calendar (defaults to the current year)
    #[arg(long, global = true)]
    year: Option<i32>,

    /// JSON scoring policy; unspecified fields keep their defaults
    #[arg(long, global = true)]
    policy: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a reference
    Parse { id: String },
    /// Report the first grammar check a reference fails
    Validate { id: String },
    /// Risk level and recommendation for a reference
    Assess { id: String },
    /// Find reference candidates in OCR text (file or stdin)
    Extract { input: Option<String> },
    /// Compare a reference's embedded time with a printed timestamp
    VerifyTime {
        id: String,
        text: String,
        #[arg(long)]
        tolerance: Option<u32>,
    },
    /// Full slip validation from an OCR document (JSON, file or stdin)
    CheckSlip {
        input: Option<String>,
        /// Treat the input as plain OCR text instead of a JSON document
        #[arg(long)]
        plain: bool,
        #[arg(long)]
        amount: Option<f64>,
        #[arg(long)]
        recipient: Option<String>,
    },
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let policy = match cli.policy.as_deref() {
        Some(path) => ScoringPolicy::from_json_file(path)?,
        None => ScoringPolicy::default(),
    };
    let current_year = cli.year.unwrap_or_else(|| SystemCalendar.current_year());
    debug!("reference year {}", current_year);

    match cli.command {
        Command::Parse { id } => match IdentifierParser::parse_strict(&id, current_year) {
            Ok(parsed) => print_json(&parsed),
            Err(err) => Err(SlipError::from(err)),
        },
        Command::Validate { id } => print_json(&IdentifierParser::validate(&id, current_year)),
        Command::Assess { id } => print_json(&RiskScorer::assess(&id, current_year)),
        Command::Extract { input } => {
            let text = read_input(input.as_deref())?;
            let candidates = extract_candidates(&text);
            print_json(&json!({
                "identifier": slipcheck::extract_identifier(&text),
                "candidates": candidates,
            }))
        }
        Command::VerifyTime { id, text, tolerance } => {
            let verifier = TimestampVerifier::new(tolerance.unwrap_or(policy.time_tolerance_minutes));
            print_json(&verifier.verify_date_time(&id, &text, current_year))
        }
        Command::CheckSlip {
            input,
            plain,
            amount,
            recipient,
        } => {
            let raw = read_input(input.as_deref())?;
            let document = if plain {
                OcrDocument {
                    text: raw,
                    lines: Vec::new(),
                    confidence: None,
                }
            } else {
                serde_json::from_str::<OcrDocument>(&raw)?
            };
            if amount.map_or(false, |amount| amount < 0.0) {
                return Err(SlipError::InvalidInput("expected amount is negative".to_string()));
            }

            let fields = SlipFieldExtractor::extract(&document);
            let expected = ExpectedValues {
                amount,
                recipient_name: recipient,
            };
            let validator = SlipValidator::new(policy, FixedCalendar(current_year));
            let validation = validator.validate_slip(&fields, &expected);
            print_json(&json!({
                "fields": fields,
                "validation": validation,
            }))
        }
    }
}
