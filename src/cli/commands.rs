//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Planning Center Online API client
#[derive(Parser, Debug)]
#[command(name = "pco")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML); PCO_* environment variables override it
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// GET a single URL
    Get {
        /// Path (e.g. /people/v2/people/1) or full URL
        url: String,

        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },

    /// Iterate every object of a list endpoint
    Iterate {
        /// Path (e.g. /people/v2/people) or full URL
        url: String,

        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,

        /// Objects per page (1 - 100)
        #[arg(long, default_value = "25")]
        per_page: u32,

        /// Offset of the first object
        #[arg(long, default_value = "0")]
        offset: u32,

        /// Stop after this many objects
        #[arg(long)]
        max_records: Option<usize>,
    },

    /// POST a JSON payload
    Post {
        /// Path or full URL
        url: String,

        /// JSON payload
        #[arg(short, long)]
        data: Option<String>,
    },

    /// PATCH a JSON payload
    Patch {
        /// Path or full URL
        url: String,

        /// JSON payload
        #[arg(short, long)]
        data: Option<String>,
    },

    /// DELETE a URL
    Delete {
        /// Path or full URL
        url: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one value per line)
    Json,
    /// Indented JSON
    Pretty,
}

/// Parse a `key=value` pair
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid key=value: no '=' found in '{s}'"))?;
    if key.is_empty() {
        return Err(format!("invalid key=value: empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("where[first_name]=Pico").unwrap(),
            ("where[first_name]".to_string(), "Pico".to_string())
        );
        assert_eq!(
            parse_key_val("order=").unwrap(),
            ("order".to_string(), String::new())
        );
        assert!(parse_key_val("no-equals").is_err());
        assert!(parse_key_val("=value").is_err());
    }

    #[test]
    fn test_cli_parses_iterate() {
        let cli = Cli::parse_from([
            "pco",
            "--format",
            "pretty",
            "iterate",
            "/people/v2/people",
            "-p",
            "include=emails",
            "--per-page",
            "100",
            "--max-records",
            "10",
        ]);

        assert_eq!(cli.format, OutputFormat::Pretty);
        match cli.command {
            Commands::Iterate {
                url,
                params,
                per_page,
                offset,
                max_records,
            } => {
                assert_eq!(url, "/people/v2/people");
                assert_eq!(params, vec![("include".to_string(), "emails".to_string())]);
                assert_eq!(per_page, 100);
                assert_eq!(offset, 0);
                assert_eq!(max_records, Some(10));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_parses_post() {
        let cli = Cli::parse_from([
            "pco",
            "-C",
            "pco.yaml",
            "post",
            "/people/v2/people",
            "--data",
            r#"{"data":{}}"#,
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("pco.yaml")));
        assert!(matches!(cli.command, Commands::Post { data: Some(_), .. }));
    }
}
