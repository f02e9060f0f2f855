use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use declarative::Variant;

use crate::resource::Kind;

#[derive(Parser)]
#[command(name = "sra")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Inspect and manage remote access appliance configuration", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Command,
}

// ============================================================================
// Connection
// ============================================================================

#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// Appliance host name
    #[arg(long, env = "SRA_HOST", global = true)]
    pub host: Option<String>,

    /// API account client id
    #[arg(long, env = "SRA_CLIENT_ID", global = true)]
    pub client_id: Option<String>,

    /// API account client secret
    #[arg(long, env = "SRA_CLIENT_SECRET", hide_env_values = true, global = true)]
    pub client_secret: Option<String>,

    /// Product the appliance runs
    #[arg(long, value_enum, env = "SRA_PRODUCT", default_value = "pra", global = true)]
    pub product: Product,

    /// Request timeout in seconds
    #[arg(long, env = "SRA_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,

    /// Number of parallel requests
    #[arg(short, long, default_value = "4", global = true)]
    pub jobs: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Product {
    /// Privileged Remote Access
    Pra,
    /// Remote Support
    Rs,
}

impl From<Product> for Variant {
    fn from(product: Product) -> Self {
        match product {
            Product::Pra => Variant::Pra,
            Product::Rs => Variant::Rs,
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

#[derive(Subcommand)]
pub enum Command {
    /// List records of a resource kind as JSON
    List {
        /// Resource kind
        #[arg(value_enum)]
        kind: Kind,

        /// Filter as key=value (repeatable; empty values are ignored)
        #[arg(short, long, value_parser = parse_filter)]
        filter: Vec<(String, String)>,
    },

    /// Read records by id as JSON
    Get {
        /// Resource kind
        #[arg(value_enum)]
        kind: Kind,

        /// Record ids
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Delete records by id
    Delete {
        /// Resource kind
        #[arg(value_enum)]
        kind: Kind,

        /// Record ids
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Show resource kinds and the products they exist on
    Kinds,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_filter(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty filter key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(
            parse_filter("name=ops").unwrap(),
            ("name".to_string(), "ops".to_string())
        );
        assert_eq!(
            parse_filter("tag=").unwrap(),
            ("tag".to_string(), String::new())
        );
        assert_eq!(
            parse_filter("q=a=b").unwrap(),
            ("q".to_string(), "a=b".to_string())
        );
        assert!(parse_filter("name").is_err());
        assert!(parse_filter("=x").is_err());
    }

    #[test]
    fn test_parse_list() {
        let cli = Cli::try_parse_from([
            "sra",
            "--product",
            "rs",
            "list",
            "shell-jump",
            "-f",
            "name=web",
        ])
        .unwrap();
        assert_eq!(cli.connection.product, Product::Rs);
        match cli.command {
            Command::List { kind, filter } => {
                assert_eq!(kind, Kind::ShellJump);
                assert_eq!(filter, [("name".to_string(), "web".to_string())]);
            }
            _ => panic!("expected list"),
        }
    }
}
