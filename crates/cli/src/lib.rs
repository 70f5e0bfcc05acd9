use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pulse")]
#[command(about = "MarketPulse - liquidity health and volatility for prediction markets")]
#[command(version)]
pub struct Cli {
    /// Override the log format from the configuration file
    #[arg(long, value_enum, global = true, env = "PULSE_LOG_FORMAT")]
    pub log_format: Option<LogFormatArg>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that evaluates markets
#[derive(Args, Debug, Clone)]
pub struct EvalOptions {
    /// Path to the configuration file (defaults apply when omitted)
    #[arg(short, long, env = "PULSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Re-sort order books best-first instead of rejecting unsorted input
    #[arg(long)]
    pub sort_book: bool,

    /// JSON output style
    #[arg(long, value_enum, default_value = "pretty")]
    pub output: OutputStyle,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score the liquidity health of one market
    Health {
        /// Market input file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        opts: EvalOptions,
    },

    /// Realised volatility over a trailing window
    Volatility {
        /// Market input file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Window such as 1h, 4h, 12h or 24h (configured default when omitted)
        #[arg(short, long)]
        window: Option<String>,

        #[command(flatten)]
        opts: EvalOptions,
    },

    /// Health, 1h and 24h volatility, book overview and upstream stats
    Summary {
        /// Market input file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        opts: EvalOptions,
    },

    /// Rank 2 to 5 markets by health
    Compare {
        /// Market input files (JSON), one per market
        #[arg(short, long = "input", required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        opts: EvalOptions,
    },

    /// Re-evaluate a market input file on an interval until interrupted
    Watch {
        /// Market input file (JSON), re-read on every tick
        #[arg(short, long)]
        input: PathBuf,

        /// Seconds between evaluations (overrides the configuration file)
        #[arg(long)]
        interval: Option<u64>,

        #[command(flatten)]
        opts: EvalOptions,
    },

    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        #[arg(short, long, default_value = "pulse.yaml")]
        config: PathBuf,
    },

    /// Write a configuration file with all defaults
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = "pulse.yaml")]
        output: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormatArg {
    Pretty,
    Json,
    Compact,
}

impl LogFormatArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormatArg::Pretty => "pretty",
            LogFormatArg::Json => "json",
            LogFormatArg::Compact => "compact",
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputStyle {
    /// Indented JSON
    #[default]
    Pretty,
    /// One line of JSON
    Compact,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
