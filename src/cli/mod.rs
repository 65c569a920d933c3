pub mod config;
pub mod convert;
pub mod enhance;
pub mod rules;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::importer::SignConvention;

#[derive(Parser)]
#[command(
    name = "ledgerconv",
    version,
    about = "Convert bank CSV statements into one ledger and annotate it with budget categories."
)]
pub struct Cli {
    /// Log progress to stderr (same as LEDGERCONV_LOG=debug).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert every account directory under INPUT_DIR into one statement.
    Convert {
        /// Directory holding one subdirectory of CSV exports per account
        input_dir: PathBuf,
        /// Output file (default: converted_file from settings)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Add categories, labels and a summary to converted transactions.
    Enhance {
        /// Converted statement file
        input_file: PathBuf,
        /// Enhanced statement file (default: enhanced_file from settings)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Auto-enhance spec file; it must exist when given
        #[arg(long = "auto-enhance-spec")]
        auto_enhance_spec: Option<PathBuf>,
        /// Only apply rules; leave unmatched transactions for a later run
        #[arg(long = "only-auto")]
        only_auto: bool,
    },
    /// Validate an auto-enhance spec file and list its rules.
    Rules {
        /// Auto-enhance spec file
        spec_file: PathBuf,
    },
    /// Show or change settings.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the settings file location and current values.
    Show,
    /// Set how the ICICI credit card Cr/Dr column maps to amount signs.
    SetSign {
        #[arg(value_enum)]
        sign: SignConvention,
    },
}
