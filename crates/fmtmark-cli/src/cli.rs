use clap::{Parser, Subcommand, ValueEnum};
use fmtmark_config::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fmtmark")]
#[command(author, version)]
#[command(about = "Inspect format templates with inline markdown and %@ placeholders")]
#[command(after_help = "\
EXAMPLES:

    # Show the node tree of a template
    fmtmark parse 'Hello **%@**, you have %2$@ messages'

    # Read the template from a file, print JSON
    fmtmark parse --file greeting.txt --format json

    # Fail on unmatched delimiters or unused arguments
    echo 'oops **%@' | fmtmark parse --strict

    # How many arguments does a template take?
    fmtmark args '%2$@ and %1$@'

    # Write a config file that makes strict JSON output the default
    fmtmark init --format json --strict

CONFIGURATION:

Settings are read from ~/.config/fmtmark/config.toml, or the file given with
--config. Command-line flags win over the config file.

    format = \"json\"
    strict = true")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log parser decisions to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a template and print its tree
    #[command(
        long_about = "Parse a template and print the resulting node tree. Prints `raw` when \
        the template is plain text that can be used as it is."
    )]
    Parse {
        #[command(flatten)]
        input: TemplateInput,

        /// Output format (defaults to the config file, then `tree`)
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Exit with an error on degraded spans or unreferenced arguments
        #[arg(long)]
        strict: bool,
    },
    /// Print how many arguments a template takes and in which order it uses them
    Args {
        #[command(flatten)]
        input: TemplateInput,
    },
    /// Write a config file (the --config path, or the default location)
    Init {
        /// Default output format to store
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Make strict checking the default
        #[arg(long)]
        strict: bool,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(clap::Args)]
pub struct TemplateInput {
    /// Template text (stdin if neither this nor --file is given)
    pub template: Option<String>,

    /// Read the template from a file
    #[arg(short, long, conflicts_with = "template")]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Tree,
    Json,
    Syntax,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Tree => OutputFormat::Tree,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Syntax => OutputFormat::Syntax,
        }
    }
}
