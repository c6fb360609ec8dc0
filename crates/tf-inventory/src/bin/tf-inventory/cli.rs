//! tf-inventory cli interface
//!
//! Follows the ansible inventory script protocol (`--list`, `--host <name>`).

use clap::{Args, Parser, ValueEnum};
use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[clap(flatten)]
    pub mode: ModeArgs,

    #[clap(flatten)]
    pub input: InputArgs,

    #[clap(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
#[group(multiple = false)]
pub struct ModeArgs {
    /// Print the whole inventory (default)
    #[clap(long)]
    pub list: bool,

    /// Print the variables of a single host
    #[clap(long, value_name = "NAME")]
    pub host: Option<String>,
}

#[derive(Args, Debug)]
pub struct InputArgs {
    /// Terraform binary used to pull the state
    #[clap(long = "terraform-bin", env = "ANSIBLE_TF_BIN", default_value = "terraform")]
    pub terraform_bin: String,

    /// Directory to run terraform in
    ///
    /// Defaults to the work directory
    #[clap(short = 'C', long = "directory", env = "ANSIBLE_TF_DIR")]
    pub directory: Option<PathBuf>,

    /// Read the state from a file instead of running terraform
    ///
    /// Use `-` to read from stdin. Takes precedence over --terraform-bin and --directory.
    #[clap(short = 's', long = "state")]
    pub state: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    #[arg(short = 'F', long = "output-format", default_value_t)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}
