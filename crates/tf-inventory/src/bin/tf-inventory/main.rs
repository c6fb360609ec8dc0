mod cli;

use anyhow::Context;
use tf_inventory::inventory::Inventory;
use tf_inventory::state::State;
use tf_inventory::value::Value;

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("TF_INVENTORY_LOG"))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

fn run(cli: cli::Cli) -> anyhow::Result<()> {
    tracing::debug!(list = cli.mode.list, host = ?cli.mode.host, "mode");

    let state = load(&cli.input)?;
    let inventory = Inventory::from_state(&state).context("Unable to build inventory")?;

    let value = match &cli.mode.host {
        Some(host) => match inventory.hostvars(host) {
            Some(vars) => Value::Mapping(vars.clone()),
            None => {
                tracing::warn!(host = %host, "unknown host");
                Value::Mapping(Default::default())
            }
        },
        None => inventory.render(),
    };

    output(&cli.output, &value)
}

fn load(input: &cli::InputArgs) -> anyhow::Result<State> {
    if let Some(path) = &input.state {
        if path.as_os_str() == "-" {
            return State::from_reader(std::io::stdin()).context("Unable to read state from stdin");
        }

        return State::load_file(path)
            .with_context(|| format!("Unable to load state file {}", path.display()));
    }

    let directory = match &input.directory {
        Some(directory) => directory.clone(),
        None => std::env::current_dir()?,
    };

    Ok(State::pull(&input.terraform_bin, &directory)?)
}

fn output(output: &cli::OutputArgs, value: &Value) -> anyhow::Result<()> {
    match output.format {
        cli::OutputFormat::Yaml => serde_yaml::to_writer(std::io::stdout(), value)?,
        cli::OutputFormat::Json => {
            serde_json::to_writer_pretty(std::io::stdout(), value)?;
            println!();
        }
    };

    Ok(())
}
