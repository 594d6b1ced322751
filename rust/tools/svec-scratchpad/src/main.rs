use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod run_commands;
pub mod scenarios;
pub mod utils;

#[derive(Parser)]
#[command(name = "svec-scratchpad")]
#[command(about = "Scenario runner and quick experiments for SimpleVector.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario
    Run {
        /// Scenario name
        name: String,

        /// Args
        args: Vec<String>,
    },

    /// List the scenarios
    List {},
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { name, args } => {
            log::info!("running {name} with {args:?}");
            let arg_refs: Vec<Option<&str>> = args.iter().map(|s| Some(s.as_str())).collect();
            match run_commands::get(&name) {
                Some(cmd) => (cmd.run)(&arg_refs)?,
                None => anyhow::bail!("unknown run command: {name} (use `list` to see them)"),
            }
        }
        Commands::List {} => {
            println!("Available run commands:");
            for c in run_commands::all() {
                println!("- {}: {}", c.name, c.about);
            }
        }
    }
    Ok(())
}
