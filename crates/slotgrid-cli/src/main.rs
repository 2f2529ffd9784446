use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "slotgrid",
    about = "SlotGrid — time-windowed resource occupancy simulator",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every node's free capacity across its horizon
    Inspect {
        /// Environment config (.json or .toml)
        #[arg(short, long, default_value = "conf/env.conf.json")]
        config: String,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Replay a task file against the environment.
    ///
    /// The task file is a JSON array of
    /// `{"requirements": [..], "duration": n, "arrival": t}` objects.
    /// At each step the tasks that have arrived are placed on the node
    /// with the earliest feasible start; tasks that do not fit are
    /// retried on the next step. Every node then advances one slot.
    Simulate {
        /// Environment config (.json or .toml)
        #[arg(short, long, default_value = "conf/env.conf.json")]
        config: String,
        /// Task file (JSON)
        #[arg(short, long)]
        tasks: String,
        /// Number of slots to simulate
        #[arg(short, long, default_value = "10")]
        steps: u64,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,slotgrid=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { config, format } => commands::inspect::inspect(&config, &format),
        Commands::Simulate {
            config,
            tasks,
            steps,
            format,
        } => commands::simulate::simulate(&config, &tasks, steps, &format),
    }
}
