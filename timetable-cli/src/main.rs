use anyhow::Result;
use clap::Parser;
use timetable_cli::{
    Cli, Commands,
    commands::{self, ExpandParams},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 设置日志级别
    let log_level = if cli.verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("timetable_cli={log_level},timetable_core={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Expand {
            file,
            limit,
            settings,
            json,
            output,
        } => commands::expand_command(ExpandParams {
            file,
            limit,
            settings,
            json,
            output,
        }),

        Commands::Validate { file } => commands::validate_command(file),
    }
}
