//! Roster CLI.

use clap::{ColorChoice, Parser};
use roster_cli::logging::{LogConfig, LogFormat, init_logging};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{
    AuditCommand, Cli, Command, ComplianceCommand, EmployeesCommand, LogFormatArg, LogLevelArg,
};
use crate::commands::Context;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let ctx = Context::from_cli(cli)?;
    runtime.block_on(async {
        match &cli.command {
            Command::Employees(command) => match command {
                EmployeesCommand::List(args) => commands::list_employees(&ctx, args).await,
                EmployeesCommand::Show { id } => commands::show_employee(&ctx, id).await,
                EmployeesCommand::Delete { id, yes } => {
                    commands::delete_employee(&ctx, id, *yes).await
                }
                EmployeesCommand::Export { filters, output } => {
                    commands::export_employees(&ctx, filters, output).await
                }
            },
            Command::Audit(command) => match command {
                AuditCommand::List(args) => commands::list_audit(&ctx, args).await,
                AuditCommand::Stats(args) => commands::audit_stats(&ctx, args).await,
            },
            Command::Compliance(command) => match command {
                ComplianceCommand::List { filters, today } => {
                    commands::list_compliance(&ctx, filters, *today).await
                }
                ComplianceCommand::Remind { today } => {
                    commands::remind_overdue(&ctx, *today).await
                }
            },
            Command::Upload(args) => commands::upload(&ctx, args).await,
            Command::Seed(args) => commands::seed(&ctx, args).await,
        }
    })
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
