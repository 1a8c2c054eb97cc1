// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Local permission evaluation for Agora meeting actions.

use std::path::PathBuf;
use std::process::ExitCode;

use agora_permission::ActionRegistry;
use agora_permission_config::{LogFormat, LoggingConfig, PermissionConfig};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod version;

use commands::{handle_actions, handle_check, CheckArgs, CheckOutcome};

/// agora-permission - evaluate permission decisions against a data snapshot.
#[derive(Parser, Debug)]
#[command(
	name = "agora-permission",
	about = "Evaluate Agora permission decisions against a JSON snapshot",
	version
)]
struct Args {
	/// Config file (defaults to /etc/agora/permission.toml)
	#[arg(long, global = true, env = "AGORA_PERMISSION_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Decide whether a user may perform an action
	Check(CheckArgs),
	/// List actions and the permission each requires
	Actions,
	/// Show version and build information
	Version,
}

#[tokio::main]
async fn main() -> ExitCode {
	let args = Args::parse();

	match run(args).await {
		Ok(outcome) => ExitCode::from(outcome.exit_code()),
		Err(e) => {
			eprintln!("error: {e:#}");
			ExitCode::from(CheckOutcome::Error.exit_code())
		}
	}
}

async fn run(args: Args) -> anyhow::Result<CheckOutcome> {
	match args.command {
		Command::Version => {
			println!("{}", version::format_version_info());
			Ok(CheckOutcome::Allowed)
		}
		Command::Check(check) => {
			let registry = build_registry(args.config)?;
			handle_check(check, &registry).await
		}
		Command::Actions => {
			let registry = build_registry(args.config)?;
			handle_actions(&registry);
			Ok(CheckOutcome::Allowed)
		}
	}
}

/// Loads configuration, installs tracing, and registers every action.
fn build_registry(config_path: Option<PathBuf>) -> anyhow::Result<ActionRegistry> {
	let config = load_config(config_path)?;
	init_tracing(&config.logging);

	let rules = config.rules.permission_rules()?;
	let registry = ActionRegistry::with_rules(&rules)?;
	tracing::debug!(actions = registry.len(), "registry ready");
	Ok(registry)
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<PermissionConfig> {
	let config = match path {
		Some(path) => agora_permission_config::load_config_with_file(path)?,
		None => agora_permission_config::load_config()?,
	};
	Ok(config)
}

/// Logs go to stderr so stdout carries only the decision.
fn init_tracing(logging: &LoggingConfig) {
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| logging.level.clone().into());
	let registry = tracing_subscriber::registry().with(filter);

	match logging.format {
		LogFormat::Json => registry
			.with(
				tracing_subscriber::fmt::layer()
					.json()
					.with_writer(std::io::stderr),
			)
			.init(),
		LogFormat::Text => registry
			.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
			.init(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn broken_config() -> tempfile::NamedTempFile {
		let file = tempfile::NamedTempFile::new().unwrap();
		std::fs::write(file.path(), "[logging\nlevel = ").unwrap();
		file
	}

	#[tokio::test]
	async fn test_version_does_not_load_config() {
		let file = broken_config();
		let args = Args {
			config: Some(file.path().to_path_buf()),
			command: Command::Version,
		};
		assert_eq!(run(args).await.unwrap(), CheckOutcome::Allowed);
	}

	#[tokio::test]
	async fn test_actions_fails_on_broken_config() {
		let file = broken_config();
		let args = Args {
			config: Some(file.path().to_path_buf()),
			command: Command::Actions,
		};
		let err = run(args).await.unwrap_err();
		assert!(format!("{err:#}").contains("failed to parse config file"));
	}

	#[test]
	fn test_parses_check_arguments() {
		let args = Args::try_parse_from([
			"agora-permission",
			"check",
			"--snapshot",
			"snapshot.json",
			"--action",
			"topic.update",
			"--user",
			"3",
			"--data",
			r#"{"id": 1}"#,
			"--data",
			r#"{"id": 2}"#,
		])
		.unwrap();
		let Command::Check(check) = args.command else {
			panic!("expected check command");
		};
		assert_eq!(check.user, 3);
		assert_eq!(check.data.len(), 2);
	}
}
