// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use agora_permission::{
	ActionRegistry, Addition, BatchVerdict, FqfieldData, MemoryDataProvider, PermissionError,
	UserId,
};
use anyhow::Context;
use clap::Args;
use serde::Serialize;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
	/// JSON snapshot keyed by `collection/id/field`
	#[arg(long)]
	pub snapshot: PathBuf,

	/// Action to evaluate, e.g. `topic.update`
	#[arg(long)]
	pub action: String,

	/// Requesting user id (0 is anonymous)
	#[arg(long, default_value = "0")]
	pub user: u64,

	/// Write payload as a JSON object; repeat for a batch
	#[arg(long = "data", value_name = "JSON")]
	pub data: Vec<String>,
}

/// How a check ended, mapped onto the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
	Allowed,
	Denied,
	Error,
}

impl CheckOutcome {
	pub fn exit_code(self) -> u8 {
		match self {
			CheckOutcome::Allowed => 0,
			CheckOutcome::Denied => 1,
			CheckOutcome::Error => 2,
		}
	}
}

#[derive(Debug, Serialize, PartialEq)]
struct ReportedError {
	kind: &'static str,
	message: String,
}

/// The `(allowed, addition, error)` triple for a batch.
#[derive(Debug, Serialize, PartialEq)]
struct CheckReport {
	allowed: bool,
	additions: Option<Vec<Option<Addition>>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	denied_index: Option<usize>,
	error: Option<ReportedError>,
}

impl CheckReport {
	fn from_result(result: Result<BatchVerdict, PermissionError>) -> (Self, CheckOutcome) {
		match result {
			Ok(BatchVerdict::Allowed(additions)) => (
				Self {
					allowed: true,
					additions: Some(additions),
					denied_index: None,
					error: None,
				},
				CheckOutcome::Allowed,
			),
			Ok(BatchVerdict::Denied { index }) => (
				Self {
					allowed: false,
					additions: None,
					denied_index: Some(index),
					error: None,
				},
				CheckOutcome::Denied,
			),
			Err(err) => (
				Self {
					allowed: false,
					additions: None,
					denied_index: None,
					error: Some(ReportedError {
						kind: err.kind().as_str(),
						message: err.to_string(),
					}),
				},
				CheckOutcome::Error,
			),
		}
	}
}

fn parse_payloads(raw: &[String]) -> anyhow::Result<Vec<FqfieldData>> {
	raw.iter()
		.map(|data| {
			serde_json::from_str::<FqfieldData>(data)
				.with_context(|| format!("invalid --data payload '{data}'"))
		})
		.collect()
}

async fn evaluate(args: &CheckArgs, registry: &ActionRegistry) -> anyhow::Result<(CheckReport, CheckOutcome)> {
	let document = std::fs::read_to_string(&args.snapshot)
		.with_context(|| format!("failed to read snapshot {}", args.snapshot.display()))?;
	let provider = MemoryDataProvider::from_json(&document)
		.with_context(|| format!("failed to load snapshot {}", args.snapshot.display()))?;
	let payloads = parse_payloads(&args.data)?;
	debug!(fields = provider.len(), payloads = payloads.len(), "snapshot loaded");

	let result = registry
		.is_allowed(&args.action, UserId::new(args.user), &payloads, &provider)
		.await;
	Ok(CheckReport::from_result(result))
}

#[instrument(skip(args, registry), fields(action = %args.action, user_id = args.user))]
pub async fn handle_check(args: CheckArgs, registry: &ActionRegistry) -> anyhow::Result<CheckOutcome> {
	let (report, outcome) = evaluate(&args, registry).await?;
	println!("{}", serde_json::to_string_pretty(&report)?);
	Ok(outcome)
}
