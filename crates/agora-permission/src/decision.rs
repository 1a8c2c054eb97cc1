// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Decision types.
//!
//! A decision is `Result<Verdict, PermissionError>`. An error never carries
//! an addition and is never "allowed"; a denial is a verdict, not an error.
//! [`into_parts`] flattens a decision into the `(allowed, addition, error)`
//! triple used at the transport boundary.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PermissionError;

/// Supplementary data returned with an allowed verdict.
pub type Addition = Map<String, Value>;

/// Outcome of a well-formed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "addition", rename_all = "snake_case")]
pub enum Verdict {
	Allowed(Option<Addition>),
	Denied,
}

impl Verdict {
	pub fn allowed() -> Self {
		Verdict::Allowed(None)
	}

	pub fn is_allowed(&self) -> bool {
		matches!(self, Verdict::Allowed(_))
	}

	pub fn addition(&self) -> Option<&Addition> {
		match self {
			Verdict::Allowed(addition) => addition.as_ref(),
			Verdict::Denied => None,
		}
	}
}

impl From<bool> for Verdict {
	fn from(allowed: bool) -> Self {
		if allowed {
			Verdict::allowed()
		} else {
			Verdict::Denied
		}
	}
}

/// Result of evaluating one request.
pub type Decision = Result<Verdict, PermissionError>;

/// Splits a decision into `(allowed, addition, error)`.
pub fn into_parts(decision: Decision) -> (bool, Option<Addition>, Option<PermissionError>) {
	match decision {
		Ok(Verdict::Allowed(addition)) => (true, addition, None),
		Ok(Verdict::Denied) => (false, None, None),
		Err(err) => (false, None, Some(err)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::UserId;

	#[test]
	fn errors_are_never_allowed() {
		let (allowed, addition, error) =
			into_parts(Err(PermissionError::UnknownUser(UserId::new(1))));
		assert!(!allowed);
		assert!(addition.is_none());
		assert!(error.is_some());
	}

	#[test]
	fn denial_has_no_error() {
		let (allowed, addition, error) = into_parts(Ok(Verdict::Denied));
		assert!(!allowed);
		assert!(addition.is_none());
		assert!(error.is_none());
	}

	#[test]
	fn allowed_keeps_addition() {
		let mut addition = Addition::new();
		addition.insert("meeting_id".to_string(), Value::from(1));
		let (allowed, returned, error) = into_parts(Ok(Verdict::Allowed(Some(addition.clone()))));
		assert!(allowed);
		assert_eq!(returned, Some(addition));
		assert!(error.is_none());
	}

	#[test]
	fn verdict_from_bool() {
		assert_eq!(Verdict::from(true), Verdict::Allowed(None));
		assert_eq!(Verdict::from(false), Verdict::Denied);
		assert!(Verdict::Denied.addition().is_none());
	}
}
