// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for permission decisions.
//!
//! A [`PermissionError`] is a hard error: the request is structurally invalid
//! or cannot be resolved. A well-formed request that the policy rejects is a
//! [`crate::Verdict::Denied`], never an error.

use thiserror::Error;

use crate::fqfield::{Fqfield, Fqid};
use crate::types::UserId;

/// Errors raised by a [`crate::DataProvider`] implementation.
#[derive(Debug, Error)]
pub enum ProviderError {
	/// The underlying data source failed.
	#[error("data provider backend error: {0}")]
	Backend(String),

	/// A present value has the wrong shape.
	#[error("cannot decode {fqfield}: {message}")]
	Decode { fqfield: Fqfield, message: String },

	/// A field reference is not of the form `collection/id/field`.
	#[error("invalid field reference '{0}'")]
	InvalidFqfield(String),

	/// A snapshot document could not be parsed.
	#[error("invalid snapshot: {0}")]
	Snapshot(#[from] serde_json::Error),
}

/// Hard errors of a permission decision.
#[derive(Debug, Error)]
pub enum PermissionError {
	/// The payload touches fields the action does not declare as writable.
	#[error("action {action} does not accept fields: {}", .fields.join(", "))]
	InvalidFields { action: String, fields: Vec<String> },

	/// A field needed to identify the target is absent.
	#[error("action {action} requires field '{field}'")]
	MissingField { action: String, field: String },

	/// A field that must hold an object id holds something else.
	#[error("field '{field}' must be a positive id, got '{value}'")]
	InvalidFieldValue { field: String, value: String },

	/// The caller-supplied user id does not exist.
	#[error("user {0} does not exist")]
	UnknownUser(UserId),

	/// The object the action targets does not exist.
	#[error("{0} does not exist")]
	UnknownTarget(Fqid),

	/// No handler is registered under this action name.
	#[error("unknown action: {0}")]
	UnknownAction(String),

	#[error(transparent)]
	Provider(#[from] ProviderError),
}

/// Coarse classification of a [`PermissionError`] for transport mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// The caller sent something the action cannot accept.
	InvalidInput,
	/// A referenced user or object does not exist.
	UnresolvableIdentity,
	/// The data provider failed.
	Internal,
}

impl ErrorKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			ErrorKind::InvalidInput => "invalid_input",
			ErrorKind::UnresolvableIdentity => "unresolvable_identity",
			ErrorKind::Internal => "internal",
		}
	}
}

impl PermissionError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			PermissionError::InvalidFields { .. }
			| PermissionError::MissingField { .. }
			| PermissionError::InvalidFieldValue { .. }
			| PermissionError::UnknownAction(_) => ErrorKind::InvalidInput,
			PermissionError::UnknownUser(_) | PermissionError::UnknownTarget(_) => {
				ErrorKind::UnresolvableIdentity
			}
			PermissionError::Provider(_) => ErrorKind::Internal,
		}
	}
}

pub type Result<T> = std::result::Result<T, PermissionError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn invalid_fields_message_lists_fields() {
		let err = PermissionError::InvalidFields {
			action: "topic.update".to_string(),
			fields: vec!["color".to_string(), "owner".to_string()],
		};
		assert_eq!(
			err.to_string(),
			"action topic.update does not accept fields: color, owner"
		);
		assert_eq!(err.kind(), ErrorKind::InvalidInput);
	}

	#[test]
	fn unknown_identities_are_classified() {
		assert_eq!(
			PermissionError::UnknownUser(UserId::new(4)).kind(),
			ErrorKind::UnresolvableIdentity
		);
		let err = PermissionError::UnknownTarget(Fqid::new("topic", 9));
		assert_eq!(err.to_string(), "topic/9 does not exist");
		assert_eq!(err.kind(), ErrorKind::UnresolvableIdentity);
	}

	#[test]
	fn provider_errors_convert() {
		let err: PermissionError = ProviderError::Backend("connection reset".to_string()).into();
		assert_eq!(err.kind(), ErrorKind::Internal);
		assert!(err.to_string().contains("connection reset"));
	}
}
