// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Field validation for write payloads.
//!
//! Every action declares which fields it may write. A payload touching any
//! other field is a schema mismatch between caller and action, reported as a
//! hard error before any permission logic runs.

use crate::error::{PermissionError, Result};
use crate::fqfield::FqfieldData;

/// Writable and required fields of one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
	writable: &'static [&'static str],
	required: &'static [&'static str],
}

impl FieldSpec {
	/// `required` fields must also be listed in `writable`.
	pub const fn new(writable: &'static [&'static str], required: &'static [&'static str]) -> Self {
		Self { writable, required }
	}

	pub fn writable(&self) -> &'static [&'static str] {
		self.writable
	}

	pub fn required(&self) -> &'static [&'static str] {
		self.required
	}

	pub fn is_writable(&self, field: &str) -> bool {
		self.writable.contains(&field)
	}

	/// Rejects every field outside the allow-list.
	pub fn validate(&self, action: &str, data: &FqfieldData) -> Result<()> {
		let invalid: Vec<String> = data
			.fields()
			.filter(|field| !self.is_writable(field))
			.map(str::to_string)
			.collect();

		if invalid.is_empty() {
			Ok(())
		} else {
			Err(PermissionError::InvalidFields {
				action: action.to_string(),
				fields: invalid,
			})
		}
	}

	/// Fails on the first missing required field.
	pub fn check_required(&self, action: &str, data: &FqfieldData) -> Result<()> {
		match self.required.iter().find(|field| !data.contains_field(field)) {
			Some(field) => Err(PermissionError::MissingField {
				action: action.to_string(),
				field: field.to_string(),
			}),
			None => Ok(()),
		}
	}
}

/// Reads `field` as an object id.
///
/// Missing fields and values that are not positive integers are hard errors.
pub fn require_id(action: &str, data: &FqfieldData, field: &str) -> Result<u64> {
	let raw = data.get(field).ok_or_else(|| PermissionError::MissingField {
		action: action.to_string(),
		field: field.to_string(),
	})?;

	raw
		.trim()
		.parse::<u64>()
		.ok()
		.filter(|id| *id > 0)
		.ok_or_else(|| PermissionError::InvalidFieldValue {
			field: field.to_string(),
			value: raw.to_string(),
		})
}
