// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Field references and write payloads.
//!
//! - [`Fqid`]: `collection/id`, one object in the data graph
//! - [`Fqfield`]: `collection/id/field`, one value of one object
//! - [`FqfieldData`]: the proposed write for a single target object, keyed by
//!   field name

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ProviderError;

/// Fully-qualified object id (`collection/id`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fqid {
	pub collection: String,
	pub id: u64,
}

impl Fqid {
	pub fn new(collection: impl Into<String>, id: u64) -> Self {
		Self {
			collection: collection.into(),
			id,
		}
	}

	/// Reference to one field of this object.
	pub fn field(&self, field: impl Into<String>) -> Fqfield {
		Fqfield {
			collection: self.collection.clone(),
			id: self.id,
			field: field.into(),
		}
	}
}

impl fmt::Display for Fqid {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.collection, self.id)
	}
}

/// Fully-qualified field reference (`collection/id/field`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fqfield {
	pub collection: String,
	pub id: u64,
	pub field: String,
}

impl Fqfield {
	pub fn new(collection: impl Into<String>, id: u64, field: impl Into<String>) -> Self {
		Self {
			collection: collection.into(),
			id,
			field: field.into(),
		}
	}

	/// The object this field belongs to.
	pub fn fqid(&self) -> Fqid {
		Fqid::new(self.collection.clone(), self.id)
	}
}

impl fmt::Display for Fqfield {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}/{}", self.collection, self.id, self.field)
	}
}

impl FromStr for Fqfield {
	type Err = ProviderError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let invalid = || ProviderError::InvalidFqfield(s.to_string());

		let mut parts = s.splitn(3, '/');
		let collection = parts.next().filter(|c| !c.is_empty()).ok_or_else(invalid)?;
		// Canonical decimal only: `01` and `+1` are rejected.
		let id = parts
			.next()
			.and_then(|raw| raw.parse::<u64>().ok().filter(|id| id.to_string() == raw))
			.filter(|id| *id > 0)
			.ok_or_else(invalid)?;
		let field = parts
			.next()
			.filter(|f| !f.is_empty() && !f.contains('/'))
			.ok_or_else(invalid)?;

		Ok(Fqfield::new(collection, id, field))
	}
}

/// The caller's proposed write for one target object.
///
/// Keys are the only source of "which fields does this write touch". Values
/// keep their wire form as strings; when deserializing, non-string JSON values
/// are stored as their JSON text so `{"id": 1}` and `{"id": "1"}` agree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FqfieldData(BTreeMap<String, String>);

impl FqfieldData {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) -> Option<String> {
		self.0.insert(field.into(), value.into())
	}

	/// Builder form of [`FqfieldData::insert`].
	pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
		self.insert(field, value);
		self
	}

	pub fn get(&self, field: &str) -> Option<&str> {
		self.0.get(field).map(String::as_str)
	}

	pub fn contains_field(&self, field: &str) -> bool {
		self.0.contains_key(field)
	}

	/// Field names in sorted order.
	pub fn fields(&self) -> impl Iterator<Item = &str> {
		self.0.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FqfieldData {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self(
			iter
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		)
	}
}

impl<'de> Deserialize<'de> for FqfieldData {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
		Ok(raw
			.into_iter()
			.map(|(field, value)| match value {
				serde_json::Value::String(s) => (field, s),
				other => (field, other.to_string()),
			})
			.collect())
	}
}
