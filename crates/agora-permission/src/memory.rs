// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory snapshot provider.
//!
//! Holds a fixed map of field values. While a decision borrows the provider
//! nothing can change it, so every lookup sees the same snapshot.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tracing::trace;

use crate::error::ProviderError;
use crate::fqfield::Fqfield;
use crate::provider::DataProvider;

/// [`DataProvider`] over an in-memory map of field values.
#[derive(Debug, Clone, Default)]
pub struct MemoryDataProvider {
	values: HashMap<Fqfield, Value>,
}

impl MemoryDataProvider {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_entries(entries: impl IntoIterator<Item = (Fqfield, Value)>) -> Self {
		Self {
			values: entries.into_iter().collect(),
		}
	}

	/// Parses a snapshot document: a JSON object keyed by `collection/id/field`.
	///
	/// `null` values are treated as absent fields.
	pub fn from_json(document: &str) -> Result<Self, ProviderError> {
		let raw: HashMap<String, Value> = serde_json::from_str(document)?;
		let mut values = HashMap::with_capacity(raw.len());
		for (key, value) in raw {
			if value.is_null() {
				continue;
			}
			values.insert(key.parse::<Fqfield>()?, value);
		}
		Ok(Self { values })
	}

	pub fn insert(&mut self, fqfield: Fqfield, value: Value) -> Option<Value> {
		self.values.insert(fqfield, value)
	}

	pub fn remove(&mut self, fqfield: &Fqfield) -> Option<Value> {
		self.values.remove(fqfield)
	}

	pub fn get_value(&self, fqfield: &Fqfield) -> Option<&Value> {
		self.values.get(fqfield)
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

#[async_trait]
impl DataProvider for MemoryDataProvider {
	async fn get(&self, fqfields: &[Fqfield]) -> Result<HashMap<Fqfield, Value>, ProviderError> {
		trace!(count = fqfields.len(), "memory provider lookup");
		Ok(fqfields
			.iter()
			.filter_map(|fqfield| {
				self
					.values
					.get(fqfield)
					.map(|value| (fqfield.clone(), value.clone()))
			})
			.collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[tokio::test]
	async fn returns_only_existing_fields() {
		let mut dp = MemoryDataProvider::new();
		dp.insert(Fqfield::new("topic", 1, "meeting_id"), json!(1));

		let present = Fqfield::new("topic", 1, "meeting_id");
		let absent = Fqfield::new("topic", 2, "meeting_id");
		let values = dp.get(&[present.clone(), absent.clone()]).await.unwrap();

		assert_eq!(values.get(&present), Some(&json!(1)));
		assert!(!values.contains_key(&absent));
	}

	#[test]
	fn parses_snapshot_documents() {
		let dp = MemoryDataProvider::from_json(
			r#"{"user/1/id": 1, "meeting/1/enable_anonymous": true, "user/1/role_id": null}"#,
		)
		.unwrap();
		assert_eq!(dp.len(), 2);
		assert_eq!(
			dp.get_value(&Fqfield::new("meeting", 1, "enable_anonymous")),
			Some(&json!(true))
		);
	}

	#[test]
	fn rejects_bad_snapshot_keys() {
		let err = MemoryDataProvider::from_json(r#"{"user/one/id": 1}"#).unwrap_err();
		assert!(matches!(err, ProviderError::InvalidFqfield(_)));

		let err = MemoryDataProvider::from_json("[1, 2]").unwrap_err();
		assert!(matches!(err, ProviderError::Snapshot(_)));
	}

	#[test]
	fn non_canonical_ids_cannot_alias_a_key() {
		let err = MemoryDataProvider::from_json(
			r#"{"topic/1/meeting_id": 1, "topic/01/meeting_id": 2}"#,
		)
		.unwrap_err();
		assert!(matches!(err, ProviderError::InvalidFqfield(ref key) if key == "topic/01/meeting_id"));

		let err = MemoryDataProvider::from_json(r#"{"topic/+1/meeting_id": 1}"#).unwrap_err();
		assert!(matches!(err, ProviderError::InvalidFqfield(_)));
	}
}
