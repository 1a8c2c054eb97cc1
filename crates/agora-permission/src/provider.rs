// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Data provider contract.
//!
//! A [`DataProvider`] is a read-only view of the data graph. Handlers issue
//! several sequential lookups per decision (target meeting, then the user's
//! groups, then group permissions), so an implementation must answer every
//! lookup made through one provider handle from the same consistent snapshot.
//! The engine never caches or locks on its own.
//!
//! [`DataAccess`] layers typed accessors on top of the raw fetch. Identity
//! lookups (users, target objects) fail with a hard error when absent;
//! optional attributes (anonymous flag, group lists) fall back to safe
//! defaults so ordinary denials stay error-free.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{PermissionError, ProviderError, Result};
use crate::fqfield::{Fqfield, Fqid};
use crate::permission::{Permission, PermissionSet};
use crate::types::{GlobalRole, GroupId, MeetingId, RoleId, UserId};

/// Read-only access to the platform's data graph.
#[async_trait]
pub trait DataProvider: Send + Sync {
	/// Fetches the requested fields.
	///
	/// Fields that do not exist are omitted from the result; that is not an
	/// error. Errors are reserved for backend failures.
	async fn get(&self, fqfields: &[Fqfield]) -> std::result::Result<HashMap<Fqfield, Value>, ProviderError>;
}

/// Typed accessors over a [`DataProvider`].
#[derive(Clone, Copy)]
pub struct DataAccess<'a> {
	provider: &'a dyn DataProvider,
}

impl<'a> DataAccess<'a> {
	pub fn new(provider: &'a dyn DataProvider) -> Self {
		Self { provider }
	}

	/// Fetches a single field.
	pub async fn value(&self, fqfield: &Fqfield) -> Result<Option<Value>> {
		let mut values = self.provider.get(std::slice::from_ref(fqfield)).await?;
		Ok(values.remove(fqfield))
	}

	/// Returns true if `collection/id` exists.
	pub async fn exists(&self, fqid: &Fqid) -> Result<bool> {
		Ok(self.value(&fqid.field("id")).await?.is_some())
	}

	/// Resolves the global role of a registered user.
	///
	/// Fails with [`PermissionError::UnknownUser`] if the user does not exist.
	/// The anonymous caller has no global role and is reported as ordinary.
	pub async fn global_role(&self, user_id: UserId) -> Result<GlobalRole> {
		if user_id.is_anonymous() {
			return Ok(GlobalRole::Ordinary);
		}

		let user = Fqid::new("user", user_id.get());
		let id_field = user.field("id");
		let role_field = user.field("role_id");
		let values = self
			.provider
			.get(&[id_field.clone(), role_field.clone()])
			.await?;

		if !values.contains_key(&id_field) {
			return Err(PermissionError::UnknownUser(user_id));
		}

		let Some(role_id) = values.get(&role_field) else {
			return Ok(GlobalRole::Ordinary);
		};
		let role_id = RoleId::new(decode_id(&role_field, role_id)?);

		let superadmin_field = Fqfield::new("role", role_id.get(), "is_superadmin_role");
		let is_superadmin = match self.value(&superadmin_field).await? {
			Some(value) => decode_bool(&superadmin_field, &value)?,
			None => false,
		};

		Ok(if is_superadmin {
			GlobalRole::Superadmin
		} else {
			GlobalRole::Ordinary
		})
	}

	/// Resolves the meeting an object belongs to.
	///
	/// Fails with [`PermissionError::UnknownTarget`] if the object has no
	/// meeting, which means it does not exist.
	pub async fn meeting_of(&self, target: &Fqid) -> Result<MeetingId> {
		let field = target.field("meeting_id");
		match self.value(&field).await? {
			Some(value) => Ok(MeetingId::new(decode_id(&field, &value)?)),
			None => Err(PermissionError::UnknownTarget(target.clone())),
		}
	}

	/// Anonymous access flag of a meeting, false when unset.
	pub async fn anonymous_enabled(&self, meeting_id: MeetingId) -> Result<bool> {
		let field = Fqfield::new("meeting", meeting_id.get(), "enable_anonymous");
		match self.value(&field).await? {
			Some(value) => Ok(decode_bool(&field, &value)?),
			None => Ok(false),
		}
	}

	pub async fn admin_group(&self, meeting_id: MeetingId) -> Result<Option<GroupId>> {
		self.optional_group(meeting_id, "admin_group_id").await
	}

	/// Group whose permissions apply to the anonymous caller.
	pub async fn default_group(&self, meeting_id: MeetingId) -> Result<Option<GroupId>> {
		self.optional_group(meeting_id, "default_group_id").await
	}

	/// Groups the user belongs to in the meeting, empty when not a member.
	pub async fn user_groups(&self, user_id: UserId, meeting_id: MeetingId) -> Result<Vec<GroupId>> {
		let field = Fqfield::new(
			"user",
			user_id.get(),
			format!("group_${}_ids", meeting_id.get()),
		);
		match self.value(&field).await? {
			Some(value) => Ok(decode_id_list(&field, &value)?
				.into_iter()
				.map(GroupId::new)
				.collect()),
			None => Ok(Vec::new()),
		}
	}

	/// Union of the permissions of all given groups.
	pub async fn group_permissions(&self, groups: &[GroupId]) -> Result<PermissionSet> {
		if groups.is_empty() {
			return Ok(PermissionSet::new());
		}

		let fields: Vec<Fqfield> = groups
			.iter()
			.map(|group| Fqfield::new("group", group.get(), "permissions"))
			.collect();
		let values = self.provider.get(&fields).await?;

		let mut permissions = PermissionSet::new();
		for field in &fields {
			if let Some(value) = values.get(field) {
				permissions.extend(decode_permissions(field, value)?);
			}
		}
		Ok(permissions)
	}

	async fn optional_group(&self, meeting_id: MeetingId, name: &str) -> Result<Option<GroupId>> {
		let field = Fqfield::new("meeting", meeting_id.get(), name);
		match self.value(&field).await? {
			Some(value) => Ok(Some(GroupId::new(decode_id(&field, &value)?))),
			None => Ok(None),
		}
	}
}

fn decode_error(fqfield: &Fqfield, message: impl Into<String>) -> ProviderError {
	ProviderError::Decode {
		fqfield: fqfield.clone(),
		message: message.into(),
	}
}

fn decode_id(fqfield: &Fqfield, value: &Value) -> std::result::Result<u64, ProviderError> {
	value
		.as_u64()
		.filter(|id| *id > 0)
		.ok_or_else(|| decode_error(fqfield, format!("expected a positive id, got {value}")))
}

fn decode_bool(fqfield: &Fqfield, value: &Value) -> std::result::Result<bool, ProviderError> {
	value
		.as_bool()
		.ok_or_else(|| decode_error(fqfield, format!("expected a boolean, got {value}")))
}

fn decode_id_list(fqfield: &Fqfield, value: &Value) -> std::result::Result<Vec<u64>, ProviderError> {
	let items = value
		.as_array()
		.ok_or_else(|| decode_error(fqfield, format!("expected a list of ids, got {value}")))?;
	items.iter().map(|item| decode_id(fqfield, item)).collect()
}

fn decode_permissions(
	fqfield: &Fqfield,
	value: &Value,
) -> std::result::Result<PermissionSet, ProviderError> {
	let items = value
		.as_array()
		.ok_or_else(|| decode_error(fqfield, format!("expected a list of permissions, got {value}")))?;
	items
		.iter()
		.map(|item| {
			let name = item
				.as_str()
				.ok_or_else(|| decode_error(fqfield, format!("expected a permission name, got {item}")))?;
			Permission::parse(name).map_err(|e| decode_error(fqfield, e.to_string()))
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::memory::MemoryDataProvider;
	use serde_json::json;

	fn provider(entries: &[(&str, Value)]) -> MemoryDataProvider {
		MemoryDataProvider::from_entries(
			entries
				.iter()
				.map(|(key, value)| (key.parse::<Fqfield>().unwrap(), value.clone())),
		)
	}

	#[tokio::test]
	async fn unknown_user_is_an_error() {
		let dp = provider(&[]);
		let access = DataAccess::new(&dp);
		let err = access.global_role(UserId::new(1)).await.unwrap_err();
		assert!(matches!(err, PermissionError::UnknownUser(id) if id == UserId::new(1)));
	}

	#[tokio::test]
	async fn anonymous_has_no_global_role() {
		let dp = provider(&[]);
		let access = DataAccess::new(&dp);
		assert_eq!(
			access.global_role(UserId::ANONYMOUS).await.unwrap(),
			GlobalRole::Ordinary
		);
	}

	#[tokio::test]
	async fn superadmin_role_is_resolved() {
		let dp = provider(&[
			("user/1/id", json!(1)),
			("user/1/role_id", json!(1)),
			("role/1/is_superadmin_role", json!(true)),
			("user/2/id", json!(2)),
			("user/2/role_id", json!(2)),
		]);
		let access = DataAccess::new(&dp);
		assert_eq!(
			access.global_role(UserId::new(1)).await.unwrap(),
			GlobalRole::Superadmin
		);
		assert_eq!(
			access.global_role(UserId::new(2)).await.unwrap(),
			GlobalRole::Ordinary
		);
	}

	#[tokio::test]
	async fn missing_target_meeting_is_unknown_target() {
		let dp = provider(&[]);
		let access = DataAccess::new(&dp);
		let err = access.meeting_of(&Fqid::new("topic", 3)).await.unwrap_err();
		assert!(matches!(err, PermissionError::UnknownTarget(_)));
	}

	#[tokio::test]
	async fn optional_attributes_default() {
		let dp = provider(&[]);
		let access = DataAccess::new(&dp);
		let meeting = MeetingId::new(1);
		assert!(!access.anonymous_enabled(meeting).await.unwrap());
		assert_eq!(access.admin_group(meeting).await.unwrap(), None);
		assert!(access
			.user_groups(UserId::new(1), meeting)
			.await
			.unwrap()
			.is_empty());
		assert!(access.group_permissions(&[GroupId::new(1)]).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn group_permissions_are_merged() {
		let dp = provider(&[
			("group/1/permissions", json!(["agenda.can_see"])),
			("group/2/permissions", json!(["motion.can_manage"])),
		]);
		let access = DataAccess::new(&dp);
		let perms = access
			.group_permissions(&[GroupId::new(1), GroupId::new(2)])
			.await
			.unwrap();
		assert!(perms.contains_name("agenda.can_see"));
		assert!(perms.contains_name("motion.can_see"));
	}

	#[tokio::test]
	async fn malformed_values_are_decode_errors() {
		let dp = provider(&[
			("meeting/1/enable_anonymous", json!("yes")),
			("user/1/group_$1_ids", json!(3)),
			("group/1/permissions", json!(["bogus"])),
		]);
		let access = DataAccess::new(&dp);
		assert!(matches!(
			access.anonymous_enabled(MeetingId::new(1)).await,
			Err(PermissionError::Provider(ProviderError::Decode { .. }))
		));
		assert!(access
			.user_groups(UserId::new(1), MeetingId::new(1))
			.await
			.is_err());
		assert!(access.group_permissions(&[GroupId::new(1)]).await.is_err());
	}
}
