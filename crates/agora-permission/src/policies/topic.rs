// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Topic policies.
//!
//! Topics are agenda content, so every topic write needs the agenda manage
//! permission in the topic's meeting.

use crate::decision::Decision;
use crate::fields::FieldSpec;
use crate::handler::{ActionHandler, IsAllowedParams, MeetingScopedAction, MeetingSource};
use crate::permission::Permission;

pub const CREATE: &str = "topic.create";
pub const UPDATE: &str = "topic.update";
pub const DELETE: &str = "topic.delete";

pub const DEFAULT_PERMISSION: &str = Permission::AGENDA_CAN_MANAGE;

pub const CREATE_FIELDS: FieldSpec = FieldSpec::new(
	&[
		"meeting_id",
		"title",
		"text",
		"attachment_ids",
		"tag_ids",
		"agenda_type",
		"agenda_parent_id",
		"agenda_comment",
		"agenda_duration",
		"agenda_weight",
	],
	&["meeting_id"],
);

pub const UPDATE_FIELDS: FieldSpec =
	FieldSpec::new(&["id", "title", "text", "attachment_ids", "tag_ids"], &["id"]);

pub const DELETE_FIELDS: FieldSpec = FieldSpec::new(&["id"], &["id"]);

const TARGET: MeetingSource = MeetingSource::Target {
	collection: "topic",
	id_field: "id",
};

pub fn create_handler(permission: Permission) -> MeetingScopedAction {
	MeetingScopedAction::new(
		CREATE,
		CREATE_FIELDS,
		MeetingSource::Field("meeting_id"),
		permission,
	)
}

pub fn update_handler(permission: Permission) -> MeetingScopedAction {
	MeetingScopedAction::new(UPDATE, UPDATE_FIELDS, TARGET, permission)
}

pub fn delete_handler(permission: Permission) -> MeetingScopedAction {
	MeetingScopedAction::new(DELETE, DELETE_FIELDS, TARGET, permission)
}

/// Evaluates `topic.create` with the default permission.
pub async fn create(params: &IsAllowedParams<'_>) -> Decision {
	create_handler(Permission::from_static(DEFAULT_PERMISSION))
		.is_allowed(params)
		.await
}

/// Evaluates `topic.update` with the default permission.
pub async fn update(params: &IsAllowedParams<'_>) -> Decision {
	update_handler(Permission::from_static(DEFAULT_PERMISSION))
		.is_allowed(params)
		.await
}

/// Evaluates `topic.delete` with the default permission.
pub async fn delete(params: &IsAllowedParams<'_>) -> Decision {
	delete_handler(Permission::from_static(DEFAULT_PERMISSION))
		.is_allowed(params)
		.await
}
