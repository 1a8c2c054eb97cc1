// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Agenda item policies.

use crate::fields::FieldSpec;
use crate::handler::{MeetingScopedAction, MeetingSource};
use crate::permission::Permission;

pub const UPDATE: &str = "agenda_item.update";
pub const DELETE: &str = "agenda_item.delete";

pub const DEFAULT_PERMISSION: &str = Permission::AGENDA_CAN_MANAGE;

pub const UPDATE_FIELDS: FieldSpec = FieldSpec::new(
	&[
		"id",
		"item_number",
		"comment",
		"closed",
		"type",
		"weight",
		"duration",
		"tag_ids",
	],
	&["id"],
);

pub const DELETE_FIELDS: FieldSpec = FieldSpec::new(&["id"], &["id"]);

const TARGET: MeetingSource = MeetingSource::Target {
	collection: "agenda_item",
	id_field: "id",
};

pub fn update_handler(permission: Permission) -> MeetingScopedAction {
	MeetingScopedAction::new(UPDATE, UPDATE_FIELDS, TARGET, permission)
}

pub fn delete_handler(permission: Permission) -> MeetingScopedAction {
	MeetingScopedAction::new(DELETE, DELETE_FIELDS, TARGET, permission)
}
