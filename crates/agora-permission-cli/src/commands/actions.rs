// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use agora_permission::ActionRegistry;

pub fn handle_actions(registry: &ActionRegistry) {
	print!("{}", render_actions(registry));
}

/// One `action<TAB>permission` line per registered action, sorted by name.
fn render_actions(registry: &ActionRegistry) -> String {
	let mut output = String::new();
	for name in registry.names() {
		let permission = registry
			.get(name)
			.and_then(|handler| handler.required_permission())
			.map(|p| p.as_str())
			.unwrap_or("-");
		output.push_str(&format!("{name}\t{permission}\n"));
	}
	output
}
