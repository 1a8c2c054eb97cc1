// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod logging;
mod rules;

pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use rules::{parse_overrides, RulesConfig, RulesConfigLayer};
