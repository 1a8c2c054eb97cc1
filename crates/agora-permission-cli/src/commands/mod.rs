// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

pub mod actions;
pub mod check;

pub use actions::handle_actions;
pub use check::{handle_check, CheckArgs, CheckOutcome};
