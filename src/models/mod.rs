// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod ad;
pub mod plan;
pub mod user;

pub use ad::{AdCopy, AdRequest};
pub use plan::Plan;
pub use user::{PlanDetails, UserRecord};
