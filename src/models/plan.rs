// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Subscription plans and their monthly ad quotas.

use serde::Serialize;

/// A subscription plan offered by the front-end pricing modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Pro,
    Unlimited,
}

impl Plan {
    /// Parse a plan key as sent by the client (`free`, `pro`, `unlimited`).
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "free" => Some(Plan::Free),
            "pro" => Some(Plan::Pro),
            "unlimited" => Some(Plan::Unlimited),
            _ => None,
        }
    }

    /// Resolve the plan for a stored `subscriptionStatus`.
    ///
    /// Older clients wrote `premium` for paid users; that maps to unlimited.
    /// Anything unrecognized falls back to the free tier.
    pub fn from_status(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "premium" => Plan::Unlimited,
            other => Plan::from_key(other).unwrap_or(Plan::Free),
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Pro => "pro",
            Plan::Unlimited => "unlimited",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Plan::Free => "Free",
            Plan::Pro => "Pro",
            Plan::Unlimited => "Unlimited",
        }
    }

    /// Monthly price in the smallest unit of `currency` (paise or cents).
    pub fn price(self, currency: &str) -> u64 {
        let usd = currency.eq_ignore_ascii_case("USD");
        match (self, usd) {
            (Plan::Free, _) => 0,
            (Plan::Pro, false) => 59_900,
            (Plan::Pro, true) => 799,
            (Plan::Unlimited, false) => 99_900,
            (Plan::Unlimited, true) => 1_299,
        }
    }

    /// Ads allowed per month. `None` means unlimited.
    pub fn ads_per_month(self) -> Option<u32> {
        match self {
            Plan::Free => Some(3),
            Plan::Pro => Some(100),
            Plan::Unlimited => None,
        }
    }

    pub fn is_paid(self) -> bool {
        self != Plan::Free
    }

    /// Ads left after `used`, or `None` if the plan is unlimited.
    pub fn remaining(self, used: u32) -> Option<u32> {
        self.ads_per_month().map(|limit| limit.saturating_sub(used))
    }

    pub fn allows(self, used: u32) -> bool {
        self.remaining(used).map_or(true, |left| left > 0)
    }
}
