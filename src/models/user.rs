//! User record persisted as `user_data_<uid>.json`.

use crate::models::plan::Plan;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// User profile and usage counters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct UserRecord {
    /// Identity-provider user id (also the file key)
    pub uid: String,
    pub name: Option<String>,
    pub email: Option<String>,
    /// When the record was first written (RFC 3339)
    pub creation_time: Option<String>,
    /// Last sign-in reported by the client (RFC 3339)
    pub last_sign_in_time: Option<String>,
    /// Ads generated in the current plan period
    pub usage_count: u32,
    /// Plan key (`free`, `pro`, `unlimited`; legacy `premium`)
    pub subscription_status: String,
    pub plan_details: Option<PlanDetails>,
    /// Client fields the server does not interpret (picture, provider, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for UserRecord {
    fn default() -> Self {
        Self {
            uid: String::new(),
            name: None,
            email: None,
            creation_time: None,
            last_sign_in_time: None,
            usage_count: 0,
            subscription_status: Plan::Free.key().to_string(),
            plan_details: None,
            extra: Map::new(),
        }
    }
}

impl UserRecord {
    pub fn plan(&self) -> Plan {
        Plan::from_status(&self.subscription_status)
    }

    pub fn can_generate(&self) -> bool {
        self.plan().allows(self.usage_count)
    }

    /// Switch to a paid plan and restart the usage counter.
    pub fn activate_plan(&mut self, plan: Plan, payment_id: &str, order_id: &str, now: &str) {
        self.subscription_status = plan.key().to_string();
        self.usage_count = 0;
        self.plan_details = Some(PlanDetails {
            plan_key: plan.key().to_string(),
            name: plan.name().to_string(),
            ads_per_month: plan.ads_per_month(),
            activated_at: Some(now.to_string()),
            payment_id: Some(payment_id.to_string()),
            order_id: Some(order_id.to_string()),
        });
    }
}

/// Details of the plan a user paid for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanDetails {
    pub plan_key: String,
    pub name: String,
    /// `None` means unlimited
    pub ads_per_month: Option<u32>,
    pub activated_at: Option<String>,
    pub payment_id: Option<String>,
    pub order_id: Option<String>,
}
