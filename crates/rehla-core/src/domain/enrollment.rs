//! Subscriptions of users to courses and their payments.

use crate::patch::FieldUpdates;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's subscription to a course. The id is the course id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub course_title: String,
    #[serde(default)]
    pub active: bool,
}

/// Partial update of a subscription.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscriptionPatch {
    pub course_title: Option<String>,
    pub active: Option<bool>,
}

impl From<SubscriptionPatch> for FieldUpdates {
    fn from(patch: SubscriptionPatch) -> Self {
        FieldUpdates::new()
            .set_opt("course_title", patch.course_title)
            .set_opt("active", patch.active)
    }
}

/// A payment recorded against a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(default)]
    pub id: String,
    pub amount_paid: i64,
    pub date_of_payment: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
}

impl Payment {
    /// Returns true while the paid period has not ended.
    #[must_use]
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.valid_until > now
    }
}

/// Sorts payments newest first.
pub fn sort_newest_first(payments: &mut [Payment]) {
    payments.sort_by(|a, b| b.date_of_payment.cmp(&a.date_of_payment));
}

/// Total amount paid over a set of payments.
#[must_use]
pub fn total_paid(payments: &[Payment]) -> i64 {
    payments.iter().map(|p| p.amount_paid).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn payment(id: &str, days_ago: i64, amount: i64) -> Payment {
        let date = Utc::now() - Duration::days(days_ago);
        Payment {
            id: id.to_string(),
            amount_paid: amount,
            date_of_payment: date,
            valid_until: date + Duration::days(30),
        }
    }

    #[test]
    fn test_sort_newest_first() {
        let mut payments = vec![payment("old", 60, 10), payment("new", 1, 20), payment("mid", 20, 30)];
        sort_newest_first(&mut payments);
        let ids: Vec<&str> = payments.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
        assert_eq!(total_paid(&payments), 60);
    }

    #[test]
    fn test_is_current() {
        let now = Utc::now();
        assert!(payment("p", 1, 0).is_current(now));
        assert!(!payment("p", 60, 0).is_current(now));
    }
}
