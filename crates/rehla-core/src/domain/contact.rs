//! Messages sent through the contact form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A contact form message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub full_name: String,
    pub phone_number: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
