//! External References
//!
//! Display records resolved from collaborators outside this subsystem
//! (member directory, activity catalog). Cards and boards only store ids.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A member that can be assigned to cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub display_name: String,
    pub email: Option<String>,
}

/// A scheduled activity from the calendar catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub title: String,
    pub starts_at: Option<DateTime<Utc>>,
}
