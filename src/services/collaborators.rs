//! External Collaborators
//!
//! Lookups owned by other systems. The board core only checks that referenced
//! ids exist and uses the records to enrich card reads.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::{Activity, DomainResult, Member};

/// Resolves member ids (card assignees)
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    async fn find_member(&self, id: &str) -> DomainResult<Option<Member>>;
}

/// Resolves scheduled-activity ids
#[async_trait]
pub trait ActivityCatalog: Send + Sync {
    async fn find_activity(&self, id: &str) -> DomainResult<Option<Activity>>;
}

/// Member directory held in memory
#[derive(Default)]
pub struct InMemoryMemberDirectory {
    members: RwLock<HashMap<String, Member>>,
}

impl InMemoryMemberDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, member: Member) {
        self.members.write().await.insert(member.id.clone(), member);
    }

    pub async fn remove(&self, id: &str) -> Option<Member> {
        self.members.write().await.remove(id)
    }
}

#[async_trait]
impl MemberDirectory for InMemoryMemberDirectory {
    async fn find_member(&self, id: &str) -> DomainResult<Option<Member>> {
        Ok(self.members.read().await.get(id).cloned())
    }
}

/// Activity catalog held in memory
#[derive(Default)]
pub struct InMemoryActivityCatalog {
    activities: RwLock<HashMap<String, Activity>>,
}

impl InMemoryActivityCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, activity: Activity) {
        self.activities.write().await.insert(activity.id.clone(), activity);
    }

    pub async fn remove(&self, id: &str) -> Option<Activity> {
        self.activities.write().await.remove(id)
    }
}

#[async_trait]
impl ActivityCatalog for InMemoryActivityCatalog {
    async fn find_activity(&self, id: &str) -> DomainResult<Option<Activity>> {
        Ok(self.activities.read().await.get(id).cloned())
    }
}
