//! Serializable snapshot of backend and preference state.
//!
//! Used to seed the in-memory collaborators from a JSON file, so an event can
//! be replayed against a known view of the world.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::memory::{InMemorySettingsStore, InMemoryVcs};
use super::SettingsStore;
use crate::model::{Comment, PullRequest, Review, ReviewRequest, UserSettings};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VcsSnapshot {
    #[serde(default)]
    pub prs: Vec<PullRequest>,
    /// Comments in creation order.
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub review_requests: Vec<ReviewRequest>,
    #[serde(default)]
    pub settings: Vec<UserSettings>,
}

impl VcsSnapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse snapshot JSON")
    }

    /// Build collaborators populated with this snapshot's contents.
    pub async fn into_collaborators(self) -> Result<(InMemoryVcs, InMemorySettingsStore)> {
        let vcs = InMemoryVcs::new();
        for pr in self.prs {
            vcs.insert_pr(pr).await;
        }
        for comment in self.comments {
            vcs.insert_comment(comment).await;
        }
        for review in self.reviews {
            vcs.insert_review(review).await;
        }
        for request in self.review_requests {
            vcs.insert_review_request(request).await;
        }

        let store = InMemorySettingsStore::new();
        for settings in self.settings {
            let user = settings.user.clone();
            store
                .set_user_settings(&user, settings)
                .await
                .with_context(|| format!("Failed to load settings for {}", user))?;
        }

        Ok((vcs, store))
    }
}
