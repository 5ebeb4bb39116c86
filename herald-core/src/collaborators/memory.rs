//! In-memory collaborator implementations.
//!
//! All state is held in memory and lost when dropped. Used by the replay CLI
//! and as test doubles.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ChatService, SettingsStore, Vcs};
use crate::ids::{CommentId, PrId, UserId};
use crate::mentions::extract_mentions;
use crate::model::{Comment, PullRequest, Review, ReviewRequest, UserSettings};

#[derive(Default)]
struct VcsData {
    prs: HashMap<PrId, PullRequest>,
    /// Insertion order is creation order.
    comments: Vec<Comment>,
    reviews: Vec<Review>,
    review_requests: Vec<ReviewRequest>,
}

impl VcsData {
    fn find_comment(&self, pr: &PrId, id: &CommentId) -> Option<&Comment> {
        self.comments.iter().find(|c| &c.pr == pr && &c.id == id)
    }

    /// Follow `in_reply_to` links up to the comment that starts the thread.
    ///
    /// A reply whose parent is unknown (or on another PR) starts its own
    /// thread. For a reply cycle the root is the smallest ID on the cycle,
    /// so every member of the cycle lands in the same thread.
    fn thread_root<'a>(&'a self, comment: &'a Comment) -> &'a CommentId {
        let mut path = vec![&comment.id];
        let mut current = comment;

        while let Some(parent_id) = &current.in_reply_to {
            let Some(parent) = self.find_comment(&current.pr, parent_id) else {
                break;
            };
            if let Some(start) = path.iter().position(|id| *id == &parent.id) {
                return path[start..]
                    .iter()
                    .min()
                    .copied()
                    .unwrap_or(&parent.id);
            }
            path.push(&parent.id);
            current = parent;
        }

        &current.id
    }
}

/// In-memory code-review backend.
#[derive(Default)]
pub struct InMemoryVcs {
    data: RwLock<VcsData>,
}

impl InMemoryVcs {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_pr(&self, pr: PullRequest) {
        let mut data = self.data.write().await;
        data.prs.insert(pr.id.clone(), pr);
    }

    pub async fn insert_review(&self, review: Review) {
        self.data.write().await.reviews.push(review);
    }

    pub async fn insert_review_request(&self, request: ReviewRequest) {
        self.data.write().await.review_requests.push(request);
    }

    pub async fn insert_comment(&self, comment: Comment) {
        self.data.write().await.comments.push(comment);
    }
}

#[async_trait]
impl Vcs for InMemoryVcs {
    async fn get_pr(&self, id: &PrId) -> Result<Option<PullRequest>> {
        let data = self.data.read().await;
        Ok(data.prs.get(id).cloned())
    }

    async fn comments_for_pr(&self, id: &PrId) -> Result<Vec<Comment>> {
        let data = self.data.read().await;
        Ok(data
            .comments
            .iter()
            .filter(|c| &c.pr == id)
            .cloned()
            .collect())
    }

    async fn comment_thread(&self, pr: &PrId, comment: &CommentId) -> Result<Vec<Comment>> {
        let data = self.data.read().await;
        let target = data
            .find_comment(pr, comment)
            .ok_or_else(|| anyhow!("Comment {} not found on PR {}", comment, pr))?;
        let root = data.thread_root(target);

        Ok(data
            .comments
            .iter()
            .filter(|c| &c.pr == pr && data.thread_root(c) == root)
            .cloned()
            .collect())
    }

    async fn mentions(&self, text: &str) -> Result<Vec<UserId>> {
        Ok(extract_mentions(text))
    }

    async fn review_requests_for_pr(&self, id: &PrId) -> Result<Vec<ReviewRequest>> {
        let data = self.data.read().await;
        Ok(data
            .review_requests
            .iter()
            .filter(|r| &r.pr == id)
            .cloned()
            .collect())
    }

    async fn reviews_for_pr(&self, id: &PrId) -> Result<Vec<Review>> {
        let data = self.data.read().await;
        Ok(data
            .reviews
            .iter()
            .filter(|r| &r.pr == id)
            .cloned()
            .collect())
    }

    async fn create_comment(&self, comment: Comment) -> Result<()> {
        let mut data = self.data.write().await;
        if !data.prs.contains_key(&comment.pr) {
            return Err(anyhow!(
                "Cannot comment on unknown PR {} (comment {})",
                comment.pr,
                comment.id
            ));
        }
        if data.find_comment(&comment.pr, &comment.id).is_some() {
            return Err(anyhow!(
                "Comment {} already exists on PR {}",
                comment.id,
                comment.pr
            ));
        }
        data.comments.push(comment);
        Ok(())
    }
}

/// In-memory preference store.
#[derive(Default)]
pub struct InMemorySettingsStore {
    settings: RwLock<HashMap<UserId, UserSettings>>,
    lookups: AtomicUsize,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `user_settings` calls served so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn user_settings(&self, user: &UserId) -> Result<UserSettings> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let settings = self.settings.read().await;
        Ok(settings
            .get(user)
            .cloned()
            .unwrap_or_else(|| UserSettings::default_for(user.clone())))
    }

    async fn set_user_settings(&self, user: &UserId, settings: UserSettings) -> Result<()> {
        if &settings.user != user {
            return Err(anyhow!(
                "Settings for {} cannot be stored under {}",
                settings.user,
                user
            ));
        }
        let mut stored = self.settings.write().await;
        stored.insert(user.clone(), settings);
        Ok(())
    }
}

/// A message handed to [`RecordingChatService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub to: UserId,
    pub text: String,
}

/// Chat transport that records every message instead of delivering it.
#[derive(Default)]
pub struct RecordingChatService {
    sent: RwLock<Vec<SentMessage>>,
    /// Recipients whose sends fail, for exercising error propagation.
    unreachable: RwLock<HashSet<UserId>>,
}

impl RecordingChatService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send to `user` fail.
    pub async fn fail_for(&self, user: UserId) {
        self.unreachable.write().await.insert(user);
    }

    /// Messages recorded so far, in send order.
    pub async fn sent(&self) -> Vec<SentMessage> {
        self.sent.read().await.clone()
    }

    /// Recipients recorded so far, in send order.
    pub async fn recipients(&self) -> Vec<UserId> {
        self.sent.read().await.iter().map(|m| m.to.clone()).collect()
    }
}

#[async_trait]
impl ChatService for RecordingChatService {
    async fn send_message(&self, to: &UserId, text: &str) -> Result<()> {
        if self.unreachable.read().await.contains(to) {
            return Err(anyhow!("Failed to deliver message to {}", to));
        }
        self.sent.write().await.push(SentMessage {
            to: to.clone(),
            text: text.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pr(id: &str, author: &str) -> PullRequest {
        PullRequest {
            id: PrId::from(id),
            author: UserId::from(author),
            name: format!("PR {}", id),
            url: format!("https://example.com/pulls/{}", id),
        }
    }

    fn comment(id: &str, pr: &str, author: &str, reply_to: Option<&str>) -> Comment {
        Comment {
            id: CommentId::from(id),
            pr: PrId::from(pr),
            author: UserId::from(author),
            body: String::new(),
            in_reply_to: reply_to.map(CommentId::from),
        }
    }

    fn ids(comments: &[Comment]) -> Vec<&str> {
        comments.iter().map(|c| c.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_get_pr_missing_returns_none() {
        let vcs = InMemoryVcs::new();
        assert_eq!(vcs.get_pr(&PrId::from("P1")).await.unwrap(), None);

        vcs.insert_pr(pr("P1", "alice")).await;
        let found = vcs.get_pr(&PrId::from("P1")).await.unwrap().unwrap();
        assert_eq!(found.author, UserId::from("alice"));
    }

    #[tokio::test]
    async fn test_thread_includes_ancestors_and_siblings() {
        let vcs = InMemoryVcs::new();
        vcs.insert_comment(comment("C1", "P1", "bob", None)).await;
        vcs.insert_comment(comment("C2", "P1", "dave", Some("C1"))).await;
        vcs.insert_comment(comment("C3", "P1", "erin", None)).await;
        vcs.insert_comment(comment("C4", "P1", "frank", Some("C2"))).await;
        vcs.insert_comment(comment("C5", "P1", "gina", Some("C1"))).await;

        let thread = vcs
            .comment_thread(&PrId::from("P1"), &CommentId::from("C2"))
            .await
            .unwrap();
        assert_eq!(ids(&thread), ["C1", "C2", "C4", "C5"]);

        let lonely = vcs
            .comment_thread(&PrId::from("P1"), &CommentId::from("C3"))
            .await
            .unwrap();
        assert_eq!(ids(&lonely), ["C3"]);
    }

    #[tokio::test]
    async fn test_thread_ignores_other_prs() {
        let vcs = InMemoryVcs::new();
        vcs.insert_comment(comment("C1", "P1", "bob", None)).await;
        vcs.insert_comment(comment("C1", "P2", "zed", None)).await;
        vcs.insert_comment(comment("C2", "P2", "yan", Some("C1"))).await;

        let thread = vcs
            .comment_thread(&PrId::from("P1"), &CommentId::from("C1"))
            .await
            .unwrap();
        assert_eq!(thread.len(), 1);
        assert_eq!(thread[0].author, UserId::from("bob"));
    }

    #[tokio::test]
    async fn test_thread_for_unknown_comment_fails() {
        let vcs = InMemoryVcs::new();
        let err = vcs
            .comment_thread(&PrId::from("P1"), &CommentId::from("C9"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("C9"));
    }

    #[tokio::test]
    async fn test_reply_cycle_terminates() {
        let vcs = InMemoryVcs::new();
        vcs.insert_comment(comment("C1", "P1", "bob", Some("C2"))).await;
        vcs.insert_comment(comment("C2", "P1", "dave", Some("C1"))).await;

        vcs.insert_comment(comment("C3", "P1", "erin", Some("C2"))).await;

        let from_c1 = vcs
            .comment_thread(&PrId::from("P1"), &CommentId::from("C1"))
            .await
            .unwrap();
        let from_c2 = vcs
            .comment_thread(&PrId::from("P1"), &CommentId::from("C2"))
            .await
            .unwrap();
        let from_c3 = vcs
            .comment_thread(&PrId::from("P1"), &CommentId::from("C3"))
            .await
            .unwrap();

        // Every comment on or hanging off the cycle shares one thread
        assert_eq!(ids(&from_c1), ["C1", "C2", "C3"]);
        assert_eq!(from_c1, from_c2);
        assert_eq!(from_c1, from_c3);
    }

    #[tokio::test]
    async fn test_create_comment_requires_known_pr() {
        let vcs = InMemoryVcs::new();
        assert!(vcs
            .create_comment(comment("C1", "P1", "bob", None))
            .await
            .is_err());

        vcs.insert_pr(pr("P1", "alice")).await;
        vcs.create_comment(comment("C1", "P1", "bob", None))
            .await
            .unwrap();
        assert!(vcs
            .create_comment(comment("C1", "P1", "bob", None))
            .await
            .is_err());
        assert_eq!(vcs.comments_for_pr(&PrId::from("P1")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_listing_filters_by_pr() {
        let vcs = InMemoryVcs::new();
        vcs.insert_review_request(ReviewRequest {
            id: "RR1".into(),
            pr: "P1".into(),
            requester: "alice".into(),
            requestee: "bob".into(),
        })
        .await;
        vcs.insert_review(Review {
            id: "R1".into(),
            pr: "P2".into(),
            reviewer: "carol".into(),
            status: crate::model::ReviewStatus::Comment,
            body: None,
        })
        .await;

        assert_eq!(
            vcs.review_requests_for_pr(&PrId::from("P1"))
                .await
                .unwrap()
                .len(),
            1
        );
        assert!(vcs.reviews_for_pr(&PrId::from("P1")).await.unwrap().is_empty());
        assert_eq!(vcs.reviews_for_pr(&PrId::from("P2")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_settings_default_when_absent() {
        let store = InMemorySettingsStore::new();
        let settings = store.user_settings(&UserId::from("bob")).await.unwrap();
        assert_eq!(settings, UserSettings::default_for(UserId::from("bob")));
        assert_eq!(store.lookup_count(), 1);
    }

    #[tokio::test]
    async fn test_settings_round_trip() {
        let store = InMemorySettingsStore::new();
        let bob = UserId::from("bob");
        store
            .set_user_settings(
                &bob,
                UserSettings {
                    user: bob.clone(),
                    enabled: Some(false),
                },
            )
            .await
            .unwrap();
        assert!(!store
            .user_settings(&bob)
            .await
            .unwrap()
            .notifications_enabled());
    }

    #[tokio::test]
    async fn test_settings_user_mismatch_rejected() {
        let store = InMemorySettingsStore::new();
        let result = store
            .set_user_settings(
                &UserId::from("bob"),
                UserSettings::default_for(UserId::from("carol")),
            )
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_recording_chat_service() {
        let chat = RecordingChatService::new();
        chat.send_message(&UserId::from("alice"), "hello")
            .await
            .unwrap();
        chat.fail_for(UserId::from("bob")).await;
        assert!(chat
            .send_message(&UserId::from("bob"), "hello")
            .await
            .is_err());

        assert_eq!(
            chat.sent().await,
            vec![SentMessage {
                to: UserId::from("alice"),
                text: "hello".to_string(),
            }]
        );
    }
}
