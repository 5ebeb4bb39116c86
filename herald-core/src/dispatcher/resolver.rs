use std::collections::HashSet;

use futures_util::future::try_join_all;
use tracing::warn;

use super::Dispatcher;
use crate::error::{NotifyError, Result};
use crate::ids::UserId;
use crate::model::{Comment, PullRequest};

/// Remove duplicate users, keeping the first occurrence of each.
pub fn dedup_users(users: impl IntoIterator<Item = UserId>) -> Vec<UserId> {
    let mut seen = HashSet::new();
    users
        .into_iter()
        .filter(|user| seen.insert(user.clone()))
        .collect()
}

impl Dispatcher {
    /// Everyone involved in the discussion `comment` belongs to.
    ///
    /// That is the PR author, plus the author of every comment in the thread
    /// and every user mentioned in those comments. Mentions are extracted for
    /// all thread comments concurrently. The result has no duplicates; its
    /// order (first seen) carries no meaning.
    ///
    /// Fails with [`NotifyError::Internal`] if `comment` is not on `pr`.
    pub async fn involved_users(&self, pr: &PullRequest, comment: &Comment) -> Result<Vec<UserId>> {
        if pr.id != comment.pr {
            return Err(NotifyError::internal(format!(
                "Mismatched PR ({}) and comment ({}) when resolving involved users",
                pr.id, comment.id
            )));
        }

        let mut thread = self.vcs.comment_thread(&pr.id, &comment.id).await?;
        if !thread.iter().any(|c| c.id == comment.id) {
            warn!(
                "Thread for comment {} on PR {} did not include the comment itself",
                comment.id, pr.id
            );
            thread.push(comment.clone());
        }

        let involved_per_comment = try_join_all(thread.iter().map(|c| async move {
            let mentions = self.vcs.mentions(&c.body).await?;
            Ok::<_, NotifyError>(
                std::iter::once(c.author.clone())
                    .chain(mentions)
                    .collect::<Vec<_>>(),
            )
        }))
        .await?;

        Ok(dedup_users(
            std::iter::once(pr.author.clone()).chain(involved_per_comment.into_iter().flatten()),
        ))
    }
}
