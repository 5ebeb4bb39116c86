use futures_util::future::try_join_all;
use tracing::debug;

use super::Dispatcher;
use crate::error::Result;
use crate::ids::UserId;
use crate::model::PullRequest;

impl Dispatcher {
    /// Whether `user` currently accepts notifications about `pr`.
    ///
    /// Users with no explicit preference are notified.
    pub async fn ok_to_message(&self, user: &UserId, pr: &PullRequest) -> Result<bool> {
        let settings = self.settings.user_settings(user).await?;
        let ok = settings.notifications_enabled();
        if !ok {
            debug!("{} has notifications disabled; skipping PR {}", user, pr.id);
        }
        Ok(ok)
    }

    /// Drop `actor` and every candidate who has opted out.
    ///
    /// All preference lookups are issued before any is awaited; the first
    /// failing lookup fails the whole call. Surviving candidates keep their
    /// relative order.
    pub(crate) async fn filter_recipients(
        &self,
        candidates: Vec<UserId>,
        actor: &UserId,
        pr: &PullRequest,
    ) -> Result<Vec<UserId>> {
        let verdicts = try_join_all(candidates.iter().map(|user| async move {
            if user == actor {
                debug!("Not notifying {} about their own activity on PR {}", user, pr.id);
                Ok(false)
            } else {
                self.ok_to_message(user, pr).await
            }
        }))
        .await?;

        Ok(candidates
            .into_iter()
            .zip(verdicts)
            .filter_map(|(user, ok)| ok.then_some(user))
            .collect())
    }
}
