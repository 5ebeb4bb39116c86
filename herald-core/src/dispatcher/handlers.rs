use futures_util::future::join_all;
use tracing::{error, info, warn};

use super::{dedup_users, Dispatcher};
use crate::config::ReviewRequestPolicy;
use crate::error::{NotifyError, Result};
use crate::event::NotificationEvent;
use crate::ids::{PrId, UserId};
use crate::model::{Comment, PullRequest, Review, ReviewRequest};

impl Dispatcher {
    /// Handle any event, returning the users who were messaged.
    pub async fn handle(&self, event: &NotificationEvent) -> Result<Vec<UserId>> {
        match event {
            NotificationEvent::Comment(comment) => self.handle_new_comment(comment).await,
            NotificationEvent::ReviewRequest(request) => {
                self.handle_new_review_request(request).await
            }
            NotificationEvent::Review(review) => self.handle_new_review(review).await,
        }
    }

    /// Notify everyone involved in the comment's thread, except its author.
    pub async fn handle_new_comment(&self, comment: &Comment) -> Result<Vec<UserId>> {
        let pr = self.fetch_pr(&comment.pr).await?;

        let involved = self.involved_users(&pr, comment).await?;
        let candidates = dedup_users(std::iter::once(pr.author.clone()).chain(involved));
        let recipients = self
            .filter_recipients(candidates, &comment.author, &pr)
            .await?;

        let text = self
            .formatter
            .format(&pr, &NotificationEvent::Comment(comment.clone()));
        self.dispatch(&recipients, &text).await?;

        info!(
            "Comment {} on PR {}: notified {} user(s)",
            comment.id,
            pr.id,
            recipients.len()
        );
        Ok(recipients)
    }

    /// Notify the requested reviewer.
    ///
    /// Under [`ReviewRequestPolicy::Gated`] (the default) a requestee who has
    /// opted out is not messaged. Under [`ReviewRequestPolicy::Ungated`] the
    /// preference is still looked up but never stops the send.
    pub async fn handle_new_review_request(&self, request: &ReviewRequest) -> Result<Vec<UserId>> {
        let pr = self.fetch_pr(&request.pr).await?;
        let requestee = &request.requestee;

        let ok = self.ok_to_message(requestee, &pr).await?;
        if !ok {
            match self.config.review_request_policy {
                ReviewRequestPolicy::Gated => {
                    info!(
                        "Review request {} on PR {}: {} has notifications disabled",
                        request.id, pr.id, requestee
                    );
                    return Ok(Vec::new());
                }
                ReviewRequestPolicy::Ungated => {
                    warn!(
                        "Review request {} on PR {}: messaging {} despite disabled notifications (ungated policy)",
                        request.id, pr.id, requestee
                    );
                }
            }
        }

        let text = self
            .formatter
            .format(&pr, &NotificationEvent::ReviewRequest(request.clone()));
        self.chat.send_message(requestee, &text).await?;

        info!(
            "Review request {} on PR {}: notified {}",
            request.id, pr.id, requestee
        );
        Ok(vec![requestee.clone()])
    }

    /// Notify the PR author and anyone mentioned in the review body, except
    /// the reviewer.
    pub async fn handle_new_review(&self, review: &Review) -> Result<Vec<UserId>> {
        let pr = self.fetch_pr(&review.pr).await?;

        let mentions = match &review.body {
            Some(body) => self.vcs.mentions(body).await?,
            None => Vec::new(),
        };
        let candidates = dedup_users(std::iter::once(pr.author.clone()).chain(mentions));
        let recipients = self
            .filter_recipients(candidates, &review.reviewer, &pr)
            .await?;

        let text = self
            .formatter
            .format(&pr, &NotificationEvent::Review(review.clone()));
        self.dispatch(&recipients, &text).await?;

        info!(
            "Review {} ({}) on PR {}: notified {} user(s)",
            review.id,
            review.status,
            pr.id,
            recipients.len()
        );
        Ok(recipients)
    }

    async fn fetch_pr(&self, id: &PrId) -> Result<PullRequest> {
        self.vcs
            .get_pr(id)
            .await?
            .ok_or_else(|| NotifyError::internal(format!("No PR for ID {}", id)))
    }

    /// Send `text` to every recipient.
    ///
    /// Every send runs to completion even if another one fails; the first
    /// failure (in recipient order) is returned afterwards.
    async fn dispatch(&self, recipients: &[UserId], text: &str) -> Result<()> {
        let results = join_all(
            recipients
                .iter()
                .map(|recipient| self.chat.send_message(recipient, text)),
        )
        .await;

        let mut first_error = None;
        for (recipient, result) in recipients.iter().zip(results) {
            if let Err(e) = result {
                error!("Failed to notify {}: {}", recipient, e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}
