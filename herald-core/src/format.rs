//! Message text for outgoing notifications.

use crate::event::NotificationEvent;
use crate::model::{PullRequest, ReviewStatus};

/// Renders the text sent to each recipient of an event.
pub trait MessageFormatter: Send + Sync {
    fn format(&self, pr: &PullRequest, event: &NotificationEvent) -> String;
}

/// One-line plain text: who did what, on which PR, and where to find it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextFormatter;

impl MessageFormatter for PlainTextFormatter {
    fn format(&self, pr: &PullRequest, event: &NotificationEvent) -> String {
        match event {
            NotificationEvent::Comment(comment) => {
                let verb = if comment.in_reply_to.is_some() {
                    "replied in a thread on"
                } else {
                    "commented on"
                };
                format!("{} {} \"{}\" {}", comment.author, verb, pr.name, pr.url)
            }
            NotificationEvent::ReviewRequest(request) => format!(
                "{} requested your review on \"{}\" {}",
                request.requester, pr.name, pr.url
            ),
            NotificationEvent::Review(review) => {
                let verb = match review.status {
                    ReviewStatus::Accept => "approved",
                    ReviewStatus::RequestChanges => "requested changes on",
                    ReviewStatus::Comment => "commented on",
                };
                format!("{} {} \"{}\" {}", review.reviewer, verb, pr.name, pr.url)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Comment, Review, ReviewRequest};
    use insta::assert_snapshot;

    fn pr() -> PullRequest {
        PullRequest {
            id: "P1".into(),
            author: "alice".into(),
            name: "Add parser".to_string(),
            url: "https://example.com/pulls/1".to_string(),
        }
    }

    fn review(status: ReviewStatus) -> NotificationEvent {
        NotificationEvent::Review(Review {
            id: "R1".into(),
            pr: "P1".into(),
            reviewer: "carol".into(),
            status,
            body: None,
        })
    }

    #[test]
    fn test_format_comment() {
        let event = NotificationEvent::Comment(Comment {
            id: "C1".into(),
            pr: "P1".into(),
            author: "bob".into(),
            body: "nit: rename this".to_string(),
            in_reply_to: None,
        });
        assert_snapshot!(
            PlainTextFormatter.format(&pr(), &event),
            @r#"bob commented on "Add parser" https://example.com/pulls/1"#
        );
    }

    #[test]
    fn test_format_reply() {
        let event = NotificationEvent::Comment(Comment {
            id: "C2".into(),
            pr: "P1".into(),
            author: "dave".into(),
            body: "done".to_string(),
            in_reply_to: Some("C1".into()),
        });
        assert_snapshot!(
            PlainTextFormatter.format(&pr(), &event),
            @r#"dave replied in a thread on "Add parser" https://example.com/pulls/1"#
        );
    }

    #[test]
    fn test_format_review_request() {
        let event = NotificationEvent::ReviewRequest(ReviewRequest {
            id: "RR1".into(),
            pr: "P1".into(),
            requester: "alice".into(),
            requestee: "bob".into(),
        });
        assert_snapshot!(
            PlainTextFormatter.format(&pr(), &event),
            @r#"alice requested your review on "Add parser" https://example.com/pulls/1"#
        );
    }

    #[test]
    fn test_format_review_statuses() {
        let formatted: Vec<String> = [
            ReviewStatus::Accept,
            ReviewStatus::RequestChanges,
            ReviewStatus::Comment,
        ]
        .into_iter()
        .map(|status| PlainTextFormatter.format(&pr(), &review(status)))
        .collect();

        assert_eq!(
            formatted,
            [
                "carol approved \"Add parser\" https://example.com/pulls/1",
                "carol requested changes on \"Add parser\" https://example.com/pulls/1",
                "carol commented on \"Add parser\" https://example.com/pulls/1",
            ]
        );
    }
}
