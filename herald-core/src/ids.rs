//! Identifier newtypes.
//!
//! Every identifier the backend hands us is a plain string, but a user ID
//! and a comment ID must never be interchangeable. Each kind gets its own
//! nominal wrapper so mixing them up is a compile error.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id!(
    /// Opaque user identifier. Only ever compared or used as a map key.
    UserId
);
string_id!(
    /// Identifier of a pull request (the review item).
    PrId
);
string_id!(
    /// Identifier of a comment on a pull request.
    CommentId
);
string_id!(
    /// Identifier of a review request.
    ReviewRequestId
);
string_id!(
    /// Identifier of a submitted review.
    ReviewId
);
