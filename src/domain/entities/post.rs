//! Post entity.
//!
//! Posts come in three shapes: a normal post, a reply to a parent post, and
//! a repost of a parent post. Replies and reposts always carry their parent
//! as a full nested document; a normal post never does.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::User;

/// Post kind discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    #[default]
    Normal,
    Reply,
    Repost,
}

/// Direction of a like/dislike toggle, deciding which endpoint to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionChange {
    Added,
    Removed,
}

/// Represents a post as returned by the API.
///
/// The counts and the per-viewer `auth_user_*` flags are denormalized by
/// the server; the like/dislike toggles below keep them coherent locally
/// while an optimistic mutation is in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,

    #[serde(rename = "type", default)]
    pub post_type: PostType,

    pub text: String,

    /// Parent document for replies and reposts, owned by value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_post: Option<Box<Post>>,

    /// Author, embedded by most endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,

    #[serde(default)]
    pub replies_count: i64,

    #[serde(default)]
    pub reposts_count: i64,

    #[serde(default)]
    pub likes_count: i64,

    #[serde(default)]
    pub dislikes_count: i64,

    #[serde(default)]
    pub views_count: i64,

    /// Whether the authenticated viewer liked this post; absent when
    /// the request was unauthenticated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_user_liked: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_user_disliked: Option<bool>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn is_liked(&self) -> bool {
        self.auth_user_liked.unwrap_or(false)
    }

    pub fn is_disliked(&self) -> bool {
        self.auth_user_disliked.unwrap_or(false)
    }

    /// An edited post shows an "Edited" tag next to its timestamp.
    pub fn is_edited(&self) -> bool {
        self.created_at != self.updated_at
    }

    /// Invariant check: reply/repost carry a parent, normal posts do not.
    pub fn parent_is_consistent(&self) -> bool {
        match self.post_type {
            PostType::Normal => self.parent_post.is_none(),
            PostType::Reply | PostType::Repost => self.parent_post.is_some(),
        }
    }

    /// Toggle the viewer's like in one step.
    ///
    /// Liking a disliked post clears the dislike first, so no observer ever
    /// sees both flags set. Returns whether the like was added or removed.
    pub fn toggle_like(&mut self) -> InteractionChange {
        if self.is_liked() {
            self.likes_count -= 1;
            self.auth_user_liked = Some(false);
            InteractionChange::Removed
        } else {
            if self.is_disliked() {
                self.dislikes_count -= 1;
                self.auth_user_disliked = Some(false);
            }
            self.likes_count += 1;
            self.auth_user_liked = Some(true);
            InteractionChange::Added
        }
    }

    /// Toggle the viewer's dislike in one step; mirror of [`toggle_like`].
    ///
    /// [`toggle_like`]: Post::toggle_like
    pub fn toggle_dislike(&mut self) -> InteractionChange {
        if self.is_disliked() {
            self.dislikes_count -= 1;
            self.auth_user_disliked = Some(false);
            InteractionChange::Removed
        } else {
            if self.is_liked() {
                self.likes_count -= 1;
                self.auth_user_liked = Some(false);
            }
            self.dislikes_count += 1;
            self.auth_user_disliked = Some(true);
            InteractionChange::Added
        }
    }
}

impl Default for Post {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::nil(),
            post_type: PostType::Normal,
            text: String::new(),
            parent_post: None,
            user: None,
            replies_count: 0,
            reposts_count: 0,
            likes_count: 0,
            dislikes_count: 0,
            views_count: 0,
            auth_user_liked: None,
            auth_user_disliked: None,
            created_at: now,
            updated_at: now,
        }
    }
}
