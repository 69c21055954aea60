//! Posts Service
//!
//! CRUD and social actions on posts. Pages own the post values they
//! render; the service mutates them optimistically for like/dislike and
//! bumps a shared refresh cell when the feed contents change shape
//! (create, repost, delete), so feed views know to reload.

use std::sync::Arc;

use reqwest::Method;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{AuthToken, InteractionChange, Post};
use crate::infrastructure::api::ApiClient;
use crate::shared::error::ClientError;
use crate::shared::signal::Signal;

pub struct PostsService {
    api: Arc<ApiClient>,
    token: Signal<Option<AuthToken>>,
    refresh: Signal<u64>,
}

impl PostsService {
    pub fn new(api: Arc<ApiClient>, token: Signal<Option<AuthToken>>) -> Self {
        Self {
            api,
            token,
            refresh: Signal::new(0),
        }
    }

    /// Bumped whenever the feed should reload; feed views subscribe.
    pub fn refresh(&self) -> Signal<u64> {
        self.refresh.clone()
    }

    /// Ask feed views to reload.
    pub fn request_refresh(&self) {
        self.refresh.update(|generation| *generation += 1);
    }

    /// One page of the public timeline, newest first.
    pub async fn index(&self, page: u32) -> Result<Vec<Post>, ClientError> {
        self.api
            .get_query("/posts", &[("page", &page.to_string())], self.bearer().as_ref())
            .await
    }

    /// A single post; `Ok(None)` when it does not exist.
    pub async fn get(&self, post_id: &str) -> Result<Option<Post>, ClientError> {
        let response = self
            .api
            .get::<Post>(&format!("/posts/{}", post_id), self.bearer().as_ref())
            .await;
        match response {
            Ok(post) => Ok(Some(post)),
            Err(ClientError::NotFound) => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// One page of a post's replies.
    pub async fn replies(&self, post_id: Uuid, page: u32) -> Result<Vec<Post>, ClientError> {
        self.api
            .get_query(
                &format!("/posts/{}/replies", post_id),
                &[("page", &page.to_string())],
                self.bearer().as_ref(),
            )
            .await
    }

    /// Publish a new post.
    pub async fn create(&self, text: &str) -> Result<Post, ClientError> {
        let post = self
            .api
            .form::<Post>(Method::POST, "/posts", &[("text", text)], self.bearer().as_ref())
            .await?;
        self.request_refresh();
        Ok(post)
    }

    /// Edit a post's text.
    pub async fn update(&self, post_id: Uuid, text: &str) -> Result<Post, ClientError> {
        self.api
            .form(
                Method::PUT,
                &format!("/posts/{}", post_id),
                &[("text", text)],
                self.bearer().as_ref(),
            )
            .await
    }

    /// Delete a post.
    pub async fn delete(&self, post_id: Uuid) -> Result<(), ClientError> {
        self.api
            .send(
                Method::DELETE,
                &format!("/posts/{}", post_id),
                self.bearer().as_ref(),
            )
            .await?;
        self.request_refresh();
        Ok(())
    }

    /// Reply to a post.
    pub async fn reply(&self, post_id: Uuid, text: &str) -> Result<Post, ClientError> {
        self.api
            .form(
                Method::POST,
                &format!("/posts/{}/reply", post_id),
                &[("text", text)],
                self.bearer().as_ref(),
            )
            .await
    }

    /// Repost a post to the authenticated user's own feed.
    pub async fn repost(&self, post_id: Uuid) -> Result<Post, ClientError> {
        let post = self
            .api
            .form::<Post>(
                Method::POST,
                &format!("/posts/{}/repost", post_id),
                &[],
                self.bearer().as_ref(),
            )
            .await?;
        self.request_refresh();
        Ok(post)
    }

    /// Toggle the viewer's like on a post, optimistically.
    ///
    /// The transition (including clearing an existing dislike) is applied
    /// to the value before the request goes out, so the UI reflects the
    /// action immediately; a failed request restores the previous value
    /// and surfaces the error.
    pub async fn toggle_like(&self, post: &mut Post) -> Result<(), ClientError> {
        let previous = post.clone();
        let change = post.toggle_like();
        let result = self.interaction(post.id, "like", change).await;
        if let Err(error) = result {
            debug!(post_id = %post.id, "Rolling back like");
            *post = previous;
            return Err(error);
        }
        Ok(())
    }

    /// Toggle the viewer's dislike on a post, optimistically.
    pub async fn toggle_dislike(&self, post: &mut Post) -> Result<(), ClientError> {
        let previous = post.clone();
        let change = post.toggle_dislike();
        let result = self.interaction(post.id, "dislike", change).await;
        if let Err(error) = result {
            debug!(post_id = %post.id, "Rolling back dislike");
            *post = previous;
            return Err(error);
        }
        Ok(())
    }

    async fn interaction(
        &self,
        post_id: Uuid,
        kind: &str,
        change: InteractionChange,
    ) -> Result<(), ClientError> {
        let method = match change {
            InteractionChange::Added => Method::PUT,
            InteractionChange::Removed => Method::DELETE,
        };
        self.api
            .send(
                method,
                &format!("/posts/{}/{}", post_id, kind),
                self.bearer().as_ref(),
            )
            .await
    }

    fn bearer(&self) -> Option<AuthToken> {
        self.token.get()
    }
}
