use std::fmt;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{ApiError, ConfigError};
use crate::graph::{FeedClient, PostId, PostRequest};
use crate::images::{scan_images, ImageSet};

/// Result of posting to one group.
#[derive(Debug)]
pub struct GroupOutcome {
    pub group_id: String,
    pub result: Result<PostId, ApiError>,
}

impl fmt::Display for GroupOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(id) => write!(
                f,
                "Successfully posted to group {}. Post ID: {id}",
                self.group_id
            ),
            Err(e) => write!(f, "Failed to post to group {}. Error: {e}", self.group_id),
        }
    }
}

/// Everything a batch run did, in the order groups were given.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<GroupOutcome>,
    pub images: ImageSet,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Publishes messages to groups through a [`FeedClient`].
pub struct Poster<C> {
    client: C,
}

impl<C: FeedClient> Poster<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// One feed post on one group: exactly one call to the client.
    pub async fn post_to_group(
        &self,
        group_id: &str,
        message: &str,
        link: Option<&str>,
        image_url: Option<&str>,
    ) -> Result<PostId, ApiError> {
        let request = PostRequest::new(group_id, message)
            .with_link(link)
            .with_image_url(image_url);

        match self.client.create_feed_post(&request).await {
            Ok(id) => {
                info!(msg = "posted", group = group_id, post = %id);
                Ok(id)
            }
            Err(e) => {
                warn!(msg = "post failed", group = group_id, error = %e);
                Err(e)
            }
        }
    }

    /// Posts the same message to every group, one after the other.
    ///
    /// A failing group does not stop the others; groups already posted stay
    /// posted. Images are looked up once in `folder` and only the first one
    /// is attached.
    pub async fn post_to_multiple_groups(
        &self,
        group_ids: &[String],
        message: &str,
        link: Option<&str>,
        folder: Option<&Path>,
    ) -> Result<BatchReport, ConfigError> {
        if group_ids.is_empty() {
            return Err(ConfigError::NoGroups);
        }
        if message.is_empty() {
            return Err(ConfigError::EmptyMessage);
        }

        let images = folder.map(scan_images).unwrap_or_default();
        let picture = images.primary().map(|p| p.to_string_lossy().into_owned());

        let mut outcomes = Vec::with_capacity(group_ids.len());
        for group_id in group_ids {
            let result = self
                .post_to_group(group_id, message, link, picture.as_deref())
                .await;
            outcomes.push(GroupOutcome {
                group_id: group_id.clone(),
                result,
            });
        }

        let report = BatchReport { outcomes, images };
        info!(
            msg = "batch done",
            succeeded = report.succeeded(),
            failed = report.failed()
        );
        Ok(report)
    }
}
