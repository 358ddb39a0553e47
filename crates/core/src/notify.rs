use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::slides::Slide;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SlideChangeBody<'a> {
    slide_index: usize,
    slide_url: &'a str,
}

/// Receiver of slide-change events. Abstracted so tests can observe what
/// would have gone over the wire.
#[async_trait]
pub trait SlideChangeSink: Send + Sync {
    async fn notify(&self, slide_index: usize, slide_url: &str) -> Result<()>;
}

/// reqwest-backed sink posting to the remote collaborator. Any response
/// body is ignored.
pub struct HttpSlideChangeSink {
    client: Client,
    endpoint: String,
}

impl HttpSlideChangeSink {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl SlideChangeSink for HttpSlideChangeSink {
    async fn notify(&self, slide_index: usize, slide_url: &str) -> Result<()> {
        let body = SlideChangeBody {
            slide_index,
            slide_url,
        };
        self.client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Best-effort emitter of slide-change events. Delivery runs in its own
/// task so navigation never waits on the network, and failures are logged
/// only; the viewer stays fully usable if no notification ever arrives.
pub struct NotificationChannel {
    sink: Arc<dyn SlideChangeSink>,
}

impl NotificationChannel {
    pub fn new(sink: Arc<dyn SlideChangeSink>) -> Self {
        Self { sink }
    }

    /// Called once per observed transition of the current slide index,
    /// including the initial settle. Slides without a remote identifier
    /// are skipped with a local warning.
    pub fn slide_changed(&self, slide_index: usize, slide: &Slide) {
        let Some(slide_url) = slide.remote_url.clone() else {
            tracing::warn!(
                "slide {} has no remote identifier; skipping slide-change notification",
                slide.id
            );
            return;
        };
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            if let Err(e) = sink.notify(slide_index, &slide_url).await {
                tracing::warn!("slide-change notification failed: {e:?}");
            }
        });
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Captures notifications instead of sending them.
    pub(crate) struct RecordingSink {
        pub(crate) seen: Mutex<Vec<(usize, String)>>,
    }

    impl RecordingSink {
        pub(crate) fn new() -> Arc<Self> {
            Arc::new(Self {
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl SlideChangeSink for RecordingSink {
        async fn notify(&self, slide_index: usize, slide_url: &str) -> Result<()> {
            self.seen
                .lock()
                .unwrap()
                .push((slide_index, slide_url.to_string()));
            Ok(())
        }
    }

    /// Lets notification tasks spawned on the current-thread test runtime
    /// run to completion.
    pub(crate) async fn settle() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    fn slide(id: usize, remote_url: Option<&str>) -> Slide {
        Slide {
            id,
            image_url: format!("/images/slide_{id:03}.png"),
            remote_url: remote_url.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn delivers_index_and_remote_url() {
        let sink = RecordingSink::new();
        let channel = NotificationChannel::new(sink.clone());

        channel.slide_changed(1, &slide(2, Some("https://bucket/slide_001.png")));
        settle().await;

        let seen = sink.seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![(1, "https://bucket/slide_001.png".to_string())]
        );
    }

    #[tokio::test]
    async fn slide_without_remote_id_is_skipped() {
        let sink = RecordingSink::new();
        let channel = NotificationChannel::new(sink.clone());

        channel.slide_changed(0, &slide(1, None));
        settle().await;

        assert!(sink.seen.lock().unwrap().is_empty());
    }
}
