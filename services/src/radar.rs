//! Radar metadata client and the periodic poller that keeps a
//! [`RadarFeed`] fresh.

use std::{future::Future, sync::Arc, time::Duration};

use shared::{
    RadarError, RadarFeed, RadarFrame,
    directions::error_message,
    radar::parse_frames,
};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

pub trait RadarSource: Send + Sync + 'static {
    fn fetch_frames(&self) -> impl Future<Output = Result<Vec<RadarFrame>, RadarError>> + Send;
}

#[derive(Clone)]
pub struct RadarClient {
    http: reqwest::Client,
    metadata_url: String,
}

impl RadarClient {
    pub fn new(metadata_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            http,
            metadata_url: metadata_url.into(),
        }
    }
}

impl RadarSource for RadarClient {
    async fn fetch_frames(&self) -> Result<Vec<RadarFrame>, RadarError> {
        let response = self
            .http
            .get(&self.metadata_url)
            .send()
            .await
            .map_err(|e| RadarError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RadarError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(RadarError::Rejected {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        parse_frames(&body)
    }
}

/// Running poller. Dropping it (or calling [`stop`](Self::stop)) ends the
/// timer task.
pub struct RadarPoller {
    task: JoinHandle<()>,
    feed: watch::Receiver<RadarFeed>,
}

impl RadarPoller {
    /// Fetch immediately, then every `every`. Fetches run one after another
    /// inside the task, so an older response can never overwrite a newer one.
    pub fn spawn<S: RadarSource>(source: S, every: Duration) -> Self {
        let source = Arc::new(source);
        let (tx, rx) = watch::channel(RadarFeed::default());

        let task = tokio::spawn(async move {
            let mut ticker = time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let result = source.fetch_frames().await;
                match &result {
                    Ok(frames) => tracing::debug!(frames = frames.len(), "radar metadata refreshed"),
                    Err(err) => tracing::warn!("radar refresh failed: {err}"),
                }
                let feed = RadarFeed::from_result(result);
                if tx.send(feed).is_err() {
                    tracing::debug!("no radar subscribers left, stopping poller");
                    break;
                }
            }
        });

        Self { task, feed: rx }
    }

    pub fn feed(&self) -> RadarFeed {
        self.feed.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RadarFeed> {
        self.feed.clone()
    }

    /// Abort the timer task and wait until it is gone.
    pub async fn stop(mut self) {
        self.task.abort();
        let _ = (&mut self.task).await;
    }
}

impl Drop for RadarPoller {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct CountingSource {
        calls: Arc<AtomicUsize>,
    }

    impl RadarSource for CountingSource {
        async fn fetch_frames(&self) -> Result<Vec<RadarFrame>, RadarError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) as i64;
            Ok(vec![RadarFrame { timestamp: 1_000 + n }])
        }
    }

    struct EmptySource;

    impl RadarSource for EmptySource {
        async fn fetch_frames(&self) -> Result<Vec<RadarFrame>, RadarError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn first_fetch_happens_immediately() {
        let calls = Arc::new(AtomicUsize::new(0));
        let poller = RadarPoller::spawn(
            CountingSource {
                calls: calls.clone(),
            },
            Duration::from_secs(600),
        );
        let mut rx = poller.subscribe();
        time::timeout(Duration::from_secs(2), rx.changed())
            .await
            .expect("initial fetch")
            .unwrap();
        assert_eq!(poller.feed().current_timestamp(), Some(1_000));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn keeps_polling_on_interval() {
        let calls = Arc::new(AtomicUsize::new(0));
        let poller = RadarPoller::spawn(
            CountingSource {
                calls: calls.clone(),
            },
            Duration::from_millis(10),
        );
        time::sleep(Duration::from_millis(100)).await;
        assert!(calls.load(Ordering::SeqCst) >= 3);
        assert!(poller.feed().is_available());
    }

    #[tokio::test]
    async fn stop_leaves_no_running_timer() {
        let calls = Arc::new(AtomicUsize::new(0));
        let poller = RadarPoller::spawn(
            CountingSource {
                calls: calls.clone(),
            },
            Duration::from_millis(10),
        );
        time::sleep(Duration::from_millis(30)).await;
        poller.stop().await;

        let after_stop = calls.load(Ordering::SeqCst);
        time::sleep(Duration::from_millis(60)).await;
        assert_eq!(calls.load(Ordering::SeqCst), after_stop);
    }

    #[tokio::test]
    async fn drop_aborts_the_task() {
        let calls = Arc::new(AtomicUsize::new(0));
        let poller = RadarPoller::spawn(
            CountingSource {
                calls: calls.clone(),
            },
            Duration::from_millis(10),
        );
        time::sleep(Duration::from_millis(30)).await;
        drop(poller);
        // Let the abort land before sampling.
        time::sleep(Duration::from_millis(20)).await;

        let after_drop = calls.load(Ordering::SeqCst);
        time::sleep(Duration::from_millis(60)).await;
        assert_eq!(calls.load(Ordering::SeqCst), after_drop);
    }

    #[tokio::test]
    async fn empty_feed_surfaces_warning_state() {
        let poller = RadarPoller::spawn(EmptySource, Duration::from_secs(600));
        let mut rx = poller.subscribe();
        time::timeout(Duration::from_secs(2), rx.changed())
            .await
            .expect("initial fetch")
            .unwrap();
        let feed = poller.feed();
        assert_eq!(feed.current_timestamp(), None);
        assert!(!feed.is_available());
        assert_eq!(feed.last_error(), Some(&RadarError::NoFrames));
    }
}
