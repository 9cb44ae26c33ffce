use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one issued request; compare against the sequencer to learn
/// whether a newer request has been issued since.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTag(u64);

/// Latest-request-wins bookkeeping for fetches that cannot be cancelled.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> RequestTag {
        RequestTag(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_latest(&self, tag: RequestTag) -> bool {
        self.latest.load(Ordering::Acquire) == tag.0
    }

    /// Supersede every outstanding request without issuing a new one.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_tag_supersedes_older() {
        let seq = RequestSequencer::new();
        let first = seq.issue();
        let second = seq.issue();
        assert!(second > first);
        assert!(!seq.is_latest(first));
        assert!(seq.is_latest(second));
    }

    #[test]
    fn invalidate_supersedes_everything() {
        let seq = RequestSequencer::new();
        let tag = seq.issue();
        seq.invalidate();
        assert!(!seq.is_latest(tag));
    }
}
