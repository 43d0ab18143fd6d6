//! Application state shared between the engine and the view layer.
//!
//! The source design kept a hidden global reactive store; here it is an
//! explicit object with a single-writer-per-field discipline: the blueprint
//! generator owns `company` and `generating`, the scroll observer owns
//! `scroll`, views only read. Writers publish whole snapshots through a
//! watch channel, so readers never observe a partially-updated record.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::blueprint::CompanyData;

/// Scroll-ordered page sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSection {
    #[default]
    Hero,
    Blueprint,
    Sandbox,
    Capabilities,
    Contact,
}

impl PageSection {
    pub const ORDERED: [PageSection; 5] = [
        PageSection::Hero,
        PageSection::Blueprint,
        PageSection::Sandbox,
        PageSection::Capabilities,
        PageSection::Contact,
    ];

    /// Section shown at a scroll progress in `0.0..=1.0`.
    pub fn at_progress(progress: f32) -> PageSection {
        let clamped = progress.clamp(0.0, 1.0);
        let idx = ((clamped * Self::ORDERED.len() as f32) as usize).min(Self::ORDERED.len() - 1);
        Self::ORDERED[idx]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScrollPosition {
    pub progress: f32,
    pub section: PageSection,
}

/// One coherent view of the store.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreSnapshot {
    pub company: Option<CompanyData>,
    pub generating: bool,
    pub scroll: ScrollPosition,
}

/// The store itself. Hand out readers freely; hand out the writer pair
/// once.
pub struct AppStore {
    tx: Arc<watch::Sender<StoreSnapshot>>,
}

impl AppStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(StoreSnapshot::default());
        Self { tx: Arc::new(tx) }
    }

    /// A live view for readers; `changed().await` wakes on every write.
    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.tx.borrow().clone()
    }

    /// The two writer handles. Call once and give each to its owning
    /// component; a second call would break the single-writer discipline.
    pub fn writers(&self) -> (BlueprintWriter, ScrollWriter) {
        (
            BlueprintWriter {
                tx: Arc::clone(&self.tx),
            },
            ScrollWriter {
                tx: Arc::clone(&self.tx),
            },
        )
    }
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Writer for `company` and `generating`; held by the blueprint generator.
pub struct BlueprintWriter {
    tx: Arc<watch::Sender<StoreSnapshot>>,
}

impl BlueprintWriter {
    pub fn set_generating(&self, generating: bool) {
        self.tx.send_modify(|s| s.generating = generating);
    }

    /// Replace the company record wholesale.
    pub fn set_company(&self, company: CompanyData) {
        self.tx.send_modify(|s| s.company = Some(company));
    }

    pub fn clear_company(&self) {
        self.tx.send_modify(|s| s.company = None);
    }
}

/// Writer for the scroll position; held by the scroll-tracking observer.
pub struct ScrollWriter {
    tx: Arc<watch::Sender<StoreSnapshot>>,
}

impl ScrollWriter {
    pub fn set_progress(&self, progress: f32) {
        let clamped = progress.clamp(0.0, 1.0);
        self.tx.send_modify(|s| {
            s.scroll.progress = clamped;
            s.scroll.section = PageSection::at_progress(clamped);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::placeholder_blueprint;

    #[test]
    fn sections_cover_the_scroll_range() {
        assert_eq!(PageSection::at_progress(0.0), PageSection::Hero);
        assert_eq!(PageSection::at_progress(0.25), PageSection::Blueprint);
        assert_eq!(PageSection::at_progress(0.5), PageSection::Sandbox);
        assert_eq!(PageSection::at_progress(0.99), PageSection::Contact);
        assert_eq!(PageSection::at_progress(1.0), PageSection::Contact);
        // out-of-range input is clamped, not wrapped
        assert_eq!(PageSection::at_progress(-3.0), PageSection::Hero);
        assert_eq!(PageSection::at_progress(7.0), PageSection::Contact);
    }

    #[tokio::test]
    async fn writers_publish_snapshots() {
        let store = AppStore::new();
        let mut rx = store.subscribe();
        let (blueprint, scroll) = store.writers();

        blueprint.set_generating(true);
        rx.changed().await.unwrap();
        assert!(rx.borrow().generating);

        blueprint.set_company(placeholder_blueprint("Acme"));
        blueprint.set_generating(false);
        scroll.set_progress(0.5);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.company.as_ref().unwrap().company, "Acme");
        assert!(!snapshot.generating);
        assert_eq!(snapshot.scroll.section, PageSection::Sandbox);
        assert!((snapshot.scroll.progress - 0.5).abs() < f32::EPSILON);
    }
}
