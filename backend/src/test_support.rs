//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`). Only
//! compiled for tests or with the `test-support` feature.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use tokio::sync::Notify;

use crate::domain::ports::{
    CommentEmail, Mailer, MailerError, MediaStore, MediaStoreError, PasswordHashError,
    PasswordHasher, StoredImage, WelcomeEmail,
};
use crate::domain::{AppLinks, ImageDataUrl, PasswordHash, ServiceCollaborators};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryStore;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clock that only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Clock frozen at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Noon on 2024-05-01 UTC.
    pub fn fixed() -> Self {
        let noon = Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .unwrap_or_else(|| panic!("fixture timestamp is unambiguous"));
        Self::new(noon)
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: TimeDelta) {
        *lock(&self.0) += delta;
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *lock(&self.0)
    }
}

/// Reversible "hasher" for tests, avoiding bcrypt's deliberate slowness.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextHasher;

const PLAIN_PREFIX: &str = "plain:";

impl PasswordHasher for PlainTextHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        Ok(PasswordHash::new(format!("{PLAIN_PREFIX}{password}")))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
        let stored = hash
            .as_str()
            .strip_prefix(PLAIN_PREFIX)
            .ok_or_else(|| PasswordHashError::malformed_hash("missing plain: prefix"))?;
        Ok(stored == password)
    }
}

/// Email captured by [`RecordingMailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentEmail {
    /// Signup greeting.
    Welcome(WelcomeEmail),
    /// New-comment alert.
    Comment(CommentEmail),
}

/// Mailer that records messages and can be told to fail.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentEmail>>,
    arrived: Notify,
    failing: AtomicBool,
}

impl RecordingMailer {
    /// Make every subsequent delivery fail (after recording it).
    pub fn fail_deliveries(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Snapshot of everything delivered so far.
    pub fn sent(&self) -> Vec<SentEmail> {
        lock(&self.sent).clone()
    }

    /// Wait until at least `count` emails arrived or `within` elapsed.
    pub async fn wait_for(&self, count: usize, within: Duration) -> Vec<SentEmail> {
        let deadline = tokio::time::Instant::now() + within;
        loop {
            let sent = self.sent();
            if sent.len() >= count {
                return sent;
            }
            if tokio::time::timeout_at(deadline, self.arrived.notified())
                .await
                .is_err()
            {
                return self.sent();
            }
        }
    }

    fn record(&self, email: SentEmail) -> Result<(), MailerError> {
        lock(&self.sent).push(email);
        self.arrived.notify_one();
        if self.failing.load(Ordering::SeqCst) {
            return Err(MailerError::delivery("recording mailer told to fail"));
        }
        Ok(())
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_welcome(&self, email: &WelcomeEmail) -> Result<(), MailerError> {
        self.record(SentEmail::Welcome(email.clone()))
    }

    async fn send_comment_notification(&self, email: &CommentEmail) -> Result<(), MailerError> {
        self.record(SentEmail::Comment(email.clone()))
    }
}

/// In-memory media store handing out predictable URLs.
#[derive(Default)]
pub struct FakeMediaStore {
    uploads: AtomicUsize,
    deleted: Mutex<Vec<String>>,
    fail_uploads: AtomicBool,
    fail_deletes: AtomicBool,
}

impl FakeMediaStore {
    /// Prefix of every URL handed out.
    pub const BASE_URL: &'static str = "https://media.example.test/proflink_posts";

    /// Make later uploads fail.
    pub fn fail_uploads(&self) {
        self.fail_uploads.store(true, Ordering::SeqCst);
    }

    /// Make later deletes fail.
    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    /// Uploads attempted so far.
    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    /// URLs deleted so far, oldest first.
    pub fn deleted(&self) -> Vec<String> {
        lock(&self.deleted).clone()
    }
}

#[async_trait]
impl MediaStore for FakeMediaStore {
    async fn upload(&self, image: &ImageDataUrl) -> Result<StoredImage, MediaStoreError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(MediaStoreError::rejected("file too large"));
        }
        let index = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        let extension = image.media_type().trim_start_matches("image/");
        Ok(StoredImage {
            url: format!("{}/{index}.{extension}", Self::BASE_URL),
        })
    }

    async fn delete(&self, url: &str) -> Result<(), MediaStoreError> {
        lock(&self.deleted).push(url.to_owned());
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(MediaStoreError::unavailable("provider timed out"));
        }
        Ok(())
    }
}

/// Fully wired application state over the in-memory store.
pub struct TestWorld {
    /// Backing store shared by every repository.
    pub store: Arc<InMemoryStore>,
    /// Clock driving timestamps and session expiry.
    pub clock: Arc<MutableClock>,
    /// Captured outgoing email.
    pub mailer: Arc<RecordingMailer>,
    /// Fake image host.
    pub media: Arc<FakeMediaStore>,
    /// Handler state wired over the fakes.
    pub state: HttpState,
}

impl TestWorld {
    /// Fresh store with a fixed clock.
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::default());
        let clock = Arc::new(MutableClock::fixed());
        let mailer = Arc::new(RecordingMailer::default());
        let media = Arc::new(FakeMediaStore::default());
        let collaborators = ServiceCollaborators {
            hasher: Arc::new(PlainTextHasher),
            media: media.clone(),
            mailer: mailer.clone(),
            links: AppLinks::default(),
            clock: clock.clone(),
        };
        let ports = HttpStatePorts::from_stores(
            store.clone(),
            store.clone(),
            store.clone(),
            &collaborators,
        );
        Self {
            store,
            clock,
            mailer,
            media,
            state: HttpState::new(ports),
        }
    }
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}
