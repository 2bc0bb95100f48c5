//! Test Support
//!
//! In-memory implementations of every collaborator contract, plus a
//! harness that wires them into an `AppState`. Unit tests exercise the
//! workflow against these directly; the end-to-end tests in `tests/` build
//! a full router from the same harness.
//!
//! Nothing in here touches the network or a database, so the whole test
//! suite runs without external services.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::accounts::{Account, AccountStore};
use crate::auth::sessions::SessionKeys;
use crate::auth::tokens::{ActionToken, TokenStore};
use crate::auth::workflow::AccountWorkflow;
use crate::error::StoreError;
use crate::media::{MediaAsset, MediaError, MediaStore};
use crate::notify::{LinkBuilder, Notifier, NotifyError};
use crate::posts::model::Post;
use crate::posts::store::PostStore;
use crate::server::state::AppState;

/// Bcrypt cost for seeded test accounts; the minimum the library accepts,
/// so seeding stays fast.
const TEST_BCRYPT_COST: u32 = 4;

/// In-memory account store
#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: Mutex<HashMap<Uuid, Account>>,
}

impl MemoryAccountStore {
    /// Read an account directly, bypassing the trait
    pub fn get(&self, id: Uuid) -> Option<Account> {
        self.accounts.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn insert(&self, account: &Account) -> Result<(), StoreError> {
        self.accounts
            .lock()
            .unwrap()
            .insert(account.id, account.clone());
        Ok(())
    }

    async fn save(&self, account: &Account) -> Result<(), StoreError> {
        self.accounts
            .lock()
            .unwrap()
            .insert(account.id, account.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        let mut accounts: Vec<Account> =
            self.accounts.lock().unwrap().values().cloned().collect();
        accounts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(accounts)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.accounts.lock().unwrap().len() as i64)
    }
}

/// In-memory token store
#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<Vec<ActionToken>>,
}

impl MemoryTokenStore {
    /// All currently live (unconsumed) tokens
    pub fn live(&self) -> Vec<ActionToken> {
        self.tokens.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn find_by_owner(&self, account_id: Uuid) -> Result<Option<ActionToken>, StoreError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.account_id == account_id)
            .cloned())
    }

    async fn find_by_owner_and_value(
        &self,
        account_id: Uuid,
        value: &str,
    ) -> Result<Option<ActionToken>, StoreError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.account_id == account_id && t.value == value)
            .cloned())
    }

    async fn insert(&self, token: &ActionToken) -> Result<(), StoreError> {
        self.tokens.lock().unwrap().push(token.clone());
        Ok(())
    }

    async fn delete(&self, token: &ActionToken) -> Result<(), StoreError> {
        // Idempotent: deleting an absent token removes nothing.
        self.tokens.lock().unwrap().retain(|t| t.id != token.id);
        Ok(())
    }
}

/// A message captured by the recording notifier
#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Notifier that records messages instead of sending them
///
/// Can be switched into a failing mode to test failure propagation.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentMail>>,
    failing: AtomicBool,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotifyError::Delivery("smtp relay refused".to_string()));
        }
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

/// In-memory post store
#[derive(Default)]
pub struct MemoryPostStore {
    posts: Mutex<HashMap<Uuid, Post>>,
}

impl MemoryPostStore {
    pub fn get(&self, id: Uuid) -> Option<Post> {
        self.posts.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        Ok(self.posts.lock().unwrap().get(&id).cloned())
    }

    async fn insert(&self, post: &Post) -> Result<(), StoreError> {
        self.posts.lock().unwrap().insert(post.id, post.clone());
        Ok(())
    }

    async fn save(&self, post: &Post) -> Result<(), StoreError> {
        self.posts.lock().unwrap().insert(post.id, post.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.posts.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn list(
        &self,
        category: Option<&str>,
        page: Option<u32>,
        per_page: u32,
    ) -> Result<Vec<Post>, StoreError> {
        let mut posts: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .values()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        if let Some(page) = page {
            // Widen before multiplying; a huge page number must yield an
            // empty page, not an overflow.
            let start = (page.max(1) as u64 - 1) * per_page as u64;
            posts = posts
                .into_iter()
                .skip(usize::try_from(start).unwrap_or(usize::MAX))
                .take(per_page as usize)
                .collect();
        }
        Ok(posts)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.posts.lock().unwrap().len() as i64)
    }
}

/// Media store that fabricates assets locally
#[derive(Default)]
pub struct MemoryMediaStore {
    uploaded: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
}

impl MemoryMediaStore {
    pub fn uploaded(&self) -> Vec<String> {
        self.uploaded.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaStore for MemoryMediaStore {
    async fn upload(&self, _bytes: Vec<u8>, content_type: &str) -> Result<MediaAsset, MediaError> {
        let public_id = Uuid::new_v4().to_string();
        self.uploaded.lock().unwrap().push(public_id.clone());
        Ok(MediaAsset {
            url: format!("https://media.test/{public_id}"),
            public_id,
            content_type: content_type.to_string(),
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), MediaError> {
        self.deleted.lock().unwrap().push(public_id.to_string());
        Ok(())
    }
}

/// A fully wired backend over in-memory collaborators
pub struct TestHarness {
    pub accounts: Arc<MemoryAccountStore>,
    pub tokens: Arc<MemoryTokenStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub posts: Arc<MemoryPostStore>,
    pub media: Arc<MemoryMediaStore>,
    pub sessions: SessionKeys,
    state: AppState,
}

impl TestHarness {
    pub fn new() -> Self {
        let accounts = Arc::new(MemoryAccountStore::default());
        let tokens = Arc::new(MemoryTokenStore::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let posts = Arc::new(MemoryPostStore::default());
        let media = Arc::new(MemoryMediaStore::default());
        let sessions = SessionKeys::new("test-secret");
        let links = LinkBuilder::new("https://app.test");

        let workflow = Arc::new(AccountWorkflow::new(
            accounts.clone(),
            tokens.clone(),
            notifier.clone(),
            links,
            sessions.clone(),
        ));

        let state = AppState {
            workflow,
            accounts: accounts.clone(),
            posts: posts.clone(),
            media: media.clone(),
            sessions: sessions.clone(),
        };

        Self {
            accounts,
            tokens,
            notifier,
            posts,
            media,
            sessions,
            state,
        }
    }

    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    pub fn workflow(&self) -> Arc<AccountWorkflow> {
        self.state.workflow.clone()
    }

    /// A session credential for an account, as a handler would issue it
    pub fn session_for(&self, account: &Account) -> String {
        self.sessions.issue(account).expect("failed to issue test session")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Insert an account with a bcrypt-hashed password
pub async fn seed_account(
    harness: &TestHarness,
    username: &str,
    email: &str,
    password: &str,
    verified: bool,
) -> Account {
    let hash = bcrypt::hash(password, TEST_BCRYPT_COST).expect("bcrypt failed");
    let mut account = Account::new(username.to_string(), email.to_string(), hash);
    account.verified = verified;
    harness.accounts.insert(&account).await.unwrap();
    account
}

/// Insert a verified admin account
pub async fn seed_admin(
    harness: &TestHarness,
    username: &str,
    email: &str,
    password: &str,
) -> Account {
    let hash = bcrypt::hash(password, TEST_BCRYPT_COST).expect("bcrypt failed");
    let mut account = Account::new(username.to_string(), email.to_string(), hash);
    account.verified = true;
    account.is_admin = true;
    harness.accounts.insert(&account).await.unwrap();
    account
}

/// Insert a post owned by the given account
pub async fn seed_post(harness: &TestHarness, author: &Account, title: &str) -> Post {
    let post = Post::new(
        author.id,
        title.to_string(),
        "A description with enough length".to_string(),
        "general".to_string(),
        None,
    );
    harness.posts.insert(&post).await.unwrap();
    post
}
