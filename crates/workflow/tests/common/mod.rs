use std::sync::Arc;

use async_trait::async_trait;
use inkwell_core::error::CoreError;
use inkwell_core::identity::Identity;
use inkwell_core::roles::Role;
use inkwell_core::session::SessionGrant;
use inkwell_db::models::draft::Draft;
use inkwell_db::models::user::CreateUser;
use inkwell_db::{DraftStore, MemoryStore};
use inkwell_events::EventBus;
use inkwell_workflow::{AuthProvider, SessionTransport, VerifiedCredential, Workflow};

/// Accepts credentials of the form `user-<id>`.
pub struct TokenAuth;

#[async_trait]
impl AuthProvider for TokenAuth {
    async fn verify(&self, credential: &str) -> Result<VerifiedCredential, CoreError> {
        credential
            .strip_prefix("user-")
            .and_then(|id| id.parse().ok())
            .map(|user_id| VerifiedCredential {
                user_id,
                email: format!("user{user_id}@example.com"),
            })
            .ok_or_else(|| CoreError::Unauthenticated("Invalid credential".to_string()))
    }
}

/// Issues `session:<room>:<user>` tokens.
pub struct EchoTransport;

#[async_trait]
impl SessionTransport for EchoTransport {
    async fn issue(&self, grant: &SessionGrant) -> Result<String, CoreError> {
        Ok(format!("session:{}:{}", grant.room_id, grant.user_id))
    }
}

pub const SESSION_TTL_SECS: i64 = 600;

pub struct TestEnv {
    pub store: Arc<MemoryStore>,
    pub events: Arc<EventBus>,
    pub workflow: Workflow,
}

impl TestEnv {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let events = Arc::new(EventBus::default());
        let workflow = Workflow::new(
            store.clone(),
            Arc::clone(&events),
            Arc::new(TokenAuth),
            Arc::new(EchoTransport),
            SESSION_TTL_SECS,
        );
        Self {
            store,
            events,
            workflow,
        }
    }

    /// A registered account that has not completed onboarding.
    pub async fn unassigned(&self, email: &str) -> Identity {
        self.store
            .create_user(&CreateUser {
                email: email.to_string(),
                password_hash: "unused".to_string(),
            })
            .await
            .unwrap()
            .identity()
    }

    pub async fn user(&self, email: &str, name: &str, role: Role) -> Identity {
        let identity = self.unassigned(email).await;
        self.workflow
            .identity
            .update_profile(identity.user_id, name, role)
            .await
            .unwrap()
    }

    pub async fn author(&self, name: &str) -> Identity {
        let email = format!("{}@example.com", name.to_lowercase());
        self.user(&email, name, Role::Author).await
    }

    pub async fn reviewer(&self, name: &str) -> Identity {
        let email = format!("{}@example.com", name.to_lowercase());
        self.user(&email, name, Role::Reviewer).await
    }

    pub async fn draft(&self, owner: &Identity, title: &str) -> Draft {
        self.workflow
            .drafts
            .create_draft(owner, title)
            .await
            .unwrap()
    }
}
