//! Inkwell workflow services.
//!
//! The five request-scoped components that sit between the HTTP layer and
//! storage. Each service is cheap to clone and holds only shared handles:
//!
//! - [`IdentityResolver`] -- credential → [`Identity`](inkwell_core::identity::Identity).
//! - [`AccessControl`] -- ownership, collaborator grants, effective access.
//! - [`DraftService`] -- drafts, version checkpoints, restore.
//! - [`SubmissionWorkflow`] -- submit, approve, reject, review queue.
//! - [`SessionAuthorizer`] -- room-scoped real-time session grants.
//!
//! Every service returns [`ServiceResult`]; domain failures arrive as
//! `StoreError::Core` with their [`CoreError`](inkwell_core::error::CoreError)
//! kind intact.

pub mod access;
pub mod drafts;
pub mod identity;
pub mod providers;
pub mod sessions;
pub mod submissions;

use std::sync::Arc;

use inkwell_db::{DraftStore, StoreError};
use inkwell_events::EventBus;

pub use access::AccessControl;
pub use drafts::DraftService;
pub use identity::IdentityResolver;
pub use providers::{AuthProvider, SessionTransport, VerifiedCredential};
pub use sessions::{SessionAuthorization, SessionAuthorizer};
pub use submissions::{SubmissionDetail, SubmissionReceipt, SubmissionWorkflow};

pub type ServiceResult<T> = Result<T, StoreError>;

/// All services wired to one store, one event bus and the external providers.
#[derive(Clone)]
pub struct Workflow {
    pub identity: IdentityResolver,
    pub access: AccessControl,
    pub drafts: DraftService,
    pub submissions: SubmissionWorkflow,
    pub sessions: SessionAuthorizer,
}

impl Workflow {
    pub fn new(
        store: Arc<dyn DraftStore>,
        events: Arc<EventBus>,
        auth: Arc<dyn AuthProvider>,
        transport: Arc<dyn SessionTransport>,
        session_ttl_secs: i64,
    ) -> Self {
        let identity = IdentityResolver::new(Arc::clone(&store), auth);
        let access = AccessControl::new(Arc::clone(&store), Arc::clone(&events));
        let drafts = DraftService::new(Arc::clone(&store), access.clone(), Arc::clone(&events));
        let submissions =
            SubmissionWorkflow::new(Arc::clone(&store), access.clone(), Arc::clone(&events));
        let sessions = SessionAuthorizer::new(
            identity.clone(),
            access.clone(),
            transport,
            session_ttl_secs,
        );
        Self {
            identity,
            access,
            drafts,
            submissions,
            sessions,
        }
    }
}
