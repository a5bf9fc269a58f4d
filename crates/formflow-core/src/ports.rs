//! External collaborators of the drivers
//!
//! The drivers own no storage, routing or transport. Everything observable
//! goes through these traits; [`crate::memory`] has in-process versions.

use async_trait::async_trait;
use formflow_records::{RecordSnapshot, VerifiableRecord};
use formflow_review::{SubmissionError, SubmissionPayload, SubmissionReceipt};
use std::sync::Arc;

/// Holder of the verifiable records
pub trait RecordStore: Send + Sync {
    /// Current records and watermark
    fn unverified_records(&self) -> RecordSnapshot;

    /// Replace the record array wholesale
    fn update_dispositions(&self, records: Vec<VerifiableRecord>);
}

/// Router
pub trait Navigator: Send + Sync {
    /// Go to a route
    fn navigate(&self, route: &str);

    /// Bring the page heading into view
    fn scroll_to_top(&self) {}
}

/// Verification submission service
#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    async fn submit(
        &self,
        payload: SubmissionPayload,
    ) -> Result<SubmissionReceipt, SubmissionError>;
}

impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    fn unverified_records(&self) -> RecordSnapshot {
        (**self).unverified_records()
    }

    fn update_dispositions(&self, records: Vec<VerifiableRecord>) {
        (**self).update_dispositions(records);
    }
}

impl<T: Navigator + ?Sized> Navigator for Arc<T> {
    fn navigate(&self, route: &str) {
        (**self).navigate(route);
    }

    fn scroll_to_top(&self) {
        (**self).scroll_to_top();
    }
}

#[async_trait]
impl<T: SubmissionGateway + ?Sized> SubmissionGateway for Arc<T> {
    async fn submit(
        &self,
        payload: SubmissionPayload,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        (**self).submit(payload).await
    }
}
