use std::future::Future;
use std::pin::Pin;

use careform_core::models::batch::{BatchErrorEnvelope, BatchRequest, BatchResponse};

use crate::error::ApiError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A structured reply from the batch endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchReply {
    Accepted(BatchResponse),
    /// Per-sub-request results, index-aligned with the request array.
    Rejected(BatchErrorEnvelope),
}

/// Sends a whole batch as one call.
///
/// `Err` means no structured reply was available (network failure,
/// unparseable body); nothing can be attributed to individual forms.
pub trait BatchTransport: Send + Sync {
    fn send_batch<'a>(
        &'a self,
        batch: &'a BatchRequest,
    ) -> BoxFuture<'a, Result<BatchReply, ApiError>>;
}
