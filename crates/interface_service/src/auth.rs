//! Caller identity and group authorization
//!
//! There is no ambient session. Every service call names its caller
//! explicitly and is checked against the group's active membership before
//! any ledger data is read.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use core_kernel::{GroupId, MemberId, OperationMetadata};
use domain_ledger::LedgerPort;

use crate::error::ServiceError;

/// The authenticated member making a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerId(MemberId);

impl CallerId {
    pub fn new(member_id: MemberId) -> Self {
        Self(member_id)
    }

    pub fn member_id(&self) -> MemberId {
        self.0
    }

    /// Request metadata attributed to this caller
    pub fn metadata(&self) -> OperationMetadata {
        OperationMetadata::default().initiated_by(self.0)
    }
}

impl From<MemberId> for CallerId {
    fn from(member_id: MemberId) -> Self {
        Self(member_id)
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Ensures `caller` is an active member of `group_id`
///
/// Unknown groups are reported as forbidden rather than not found so the
/// response does not reveal whether a group exists.
pub async fn require_member(
    ledger: &dyn LedgerPort,
    caller: CallerId,
    group_id: GroupId,
) -> Result<(), ServiceError> {
    let active = ledger
        .is_active_member(group_id, caller.member_id(), Some(caller.metadata()))
        .await?;

    if !active {
        debug!(%caller, %group_id, "caller rejected");
        return Err(ServiceError::Forbidden {
            caller: caller.to_string(),
            group: group_id.to_string(),
        });
    }
    Ok(())
}
