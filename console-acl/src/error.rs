// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

use crate::Subject;

/// Errors which can occur when preparing an ACL update.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AclError {
    #[error("subject must not be empty")]
    EmptySubject,

    #[error("subject {0} holds no explicit rights which could be revoked")]
    NothingToRevoke(Subject),

    #[error("new owner must not be empty")]
    EmptyOwner,
}
