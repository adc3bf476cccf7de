// SPDX-License-Identifier: MIT OR Apache-2.0

//! Access-rights derivation for editing the ACL of a schema path.
//!
//! The backend reports two lists per path: the explicit ACL (rights attached directly to a
//! subject) and the effective ACL (rights after inheritance from parent paths). From these the
//! crate builds one [`AclEntry`] per subject, and from an entry plus a set of pending toggles it
//! derives which rights need to be granted or revoked to persist the edit.
//!
//! ```
//! use console_acl::{AclEntry, PendingChanges, resolve};
//!
//! let entry = AclEntry::new("alice@builtin")
//!     .with_explicit(["SelectRow", "UpdateRow"])
//!     .with_effective(["SelectRow", "UpdateRow", "DescribeSchema"]);
//!
//! let mut pending = PendingChanges::new();
//! pending.set("UpdateRow", false);
//! pending.set("CreateTable", true);
//!
//! let resolution = resolve(entry.explicit_rights(), &pending);
//! assert_eq!(resolution.rights_to_grant, vec!["CreateTable".to_string()]);
//! assert_eq!(resolution.rights_to_revoke, vec!["UpdateRow".to_string()]);
//! assert!(entry.inherited_rights().contains("DescribeSchema"));
//! ```
mod entry;
mod error;
pub mod permissions;
pub mod request;
mod resolver;
pub mod session;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use entry::{
    AccessType, AclEntry, AclRecord, AclResponse, Right, Rights, Subject, build_entries,
    explicit_rights_of, inherited_rights_of,
};
pub use error::AclError;
pub use resolver::{
    PendingChanges, Resolution, current_rights_map, inherited_rights, resolve, rights_to_grant,
    rights_to_revoke,
};
