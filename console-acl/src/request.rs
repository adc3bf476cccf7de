// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payloads for persisting access changes on a schema path.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{AccessType, AclError, Resolution, Right, Rights, Subject};

/// Rights to add to or remove from one subject.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "PascalCase"))]
pub struct AccessGrant {
    pub subject: Subject,
    pub access_rights: Vec<Right>,
    pub access_type: AccessType,
}

impl AccessGrant {
    fn allow(subject: &Subject, access_rights: Vec<Right>) -> Self {
        Self {
            subject: subject.clone(),
            access_rights,
            access_type: AccessType::Allow,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "PascalCase"))]
pub struct ChangeOwnership {
    pub subject: Subject,
}

/// Body of an ACL update request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "PascalCase"))]
pub struct AccessChange {
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub add_access: Vec<AccessGrant>,

    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub remove_access: Vec<AccessGrant>,

    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub change_ownership: Option<ChangeOwnership>,
}

impl AccessChange {
    /// Grant and revoke the resolved rights for every given subject.
    ///
    /// Empty subjects are skipped, as are empty grant or revoke lists.
    pub fn grant_and_revoke<'a, I>(subjects: I, resolution: &Resolution) -> Self
    where
        I: IntoIterator<Item = &'a Subject>,
    {
        let mut change = Self::default();

        for subject in subjects.into_iter().filter(|subject| !subject.is_empty()) {
            if !resolution.rights_to_grant.is_empty() {
                change.add_access.push(AccessGrant::allow(
                    subject,
                    resolution.rights_to_grant.clone(),
                ));
            }

            if !resolution.rights_to_revoke.is_empty() {
                change.remove_access.push(AccessGrant::allow(
                    subject,
                    resolution.rights_to_revoke.clone(),
                ));
            }
        }

        change
    }

    /// Remove every explicit right of a subject.
    pub fn revoke_all(subject: &Subject, explicit_rights: &Rights) -> Result<Self, AclError> {
        if subject.is_empty() {
            return Err(AclError::EmptySubject);
        }

        if explicit_rights.is_empty() {
            return Err(AclError::NothingToRevoke(subject.clone()));
        }

        Ok(Self {
            remove_access: vec![AccessGrant::allow(
                subject,
                explicit_rights.iter().cloned().collect(),
            )],
            ..Default::default()
        })
    }

    /// Transfer ownership of the path to another subject.
    pub fn change_owner(subject: impl Into<Subject>) -> Result<Self, AclError> {
        let subject = subject.into();
        if subject.trim().is_empty() {
            return Err(AclError::EmptyOwner);
        }

        Ok(Self {
            change_ownership: Some(ChangeOwnership { subject }),
            ..Default::default()
        })
    }

    /// Returns `true` if submitting this change would be a no-op.
    pub fn is_empty(&self) -> bool {
        self.add_access.is_empty()
            && self.remove_access.is_empty()
            && self.change_ownership.is_none()
    }
}

/// ACL update addressed to a schema path of a database.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct UpdateAccessRequest {
    pub path: String,
    pub database: String,
    pub rights: AccessChange,
}

impl UpdateAccessRequest {
    pub fn new(path: impl Into<String>, database: impl Into<String>, rights: AccessChange) -> Self {
        Self {
            path: path.into(),
            database: database.into(),
            rights,
        }
    }
}
