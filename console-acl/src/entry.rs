// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::{BTreeSet, HashMap};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Name of a single access right, for example "SelectRow" or "ydb.generic.read".
///
/// Rights are treated as opaque identifiers, no meaning is attached to their names.
pub type Right = String;

/// User or group identifier an ACL record is scoped to.
pub type Subject = String;

/// Set of rights, ordered by name.
pub type Rights = BTreeSet<Right>;

/// Whether an ACL record allows or denies its rights.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum AccessType {
    #[default]
    Allow,
    Deny,
}

/// Single record of an ACL list as reported by the backend.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "PascalCase"))]
pub struct AclRecord {
    pub subject: Subject,

    #[cfg_attr(feature = "serde", serde(default))]
    pub access_rights: Vec<Right>,

    /// Named groups of rights ("access rules") held by the subject.
    #[cfg_attr(feature = "serde", serde(default))]
    pub access_rules: Vec<Right>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub access_type: AccessType,

    #[cfg_attr(feature = "serde", serde(default))]
    pub inheritance_type: Vec<String>,
}

impl AclRecord {
    /// Allowing record for a subject with the given rights.
    pub fn allow<I, R>(subject: impl Into<Subject>, rights: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Right>,
    {
        Self {
            subject: subject.into(),
            access_rights: rights.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Denying record for a subject with the given rights.
    pub fn deny<I, R>(subject: impl Into<Subject>, rights: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Right>,
    {
        Self {
            access_type: AccessType::Deny,
            ..Self::allow(subject, rights)
        }
    }

    /// Attach named access rules to this record.
    pub fn with_rules<I, R>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Right>,
    {
        self.access_rules = rules.into_iter().map(Into::into).collect();
        self
    }

    fn granted(&self) -> impl Iterator<Item = &Right> {
        self.access_rights.iter().chain(self.access_rules.iter())
    }
}

/// ACL of a schema path, containing both the explicit and the inheritance-resolved list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "PascalCase"))]
pub struct AclResponse {
    #[cfg_attr(feature = "serde", serde(default))]
    pub owner: Option<Subject>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub acl: Vec<AclRecord>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub effective_acl: Vec<AclRecord>,
}

/// Explicit and effective rights of one subject on a schema path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AclEntry {
    subject: Subject,
    explicit_rights: Rights,
    effective_rights: Rights,
}

impl AclEntry {
    pub fn new(subject: impl Into<Subject>) -> Self {
        Self {
            subject: subject.into(),
            explicit_rights: Rights::new(),
            effective_rights: Rights::new(),
        }
    }

    pub fn with_explicit<I, R>(mut self, rights: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Right>,
    {
        self.explicit_rights.extend(rights.into_iter().map(Into::into));
        self
    }

    pub fn with_effective<I, R>(mut self, rights: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Right>,
    {
        self.effective_rights.extend(rights.into_iter().map(Into::into));
        self
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// Rights directly attached to the subject.
    pub fn explicit_rights(&self) -> &Rights {
        &self.explicit_rights
    }

    /// Rights the subject holds after inheritance resolution.
    pub fn effective_rights(&self) -> &Rights {
        &self.effective_rights
    }

    /// Rights held only through inheritance. These can't be revoked on this path.
    pub fn inherited_rights(&self) -> Rights {
        crate::inherited_rights(&self.effective_rights, &self.explicit_rights)
    }
}

/// Group the records of an ACL response into one entry per subject.
///
/// Entries are returned in the order their subject first appears, explicit list first. Only
/// allowing records contribute rights, a subject which is only ever denied still gets an (empty)
/// entry.
pub fn build_entries(response: &AclResponse) -> Vec<AclEntry> {
    let mut entries: Vec<AclEntry> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    let explicit = response.acl.iter().map(|record| (record, true));
    let effective = response.effective_acl.iter().map(|record| (record, false));

    for (record, is_explicit) in explicit.chain(effective) {
        let position = *index.entry(record.subject.as_str()).or_insert_with(|| {
            entries.push(AclEntry::new(record.subject.clone()));
            entries.len() - 1
        });

        if record.access_type == AccessType::Deny {
            trace!(subject = %record.subject, "skip deny record");
            continue;
        }

        let entry = &mut entries[position];
        let target = if is_explicit {
            &mut entry.explicit_rights
        } else {
            &mut entry.effective_rights
        };
        target.extend(record.granted().cloned());
    }

    entries
}

/// Explicit rights of a subject, empty if the subject has no entry.
pub fn explicit_rights_of(entries: &[AclEntry], subject: &str) -> Rights {
    entries
        .iter()
        .find(|entry| entry.subject == subject)
        .map(|entry| entry.explicit_rights.clone())
        .unwrap_or_default()
}

/// Inherited rights of a subject, empty if the subject has no entry.
pub fn inherited_rights_of(entries: &[AclEntry], subject: &str) -> Rights {
    entries
        .iter()
        .find(|entry| entry.subject == subject)
        .map(AclEntry::inherited_rights)
        .unwrap_or_default()
}
