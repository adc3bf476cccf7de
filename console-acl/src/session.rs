// SPDX-License-Identifier: MIT OR Apache-2.0

//! Editing the rights of one subject, or of a batch of new subjects, on a schema path.
//!
//! A session owns the pending toggles of a single editing view. It is created empty when the view
//! opens and thrown away on close, on a successful save or when the subject changes. Nothing is
//! shared between sessions.
use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::permissions::{AvailablePermissions, RightToggle, RightsView, rights_toggles};
use crate::request::{AccessChange, UpdateAccessRequest};
use crate::{AclEntry, PendingChanges, Resolution, Right, Rights, Subject, resolve};

/// Whose rights are being edited.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditTarget {
    /// Subject which already has an entry in the ACL of the path.
    Existing(Subject),

    /// Subjects which are about to be added to the ACL. They hold no rights yet.
    New(Vec<Subject>),
}

#[derive(Clone, Debug)]
pub struct RightsEditSession {
    target: EditTarget,
    explicit_rights: Rights,
    inherited_rights: Rights,
    pending: PendingChanges,
    error: Option<String>,
}

impl RightsEditSession {
    /// Start editing a subject from its current ACL entry.
    pub fn for_entry(entry: &AclEntry) -> Self {
        Self {
            target: EditTarget::Existing(entry.subject().clone()),
            explicit_rights: entry.explicit_rights().clone(),
            inherited_rights: entry.inherited_rights(),
            pending: PendingChanges::new(),
            error: None,
        }
    }

    /// Start granting rights to subjects which are not in the ACL yet.
    pub fn for_new_subjects<I, S>(subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Subject>,
    {
        let mut session = Self {
            target: EditTarget::New(Vec::new()),
            explicit_rights: Rights::new(),
            inherited_rights: Rights::new(),
            pending: PendingChanges::new(),
            error: None,
        };
        session.set_new_subjects(subjects);
        session
    }

    pub fn target(&self) -> &EditTarget {
        &self.target
    }

    /// Subjects an update would be sent for.
    pub fn subjects(&self) -> &[Subject] {
        match &self.target {
            EditTarget::Existing(subject) => std::slice::from_ref(subject),
            EditTarget::New(subjects) => subjects,
        }
    }

    /// Replace the list of new subjects. Blank entries are dropped, pending toggles are kept.
    ///
    /// Has no effect when editing an existing subject.
    pub fn set_new_subjects<I, S>(&mut self, subjects: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<Subject>,
    {
        if let EditTarget::New(current) = &mut self.target {
            *current = subjects
                .into_iter()
                .map(Into::into)
                .filter(|subject| !subject.trim().is_empty())
                .collect();
        }
    }

    /// Toggle a right. Clears the error of a previous failed submission.
    pub fn set_right(&mut self, right: impl Into<Right>, granted: bool) {
        let right = right.into();
        trace!(%right, granted, "set right");
        self.error = None;
        self.pending.set(right, granted);
    }

    /// Drop all pending toggles.
    pub fn discard(&mut self) {
        self.pending.clear();
    }

    pub fn pending(&self) -> &PendingChanges {
        &self.pending
    }

    pub fn explicit_rights(&self) -> &Rights {
        &self.explicit_rights
    }

    pub fn inherited_rights(&self) -> &Rights {
        &self.inherited_rights
    }

    pub fn resolution(&self) -> Resolution {
        resolve(&self.explicit_rights, &self.pending)
    }

    pub fn has_changes(&self) -> bool {
        self.resolution().has_changes()
    }

    pub fn current_rights_map(&self) -> BTreeMap<Right, bool> {
        crate::current_rights_map(&self.explicit_rights, &self.pending)
    }

    /// Toggles to render for the given permission view.
    pub fn toggles(&self, view: RightsView, available: &AvailablePermissions) -> Vec<RightToggle> {
        rights_toggles(
            view,
            available,
            &self.current_rights_map(),
            &self.inherited_rights,
        )
    }

    /// Build the request persisting this edit.
    ///
    /// Returns `None` when there is nothing to save, either because no toggle changes anything or
    /// because no subject was entered yet.
    pub fn update_request(&self, path: &str, database: &str) -> Option<UpdateAccessRequest> {
        let resolution = self.resolution();
        if !resolution.has_changes() {
            return None;
        }

        let change = AccessChange::grant_and_revoke(self.subjects(), &resolution);
        if change.is_empty() {
            return None;
        }

        Some(UpdateAccessRequest::new(path, database, change))
    }

    /// Remember why a submission failed. Pending toggles stay untouched so the user can retry.
    pub fn submission_failed(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(%message, "access update failed");
        self.error = Some(message);
    }

    /// The update was persisted, nothing is pending anymore.
    pub fn submission_succeeded(&mut self) {
        self.pending.clear();
        self.error = None;
    }

    /// Error message of the last failed submission.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Take a freshly fetched entry as the new baseline.
    ///
    /// Pending toggles survive when the entry belongs to the subject being edited. An entry of
    /// another subject starts a new session for that subject.
    pub fn rebase(&mut self, entry: &AclEntry) {
        let same_subject =
            matches!(&self.target, EditTarget::Existing(subject) if subject == entry.subject());

        if same_subject {
            self.explicit_rights = entry.explicit_rights().clone();
            self.inherited_rights = entry.inherited_rights();
        } else {
            debug!(subject = %entry.subject(), "subject changed, discarding pending rights");
            *self = Self::for_entry(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use assert_matches::assert_matches;

    use crate::AclEntry;
    use crate::permissions::{AvailablePermissions, Permission, RightsView};
    use crate::test_utils::{rights, setup_logging};

    use super::{EditTarget, RightsEditSession};

    fn alice() -> AclEntry {
        AclEntry::new("alice")
            .with_explicit(["SelectRow", "UpdateRow"])
            .with_effective(["SelectRow", "UpdateRow", "DescribeSchema"])
    }

    #[test]
    fn edit_existing_subject() {
        setup_logging();

        let mut session = RightsEditSession::for_entry(&alice());
        assert!(!session.has_changes());
        assert!(session.update_request("/Root/db/t", "/Root/db").is_none());

        session.set_right("UpdateRow", false);
        session.set_right("CreateTable", true);

        assert_eq!(session.inherited_rights(), &rights(["DescribeSchema"]));
        assert_eq!(
            session.current_rights_map(),
            BTreeMap::from([
                ("CreateTable".to_string(), true),
                ("SelectRow".to_string(), true),
                ("UpdateRow".to_string(), false),
            ])
        );

        let request = session.update_request("/Root/db/t", "/Root/db").unwrap();
        assert_eq!(request.path, "/Root/db/t");
        assert_eq!(request.rights.add_access[0].subject, "alice");
        assert_eq!(request.rights.add_access[0].access_rights, vec!["CreateTable"]);
        assert_eq!(request.rights.remove_access[0].access_rights, vec!["UpdateRow"]);
    }

    #[test]
    fn failed_submission_keeps_edits() {
        let mut session = RightsEditSession::for_entry(&alice());
        session.set_right("CreateTable", true);

        session.submission_failed("Access denied");
        assert_eq!(session.error(), Some("Access denied"));
        assert!(session.has_changes());
        assert!(session.update_request("/Root/db/t", "/Root/db").is_some());

        // The next toggle clears the error.
        session.set_right("EraseRow", true);
        assert!(session.error().is_none());
        assert_eq!(session.pending().len(), 2);

        session.submission_succeeded();
        assert!(!session.has_changes());
        assert!(session.pending().is_empty());
    }

    #[test]
    fn discard_pending() {
        let mut session = RightsEditSession::for_entry(&alice());
        session.set_right("SelectRow", false);
        assert!(session.has_changes());

        session.discard();
        assert!(!session.has_changes());
        assert_eq!(session.current_rights_map().len(), 2);
    }

    #[test]
    fn new_subjects() {
        let mut session = RightsEditSession::for_new_subjects(Vec::<String>::new());
        session.set_right("SelectRow", true);

        // Nothing to send without subjects.
        assert!(session.has_changes());
        assert!(session.update_request("/Root/db", "/Root/db").is_none());

        session.set_new_subjects(["bob", " ", "devs@ad"]);
        assert_eq!(session.subjects(), &["bob".to_string(), "devs@ad".to_string()]);

        let request = session.update_request("/Root/db", "/Root/db").unwrap();
        assert_eq!(request.rights.add_access.len(), 2);
        assert!(request.rights.remove_access.is_empty());

        // Revoking something new subjects never held is a no-op.
        session.discard();
        session.set_right("SelectRow", false);
        assert!(session.update_request("/Root/db", "/Root/db").is_none());
    }

    #[test]
    fn rebase_same_subject_keeps_edits() {
        let mut session = RightsEditSession::for_entry(&alice());
        session.set_right("CreateTable", true);

        // Refetch shows CreateTable got granted in the meantime.
        let refreshed = alice().with_explicit(["CreateTable"]);
        session.rebase(&refreshed);

        assert_eq!(session.pending().len(), 1);
        assert!(!session.has_changes());
    }

    #[test]
    fn rebase_other_subject_discards() {
        let mut session = RightsEditSession::for_entry(&alice());
        session.set_right("CreateTable", true);
        session.submission_failed("timeout");

        session.rebase(&AclEntry::new("bob").with_explicit(["SelectRow"]));

        assert_matches!(session.target(), EditTarget::Existing(subject) if subject == "bob");
        assert!(session.pending().is_empty());
        assert!(session.error().is_none());
        assert_eq!(session.explicit_rights(), &rights(["SelectRow"]));
    }

    #[test]
    fn toggles_for_inherited_rights() {
        let session = RightsEditSession::for_entry(&alice());
        let available = AvailablePermissions {
            access_rights: vec![
                Permission {
                    name: "SelectRow".into(),
                    mask: 1,
                },
                Permission {
                    name: "DescribeSchema".into(),
                    mask: 8,
                },
            ],
            ..Default::default()
        };

        let toggles = session.toggles(RightsView::Granular, &available);
        assert!(toggles[0].switch);
        assert!(toggles[1].inherited && !toggles[1].switch);
    }
}
