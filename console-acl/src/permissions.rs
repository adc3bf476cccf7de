// SPDX-License-Identifier: MIT OR Apache-2.0

//! Available permissions of a database and how they are offered for editing.
//!
//! The backend lists permissions in two shapes: named groups of rights ("access rules") and
//! single granular rights. Both are rendered as a list of toggles, one per permission, combining
//! the merged rights map of an edit with the inherited rights of the subject.
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Right, Rights};

/// Which list of permissions is offered for editing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RightsView {
    #[default]
    Groups,
    Granular,
}

/// Named group of rights, including other rights and rules.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "PascalCase"))]
pub struct PermissionGroup {
    pub name: Right,

    #[cfg_attr(feature = "serde", serde(default))]
    pub mask: u64,

    #[cfg_attr(feature = "serde", serde(default))]
    pub access_rights: Vec<Right>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub access_rules: Vec<Right>,

    /// Group stems from the older bitmask rights model.
    ///
    /// Legacy groups are only offered when the subject already holds them. The backend does not
    /// send this flag, it decodes as `false` and is derived from `mask` through
    /// [`AvailablePermissions::mark_legacy`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub legacy: bool,
}

/// Single granular right.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "PascalCase"))]
pub struct Permission {
    pub name: Right,

    #[cfg_attr(feature = "serde", serde(default))]
    pub mask: u64,
}

/// Permissions which can be granted on a database.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "PascalCase"))]
pub struct AvailablePermissions {
    #[cfg_attr(feature = "serde", serde(default))]
    pub access_rules: Vec<PermissionGroup>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub access_rights: Vec<Permission>,
}

impl AvailablePermissions {
    /// Flag every permission group whose mask matches the given predicate as legacy.
    ///
    /// Groups which don't match are unflagged, so calling this again with another predicate
    /// replaces the previous classification.
    pub fn mark_legacy(&mut self, is_legacy: impl Fn(u64) -> bool) {
        for group in &mut self.access_rules {
            group.legacy = is_legacy(group.mask);
        }
    }
}

/// Display state of one permission while editing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RightToggle {
    pub name: Right,

    /// Right is held explicitly or pending to be granted.
    pub active: bool,

    /// Right is held through inheritance.
    pub inherited: bool,

    /// Rights and rules contained in a permission group, empty for granular rights.
    pub included_rights: Vec<Right>,

    /// Whether a switch is offered. Rights held only through inheritance can't be changed on this
    /// path, so they get no switch at all.
    pub switch: bool,
}

impl RightToggle {
    fn new(name: &Right, current: &BTreeMap<Right, bool>, inherited: &Rights) -> Self {
        let active = current.get(name).copied().unwrap_or(false);
        let inherited = inherited.contains(name);

        Self {
            name: name.clone(),
            active,
            inherited,
            included_rights: Vec::new(),
            switch: active || !inherited,
        }
    }

    /// Only inherited, not held or granted explicitly.
    pub fn only_inherited(&self) -> bool {
        self.inherited && !self.active
    }
}

/// Toggles for every permission shown in the given view, in the order the backend listed them.
pub fn rights_toggles(
    view: RightsView,
    available: &AvailablePermissions,
    current: &BTreeMap<Right, bool>,
    inherited: &Rights,
) -> Vec<RightToggle> {
    match view {
        RightsView::Groups => available
            .access_rules
            .iter()
            .filter_map(|group| {
                let mut toggle = RightToggle::new(&group.name, current, inherited);
                if group.legacy && !toggle.active && !toggle.inherited {
                    return None;
                }

                toggle.included_rights = group
                    .access_rights
                    .iter()
                    .chain(group.access_rules.iter())
                    .cloned()
                    .collect();
                Some(toggle)
            })
            .collect(),
        RightsView::Granular => available
            .access_rights
            .iter()
            .map(|permission| RightToggle::new(&permission.name, current, inherited))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::rights;
    use crate::{PendingChanges, current_rights_map};

    use super::{AvailablePermissions, Permission, PermissionGroup, RightsView, rights_toggles};

    fn available() -> AvailablePermissions {
        AvailablePermissions {
            access_rules: vec![
                PermissionGroup {
                    name: "ydb.generic.read".into(),
                    access_rights: vec!["SelectRow".into(), "DescribeSchema".into()],
                    access_rules: vec!["ydb.generic.list".into()],
                    ..Default::default()
                },
                PermissionGroup {
                    name: "ydb.generic.list".into(),
                    ..Default::default()
                },
                PermissionGroup {
                    name: "ydb.deprecated.select_row".into(),
                    legacy: true,
                    ..Default::default()
                },
                PermissionGroup {
                    name: "ydb.deprecated.update_row".into(),
                    legacy: true,
                    ..Default::default()
                },
            ],
            access_rights: vec![
                Permission {
                    name: "SelectRow".into(),
                    mask: 1,
                },
                Permission {
                    name: "UpdateRow".into(),
                    mask: 2,
                },
            ],
        }
    }

    #[test]
    fn group_toggles() {
        let explicit = rights(["ydb.deprecated.update_row"]);
        let inherited = rights(["ydb.generic.list"]);
        let mut pending = PendingChanges::new();
        pending.set("ydb.generic.read", true);
        let current = current_rights_map(&explicit, &pending);

        let toggles = rights_toggles(RightsView::Groups, &available(), &current, &inherited);
        let names: Vec<&str> = toggles.iter().map(|toggle| toggle.name.as_str()).collect();

        // Inactive legacy group is hidden, the held one stays.
        assert_eq!(
            names,
            vec![
                "ydb.generic.read",
                "ydb.generic.list",
                "ydb.deprecated.update_row"
            ]
        );

        let read = &toggles[0];
        assert!(read.active && read.switch);
        assert_eq!(
            read.included_rights,
            vec!["SelectRow", "DescribeSchema", "ydb.generic.list"]
        );

        // Inherited only: marker but no switch.
        let list = &toggles[1];
        assert!(list.inherited);
        assert!(list.only_inherited());
        assert!(!list.switch);
    }

    #[test]
    fn inherited_legacy_group_is_shown() {
        let inherited = rights(["ydb.deprecated.select_row"]);
        let current = current_rights_map(&rights([]), &PendingChanges::new());

        let toggles = rights_toggles(RightsView::Groups, &available(), &current, &inherited);
        assert!(
            toggles
                .iter()
                .any(|toggle| toggle.name == "ydb.deprecated.select_row" && !toggle.switch)
        );
        assert!(
            !toggles
                .iter()
                .any(|toggle| toggle.name == "ydb.deprecated.update_row")
        );
    }

    #[test]
    fn granular_toggles() {
        let explicit = rights(["SelectRow"]);
        let inherited = rights(["SelectRow", "UpdateRow"]);
        let current = current_rights_map(&explicit, &PendingChanges::new());

        let toggles = rights_toggles(RightsView::Granular, &available(), &current, &inherited);
        assert_eq!(toggles.len(), 2);

        // Held explicitly and inherited: still switchable.
        assert!(toggles[0].active && toggles[0].inherited && toggles[0].switch);
        assert!(toggles[0].included_rights.is_empty());

        // Granting an inherited right explicitly brings the switch back.
        assert!(!toggles[1].switch);
        let mut pending = PendingChanges::new();
        pending.set("UpdateRow", true);
        let current = current_rights_map(&explicit, &pending);
        let toggles = rights_toggles(RightsView::Granular, &available(), &current, &inherited);
        assert!(toggles[1].switch);
    }

    #[test]
    fn decode_available_permissions() {
        let json = r#"{
            "AccessRules": [
                {"Name": "ydb.generic.read", "Mask": 1, "AccessRights": ["SelectRow"]}
            ],
            "AccessRights": [{"Name": "SelectRow", "Mask": 1}]
        }"#;

        let available: AvailablePermissions = serde_json::from_str(json).unwrap();
        assert_eq!(available.access_rules[0].access_rights, vec!["SelectRow"]);
        assert!(!available.access_rules[0].legacy);
        assert_eq!(available.access_rights[0].mask, 1);
    }

    #[test]
    fn legacy_groups_from_mask() {
        const LEGACY_BITS: u64 = 0xff;

        let json = r#"{
            "AccessRules": [
                {"Name": "ydb.generic.read", "Mask": 256},
                {"Name": "ydb.deprecated.select_row", "Mask": 1},
                {"Name": "ydb.deprecated.update_row", "Mask": 2}
            ]
        }"#;

        let mut available: AvailablePermissions = serde_json::from_str(json).unwrap();
        let explicit = rights(["ydb.deprecated.update_row"]);
        let current = current_rights_map(&explicit, &PendingChanges::new());

        // Nothing is legacy until classified.
        let toggles = rights_toggles(RightsView::Groups, &available, &current, &rights([]));
        assert_eq!(toggles.len(), 3);

        available.mark_legacy(|mask| mask & LEGACY_BITS != 0);
        let legacy: Vec<bool> = available.access_rules.iter().map(|group| group.legacy).collect();
        assert_eq!(legacy, vec![false, true, true]);

        // Inactive legacy group is hidden, the held one stays.
        let toggles = rights_toggles(RightsView::Groups, &available, &current, &rights([]));
        let names: Vec<&str> = toggles.iter().map(|toggle| toggle.name.as_str()).collect();
        assert_eq!(names, vec!["ydb.generic.read", "ydb.deprecated.update_row"]);

        available.mark_legacy(|_| false);
        assert!(available.access_rules.iter().all(|group| !group.legacy));
    }
}
