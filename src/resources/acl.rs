//! Access control lists on catalog entities.

use serde::{Deserialize, Serialize};

use crate::field::Field;
use crate::types::{AccessControlList, Grant};

/// Local model of an access control list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclModel {
    /// User grants.
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub users: Field<Vec<Grant>>,
    /// Role grants.
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub roles: Field<Vec<Grant>>,
}

impl AclModel {
    /// Request body for this ACL. Unset or null lists are sent empty.
    pub fn to_wire(&self) -> AccessControlList {
        AccessControlList {
            users: self.users.cloned_value().unwrap_or_default(),
            roles: self.roles.cloned_value().unwrap_or_default(),
        }
    }

    fn from_wire(wire: AccessControlList) -> Self {
        Self {
            users: non_empty(wire.users),
            roles: non_empty(wire.roles),
        }
    }
}

fn non_empty(grants: Vec<Grant>) -> Field<Vec<Grant>> {
    if grants.is_empty() {
        Field::Null
    } else {
        Field::Value(grants)
    }
}

/// Merge a reported ACL into a resource model.
///
/// An ACL the user never configured stays unset, even though the server
/// always reports the owner's grants.
pub fn observe(previous: &Field<AclModel>, wire: Option<AccessControlList>) -> Field<AclModel> {
    Field::observe(previous, wire, |w, _| AclModel::from_wire(w))
}

/// Represent a reported ACL unconditionally (computed-only attributes).
pub fn reported(wire: Option<AccessControlList>) -> Field<AclModel> {
    Field::reported(wire.map(AclModel::from_wire))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire() -> AccessControlList {
        AccessControlList {
            users: vec![Grant::new("u1", ["SELECT", "ALTER"])],
            roles: vec![],
        }
    }

    #[test]
    fn test_unconfigured_acl_stays_unset() {
        assert!(observe(&Field::Unset, Some(wire())).is_unset());
    }

    #[test]
    fn test_configured_acl_follows_server() {
        let previous = Field::Value(AclModel::default());
        let merged = observe(&previous, Some(wire()));
        let acl = merged.value().unwrap();
        assert_eq!(acl.users.value().unwrap()[0].id, "u1");
        assert!(acl.roles.is_null());
    }

    #[test]
    fn test_configured_acl_missing_on_wire_is_null() {
        let previous = Field::Value(AclModel::default());
        assert!(observe(&previous, None).is_null());
    }

    #[test]
    fn test_reported_ignores_previous() {
        assert!(reported(Some(wire())).value().is_some());
        assert!(reported(None).is_null());
    }

    #[test]
    fn test_to_wire() {
        let model = AclModel {
            users: Field::Null,
            roles: Field::Value(vec![Grant::new("r1", ["SELECT"])]),
        };
        let body = model.to_wire();
        assert!(body.users.is_empty());
        assert_eq!(body.roles[0].permissions, vec!["SELECT".to_string()]);
    }
}
