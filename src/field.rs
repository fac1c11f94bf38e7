//! Tri-state optional fields and the null-preservation merge rules.
//!
//! A declarative model has to tell apart three situations for every optional
//! attribute:
//!
//! - [`Field::Unset`]: the user never configured it. Refreshing from the API
//!   must leave it unset, otherwise server-assigned defaults show up as drift.
//! - [`Field::Null`]: the attribute is part of the model but has no value,
//!   e.g. a sub-field of a configured block the server did not report.
//! - [`Field::Value`]: an explicit or server-observed value.
//!
//! In JSON state an absent key is `Unset` and `null` is `Null`. Fields are
//! declared with `#[serde(default, skip_serializing_if = "Field::is_unset")]`.
//!
//! # Example
//!
//! ```
//! use dremio_provider::field::Field;
//!
//! // The user never configured the block: the server default is ignored.
//! let previous: Field<u32> = Field::Unset;
//! let merged = Field::observe(&previous, Some(100), |ttl, _| ttl);
//! assert!(merged.is_unset());
//!
//! // A configured block follows the server.
//! let previous = Field::Value(50);
//! let merged = Field::observe(&previous, Some(100), |ttl, _| ttl);
//! assert_eq!(merged, Field::Value(100));
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An optional model attribute with distinct "never configured" and "null" states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Field<T> {
    /// Never configured by the user.
    #[default]
    Unset,
    /// Configured but without a value.
    Null,
    /// A concrete value.
    Value(T),
}

impl<T> Field<T> {
    /// Whether the field was never configured.
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Whether the field is an explicit null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether the field is part of the model (explicit null or value).
    pub fn is_set(&self) -> bool {
        !self.is_unset()
    }

    /// Borrow the value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Take the value, if any.
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow the inner value as a `Field<&T>`.
    pub fn as_ref(&self) -> Field<&T> {
        match self {
            Self::Unset => Field::Unset,
            Self::Null => Field::Null,
            Self::Value(v) => Field::Value(v),
        }
    }

    /// Map the inner value, keeping `Unset` and `Null` as they are.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Self::Unset => Field::Unset,
            Self::Null => Field::Null,
            Self::Value(v) => Field::Value(f(v)),
        }
    }

    /// Represent a sub-field reported (or not) by the server.
    ///
    /// Used inside a block the user did configure: a missing wire value becomes
    /// an explicit null rather than disappearing from the model.
    pub fn reported(wire: Option<T>) -> Self {
        match wire {
            Some(v) => Self::Value(v),
            None => Self::Null,
        }
    }

    /// Merge a wire value into the model, honouring the previous model.
    ///
    /// - previous `Unset` stays `Unset`, whatever the server returned;
    /// - otherwise a missing wire value becomes `Null`;
    /// - otherwise `merge` builds the new value from the wire value and the
    ///   previous value (so nested blocks can recurse with their own rules).
    pub fn observe<W>(
        previous: &Field<T>,
        wire: Option<W>,
        merge: impl FnOnce(W, Option<&T>) -> T,
    ) -> Field<T> {
        match (previous, wire) {
            (Field::Unset, _) => Field::Unset,
            (_, None) => Field::Null,
            (prev, Some(w)) => Field::Value(merge(w, prev.value())),
        }
    }

    /// Convert the value for a request body.
    ///
    /// `Unset` and `Null` are omitted (`None`) so that the request never sends
    /// nulls that would overwrite server state.
    pub fn to_wire<W, E>(&self, f: impl FnOnce(&T) -> Result<W, E>) -> Result<Option<W>, E> {
        match self {
            Self::Value(v) => f(v).map(Some),
            _ => Ok(None),
        }
    }
}

impl<T: Clone> Field<T> {
    /// Copy the value for a request body, omitting `Unset` and `Null`.
    pub fn cloned_value(&self) -> Option<T> {
        self.value().cloned()
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        Self::reported(value)
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => serializer.serialize_some(v),
            Self::Unset | Self::Null => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // A missing key never reaches here: `#[serde(default)]` yields `Unset`.
        Option::<T>::deserialize(deserializer).map(Self::reported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Holder {
        #[serde(default, skip_serializing_if = "Field::is_unset")]
        ttl: Field<i64>,
    }

    #[test]
    fn test_state_predicates() {
        let unset: Field<i64> = Field::Unset;
        assert!(unset.is_unset());
        assert!(!unset.is_set());

        let null: Field<i64> = Field::Null;
        assert!(null.is_null());
        assert!(null.is_set());
        assert_eq!(null.value(), None);

        let value = Field::Value(3);
        assert!(value.is_set());
        assert_eq!(value.value(), Some(&3));
        assert_eq!(value.into_value(), Some(3));
    }

    #[test]
    fn test_observe_keeps_unset() {
        let merged = Field::observe(&Field::<i64>::Unset, Some(100), |w, _| w);
        assert_eq!(merged, Field::Unset);

        let merged = Field::observe(&Field::<i64>::Unset, None::<i64>, |w, _| w);
        assert_eq!(merged, Field::Unset);
    }

    #[test]
    fn test_observe_populates_configured_field() {
        let merged = Field::observe(&Field::Value(1), Some(100), |w, _| w);
        assert_eq!(merged, Field::Value(100));

        let merged = Field::observe(&Field::<i64>::Null, Some(7), |w, _| w);
        assert_eq!(merged, Field::Value(7));
    }

    #[test]
    fn test_observe_missing_wire_value_becomes_null() {
        let merged = Field::observe(&Field::Value(1), None::<i64>, |w, _| w);
        assert_eq!(merged, Field::Null);
    }

    #[test]
    fn test_observe_passes_previous_value() {
        let merged = Field::observe(&Field::Value(10), Some(5), |w, prev| {
            w + prev.copied().unwrap_or(0)
        });
        assert_eq!(merged, Field::Value(15));
    }

    #[test]
    fn test_to_wire_omits_unset_and_null() {
        let ok = |v: &i64| Ok::<_, ()>(*v * 2);
        assert_eq!(Field::<i64>::Unset.to_wire(ok), Ok(None));
        assert_eq!(Field::<i64>::Null.to_wire(ok), Ok(None));
        assert_eq!(Field::Value(4).to_wire(ok), Ok(Some(8)));
    }

    #[test]
    fn test_serde_tri_state() {
        let holder: Holder = serde_json::from_value(json!({})).unwrap();
        assert_eq!(holder.ttl, Field::Unset);

        let holder: Holder = serde_json::from_value(json!({"ttl": null})).unwrap();
        assert_eq!(holder.ttl, Field::Null);

        let holder: Holder = serde_json::from_value(json!({"ttl": 5})).unwrap();
        assert_eq!(holder.ttl, Field::Value(5));
    }

    #[test]
    fn test_serialize_skips_unset_but_keeps_null() {
        assert_eq!(serde_json::to_value(Holder::default()).unwrap(), json!({}));
        assert_eq!(
            serde_json::to_value(Holder { ttl: Field::Null }).unwrap(),
            json!({"ttl": null})
        );
        assert_eq!(
            serde_json::to_value(Holder { ttl: Field::Value(9) }).unwrap(),
            json!({"ttl": 9})
        );
    }

    #[test]
    fn test_map_and_as_ref() {
        let f = Field::Value("a".to_string());
        assert_eq!(f.as_ref().map(|s| s.len()), Field::Value(1));
        assert_eq!(Field::<String>::Null.map(|s| s.len()), Field::Null);
        assert_eq!(Field::<String>::Unset.map(|s| s.len()), Field::Unset);
    }
}
