//! Feature flag schema.
//!
//! Every flag the service understands is listed in [`FeatureFlag`] with its
//! default value and the schema version that introduced it. A flag document
//! is a flat JSON object of booleans:
//!
//! ```json
//! { "enable_cod": true, "enable_free_shipping_nudge": false }
//! ```
//!
//! Keys missing from the document take their default, keys the schema does
//! not know are ignored. A document that is not valid JSON, is not an object,
//! or holds a non-boolean under a known key is rejected as a whole; callers
//! fall back to [`FeatureFlags::default`] so a broken document can never
//! switch a restricted feature on.

use core::fmt;
use core::str::FromStr;

use serde::Serialize;
use serde_json::{Map, Value};

/// Errors that can occur when parsing a flag document.
#[derive(thiserror::Error, Debug)]
pub enum FlagDocumentError {
    /// The document is not valid JSON.
    #[error("flag document is not valid JSON: {0}")]
    Syntax(#[from] serde_json::Error),
    /// The document is valid JSON but not an object.
    #[error("flag document must be a JSON object")]
    NotAnObject,
    /// A known flag holds something other than a boolean.
    #[error("flag `{key}` must be a boolean")]
    InvalidValue {
        /// Offending flag key.
        key: &'static str,
    },
}

/// Error returned when a flag name is not part of the schema.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown feature flag: {0}")]
pub struct UnknownFlag(pub String);

/// A flag known to the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureFlag {
    /// Offer and accept cash on delivery.
    EnableCod,
    /// Show the "spend X more for free shipping" hint.
    EnableFreeShippingNudge,
}

impl FeatureFlag {
    /// Every flag in the schema, in introduction order.
    pub const ALL: [Self; 2] = [Self::EnableCod, Self::EnableFreeShippingNudge];

    /// Key used in flag documents.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::EnableCod => "enable_cod",
            Self::EnableFreeShippingNudge => "enable_free_shipping_nudge",
        }
    }

    /// Value used when the document does not mention the flag.
    #[must_use]
    pub const fn default_value(self) -> bool {
        match self {
            Self::EnableCod | Self::EnableFreeShippingNudge => false,
        }
    }

    /// Schema version in which the flag first appeared.
    #[must_use]
    pub const fn introduced_in(self) -> u32 {
        match self {
            Self::EnableCod => 1,
            Self::EnableFreeShippingNudge => 2,
        }
    }
}

impl fmt::Display for FeatureFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FeatureFlag {
    type Err = UnknownFlag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|flag| flag.key() == s)
            .ok_or_else(|| UnknownFlag(s.to_owned()))
    }
}

/// Resolved flag values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct FeatureFlags {
    /// See [`FeatureFlag::EnableCod`].
    pub enable_cod: bool,
    /// See [`FeatureFlag::EnableFreeShippingNudge`].
    pub enable_free_shipping_nudge: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            enable_cod: FeatureFlag::EnableCod.default_value(),
            enable_free_shipping_nudge: FeatureFlag::EnableFreeShippingNudge.default_value(),
        }
    }
}

impl FeatureFlags {
    /// Current schema version.
    pub const SCHEMA_VERSION: u32 = 2;

    /// Whether `flag` is on.
    #[must_use]
    pub const fn is_enabled(&self, flag: FeatureFlag) -> bool {
        match flag {
            FeatureFlag::EnableCod => self.enable_cod,
            FeatureFlag::EnableFreeShippingNudge => self.enable_free_shipping_nudge,
        }
    }

    /// Set `flag` to `enabled`.
    pub const fn set(&mut self, flag: FeatureFlag, enabled: bool) {
        match flag {
            FeatureFlag::EnableCod => self.enable_cod = enabled,
            FeatureFlag::EnableFreeShippingNudge => self.enable_free_shipping_nudge = enabled,
        }
    }

    /// Resolve flags from a parsed JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`FlagDocumentError::InvalidValue`] if a known flag is not a
    /// boolean.
    pub fn from_map(document: &Map<String, Value>) -> Result<Self, FlagDocumentError> {
        let mut flags = Self::default();
        for flag in FeatureFlag::ALL {
            match document.get(flag.key()) {
                None => {}
                Some(Value::Bool(enabled)) => flags.set(flag, *enabled),
                Some(_) => return Err(FlagDocumentError::InvalidValue { key: flag.key() }),
            }
        }
        Ok(flags)
    }

    /// Parse a flag document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a JSON object of booleans.
    /// Callers are expected to fall back to [`FeatureFlags::default`].
    pub fn from_json(document: &str) -> Result<Self, FlagDocumentError> {
        match serde_json::from_str::<Value>(document)? {
            Value::Object(map) => Self::from_map(&map),
            _ => Err(FlagDocumentError::NotAnObject),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_all_off() {
        let flags = FeatureFlags::default();
        for flag in FeatureFlag::ALL {
            assert!(!flags.is_enabled(flag), "{flag} should default to off");
        }
    }

    #[test]
    fn test_from_json_reads_known_flags() {
        let flags =
            FeatureFlags::from_json(r#"{"enable_cod": true, "enable_free_shipping_nudge": true}"#)
                .unwrap();
        assert!(flags.enable_cod);
        assert!(flags.enable_free_shipping_nudge);
    }

    #[test]
    fn test_missing_keys_default_off() {
        let flags = FeatureFlags::from_json(r#"{"enable_cod": true}"#).unwrap();
        assert!(flags.enable_cod);
        assert!(!flags.enable_free_shipping_nudge);

        let flags = FeatureFlags::from_json("{}").unwrap();
        assert_eq!(flags, FeatureFlags::default());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let flags =
            FeatureFlags::from_json(r#"{"enable_cod": true, "enable_crypto": "yes", "v": 9}"#)
                .unwrap();
        assert!(flags.enable_cod);
    }

    #[test]
    fn test_invalid_syntax_is_error() {
        let err = FeatureFlags::from_json("{enable_cod: true").unwrap_err();
        assert!(matches!(err, FlagDocumentError::Syntax(_)));
    }

    #[test]
    fn test_non_object_is_error() {
        assert!(matches!(
            FeatureFlags::from_json("[true]").unwrap_err(),
            FlagDocumentError::NotAnObject
        ));
        assert!(matches!(
            FeatureFlags::from_json("true").unwrap_err(),
            FlagDocumentError::NotAnObject
        ));
    }

    #[test]
    fn test_truthy_non_boolean_is_rejected() {
        let err = FeatureFlags::from_json(r#"{"enable_cod": "true"}"#).unwrap_err();
        assert!(matches!(
            err,
            FlagDocumentError::InvalidValue { key: "enable_cod" }
        ));

        let err = FeatureFlags::from_json(r#"{"enable_cod": 1}"#).unwrap_err();
        assert!(matches!(err, FlagDocumentError::InvalidValue { .. }));
    }

    #[test]
    fn test_flag_keys_round_trip_through_from_str() {
        for flag in FeatureFlag::ALL {
            assert_eq!(flag.key().parse::<FeatureFlag>().unwrap(), flag);
        }
        assert_eq!(
            "enable_bitcoin".parse::<FeatureFlag>(),
            Err(UnknownFlag("enable_bitcoin".to_string()))
        );
    }

    #[test]
    fn test_schema_version_covers_every_flag() {
        for flag in FeatureFlag::ALL {
            assert!(flag.introduced_in() <= FeatureFlags::SCHEMA_VERSION);
        }
    }

    #[test]
    fn test_serializes_with_document_keys() {
        let flags = FeatureFlags {
            enable_cod: true,
            enable_free_shipping_nudge: false,
        };
        let json = serde_json::to_value(flags).unwrap();
        assert_eq!(json["enable_cod"], true);
        assert_eq!(json["enable_free_shipping_nudge"], false);
    }
}
