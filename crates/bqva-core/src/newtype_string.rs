//! Macro for defining validated identifier segments.
//!
//! A warehouse object is addressed by three segments (project, dataset,
//! table). Each segment type shares the same invariant: non-empty, and free of
//! the characters that separate or quote segments in either query dialect.

use crate::error::{CoreError, CoreResult};

/// Characters that may never appear inside a single identifier segment.
const SEPARATORS: &[char] = &[':', '.', '`', '[', ']'];

/// Check one identifier segment, naming the segment `kind` in the error.
pub(crate) fn validate_segment(kind: &'static str, value: &str) -> CoreResult<()> {
    if value.is_empty() {
        return Err(CoreError::InvalidIdentifier {
            kind,
            value: value.to_string(),
            reason: "must not be empty",
        });
    }
    if value.contains(SEPARATORS) {
        return Err(CoreError::InvalidIdentifier {
            kind,
            value: value.to_string(),
            reason: "must not contain ':', '.', '`', '[' or ']'",
        });
    }
    if value.chars().any(char::is_whitespace) {
        return Err(CoreError::InvalidIdentifier {
            kind,
            value: value.to_string(),
            reason: "must not contain whitespace",
        });
    }
    Ok(())
}

/// Check a project id, which may carry a domain scope
/// (`example.com:my-project`). The domain is dot-separated labels of letters,
/// digits and hyphens; the project part follows the plain segment rules.
pub(crate) fn validate_project(kind: &'static str, value: &str) -> CoreResult<()> {
    let Some((domain, project)) = value.split_once(':') else {
        return validate_segment(kind, value);
    };
    let labels: Vec<&str> = domain.split('.').collect();
    let valid_domain = labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        });
    if !valid_domain {
        return Err(CoreError::InvalidIdentifier {
            kind,
            value: value.to_string(),
            reason: "domain scope must look like 'example.com'",
        });
    }
    validate_segment(kind, project)
}

/// Define a validated identifier segment newtype. An optional second
/// argument names the validation function; it defaults to
/// [`validate_segment`].
///
/// Generates the struct with `Debug, Clone, PartialEq, Eq, Hash, PartialOrd,
/// Ord, Serialize`, a validating `Deserialize`, a fallible `new()`,
/// `as_str()`, `into_inner()`, `Display`, `AsRef<str>`, `Deref<Target=str>`,
/// `Borrow<str>`, `TryFrom<&str>` and string comparisons.
macro_rules! define_identifier {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident($kind:literal);
    ) => {
        $crate::newtype_string::define_identifier! {
            $(#[$meta])*
            $vis struct $Name($kind, $crate::newtype_string::validate_segment);
        }
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident($kind:literal, $validate:path);
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
        #[serde(transparent)]
        $vis struct $Name(String);

        impl<'de> serde::Deserialize<'de> for $Name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                $Name::new(s).map_err(serde::de::Error::custom)
            }
        }

        impl $Name {
            /// Validate and wrap a segment.
            pub fn new(value: impl Into<String>) -> $crate::error::CoreResult<Self> {
                let value = value.into();
                $validate($kind, &value)?;
                Ok(Self(value))
            }

            /// Return the segment as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the inner `String`.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $Name {
            fn as_ref(&self) -> &str { &self.0 }
        }

        impl std::ops::Deref for $Name {
            type Target = str;
            fn deref(&self) -> &str { &self.0 }
        }

        impl std::borrow::Borrow<str> for $Name {
            fn borrow(&self) -> &str { &self.0 }
        }

        impl TryFrom<&str> for $Name {
            type Error = $crate::error::CoreError;
            fn try_from(s: &str) -> Result<Self, Self::Error> {
                $Name::new(s)
            }
        }

        impl PartialEq<str> for $Name {
            fn eq(&self, other: &str) -> bool { self.0 == other }
        }

        impl PartialEq<&str> for $Name {
            fn eq(&self, other: &&str) -> bool { self.0 == *other }
        }
    };
}

pub(crate) use define_identifier;
