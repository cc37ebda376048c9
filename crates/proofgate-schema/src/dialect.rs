//! # Dialect Resolution — Supported `$schema` URIs
//!
//! A capability table from supported JSON Schema dialect identifiers to
//! the validator draft that implements them. Resolution accepts `http`
//! and `https` schemes and an optional trailing `#`, matching how the
//! dialect URIs appear in the wild. Anything else is unrecognized and
//! becomes a typed `UNSUPPORTED_DIALECT` classification upstream.

use std::fmt;

/// A supported JSON Schema dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// JSON Schema draft 4.
    Draft4,
    /// JSON Schema draft 6.
    Draft6,
    /// JSON Schema draft 7.
    Draft7,
    /// JSON Schema draft 2019-09.
    Draft201909,
    /// JSON Schema draft 2020-12.
    Draft202012,
}

impl Dialect {
    /// Every supported dialect.
    pub const ALL: [Dialect; 5] = [
        Dialect::Draft4,
        Dialect::Draft6,
        Dialect::Draft7,
        Dialect::Draft201909,
        Dialect::Draft202012,
    ];

    /// Resolve a declared `$schema` URI to a supported dialect.
    ///
    /// Returns `None` for anything outside the capability table; callers
    /// classify that as unsupported rather than guessing a fallback.
    pub fn from_uri(uri: &str) -> Option<Dialect> {
        let trimmed = uri.strip_suffix('#').unwrap_or(uri);
        let rest = trimmed
            .strip_prefix("http://")
            .or_else(|| trimmed.strip_prefix("https://"))?;
        match rest {
            "json-schema.org/draft-04/schema" => Some(Dialect::Draft4),
            "json-schema.org/draft-06/schema" => Some(Dialect::Draft6),
            "json-schema.org/draft-07/schema" => Some(Dialect::Draft7),
            "json-schema.org/draft/2019-09/schema" => Some(Dialect::Draft201909),
            "json-schema.org/draft/2020-12/schema" => Some(Dialect::Draft202012),
            _ => None,
        }
    }

    /// The canonical URI for this dialect, as published.
    pub fn uri(self) -> &'static str {
        match self {
            Dialect::Draft4 => "http://json-schema.org/draft-04/schema#",
            Dialect::Draft6 => "http://json-schema.org/draft-06/schema#",
            Dialect::Draft7 => "http://json-schema.org/draft-07/schema#",
            Dialect::Draft201909 => "https://json-schema.org/draft/2019-09/schema",
            Dialect::Draft202012 => "https://json-schema.org/draft/2020-12/schema",
        }
    }

    /// The `jsonschema` draft implementing this dialect.
    pub fn draft(self) -> jsonschema::Draft {
        match self {
            Dialect::Draft4 => jsonschema::Draft::Draft4,
            Dialect::Draft6 => jsonschema::Draft::Draft6,
            Dialect::Draft7 => jsonschema::Draft::Draft7,
            Dialect::Draft201909 => jsonschema::Draft::Draft201909,
            Dialect::Draft202012 => jsonschema::Draft::Draft202012,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uri())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_draft7_in_all_spellings() {
        for uri in [
            "http://json-schema.org/draft-07/schema#",
            "http://json-schema.org/draft-07/schema",
            "https://json-schema.org/draft-07/schema#",
            "https://json-schema.org/draft-07/schema",
        ] {
            assert_eq!(Dialect::from_uri(uri), Some(Dialect::Draft7), "{uri}");
        }
    }

    #[test]
    fn resolves_modern_drafts() {
        assert_eq!(
            Dialect::from_uri("https://json-schema.org/draft/2020-12/schema"),
            Some(Dialect::Draft202012)
        );
        assert_eq!(
            Dialect::from_uri("https://json-schema.org/draft/2019-09/schema#"),
            Some(Dialect::Draft201909)
        );
    }

    #[test]
    fn rejects_unknown_uris() {
        assert_eq!(Dialect::from_uri("https://example.com/my-schema"), None);
        assert_eq!(Dialect::from_uri("json-schema.org/draft-07/schema"), None);
        assert_eq!(Dialect::from_uri(""), None);
    }

    #[test]
    fn every_canonical_uri_round_trips() {
        for dialect in Dialect::ALL {
            assert_eq!(Dialect::from_uri(dialect.uri()), Some(dialect));
        }
    }
}
