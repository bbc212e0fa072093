//! Channel-to-UTM taxonomy classification
//!
//! Providers name the same acquisition channel a dozen different ways
//! ("Facebook", "social_media", "Adwords", ...). [`SynonymTable::classify`]
//! maps any raw channel/type pair onto a canonical `(utm_source, utm_medium)`
//! pair. The function is total: every input, including absent or empty
//! fields, resolves to a valid pair.
//!
//! The vocabulary lives in the table, not in control flow, so new provider
//! spellings are added with [`SynonymTable::add_synonym`] rather than by
//! editing match arms.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A recognized canonical `utm_source` value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalSource {
    Meta,
    Google,
    Linkedin,
    Newsletter,
    Direct,
}

impl CanonicalSource {
    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalSource::Meta => "meta",
            CanonicalSource::Google => "google",
            CanonicalSource::Linkedin => "linkedin",
            CanonicalSource::Newsletter => "newsletter",
            CanonicalSource::Direct => "direct",
        }
    }

    /// Medium implied by a recognized source
    fn medium(self) -> &'static str {
        match self {
            CanonicalSource::Meta | CanonicalSource::Google | CanonicalSource::Linkedin => "cpc",
            CanonicalSource::Newsletter => "email",
            CanonicalSource::Direct => "direct",
        }
    }
}

/// Raw-token-to-canonical-source lookup table
#[derive(Debug, Clone)]
pub struct SynonymTable {
    synonyms: HashMap<String, CanonicalSource>,
}

impl Default for SynonymTable {
    /// The built-in provider vocabulary
    fn default() -> Self {
        let mut table = Self {
            synonyms: HashMap::new(),
        };
        for token in ["facebook", "instagram", "meta", "social", "social_media"] {
            table.add_synonym(token, CanonicalSource::Meta);
        }
        for token in ["google", "search", "adwords", "organic"] {
            table.add_synonym(token, CanonicalSource::Google);
        }
        table.add_synonym("linkedin", CanonicalSource::Linkedin);
        for token in ["email", "newsletter"] {
            table.add_synonym(token, CanonicalSource::Newsletter);
        }
        for token in ["direct", "(direct)", "none", "(none)", "unknown", "nan"] {
            table.add_synonym(token, CanonicalSource::Direct);
        }
        table
    }
}

impl SynonymTable {
    /// Register a raw token as a synonym for a canonical source
    pub fn add_synonym(&mut self, token: impl Into<String>, source: CanonicalSource) {
        self.synonyms
            .insert(token.into().trim().to_lowercase(), source);
    }

    /// Map a raw channel field and campaign-type field to `(utm_source, utm_medium)`.
    ///
    /// Unrecognized non-empty tokens pass through verbatim (lowercased,
    /// trimmed) as the source; their medium is inferred from campaign-type
    /// substring hints. Absent or empty sources resolve to `direct`.
    pub fn classify(&self, raw_source: Option<&str>, raw_type: Option<&str>) -> (String, String) {
        let token = raw_source.map(|s| s.trim().to_lowercase()).unwrap_or_default();
        let type_hint = raw_type.map(|s| s.trim().to_lowercase()).unwrap_or_default();

        if let Some(&source) = self.synonyms.get(&token) {
            return (source.as_str().to_string(), source.medium().to_string());
        }

        if token.is_empty() {
            let direct = CanonicalSource::Direct;
            return (direct.as_str().to_string(), direct.medium().to_string());
        }

        // Passthrough source; medium from campaign-type hints, first match wins
        let medium = if type_hint.contains("email") {
            "email"
        } else if type_hint.contains("organic") {
            "organic"
        } else if type_hint.contains("influencer") || type_hint.contains("social") {
            "social"
        } else {
            "other"
        };
        (token, medium.to_string())
    }
}
