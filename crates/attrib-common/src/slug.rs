//! Campaign name normalization
//!
//! Campaign names arrive as free text ("Email Blast!", "SEO Push",
//! "brand/awareness Q2"). [`slugify`] collapses them into a single canonical
//! token so the same campaign spells identically across providers.

/// Token returned when the input is absent or normalizes to nothing
pub const UNKNOWN_CAMPAIGN: &str = "unknown_campaign";

/// Normalize an arbitrary campaign name into a canonical token.
///
/// Lowercase and trim, keep alphanumerics, map everything else to
/// underscores, collapse runs, strip the ends. Total, deterministic, and
/// idempotent: `slugify(slugify(x)) == slugify(x)`.
pub fn slugify(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return UNKNOWN_CAMPAIGN.to_string();
    };

    let mut out = String::with_capacity(raw.len());
    for ch in raw.trim().to_lowercase().chars() {
        if ch.is_alphanumeric() {
            out.push(ch);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }

    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        UNKNOWN_CAMPAIGN.to_string()
    } else {
        trimmed.to_string()
    }
}
