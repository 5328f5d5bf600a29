//! Issuer identification by content sniffing.

use crate::models::config::IssuerRegistry;
use crate::models::statement::IssuerMatch;

/// Identify the statement issuer.
///
/// The first registry entry whose key appears anywhere in the text wins, so
/// a letterhead mentioning a partner bank resolves by registry order.
pub fn identify_issuer(text: &str, registry: &IssuerRegistry) -> IssuerMatch {
    let lower = text.to_lowercase();

    registry
        .entries
        .iter()
        .find(|entry| lower.contains(&entry.key.to_lowercase()))
        .map(IssuerMatch::known)
        .unwrap_or_else(|| IssuerMatch::unknown(registry.fallback_asset_ref.clone()))
}
