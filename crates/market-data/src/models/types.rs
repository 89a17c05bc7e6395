/// Base of every reference link built from a canonical id.
pub const REFERENCE_BASE_URL: &str = "https://www.coingecko.com/en/coins";

/// Build the reference-site link for a canonical id.
pub fn reference_link(canonical_id: &str) -> String {
    format!("{}/{}", REFERENCE_BASE_URL, canonical_id)
}
