//! Symbol normalization.

/// Symbols of at most this many characters are treated as collision-prone.
pub const SHORT_SYMBOL_MAX_LEN: usize = 3;

/// A user-supplied symbol prepared for matching.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolQuery {
    /// Trimmed input, casing preserved
    pub raw: String,
    /// Uppercased form used for symbol and name comparisons
    pub upper: String,
    /// Lowercased form used for id comparisons
    pub lower: String,
    /// Length in characters
    pub len: usize,
}

impl SymbolQuery {
    pub fn new(input: &str) -> Self {
        let raw = input.trim().to_string();
        let upper = raw.to_uppercase();
        let lower = upper.to_lowercase();
        let len = upper.chars().count();
        Self {
            raw,
            upper,
            lower,
            len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_short(&self) -> bool {
        self.len <= SHORT_SYMBOL_MAX_LEN
    }
}

/// Prefix/suffix-insensitive form of a symbol.
///
/// Strips a leading lowercase `k`, then a leading lowercase `t`, then a
/// trailing `-token`, and uppercases the rest: `kPEPE` -> `PEPE`,
/// `tBTC` -> `BTC`, `foo-token` -> `FOO`. Uppercase `K`/`T` are kept, so
/// `KAS` stays `KAS`.
pub fn normalize_symbol(symbol: &str) -> String {
    let s = symbol.strip_prefix('k').unwrap_or(symbol);
    let s = s.strip_prefix('t').unwrap_or(s);
    let s = s.strip_suffix("-token").unwrap_or(s);
    s.to_uppercase()
}
