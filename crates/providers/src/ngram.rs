//! No-repeat n-gram constraint.
//!
//! Given the token sequence so far, lists the tokens that would complete an
//! n-gram already present in the sequence. The sampler masks them out so
//! the model cannot loop on the same phrase.

/// Tokens banned as the next token under an `n`-gram no-repeat rule.
///
/// `n == 0` disables the rule. The result is sorted and deduplicated.
pub fn banned_tokens(tokens: &[u32], n: usize) -> Vec<u32> {
    if n == 0 || tokens.len() + 1 < n {
        return Vec::new();
    }

    let prefix = &tokens[tokens.len() + 1 - n..];
    let mut banned: Vec<u32> = tokens
        .windows(n)
        .filter(|w| &w[..n - 1] == prefix)
        .map(|w| w[n - 1])
        .collect();
    banned.sort_unstable();
    banned.dedup();
    banned
}
