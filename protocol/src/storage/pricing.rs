//! Name and namespace pricing.
//!
//! ```text
//! name price = coeff * base ^ buckets[min(len(label), 16) - 1] / discount * unit
//! ```
//!
//! `discount` is the largest applicable of `no_vowel_discount` (label has
//! no vowel) and `nonalpha_discount` (label has a digit, `-` or `_`), or 1.
//! All arithmetic saturates; the result never drops below one unit.

use crate::config::{ConsensusParams, PRICE_BUCKET_COUNT};
use crate::operation::NamespaceParams;

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u', 'y'];

/// Price of registering or renewing `label` (the part before the dot).
pub fn name_price(label: &str, params: &NamespaceParams, consensus: &ConsensusParams) -> u64 {
    let len = label.chars().count().clamp(1, PRICE_BUCKET_COUNT);
    let exponent = u32::from(params.buckets[len - 1]);

    let mut discount: u64 = 1;
    if !label.chars().any(|c| VOWELS.contains(&c)) {
        discount = discount.max(u64::from(params.no_vowel_discount));
    }
    if label.chars().any(|c| c.is_ascii_digit() || c == '-' || c == '_') {
        discount = discount.max(u64::from(params.nonalpha_discount));
    }

    let raw = u64::from(params.coeff).saturating_mul(u64::from(params.base).saturating_pow(exponent));
    let unit = consensus.name_cost_unit;
    (raw / discount.max(1)).saturating_mul(unit).max(unit)
}

/// Price of revealing a namespace, by id length tier.
pub fn namespace_price(namespace_id: &str, consensus: &ConsensusParams) -> u64 {
    let tier = match namespace_id.chars().count() {
        0 | 1 => 0,
        2..=3 => 1,
        4..=7 => 2,
        _ => 3,
    };
    consensus.namespace_prices[tier]
}
