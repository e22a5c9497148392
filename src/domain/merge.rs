//! Cross-source deduplication
//!
//! Collapses tokens seen by several providers into one record per address.
//! The first record seen is the base; numeric evidence is merged with `max`.

use std::collections::HashMap;

use super::token::Token;

/// Merge `incoming` into `base`, both describing the same address.
///
/// - image: kept from base, taken from incoming only when base has none
/// - name: kept from base unless base's name is just its symbol and
///   incoming carries a real name
/// - market cap, liquidity, 24h volume: maximum of the two
/// - everything else: base
pub fn merge_into(base: &mut Token, incoming: &Token) {
    debug_assert_eq!(base.address, incoming.address);

    if base.needs_image() && !incoming.needs_image() {
        base.image_url = incoming.image_url.clone();
    }

    if base.has_placeholder_name() && !incoming.has_placeholder_name() {
        base.name = incoming.name.clone();
    }

    base.market_cap = base.market_cap.max(incoming.market_cap);
    base.liquidity = base.liquidity.max(incoming.liquidity);
    base.volume_24h = base.volume_24h.max(incoming.volume_24h);
}

/// One token per address, in order of first appearance
pub fn deduplicate(tokens: Vec<Token>) -> Vec<Token> {
    let mut index: HashMap<String, usize> = HashMap::with_capacity(tokens.len());
    let mut unique: Vec<Token> = Vec::with_capacity(tokens.len());

    for token in tokens {
        match index.get(&token.address) {
            Some(&slot) => merge_into(&mut unique[slot], &token),
            None => {
                index.insert(token.address.clone(), unique.len());
                unique.push(token);
            }
        }
    }

    unique
}
