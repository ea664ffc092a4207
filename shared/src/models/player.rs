use serde::{Deserialize, Serialize};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WALLET_REGEX: Regex = Regex::new(r"^0x.{40}$").unwrap();
}

/// A player of the game, identified by name.
///
/// Names are compared case-sensitively. Wallet addresses are resolved to a
/// name before a `Player` is built and are not kept afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Returns true for 42-character, `0x`-prefixed wallet identifiers
pub fn is_wallet_address(term: &str) -> bool {
    WALLET_REGEX.is_match(term)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("0x1234567890abcdef1234567890abcdef12345678", true ; "full wallet")]
    #[test_case("0x1234", false ; "too short")]
    #[test_case("1x1234567890abcdef1234567890abcdef12345678", false ; "wrong prefix")]
    #[test_case("0x1234567890abcdef1234567890abcdef123456789", false ; "too long")]
    #[test_case("Alice", false ; "plain name")]
    fn test_is_wallet_address(term: &str, expected: bool) {
        assert_eq!(is_wallet_address(term), expected);
    }

    #[test]
    fn test_player_display() {
        let player = Player::new("Alice");
        assert_eq!(player.to_string(), "Alice");
    }
}
