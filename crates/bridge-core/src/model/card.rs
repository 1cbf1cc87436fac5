use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A playing card. Ordering is by suit, then rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { suit, rank }
    }

    /// Dense index in `0..52`, suit-major.
    pub const fn index(self) -> usize {
        self.suit.index() * 13 + (self.rank.value() as usize - 2)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        let suit = Suit::from_index(index / 13)?;
        let rank = Rank::from_value((index % 13) as u8 + 2)?;
        Some(Self::new(rank, suit))
    }

    pub const fn is_honor(self) -> bool {
        self.rank.is_honor()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.suit, self.rank)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardParseError {
    Empty,
    UnknownSuit(String),
    UnknownRank(String),
}

impl fmt::Display for CardParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardParseError::Empty => write!(f, "empty card code"),
            CardParseError::UnknownSuit(code) => write!(f, "unknown suit in card code '{code}'"),
            CardParseError::UnknownRank(code) => write!(f, "unknown rank in card code '{code}'"),
        }
    }
}

impl std::error::Error for CardParseError {}

impl FromStr for Card {
    type Err = CardParseError;

    /// Parses a suit letter followed by a rank token, e.g. `SA`, `H10`, `dt`.
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let code = code.trim();
        let mut chars = code.chars();
        let first = chars.next().ok_or(CardParseError::Empty)?;
        let suit =
            Suit::from_letter(first).ok_or_else(|| CardParseError::UnknownSuit(code.to_string()))?;
        let rank = Rank::from_token(chars.as_str())
            .ok_or_else(|| CardParseError::UnknownRank(code.to_string()))?;
        Ok(Card::new(rank, suit))
    }
}

impl TryFrom<String> for Card {
    type Error = CardParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{Card, CardParseError, Rank, Suit};

    #[test]
    fn parses_letter_and_numeric_tens() {
        let ten = Card::new(Rank::Ten, Suit::Hearts);
        assert_eq!("H10".parse::<Card>(), Ok(ten));
        assert_eq!("HT".parse::<Card>(), Ok(ten));
        assert_eq!("sa".parse::<Card>(), Ok(Card::new(Rank::Ace, Suit::Spades)));
    }

    #[test]
    fn rejects_unknown_codes() {
        assert!(matches!("XA".parse::<Card>(), Err(CardParseError::UnknownSuit(_))));
        assert!(matches!("S1".parse::<Card>(), Err(CardParseError::UnknownRank(_))));
        assert_eq!("".parse::<Card>(), Err(CardParseError::Empty));
    }

    #[test]
    fn display_is_canonical_code() {
        assert_eq!(Card::new(Rank::Ten, Suit::Clubs).to_string(), "CT");
        assert_eq!(Card::new(Rank::King, Suit::Diamonds).to_string(), "DK");
    }

    #[test]
    fn ordering_is_suit_then_rank() {
        let low_spade = Card::new(Rank::Two, Suit::Spades);
        let high_heart = Card::new(Rank::Ace, Suit::Hearts);
        assert!(high_heart < low_spade);
        assert!(Card::new(Rank::Three, Suit::Clubs) < Card::new(Rank::Four, Suit::Clubs));
    }

    #[test]
    fn index_covers_the_deck() {
        for index in 0..52 {
            let card = Card::from_index(index).expect("index in range");
            assert_eq!(card.index(), index);
        }
        assert!(Card::from_index(52).is_none());
    }

    #[test]
    fn serde_uses_card_codes() {
        let card = Card::new(Rank::Queen, Suit::Diamonds);
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(json, "\"DQ\"");
        let back: Card = serde_json::from_str("\"d10\"").unwrap();
        assert_eq!(back, Card::new(Rank::Ten, Suit::Diamonds));
        assert!(serde_json::from_str::<Card>("\"Z9\"").is_err());
    }
}
