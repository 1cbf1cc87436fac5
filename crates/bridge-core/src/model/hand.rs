use crate::model::card::Card;
use crate::model::suit::Suit;
use std::fmt;

/// Cards held by one seat, kept sorted by suit (clubs first) then rank ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        let mut hand = Self { cards };
        hand.sort();
        hand
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
        self.sort();
    }

    pub fn remove(&mut self, card: Card) -> bool {
        if let Some(index) = self.cards.iter().position(|&c| c == card) {
            self.cards.remove(index);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn has_suit(&self, suit: Suit) -> bool {
        self.cards.iter().any(|card| card.suit == suit)
    }

    pub fn suit_count(&self, suit: Suit) -> usize {
        self.cards.iter().filter(|card| card.suit == suit).count()
    }

    /// Cards of `suit` in ascending rank order.
    pub fn cards_in_suit(&self, suit: Suit) -> impl Iterator<Item = Card> + '_ {
        self.cards.iter().copied().filter(move |card| card.suit == suit)
    }

    fn sort(&mut self) {
        self.cards
            .sort_by(|a, b| a.suit.cmp(&b.suit).then(a.rank.cmp(&b.rank)));
    }
}

/// Renders suits high to low, e.g. `S: A K 4  H: Q J 9  D: A 7 6  C: 8 7 5 3`.
impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for suit in Suit::ALL.iter().rev().copied() {
            if !first {
                f.write_str("  ")?;
            }
            first = false;
            write!(f, "{}:", suit)?;
            let mut holding = self.cards_in_suit(suit).collect::<Vec<_>>();
            if holding.is_empty() {
                f.write_str(" -")?;
            }
            holding.reverse();
            for card in holding {
                write!(f, " {}", card.rank)?;
            }
        }
        Ok(())
    }
}
