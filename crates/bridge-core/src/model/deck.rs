use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::ALL.iter().copied() {
            for rank in Rank::ORDERED.iter().copied() {
                cards.push(Card::new(rank, suit));
            }
        }
        Self { cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.cards.shuffle(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Splits the deck into four 13-card blocks, North first.
    pub fn deal_blocks(&self) -> [Vec<Card>; 4] {
        let mut blocks: [Vec<Card>; 4] = Default::default();
        for (index, chunk) in self.cards.chunks(13).take(4).enumerate() {
            blocks[index] = chunk.to_vec();
        }
        blocks
    }
}

#[cfg(test)]
mod tests {
    use super::Deck;
    use std::collections::HashSet;

    #[test]
    fn standard_deck_has_52_unique_cards() {
        let deck = Deck::standard();
        let unique: HashSet<_> = deck.cards().iter().collect();
        assert_eq!(unique.len(), 52);
    }

    #[test]
    fn shuffle_with_seed_is_deterministic() {
        let a = Deck::shuffled_with_seed(42);
        let b = Deck::shuffled_with_seed(42);
        let c = Deck::shuffled_with_seed(43);
        assert_eq!(a.cards(), b.cards());
        assert_ne!(a.cards(), c.cards());
    }

    #[test]
    fn blocks_partition_the_deck() {
        let deck = Deck::shuffled_with_seed(7);
        let blocks = deck.deal_blocks();
        assert!(blocks.iter().all(|block| block.len() == 13));
        let unique: HashSet<_> = blocks.iter().flatten().collect();
        assert_eq!(unique.len(), 52);
    }
}
