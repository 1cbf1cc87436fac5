use crate::model::card::Card;

/// Compact set of cards backed by a 52-bit mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CardSet {
    bits: u64,
}

impl CardSet {
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// Returns `false` when the card was already present.
    pub fn insert(&mut self, card: Card) -> bool {
        let mask = 1u64 << card.index();
        let fresh = self.bits & mask == 0;
        self.bits |= mask;
        fresh
    }

    pub fn contains(&self, card: Card) -> bool {
        self.bits & (1u64 << card.index()) != 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Card> + '_ {
        (0..52).filter_map(move |index| {
            if self.bits & (1u64 << index) != 0 {
                Card::from_index(index)
            } else {
                None
            }
        })
    }
}

impl FromIterator<Card> for CardSet {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        let mut set = CardSet::new();
        for card in iter {
            set.insert(card);
        }
        set
    }
}
