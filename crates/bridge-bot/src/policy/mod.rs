use bridge_core::game::state::GameState;
use bridge_core::model::card::Card;
use bridge_core::model::contract::Strain;
use bridge_core::model::seat::Seat;
use bridge_core::model::suit::Suit;
use bridge_core::model::trick::Play;

/// Read-only view handed to a chooser when `seat` is on turn.
#[derive(Clone, Copy)]
pub struct PlayContext<'a> {
    pub seat: Seat,
    pub state: &'a GameState,
}

impl<'a> PlayContext<'a> {
    pub fn new(seat: Seat, state: &'a GameState) -> Self {
        Self { seat, state }
    }

    pub fn strain(&self) -> Strain {
        self.state.contract().strain
    }

    pub fn trump(&self) -> Option<Suit> {
        self.strain().trump()
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.state.current_trick().lead_suit()
    }

    pub fn plays(&self) -> &'a [Play] {
        self.state.current_trick().plays()
    }

    /// Number of cards already in the trick: 0 when leading, 3 when last.
    pub fn position(&self) -> usize {
        self.plays().len()
    }

    pub fn current_winner(&self) -> Option<Play> {
        self.state.current_trick().current_winner(self.strain())
    }

    pub fn legal_cards(&self) -> Vec<Card> {
        self.state.legal_cards(self.seat)
    }
}

/// Anything that can pick a card for the seat on turn.
pub trait CardChooser: Send + Sync {
    /// Returns `None` only when the seat has no cards left.
    fn choose(&self, ctx: &PlayContext<'_>) -> Option<Card>;
}

/// First card in `candidates` with the lowest score.
pub(crate) fn first_min_by_key<K: PartialOrd>(
    candidates: &[Card],
    mut score: impl FnMut(Card) -> K,
) -> Option<(Card, K)> {
    let mut best: Option<(Card, K)> = None;
    for &card in candidates {
        let value = score(card);
        match &best {
            Some((_, current)) if !(value < *current) => {}
            _ => best = Some((card, value)),
        }
    }
    best
}

/// First card in `candidates` with the highest score.
pub(crate) fn first_max_by_key<K: PartialOrd>(
    candidates: &[Card],
    mut score: impl FnMut(Card) -> K,
) -> Option<(Card, K)> {
    let mut best: Option<(Card, K)> = None;
    for &card in candidates {
        let value = score(card);
        match &best {
            Some((_, current)) if !(value > *current) => {}
            _ => best = Some((card, value)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::{first_max_by_key, first_min_by_key};
    use bridge_core::model::card::Card;

    fn cards(codes: &[&str]) -> Vec<Card> {
        codes.iter().map(|code| code.parse().unwrap()).collect()
    }

    #[test]
    fn ties_go_to_the_first_card() {
        let hand = cards(&["C2", "D2", "H2"]);
        assert_eq!(first_min_by_key(&hand, |_| 1).map(|(c, _)| c), Some(hand[0]));
        assert_eq!(first_max_by_key(&hand, |_| 1.0).map(|(c, _)| c), Some(hand[0]));
    }

    #[test]
    fn picks_extremes() {
        let hand = cards(&["C2", "D9", "H5"]);
        let rank = |card: Card| card.rank.value() as i32;
        assert_eq!(first_min_by_key(&hand, rank).map(|(c, _)| c), Some(hand[0]));
        assert_eq!(first_max_by_key(&hand, rank).map(|(c, _)| c), Some(hand[1]));
        assert!(first_min_by_key(&[], rank).is_none());
    }
}
