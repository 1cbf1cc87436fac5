use crate::game::rules;
use crate::model::card::Card;
use crate::model::contract::Strain;
use crate::model::seat::Seat;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A trick in progress. Turn order is enforced by the game state, which
/// skips seats whose hands are exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trick {
    leader: Seat,
    plays: Vec<Play>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub seat: Seat,
    pub card: Card,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrickError {
    TrickComplete,
    AlreadyPlayed(Seat),
}

impl fmt::Display for TrickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrickError::TrickComplete => write!(f, "trick already complete"),
            TrickError::AlreadyPlayed(seat) => write!(f, "{seat} has already played this trick"),
        }
    }
}

impl std::error::Error for TrickError {}

impl Trick {
    pub fn new(leader: Seat) -> Self {
        Self {
            leader,
            plays: Vec::with_capacity(4),
        }
    }

    pub fn leader(&self) -> Seat {
        self.leader
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == 4
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.plays.first().map(|play| play.card.suit)
    }

    pub fn play(&mut self, seat: Seat, card: Card) -> Result<(), TrickError> {
        if self.is_complete() {
            return Err(TrickError::TrickComplete);
        }
        if self.plays.iter().any(|play| play.seat == seat) {
            return Err(TrickError::AlreadyPlayed(seat));
        }
        self.plays.push(Play { seat, card });
        Ok(())
    }

    /// Winner of the plays made so far.
    pub fn current_winner(&self, strain: Strain) -> Option<Play> {
        rules::current_winner(&self.plays, strain)
    }
}

#[cfg(test)]
mod tests {
    use super::{Trick, TrickError};
    use crate::model::card::Card;
    use crate::model::contract::Strain;
    use crate::model::rank::Rank;
    use crate::model::seat::Seat;
    use crate::model::suit::Suit;

    #[test]
    fn rejects_second_play_by_same_seat() {
        let mut trick = Trick::new(Seat::North);
        trick.play(Seat::North, Card::new(Rank::Two, Suit::Clubs)).unwrap();
        assert_eq!(
            trick.play(Seat::North, Card::new(Rank::Three, Suit::Clubs)),
            Err(TrickError::AlreadyPlayed(Seat::North))
        );
    }

    #[test]
    fn rejects_fifth_card() {
        let mut trick = Trick::new(Seat::North);
        for (seat, rank) in Seat::LOOP.iter().zip([Rank::Two, Rank::Three, Rank::Four, Rank::Five]) {
            trick.play(*seat, Card::new(rank, Suit::Clubs)).unwrap();
        }
        assert!(trick.is_complete());
        assert_eq!(
            trick.play(Seat::North, Card::new(Rank::Six, Suit::Clubs)),
            Err(TrickError::TrickComplete)
        );
    }

    #[test]
    fn partial_winner_tracks_lead_suit() {
        let mut trick = Trick::new(Seat::West);
        trick.play(Seat::West, Card::new(Rank::Ten, Suit::Clubs)).unwrap();
        trick.play(Seat::North, Card::new(Rank::Ace, Suit::Spades)).unwrap();
        assert_eq!(trick.lead_suit(), Some(Suit::Clubs));
        let winner = trick.current_winner(Strain::NoTrump).unwrap();
        assert_eq!(winner.seat, Seat::West);
        let winner = trick.current_winner(Strain::Trump(Suit::Spades)).unwrap();
        assert_eq!(winner.seat, Seat::North);
    }
}
