use crate::game::deal::{CARDS_PER_HAND, Deal};
use crate::game::rules;
use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::contract::{Contract, TOTAL_TRICKS, Verdict};
use crate::model::hand::Hand;
use crate::model::seat::Seat;
use crate::model::suit::Suit;
use crate::model::trick::{Play, Trick, TrickError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One completed trick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickRecord {
    pub number: u8,
    pub leader: Seat,
    pub winner: Seat,
    pub plays: Vec<Play>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    OutOfTurn { expected: Option<Seat>, actual: Seat },
    CardNotHeld { seat: Seat, card: Card },
    MustFollowSuit { seat: Seat, card: Card, lead: Suit },
    TrickIncomplete,
    Trick(TrickError),
    ConservationBroken { seat: Seat, held: usize, played: u8 },
    CardSeenTwice(Card),
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::OutOfTurn {
                expected: Some(expected),
                actual,
            } => write!(f, "expected {expected} to play but got {actual}"),
            StateError::OutOfTurn {
                expected: None,
                actual,
            } => write!(f, "{actual} played but the trick is closed"),
            StateError::CardNotHeld { seat, card } => write!(f, "{seat} does not hold {card}"),
            StateError::MustFollowSuit { seat, card, lead } => {
                write!(f, "{seat} played {card} while holding {}", lead.name())
            }
            StateError::TrickIncomplete => write!(f, "trick does not have four plays"),
            StateError::Trick(err) => write!(f, "{err}"),
            StateError::ConservationBroken { seat, held, played } => write!(
                f,
                "{seat} holds {held} card(s) after playing {played}, expected {CARDS_PER_HAND} in total"
            ),
            StateError::CardSeenTwice(card) => write!(f, "{card} is both played and held"),
        }
    }
}

impl std::error::Error for StateError {}

impl From<TrickError> for StateError {
    fn from(err: TrickError) -> Self {
        StateError::Trick(err)
    }
}

/// Mutable play state for one deal. Cloned per simulated trial.
#[derive(Debug, Clone)]
pub struct GameState {
    hands: [Hand; 4],
    contract: Contract,
    leader: Seat,
    current: Trick,
    declarer_tricks: u8,
    defense_tricks: u8,
    history: Vec<TrickRecord>,
    played: CardSet,
    played_by: [u8; 4],
}

impl GameState {
    pub fn new(deal: &Deal) -> Self {
        let leader = deal.opening_lead().seat;
        Self {
            hands: deal.hands().clone(),
            contract: deal.contract(),
            leader,
            current: Trick::new(leader),
            declarer_tricks: 0,
            defense_tricks: 0,
            history: Vec::with_capacity(TOTAL_TRICKS as usize),
            played: CardSet::new(),
            played_by: [0; 4],
        }
    }

    pub fn hand(&self, seat: Seat) -> &Hand {
        &self.hands[seat.index()]
    }

    pub fn contract(&self) -> Contract {
        self.contract
    }

    pub fn leader(&self) -> Seat {
        self.leader
    }

    pub fn current_trick(&self) -> &Trick {
        &self.current
    }

    pub fn history(&self) -> &[TrickRecord] {
        &self.history
    }

    pub fn played(&self) -> &CardSet {
        &self.played
    }

    pub fn declarer_tricks(&self) -> u8 {
        self.declarer_tricks
    }

    pub fn defense_tricks(&self) -> u8 {
        self.defense_tricks
    }

    pub fn tricks_played(&self) -> u8 {
        self.history.len() as u8
    }

    pub fn tricks_remaining(&self) -> u8 {
        TOTAL_TRICKS.saturating_sub(self.tricks_played())
    }

    pub fn tricks_still_needed(&self) -> u8 {
        self.contract
            .tricks_needed()
            .saturating_sub(self.declarer_tricks)
    }

    pub fn verdict(&self) -> Verdict {
        self.contract.verdict(self.declarer_tricks)
    }

    /// Next seat in rotation from the leader that has not played to this
    /// trick and still holds cards.
    pub fn next_to_play(&self) -> Option<Seat> {
        if self.current.is_complete() {
            return None;
        }
        rules::rotation_from(self.leader).into_iter().find(|seat| {
            !self.hand(*seat).is_empty()
                && !self.current.plays().iter().any(|play| play.seat == *seat)
        })
    }

    pub fn legal_cards(&self, seat: Seat) -> Vec<Card> {
        rules::legal_cards(self.hand(seat), self.current.lead_suit())
    }

    pub fn play(&mut self, seat: Seat, card: Card) -> Result<(), StateError> {
        let expected = self.next_to_play();
        if expected != Some(seat) {
            return Err(StateError::OutOfTurn {
                expected,
                actual: seat,
            });
        }
        let hand = &self.hands[seat.index()];
        if !hand.contains(card) {
            return Err(StateError::CardNotHeld { seat, card });
        }
        let lead = self.current.lead_suit();
        if !rules::is_legal(hand, lead, card) {
            return Err(StateError::MustFollowSuit {
                seat,
                card,
                lead: lead.unwrap_or(card.suit),
            });
        }

        self.current.play(seat, card)?;
        self.hands[seat.index()].remove(card);
        self.played.insert(card);
        self.played_by[seat.index()] += 1;
        Ok(())
    }

    /// Credits a four-card trick to the winning side and starts the next one.
    pub fn complete_trick(&mut self) -> Result<Seat, StateError> {
        if !self.current.is_complete() {
            return Err(StateError::TrickIncomplete);
        }
        let winner = self
            .current
            .current_winner(self.contract.strain)
            .map(|play| play.seat)
            .ok_or(StateError::TrickIncomplete)?;

        if self.contract.is_declarer_side(winner) {
            self.declarer_tricks += 1;
        } else {
            self.defense_tricks += 1;
        }

        let number = self.tricks_played() + 1;
        let finished = std::mem::replace(&mut self.current, Trick::new(winner));
        self.history.push(TrickRecord {
            number,
            leader: finished.leader(),
            winner,
            plays: finished.plays().to_vec(),
        });
        self.leader = winner;
        Ok(winner)
    }

    /// Play ends when nobody is left to play: every hand is empty, or the
    /// open trick can no longer be completed. A full trick still waiting to
    /// be credited does not end play.
    pub fn is_finished(&self) -> bool {
        !self.current.is_complete() && self.next_to_play().is_none()
    }

    /// Cards of `suit` still held by the three seats other than `viewer`.
    pub fn unseen_in_suit(&self, viewer: Seat, suit: Suit) -> Vec<Card> {
        Seat::LOOP
            .iter()
            .filter(|seat| **seat != viewer)
            .flat_map(|seat| self.hand(*seat).cards_in_suit(suit))
            .collect()
    }

    /// Every card is either held or played, never both, and every seat
    /// accounts for its thirteen.
    pub fn check_conservation(&self) -> Result<(), StateError> {
        for seat in Seat::LOOP {
            let held = self.hand(seat).len();
            let played = self.played_by[seat.index()];
            if held + played as usize != CARDS_PER_HAND {
                return Err(StateError::ConservationBroken { seat, held, played });
            }
            if let Some(card) = self.hand(seat).iter().find(|card| self.played.contains(**card)) {
                return Err(StateError::CardSeenTwice(*card));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{GameState, StateError};
    use crate::game::deal::Deal;
    use crate::model::card::Card;
    use crate::model::contract::Verdict;
    use crate::model::seat::Seat;

    const SAMPLE: &str = include_str!("../../../../deals/4H.json");

    fn card(code: &str) -> Card {
        code.parse().unwrap()
    }

    fn state() -> GameState {
        GameState::new(&Deal::from_json(SAMPLE).unwrap())
    }

    #[test]
    fn opening_leader_is_west() {
        let state = state();
        assert_eq!(state.next_to_play(), Some(Seat::West));
        assert_eq!(state.tricks_remaining(), 13);
        assert_eq!(state.tricks_still_needed(), 10);
    }

    #[test]
    fn rejects_out_of_turn_and_revoke() {
        let mut state = state();
        assert!(matches!(
            state.play(Seat::North, card("C3")),
            Err(StateError::OutOfTurn { .. })
        ));
        state.play(Seat::West, card("C9")).unwrap();
        assert!(matches!(
            state.play(Seat::North, card("SA")),
            Err(StateError::MustFollowSuit { .. })
        ));
        assert!(matches!(
            state.play(Seat::North, card("CA")),
            Err(StateError::CardNotHeld { .. })
        ));
    }

    #[test]
    fn completes_first_trick_and_credits_winner() {
        let mut state = state();
        for (seat, code) in [
            (Seat::West, "C9"),
            (Seat::North, "C3"),
            (Seat::East, "CT"),
            (Seat::South, "CA"),
        ] {
            state.play(seat, card(code)).unwrap();
            state.check_conservation().unwrap();
        }
        assert_eq!(state.next_to_play(), None);
        assert_eq!(state.complete_trick(), Ok(Seat::South));
        assert_eq!(state.declarer_tricks(), 1);
        assert_eq!(state.leader(), Seat::South);
        assert_eq!(state.history()[0].number, 1);
        assert_eq!(state.history()[0].plays.len(), 4);
        assert_eq!(state.played().len(), 4);
        state.check_conservation().unwrap();
    }

    #[test]
    fn incomplete_trick_cannot_be_closed() {
        let mut state = state();
        state.play(Seat::West, card("C9")).unwrap();
        assert_eq!(state.complete_trick(), Err(StateError::TrickIncomplete));
        assert!(!state.is_finished());
    }

    #[test]
    fn unseen_cards_exclude_viewer() {
        let state = state();
        let unseen = state.unseen_in_suit(Seat::South, crate::model::suit::Suit::Hearts);
        assert_eq!(unseen.len(), 8);
        assert!(!unseen.contains(&card("HA")));
    }

    #[test]
    fn verdict_tracks_declarer_tricks() {
        let state = state();
        assert_eq!(state.verdict(), Verdict::Down { undertricks: 10 });
    }
}
