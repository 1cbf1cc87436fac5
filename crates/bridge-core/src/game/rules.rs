//! Trick-taking rules: legal cards, trick winners and turn rotation.

use crate::model::card::Card;
use crate::model::contract::Strain;
use crate::model::hand::Hand;
use crate::model::seat::Seat;
use crate::model::suit::Suit;
use crate::model::trick::Play;

/// Cards `hand` may play. Must follow `lead_suit` when able.
pub fn legal_cards(hand: &Hand, lead_suit: Option<Suit>) -> Vec<Card> {
    match lead_suit {
        Some(suit) if hand.has_suit(suit) => hand.cards_in_suit(suit).collect(),
        _ => hand.cards().to_vec(),
    }
}

pub fn is_legal(hand: &Hand, lead_suit: Option<Suit>, card: Card) -> bool {
    if !hand.contains(card) {
        return false;
    }
    match lead_suit {
        Some(suit) => card.suit == suit || !hand.has_suit(suit),
        None => true,
    }
}

/// Whether `challenger` takes over from `winner` in a trick led in `lead_suit`.
pub fn beats(challenger: Card, winner: Card, lead_suit: Suit, strain: Strain) -> bool {
    match strain.trump() {
        Some(trump) => {
            if challenger.suit == trump && winner.suit != trump {
                return true;
            }
            challenger.suit == winner.suit && challenger.rank > winner.rank
        }
        None => {
            challenger.suit == lead_suit
                && challenger.suit == winner.suit
                && challenger.rank > winner.rank
        }
    }
}

/// Left-to-right scan over a partial or complete trick.
pub fn current_winner(plays: &[Play], strain: Strain) -> Option<Play> {
    let (first, rest) = plays.split_first()?;
    let lead_suit = first.card.suit;
    let mut best = *first;
    for play in rest {
        if beats(play.card, best.card, lead_suit, strain) {
            best = *play;
        }
    }
    Some(best)
}

pub fn trick_winner(plays: &[Play], strain: Strain) -> Option<Seat> {
    current_winner(plays, strain).map(|play| play.seat)
}

/// The four seats in play order starting at `leader`.
pub fn rotation_from(leader: Seat) -> [Seat; 4] {
    let second = leader.next();
    let third = second.next();
    [leader, second, third, third.next()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::rank::Rank;

    fn play(seat: Seat, code: &str) -> Play {
        Play {
            seat,
            card: code.parse().unwrap(),
        }
    }

    fn hand(codes: &[&str]) -> Hand {
        Hand::with_cards(codes.iter().map(|code| code.parse().unwrap()).collect())
    }

    #[test]
    fn no_trump_highest_of_lead_suit_wins() {
        let plays = [
            play(Seat::West, "C10"),
            play(Seat::North, "C2"),
            play(Seat::East, "CA"),
            play(Seat::South, "CK"),
        ];
        assert_eq!(trick_winner(&plays, Strain::NoTrump), Some(Seat::East));
    }

    #[test]
    fn trump_beats_higher_side_suit_card() {
        let plays = [
            play(Seat::West, "C10"),
            play(Seat::North, "C2"),
            play(Seat::East, "H3"),
            play(Seat::South, "CK"),
        ];
        assert_eq!(
            trick_winner(&plays, Strain::Trump(Suit::Hearts)),
            Some(Seat::East)
        );
    }

    #[test]
    fn overtrump_wins() {
        let plays = [
            play(Seat::West, "CA"),
            play(Seat::North, "S2"),
            play(Seat::East, "S9"),
            play(Seat::South, "SJ"),
        ];
        assert_eq!(
            trick_winner(&plays, Strain::Trump(Suit::Spades)),
            Some(Seat::South)
        );
    }

    #[test]
    fn discards_never_win_in_no_trump() {
        let plays = [
            play(Seat::North, "D4"),
            play(Seat::East, "SA"),
            play(Seat::South, "HA"),
            play(Seat::West, "D3"),
        ];
        assert_eq!(trick_winner(&plays, Strain::NoTrump), Some(Seat::North));
        assert_eq!(
            trick_winner(&plays, Strain::Trump(Suit::Clubs)),
            Some(Seat::North)
        );
    }

    #[test]
    fn winner_is_pure() {
        let plays = [play(Seat::South, "HK"), play(Seat::West, "HA")];
        let first = trick_winner(&plays, Strain::NoTrump);
        let second = trick_winner(&plays, Strain::NoTrump);
        assert_eq!(first, second);
        assert_eq!(first, Some(Seat::West));
        assert_eq!(trick_winner(&[], Strain::NoTrump), None);
    }

    #[test]
    fn legal_cards_follow_suit_when_possible() {
        let held = hand(&["SA", "S4", "HK", "C2"]);
        let legal = legal_cards(&held, Some(Suit::Spades));
        assert_eq!(legal.len(), 2);
        assert!(legal.iter().all(|card| card.suit == Suit::Spades));
        assert_eq!(legal_cards(&held, Some(Suit::Diamonds)).len(), 4);
        assert_eq!(legal_cards(&held, None).len(), 4);
        assert!(!is_legal(&held, Some(Suit::Spades), "HK".parse().unwrap()));
        assert!(is_legal(&held, Some(Suit::Diamonds), "HK".parse().unwrap()));
        assert!(!is_legal(&held, None, Card::new(Rank::Ace, Suit::Diamonds)));
    }

    #[test]
    fn rotation_wraps_clockwise() {
        assert_eq!(
            rotation_from(Seat::West),
            [Seat::West, Seat::North, Seat::East, Seat::South]
        );
    }
}
