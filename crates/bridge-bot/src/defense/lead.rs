//! Scores for the card that starts a trick.

use bridge_core::model::card::Card;
use bridge_core::model::hand::Hand;
use bridge_core::model::rank::Rank;
use bridge_core::model::suit::Suit;

pub(super) fn trump_lead(hand: &Hand, card: Card, trump: Suit) -> i32 {
    let length = hand.suit_count(card.suit);
    let holds_ace = hand.contains(Card::new(Rank::Ace, card.suit));
    let is_trump = card.suit == trump;
    let king_from_ace_king = card.rank == Rank::King && holds_ace;
    let mut score = 0;

    match card.rank {
        Rank::Ace if !is_trump => score -= 50,
        Rank::Ace => {
            if hand.suit_count(trump) >= 5 {
                score -= 20;
            } else {
                score += 10;
            }
        }
        Rank::King if king_from_ace_king && !is_trump => score -= 40,
        _ => {}
    }

    // Singletons set up a ruff; a bare ace has to be cashed now.
    if length == 1 && !is_trump {
        if card.rank <= Rank::Ten {
            score -= 30;
        } else if card.rank == Rank::Ace {
            score -= 45;
        }
    }

    if is_trump {
        score += 15;
        if length >= 5 {
            score -= 10;
        }
    }

    if card.is_honor() && length <= 3 && card.rank != Rank::Ace && !king_from_ace_king {
        score += 25;
    }

    score
}

pub(super) fn no_trump_lead(hand: &Hand, card: Card) -> i32 {
    let mut holding: Vec<Card> = hand.cards_in_suit(card.suit).collect();
    holding.reverse();
    let length = holding.len() as i32;
    let mut score = -length * 8;

    let bonus = sequence_bonus(&holding, card);
    score -= bonus;

    if length >= 4 && bonus < 10 && holding.get(3) == Some(&card) {
        score -= 20;
    }

    if card.rank == Rank::Ace
        && !hand.contains(Card::new(Rank::King, card.suit))
        && length < 6
    {
        score += 25;
    }

    score
}

/// Bonus for leading from a run of touching cards. `holding` is high to low.
fn sequence_bonus(holding: &[Card], card: Card) -> i32 {
    if holding.len() < 2 {
        return 0;
    }
    let Some(index) = holding.iter().position(|held| *held == card) else {
        return 0;
    };
    let run = 1 + holding[index..]
        .windows(2)
        .take_while(|pair| pair[0].rank.value() == pair[1].rank.value() + 1)
        .count();
    match run {
        3.. => 25,
        2 if index == 0 => 15,
        2 => 10,
        _ => 0,
    }
}
