//! Scores for cards thrown when void in the led suit.

use crate::policy::PlayContext;
use bridge_core::model::card::Card;
use bridge_core::model::rank::Rank;
use bridge_core::model::suit::Suit;

/// Cards of the same suit above `card` still held by the other three seats.
fn higher_outstanding(ctx: &PlayContext<'_>, card: Card) -> usize {
    ctx.state
        .unseen_in_suit(ctx.seat, card.suit)
        .iter()
        .filter(|other| other.rank > card.rank)
        .count()
}

pub(super) fn trump_discard(ctx: &PlayContext<'_>, card: Card, trump: Suit) -> i32 {
    let higher = higher_outstanding(ctx, card);
    let mut score = i32::from(card.rank.value());
    score += match card.rank {
        Rank::Ace => 500,
        Rank::King if higher <= 1 => 200,
        Rank::Queen if higher <= 2 => 100,
        Rank::Jack if higher <= 3 => 75,
        _ => 0,
    };
    if card.suit == trump {
        score += 50;
    }
    score
}

pub(super) fn no_trump_discard(ctx: &PlayContext<'_>, card: Card) -> i32 {
    let higher = higher_outstanding(ctx, card);
    let mut score = i32::from(card.rank.value());
    score += match card.rank {
        Rank::Ace => 200,
        Rank::King if higher <= 1 => 100,
        Rank::Queen if higher <= 2 => 75,
        Rank::Jack if higher <= 3 => 50,
        Rank::Ten if higher <= 4 => 25,
        _ => 0,
    };
    if ctx.state.hand(ctx.seat).suit_count(card.suit) <= 2 {
        score += 10;
    }
    if card.suit.is_major() {
        score += 5;
    }
    score
}
