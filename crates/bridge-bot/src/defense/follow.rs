//! Scores for the second, third and fourth cards of a trick.
//!
//! Low cards score low so the minimum lands on them. A card that takes the
//! trick from the declaring side drops into a winning tier below every
//! losing card, ordered by how much it overshoots the current winner.

use super::TrickView;
use super::discard::{no_trump_discard, trump_discard};
use crate::policy::PlayContext;
use bridge_core::model::card::Card;
use bridge_core::model::rank::Rank;
use bridge_core::model::suit::Suit;

const WINNING_TIER: i32 = -100;

fn rank(card: Card) -> i32 {
    i32::from(card.rank.value())
}

/// Rank gap between `card` and the current winner.
fn margin(view: &TrickView, card: Card) -> i32 {
    view.winner.map_or(0, |winner| rank(card) - rank(winner.card))
}

/// Mirrors a rank so that twos score lowest: 2 -> 13, A -> 1.
fn mirrored(card: Card) -> i32 {
    15 - rank(card)
}

pub(super) fn trump_follow(
    ctx: &PlayContext<'_>,
    view: &TrickView,
    card: Card,
    lead: Suit,
    trump: Suit,
) -> i32 {
    let beats = view.beaten_by(ctx, card);

    if view.partner_winning {
        return if card.suit == lead {
            rank(card) * 15 + if beats { 200 } else { 0 }
        } else if card.suit == trump {
            300
        } else {
            trump_discard(ctx, card, trump)
        };
    }

    if card.suit == lead {
        return if beats {
            WINNING_TIER + margin(view, card) * 5
        } else {
            rank(card) * 3
        };
    }

    if card.suit == trump {
        let Some(winner) = view.winner else {
            return 0;
        };
        if winner.card.suit != trump {
            let trumps = ctx.state.hand(ctx.seat).suit_count(trump);
            let weight = if trumps >= 3 { 8 } else { 4 };
            return -mirrored(card) * weight;
        }
        return if beats {
            margin(view, card) * 2
        } else {
            100
        };
    }

    trump_discard(ctx, card, trump)
}

pub(super) fn no_trump_follow(
    ctx: &PlayContext<'_>,
    view: &TrickView,
    card: Card,
    lead: Suit,
) -> i32 {
    let beats = view.beaten_by(ctx, card);

    if card.suit != lead {
        return no_trump_discard(ctx, card);
    }

    if view.partner_winning {
        return rank(card) * 10 + if beats { 50 } else { 0 };
    }

    match view.position {
        // Second hand low, but cover an honor with a near card.
        1 => {
            let honor_led = view
                .winner
                .is_some_and(|winner| winner.card.rank >= Rank::Queen);
            if honor_led && beats {
                let gap = margin(view, card);
                if gap <= 2 { gap - 20 } else { gap + 10 }
            } else {
                rank(card) * 2
            }
        }
        // Third hand high. Partner's winning lead was handled above.
        2 => {
            if beats {
                WINNING_TIER + margin(view, card) * 3
            } else {
                8 - rank(card)
            }
        }
        // Fourth hand wins as cheaply as it can.
        _ => {
            if beats {
                let support = view
                    .leader
                    .is_some_and(|leader| lead_suggests_strength(leader.card));
                WINNING_TIER + margin(view, card) * 2 - if support { 10 } else { 0 }
            } else {
                rank(card) * 3
            }
        }
    }
}

/// An honor or a low spot card is read as a lead from strength.
fn lead_suggests_strength(card: Card) -> bool {
    card.rank >= Rank::Jack || card.rank <= Rank::Seven
}
