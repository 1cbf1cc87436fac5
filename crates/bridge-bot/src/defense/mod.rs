//! Rule-based defence. Every legal card is scored and the lowest score is
//! played; the first card in hand order wins ties.

mod discard;
mod follow;
mod lead;

use crate::policy::{CardChooser, PlayContext, first_min_by_key};
use bridge_core::game::rules;
use bridge_core::model::card::Card;
use bridge_core::model::suit::Suit;
use bridge_core::model::trick::Play;
use tracing::{Level, event};

/// Score returned for an honor thrown under an opponent's higher card.
pub const WASTED_HONOR_PENALTY: i32 = 500;

/// What the defender can see of the trick in progress.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TrickView {
    pub lead_suit: Option<Suit>,
    pub winner: Option<Play>,
    pub leader: Option<Play>,
    pub partner_winning: bool,
    pub position: usize,
}

impl TrickView {
    fn new(ctx: &PlayContext<'_>) -> Self {
        let winner = ctx.current_winner();
        Self {
            lead_suit: ctx.lead_suit(),
            winner,
            leader: ctx.plays().first().copied(),
            partner_winning: winner.is_some_and(|play| play.seat == ctx.seat.partner()),
            position: ctx.position(),
        }
    }

    /// Whether `card` would take over the trick from the current winner.
    pub fn beaten_by(&self, ctx: &PlayContext<'_>, card: Card) -> bool {
        match (self.winner, self.lead_suit) {
            (Some(winner), Some(lead)) => rules::beats(card, winner.card, lead, ctx.strain()),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefensePolicy;

impl DefensePolicy {
    pub fn new() -> Self {
        Self
    }

    /// Lower is better.
    pub fn score_card(&self, ctx: &PlayContext<'_>, card: Card) -> i32 {
        score(ctx, &TrickView::new(ctx), card)
    }
}

impl CardChooser for DefensePolicy {
    fn choose(&self, ctx: &PlayContext<'_>) -> Option<Card> {
        let legal = ctx.legal_cards();
        if legal.len() <= 1 {
            return legal.first().copied();
        }
        let view = TrickView::new(ctx);
        let (card, best) = first_min_by_key(&legal, |card| score(ctx, &view, card))?;
        log_defense_decision(ctx, &legal, card, best);
        Some(card)
    }
}

fn score(ctx: &PlayContext<'_>, view: &TrickView, card: Card) -> i32 {
    if wastes_honor(ctx, view, card) {
        return WASTED_HONOR_PENALTY;
    }
    let hand = ctx.state.hand(ctx.seat);
    match (view.lead_suit, ctx.trump()) {
        (None, Some(trump)) => lead::trump_lead(hand, card, trump),
        (None, None) => lead::no_trump_lead(hand, card),
        (Some(lead), Some(trump)) => follow::trump_follow(ctx, view, card, lead, trump),
        (Some(lead), None) => follow::no_trump_follow(ctx, view, card, lead),
    }
}

/// An honor of the winning card's suit that cannot beat an opponent's winner.
fn wastes_honor(ctx: &PlayContext<'_>, view: &TrickView, card: Card) -> bool {
    let (Some(lead), Some(winner)) = (view.lead_suit, view.winner) else {
        return false;
    };
    card.suit == lead
        && !view.partner_winning
        && ctx.state.contract().is_declarer_side(winner.seat)
        && card.is_honor()
        && card.suit == winner.card.suit
        && card.rank < winner.card.rank
}

fn log_defense_decision(ctx: &PlayContext<'_>, legal: &[Card], chosen: Card, score: i32) {
    if !tracing::enabled!(target: "bridge_bot::defense", Level::DEBUG) {
        return;
    }
    let legal_preview = if legal.len() <= 6 {
        legal
            .iter()
            .map(Card::to_string)
            .collect::<Vec<_>>()
            .join(",")
    } else {
        format!("{} moves", legal.len())
    };
    event!(
        target: "bridge_bot::defense",
        Level::DEBUG,
        seat = %ctx.seat,
        trick = ctx.state.tricks_played() + 1,
        position = ctx.position(),
        legal_moves = %legal_preview,
        chosen = %chosen,
        score,
    );
}
