//! Genome-weighted card selection for declarer and dummy.

use crate::filler::filler;
use crate::genome::Genome;
use crate::policy::{CardChooser, PlayContext, first_max_by_key};
use bridge_core::game::rules;
use bridge_core::model::card::Card;
use bridge_core::model::contract::TOTAL_TRICKS;
use bridge_core::model::rank::Rank;
use tracing::{Level, event};

#[derive(Debug, Clone, PartialEq)]
pub struct DeclarerStrategy {
    genome: Genome,
}

/// Running weighted sum; each feature takes the next gene.
struct Accumulator<'a> {
    genes: &'a [f64],
    slot: usize,
    total: f64,
}

impl<'a> Accumulator<'a> {
    fn new(genes: &'a [f64]) -> Self {
        Self {
            genes,
            slot: 0,
            total: 0.0,
        }
    }

    fn push(&mut self, value: f64) {
        if let Some(weight) = self.genes.get(self.slot) {
            self.total += weight * value;
        }
        self.slot += 1;
    }

    fn remaining(&self) -> std::ops::Range<usize> {
        self.slot..self.genes.len().max(self.slot)
    }
}

/// Score of one candidate plus how many named slots it consumed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardScore {
    pub total: f64,
    pub named_slots: usize,
}

impl DeclarerStrategy {
    pub fn new(genome: Genome) -> Self {
        Self { genome }
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    /// Higher is better. `legal` is the full legal set for the seat on turn.
    pub fn score_card(&self, ctx: &PlayContext<'_>, legal: &[Card], card: Card) -> CardScore {
        let state = ctx.state;
        let hand = state.hand(ctx.seat);
        let rank = f64::from(card.rank.value());
        let mut acc = Accumulator::new(self.genome.genes());

        acc.push(rank / 14.0);
        acc.push(if ctx.strain().is_trump(card.suit) { 1.0 } else { 0.0 });

        let length = hand.suit_count(card.suit);
        acc.push(length as f64 / 13.0);

        match ctx.position() {
            0 => {
                acc.push(1.0);
                acc.push(if length >= 4 { 1.0 } else { 0.0 });
                acc.push(if card.rank >= Rank::Queen { 1.0 } else { 0.0 });
            }
            3 => {
                acc.push(1.0);
                let wins = match (ctx.current_winner(), ctx.lead_suit()) {
                    (Some(winner), Some(lead)) => {
                        rules::beats(card, winner.card, lead, ctx.strain())
                    }
                    _ => false,
                };
                acc.push(if wins { 1.0 } else { 0.0 });
            }
            _ => acc.push(1.0),
        }

        if ctx.lead_suit() == Some(card.suit) {
            let higher = legal
                .iter()
                .filter(|other| other.suit == card.suit && other.rank > card.rank)
                .count();
            acc.push(1.0 - higher as f64 / 4.0);
        }

        let dummy = state.hand(state.contract().dummy());
        let dummy_ranks: Vec<f64> = dummy
            .cards_in_suit(card.suit)
            .map(|held| f64::from(held.rank.value()))
            .collect();
        if !dummy_ranks.is_empty() {
            let average = dummy_ranks.iter().sum::<f64>() / dummy_ranks.len() as f64;
            acc.push(average / 14.0);
        }

        let unseen = state.unseen_in_suit(ctx.seat, card.suit);
        if !unseen.is_empty() {
            let higher = unseen.iter().filter(|other| other.rank > card.rank).count();
            acc.push(1.0 - higher as f64 / unseen.len() as f64);
        }

        let played = state.tricks_played();
        let remaining = TOTAL_TRICKS.saturating_sub(played);
        if remaining > 0 {
            acc.push(f64::from(state.declarer_tricks()) / (f64::from(played) + 1.0));
        }

        if state.tricks_still_needed() > remaining {
            acc.push(rank / 14.0);
        }

        let named_slots = acc.slot;
        for slot in acc.remaining() {
            acc.push(filler(card, slot, played));
        }

        CardScore {
            total: acc.total,
            named_slots,
        }
    }
}

impl CardChooser for DeclarerStrategy {
    fn choose(&self, ctx: &PlayContext<'_>) -> Option<Card> {
        let legal = ctx.legal_cards();
        if legal.len() <= 1 {
            return legal.first().copied();
        }
        let (card, best) =
            first_max_by_key(&legal, |card| self.score_card(ctx, &legal, card).total)?;
        log_declarer_decision(ctx, legal.len(), card, best);
        Some(card)
    }
}

fn log_declarer_decision(ctx: &PlayContext<'_>, legal_count: usize, chosen: Card, score: f64) {
    if !tracing::enabled!(target: "bridge_bot::declarer", Level::DEBUG) {
        return;
    }
    event!(
        target: "bridge_bot::declarer",
        Level::DEBUG,
        seat = %ctx.seat,
        trick = ctx.state.tricks_played() + 1,
        position = ctx.position(),
        legal_count,
        chosen = %chosen,
        score,
    );
}
