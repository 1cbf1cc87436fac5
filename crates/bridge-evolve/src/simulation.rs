//! Plays one deal to the end with declarer and defence choosers.

use bridge_bot::{CardChooser, PlayContext};
use bridge_core::game::deal::Deal;
use bridge_core::game::state::{GameState, StateError};
use bridge_core::model::card::Card;
use bridge_core::model::contract::Verdict;
use bridge_core::model::seat::Seat;
use bridge_core::model::trick::Play;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("{seat} chose {card}, which is not a legal play")]
    IllegalCard { seat: Seat, card: Card },
    #[error("{seat} is on turn but no card was chosen")]
    NoCard { seat: Seat },
    #[error(transparent)]
    State(#[from] StateError),
}

/// Driver phase. Trick 1 is played under `OpeningLead`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    OpeningLead,
    Trick(u8),
    Done,
}

#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub state: GameState,
    pub made: bool,
    pub verdict: Verdict,
}

/// Step-wise play of a single deal. Each `step` plays one card or closes
/// one trick.
pub struct Simulation<'a> {
    state: GameState,
    phase: Phase,
    opening_lead: Play,
    declarer: &'a dyn CardChooser,
    defense: &'a dyn CardChooser,
}

impl<'a> Simulation<'a> {
    pub fn new(deal: &Deal, declarer: &'a dyn CardChooser, defense: &'a dyn CardChooser) -> Self {
        Self {
            state: GameState::new(deal),
            phase: Phase::Init,
            opening_lead: deal.opening_lead(),
            declarer,
            defense,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn step(&mut self) -> Result<Phase, SimulationError> {
        match self.phase {
            Phase::Init => {
                self.phase = Phase::OpeningLead;
                return Ok(self.phase);
            }
            Phase::Done => return Ok(Phase::Done),
            Phase::OpeningLead | Phase::Trick(_) => {}
        }

        if self.state.tricks_played() == 0 && self.state.current_trick().is_empty() {
            let Play { seat, card } = self.opening_lead;
            self.state.play(seat, card)?;
        } else if let Some(seat) = self.state.next_to_play() {
            let card = self.choose(seat)?;
            self.state.play(seat, card)?;
        } else if self.state.current_trick().is_complete() {
            self.state.complete_trick()?;
        }

        self.phase = if self.state.is_finished() {
            Phase::Done
        } else if self.state.tricks_played() == 0 {
            Phase::OpeningLead
        } else {
            Phase::Trick(self.state.tricks_played() + 1)
        };
        Ok(self.phase)
    }

    pub fn run(mut self) -> Result<SimulationOutcome, SimulationError> {
        while self.step()? != Phase::Done {}
        Ok(self.finish())
    }

    pub fn finish(self) -> SimulationOutcome {
        let verdict = self.state.verdict();
        SimulationOutcome {
            state: self.state,
            made: verdict.is_made(),
            verdict,
        }
    }

    fn choose(&self, seat: Seat) -> Result<Card, SimulationError> {
        let ctx = PlayContext::new(seat, &self.state);
        let chooser = if self.state.contract().is_declarer_side(seat) {
            self.declarer
        } else {
            self.defense
        };
        let card = chooser.choose(&ctx).ok_or(SimulationError::NoCard { seat })?;
        if !ctx.legal_cards().contains(&card) {
            return Err(SimulationError::IllegalCard { seat, card });
        }
        Ok(card)
    }
}

/// Plays `deal` to completion.
pub fn simulate(
    deal: &Deal,
    declarer: &dyn CardChooser,
    defense: &dyn CardChooser,
) -> Result<SimulationOutcome, SimulationError> {
    Simulation::new(deal, declarer, defense).run()
}

#[cfg(test)]
mod tests {
    use super::{Phase, Simulation, SimulationError, simulate};
    use bridge_bot::{CardChooser, DeclarerStrategy, DefensePolicy, Genome, PlayContext};
    use bridge_core::game::deal::Deal;
    use bridge_core::model::card::Card;
    use bridge_core::model::contract::{Contract, Strain};
    use bridge_core::model::deck::Deck;
    use bridge_core::model::seat::Seat;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const SAMPLE: &str = include_str!("../../../deals/4H.json");

    struct Revoker;

    impl CardChooser for Revoker {
        fn choose(&self, ctx: &PlayContext<'_>) -> Option<Card> {
            let legal = ctx.legal_cards();
            ctx.state
                .hand(ctx.seat)
                .iter()
                .copied()
                .find(|card| !legal.contains(card))
                .or_else(|| legal.first().copied())
        }
    }

    fn strategy(seed: u64) -> DeclarerStrategy {
        let mut rng = StdRng::seed_from_u64(seed);
        DeclarerStrategy::new(Genome::random(60, &mut rng).unwrap())
    }

    #[test]
    fn phases_advance_in_order() {
        let deal = Deal::from_json(SAMPLE).unwrap();
        let declarer = strategy(1);
        let defense = DefensePolicy::new();
        let mut sim = Simulation::new(&deal, &declarer, &defense);
        assert_eq!(sim.phase(), Phase::Init);
        assert_eq!(sim.step().unwrap(), Phase::OpeningLead);
        assert_eq!(sim.step().unwrap(), Phase::OpeningLead);
        assert_eq!(sim.state().current_trick().plays()[0].card, deal.opening_lead().card);

        let mut seen = vec![];
        loop {
            let phase = sim.step().unwrap();
            if seen.last() != Some(&phase) {
                seen.push(phase);
            }
            sim.state().check_conservation().unwrap();
            if phase == Phase::Done {
                break;
            }
        }
        let mut expected = vec![Phase::OpeningLead];
        expected.extend((2..=13).map(Phase::Trick));
        expected.push(Phase::Done);
        assert_eq!(seen, expected);
        assert_eq!(sim.state().tricks_played(), 13);
        assert_eq!(sim.step().unwrap(), Phase::Done);
    }

    #[test]
    fn conserves_cards_on_many_seeded_deals() {
        let defense = DefensePolicy::new();
        for seed in 0..25u64 {
            let contract = Contract::new(
                (seed % 7) as u8 + 1,
                if seed % 2 == 0 { Strain::NoTrump } else { "S".parse().unwrap() },
                Seat::LOOP[(seed % 4) as usize],
            );
            let deal = Deal::from_deck(&Deck::shuffled_with_seed(seed), contract).unwrap();
            let declarer = strategy(seed);
            let mut sim = Simulation::new(&deal, &declarer, &defense);
            while sim.step().unwrap() != Phase::Done {
                sim.state().check_conservation().unwrap();
            }
            let outcome = sim.finish();
            let tricks = outcome.state.declarer_tricks();
            assert_eq!(tricks + outcome.state.defense_tricks(), 13);
            assert_eq!(outcome.made, tricks >= contract.tricks_needed());
        }
    }

    #[test]
    fn same_genome_same_history() {
        let deal = Deal::from_json(SAMPLE).unwrap();
        let defense = DefensePolicy::new();
        let first = simulate(&deal, &strategy(5), &defense).unwrap();
        let second = simulate(&deal, &strategy(5), &defense).unwrap();
        assert_eq!(first.state.history(), second.state.history());
        assert_eq!(first.verdict, second.verdict);
    }

    #[test]
    fn illegal_choice_is_fatal() {
        let deal = Deal::from_json(SAMPLE).unwrap();
        let defense = DefensePolicy::new();
        let err = simulate(&deal, &Revoker, &defense).unwrap_err();
        assert!(matches!(err, SimulationError::IllegalCard { seat: Seat::North, .. }));
    }
}
