use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::contract::{Contract, Strain};
use crate::model::deck::Deck;
use crate::model::hand::Hand;
use crate::model::seat::Seat;
use crate::model::trick::Play;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const CARDS_PER_HAND: usize = 13;

/// On-disk deal layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealRecord {
    pub hands: BTreeMap<String, Vec<String>>,
    pub declarer: String,
    pub trump: String,
    pub contract_level: u8,
    pub lead: LeadRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub card: String,
    pub player: String,
}

#[derive(Debug)]
pub enum DealError {
    Io { path: PathBuf, source: std::io::Error },
    Json(serde_json::Error),
    UnknownSeat(String),
    MissingSeat(Seat),
    WrongCardCount { seat: Seat, count: usize },
    UnknownCard(String),
    DuplicateCard(Card),
    IncompleteDeck { missing: usize },
    InvalidLevel(u8),
    InvalidStrain(String),
    LeadNotHeld { card: Card, seat: Seat },
    WrongLeader { expected: Seat, actual: Seat },
}

impl fmt::Display for DealError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DealError::Io { path, source } => {
                write!(f, "failed to read deal {}: {source}", path.display())
            }
            DealError::Json(source) => write!(f, "malformed deal JSON: {source}"),
            DealError::UnknownSeat(value) => write!(f, "unknown seat '{value}'"),
            DealError::MissingSeat(seat) => write!(f, "no hand given for {seat}"),
            DealError::WrongCardCount { seat, count } => {
                write!(f, "{seat} holds {count} cards, expected {CARDS_PER_HAND}")
            }
            DealError::UnknownCard(code) => write!(f, "unknown card code '{code}'"),
            DealError::DuplicateCard(card) => write!(f, "card {card} dealt more than once"),
            DealError::IncompleteDeck { missing } => {
                write!(f, "deal is missing {missing} card(s) of the deck")
            }
            DealError::InvalidLevel(level) => {
                write!(f, "contract level {level} outside 1..=7")
            }
            DealError::InvalidStrain(value) => write!(f, "unknown trump designation '{value}'"),
            DealError::LeadNotHeld { card, seat } => {
                write!(f, "opening lead {card} is not in {seat}'s hand")
            }
            DealError::WrongLeader { expected, actual } => {
                write!(f, "opening lead must come from {expected}, not {actual}")
            }
        }
    }
}

impl std::error::Error for DealError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DealError::Io { source, .. } => Some(source),
            DealError::Json(source) => Some(source),
            _ => None,
        }
    }
}

/// A validated deal: four 13-card hands, the contract and the opening lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    hands: [Hand; 4],
    contract: Contract,
    opening_lead: Play,
}

impl Deal {
    pub fn new(
        hands: [Vec<Card>; 4],
        contract: Contract,
        opening_lead: Play,
    ) -> Result<Self, DealError> {
        if !(1..=7).contains(&contract.level) {
            return Err(DealError::InvalidLevel(contract.level));
        }

        let mut seen = CardSet::new();
        for (seat, cards) in Seat::LOOP.iter().zip(hands.iter()) {
            if cards.len() != CARDS_PER_HAND {
                return Err(DealError::WrongCardCount {
                    seat: *seat,
                    count: cards.len(),
                });
            }
            for card in cards {
                if !seen.insert(*card) {
                    return Err(DealError::DuplicateCard(*card));
                }
            }
        }
        if seen.len() != 52 {
            return Err(DealError::IncompleteDeck {
                missing: 52 - seen.len(),
            });
        }

        let expected = contract.opening_leader();
        if opening_lead.seat != expected {
            return Err(DealError::WrongLeader {
                expected,
                actual: opening_lead.seat,
            });
        }
        if !hands[opening_lead.seat.index()].contains(&opening_lead.card) {
            return Err(DealError::LeadNotHeld {
                card: opening_lead.card,
                seat: opening_lead.seat,
            });
        }

        Ok(Self {
            hands: hands.map(Hand::with_cards),
            contract,
            opening_lead,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, DealError> {
        let contents = fs::read_to_string(path).map_err(|source| DealError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, DealError> {
        let record: DealRecord =
            serde_json::from_str(json).map_err(DealError::Json)?;
        Self::try_from(record)
    }

    /// Deals a deck in 13-card blocks (North first). The opening leader leads
    /// the lowest card of their longest suit.
    pub fn from_deck(deck: &Deck, contract: Contract) -> Result<Self, DealError> {
        let blocks = deck.deal_blocks();
        let leader = contract.opening_leader();
        let leader_hand = Hand::with_cards(blocks[leader.index()].clone());
        let card = longest_suit_low_card(&leader_hand).ok_or(DealError::WrongCardCount {
            seat: leader,
            count: 0,
        })?;
        Self::new(blocks, contract, Play { seat: leader, card })
    }

    pub fn hand(&self, seat: Seat) -> &Hand {
        &self.hands[seat.index()]
    }

    pub fn hands(&self) -> &[Hand; 4] {
        &self.hands
    }

    pub fn contract(&self) -> Contract {
        self.contract
    }

    pub fn opening_lead(&self) -> Play {
        self.opening_lead
    }

    pub fn to_record(&self) -> DealRecord {
        let hands = Seat::LOOP
            .iter()
            .map(|seat| {
                let codes = self.hand(*seat).iter().map(Card::to_string).collect();
                (seat.letter().to_string(), codes)
            })
            .collect();
        DealRecord {
            hands,
            declarer: self.contract.declarer.letter().to_string(),
            trump: self.contract.strain.to_string(),
            contract_level: self.contract.level,
            lead: LeadRecord {
                card: self.opening_lead.card.to_string(),
                player: self.opening_lead.seat.letter().to_string(),
            },
        }
    }
}

fn longest_suit_low_card(hand: &Hand) -> Option<Card> {
    let mut best: Option<(usize, Card)> = None;
    for card in hand.iter().copied() {
        let length = hand.suit_count(card.suit);
        match best {
            Some((best_len, _)) if best_len >= length => {}
            _ => best = Some((length, card)),
        }
    }
    best.map(|(_, card)| card)
}

fn parse_seat(value: &str) -> Result<Seat, DealError> {
    Seat::from_letter(value).ok_or_else(|| DealError::UnknownSeat(value.to_string()))
}

fn parse_card(code: &str) -> Result<Card, DealError> {
    code.parse()
        .map_err(|_| DealError::UnknownCard(code.to_string()))
}

impl TryFrom<DealRecord> for Deal {
    type Error = DealError;

    fn try_from(record: DealRecord) -> Result<Self, Self::Error> {
        let mut hands: [Option<Vec<Card>>; 4] = Default::default();
        for (label, codes) in &record.hands {
            let seat = parse_seat(label)?;
            let cards = codes
                .iter()
                .map(|code| parse_card(code))
                .collect::<Result<Vec<_>, _>>()?;
            hands[seat.index()] = Some(cards);
        }
        let mut complete: [Vec<Card>; 4] = Default::default();
        for seat in Seat::LOOP {
            complete[seat.index()] = hands[seat.index()]
                .take()
                .ok_or(DealError::MissingSeat(seat))?;
        }

        let declarer = parse_seat(&record.declarer)?;
        let strain: Strain = record
            .trump
            .parse()
            .map_err(|_| DealError::InvalidStrain(record.trump.clone()))?;
        let contract = Contract::new(record.contract_level, strain, declarer);
        let lead = Play {
            seat: parse_seat(&record.lead.player)?,
            card: parse_card(&record.lead.card)?,
        };
        Deal::new(complete, contract, lead)
    }
}

impl fmt::Display for Deal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Contract: {}", self.contract)?;
        writeln!(
            f,
            "Opening lead: {} from {}",
            self.opening_lead.card, self.opening_lead.seat
        )?;
        for seat in Seat::LOOP {
            writeln!(f, "{:<6} {}", seat.to_string(), self.hand(seat))?;
        }
        Ok(())
    }
}
