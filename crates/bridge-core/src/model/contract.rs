use crate::model::seat::Seat;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Book tricks every contract level builds on.
pub const BOOK: u8 = 6;
pub const TOTAL_TRICKS: u8 = 13;

/// Denomination of the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Strain {
    Trump(Suit),
    NoTrump,
}

impl Strain {
    pub const fn trump(self) -> Option<Suit> {
        match self {
            Strain::Trump(suit) => Some(suit),
            Strain::NoTrump => None,
        }
    }

    pub fn is_trump(self, suit: Suit) -> bool {
        self.trump() == Some(suit)
    }
}

impl fmt::Display for Strain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strain::Trump(suit) => write!(f, "{suit}"),
            Strain::NoTrump => f.write_str("NT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrainParseError(pub String);

impl fmt::Display for StrainParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown strain '{}'", self.0)
    }
}

impl std::error::Error for StrainParseError {}

impl FromStr for Strain {
    type Err = StrainParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("NT") {
            return Ok(Strain::NoTrump);
        }
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => Suit::from_letter(letter)
                .map(Strain::Trump)
                .ok_or_else(|| StrainParseError(value.to_string())),
            _ => Err(StrainParseError(value.to_string())),
        }
    }
}

impl TryFrom<String> for Strain {
    type Error = StrainParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Strain> for String {
    fn from(strain: Strain) -> Self {
        strain.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub level: u8,
    pub strain: Strain,
    pub declarer: Seat,
}

impl Contract {
    pub const fn new(level: u8, strain: Strain, declarer: Seat) -> Self {
        Self {
            level,
            strain,
            declarer,
        }
    }

    pub const fn tricks_needed(&self) -> u8 {
        BOOK + self.level
    }

    pub const fn dummy(&self) -> Seat {
        self.declarer.partner()
    }

    pub const fn opening_leader(&self) -> Seat {
        self.declarer.next()
    }

    pub fn is_declarer_side(&self, seat: Seat) -> bool {
        seat == self.declarer || seat == self.dummy()
    }

    pub fn verdict(&self, declarer_tricks: u8) -> Verdict {
        let needed = self.tricks_needed();
        if declarer_tricks >= needed {
            Verdict::Made {
                overtricks: declarer_tricks - needed,
            }
        } else {
            Verdict::Down {
                undertricks: needed - declarer_tricks,
            }
        }
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} by {}", self.level, self.strain, self.declarer)
    }
}

/// Outcome of a contract once play has ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Verdict {
    Made { overtricks: u8 },
    Down { undertricks: u8 },
}

impl Verdict {
    pub const fn is_made(&self) -> bool {
        matches!(self, Verdict::Made { .. })
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Made { overtricks: 0 } => f.write_str("made"),
            Verdict::Made { overtricks } => write!(f, "made with {overtricks} overtrick(s)"),
            Verdict::Down { undertricks } => write!(f, "down {undertricks}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Contract, Strain, Verdict};
    use crate::model::seat::Seat;
    use crate::model::suit::Suit;

    #[test]
    fn parses_strains() {
        assert_eq!("nt".parse::<Strain>(), Ok(Strain::NoTrump));
        assert_eq!("H".parse::<Strain>(), Ok(Strain::Trump(Suit::Hearts)));
        assert!("HH".parse::<Strain>().is_err());
        assert!("X".parse::<Strain>().is_err());
    }

    #[test]
    fn derived_seats() {
        let contract = Contract::new(4, Strain::Trump(Suit::Hearts), Seat::South);
        assert_eq!(contract.dummy(), Seat::North);
        assert_eq!(contract.opening_leader(), Seat::West);
        assert!(contract.is_declarer_side(Seat::North));
        assert!(!contract.is_declarer_side(Seat::East));
        assert_eq!(contract.tricks_needed(), 10);
    }

    #[test]
    fn verdict_counts_are_non_negative() {
        let contract = Contract::new(3, Strain::NoTrump, Seat::North);
        assert_eq!(contract.verdict(9), Verdict::Made { overtricks: 0 });
        assert_eq!(contract.verdict(11), Verdict::Made { overtricks: 2 });
        assert_eq!(contract.verdict(6), Verdict::Down { undertricks: 3 });
        assert_eq!(contract.verdict(0), Verdict::Down { undertricks: 9 });
        let grand = Contract::new(7, Strain::NoTrump, Seat::North);
        assert_eq!(grand.verdict(13), Verdict::Made { overtricks: 0 });
        assert!(!grand.verdict(12).is_made());
    }

    #[test]
    fn displays_compactly() {
        let contract = Contract::new(4, Strain::Trump(Suit::Spades), Seat::East);
        assert_eq!(contract.to_string(), "4S by East");
        assert_eq!(Verdict::Down { undertricks: 2 }.to_string(), "down 2");
    }
}
