use core::fmt;
use serde::{Deserialize, Serialize};

/// Compass seat at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Seat {
    #[serde(rename = "N")]
    North = 0,
    #[serde(rename = "E")]
    East = 1,
    #[serde(rename = "S")]
    South = 2,
    #[serde(rename = "W")]
    West = 3,
}

impl Seat {
    pub const LOOP: [Seat; 4] = [Seat::North, Seat::East, Seat::South, Seat::West];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Seat::North),
            1 => Some(Seat::East),
            2 => Some(Seat::South),
            3 => Some(Seat::West),
            _ => None,
        }
    }

    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter.trim().to_ascii_uppercase().as_str() {
            "N" => Some(Seat::North),
            "E" => Some(Seat::East),
            "S" => Some(Seat::South),
            "W" => Some(Seat::West),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Clockwise neighbour: the seat that plays after this one.
    pub const fn next(self) -> Seat {
        match self {
            Seat::North => Seat::East,
            Seat::East => Seat::South,
            Seat::South => Seat::West,
            Seat::West => Seat::North,
        }
    }

    pub const fn previous(self) -> Seat {
        match self {
            Seat::North => Seat::West,
            Seat::East => Seat::North,
            Seat::South => Seat::East,
            Seat::West => Seat::South,
        }
    }

    pub const fn partner(self) -> Seat {
        match self {
            Seat::North => Seat::South,
            Seat::East => Seat::West,
            Seat::South => Seat::North,
            Seat::West => Seat::East,
        }
    }

    pub const fn side(self) -> Side {
        match self {
            Seat::North | Seat::South => Side::NorthSouth,
            Seat::East | Seat::West => Side::EastWest,
        }
    }

    pub const fn letter(self) -> char {
        match self {
            Seat::North => 'N',
            Seat::East => 'E',
            Seat::South => 'S',
            Seat::West => 'W',
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Seat::North => "North",
            Seat::East => "East",
            Seat::South => "South",
            Seat::West => "West",
        };
        f.write_str(label)
    }
}

/// Partnership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    NorthSouth,
    EastWest,
}

impl Side {
    pub const fn seats(self) -> [Seat; 2] {
        match self {
            Side::NorthSouth => [Seat::North, Seat::South],
            Side::EastWest => [Seat::East, Seat::West],
        }
    }

    pub const fn opponents(self) -> Side {
        match self {
            Side::NorthSouth => Side::EastWest,
            Side::EastWest => Side::NorthSouth,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::NorthSouth => f.write_str("North-South"),
            Side::EastWest => f.write_str("East-West"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Seat, Side};

    #[test]
    fn next_wraps_around() {
        assert_eq!(Seat::West.next(), Seat::North);
        assert_eq!(Seat::North.previous(), Seat::West);
    }

    #[test]
    fn partnerships_are_fixed() {
        assert_eq!(Seat::North.partner(), Seat::South);
        assert_eq!(Seat::East.partner(), Seat::West);
        assert_eq!(Seat::West.side(), Side::EastWest);
        assert_eq!(Side::NorthSouth.opponents(), Side::EastWest);
    }

    #[test]
    fn index_roundtrip() {
        for (i, seat) in Seat::LOOP.iter().enumerate() {
            assert_eq!(Seat::from_index(i), Some(*seat));
            assert_eq!(seat.index(), i);
            assert_eq!(Seat::from_letter(&seat.letter().to_string()), Some(*seat));
        }
    }

    #[test]
    fn serializes_as_letters() {
        assert_eq!(serde_json::to_string(&Seat::East).unwrap(), "\"E\"");
        let seat: Seat = serde_json::from_str("\"W\"").unwrap();
        assert_eq!(seat, Seat::West);
    }
}
