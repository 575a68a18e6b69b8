//! Lattice addressing for joint positions.
//!
//! Joints live on a small integer lattice. Each axis offset is written as a
//! single character of a seven-symbol alphabet centred on `M`:
//!
//! ```text
//!  J  K  L  M  N  O  P
//! -3 -2 -1  0 +1 +2 +3
//! ```
//!
//! The lattice is rotated 45° relative to world axes when rendered; the grammar
//! only ever deals with integer deltas, so the rotation never appears here.
//!
//! # Overview
//!
//! - [`symbol_for`] / [`offset_for`] - the character mapping in both directions.
//! - [`Position`] - a validated `(x, z)` lattice point.
//! - [`Direction`] - the four single-unit steps a connector can take.
//! - [`Midpoint`] - the geometric key of a connector between two positions.

use std::fmt;

use thiserror::Error;

/// Axis symbols ordered from the most negative to the most positive offset.
const ALPHABET: [char; 7] = ['J', 'K', 'L', 'M', 'N', 'O', 'P'];

/// Smallest addressable offset on either axis.
pub const MIN_OFFSET: i32 = -3;

/// Largest addressable offset on either axis.
pub const MAX_OFFSET: i32 = 3;

/// Errors raised when mapping between offsets and symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LatticeError {
    #[error("offset {0} is outside the addressable lattice (-3..=3)")]
    OffsetOutOfRange(i32),

    #[error("`{0}` is not a lattice symbol")]
    UnknownSymbol(char),
}

/// Returns the lattice symbol for an axis offset.
///
/// # Errors
///
/// Returns [`LatticeError::OffsetOutOfRange`] for offsets outside
/// [`MIN_OFFSET`]..=[`MAX_OFFSET`].
///
/// # Examples
///
/// ```
/// # use airframe_core::lattice::symbol_for;
/// assert_eq!(symbol_for(0), Ok('M'));
/// assert_eq!(symbol_for(-3), Ok('J'));
/// assert!(symbol_for(4).is_err());
/// ```
pub fn symbol_for(offset: i32) -> Result<char, LatticeError> {
    if !(MIN_OFFSET..=MAX_OFFSET).contains(&offset) {
        return Err(LatticeError::OffsetOutOfRange(offset));
    }
    Ok(ALPHABET[(offset - MIN_OFFSET) as usize])
}

/// Returns the axis offset encoded by a lattice symbol.
///
/// # Errors
///
/// Returns [`LatticeError::UnknownSymbol`] for characters outside the alphabet.
pub fn offset_for(symbol: char) -> Result<i32, LatticeError> {
    ALPHABET
        .iter()
        .position(|&candidate| candidate == symbol)
        .map(|index| index as i32 + MIN_OFFSET)
        .ok_or(LatticeError::UnknownSymbol(symbol))
}

/// Returns `true` if `symbol` belongs to the lattice alphabet.
pub fn is_symbol(symbol: char) -> bool {
    ALPHABET.contains(&symbol)
}

/// A point on the addressable lattice.
///
/// Both coordinates are guaranteed to lie in [`MIN_OFFSET`]..=[`MAX_OFFSET`], so
/// every position can be written back as two lattice symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    x: i32,
    z: i32,
}

impl Position {
    /// The lattice origin, home of the root joint.
    pub const ORIGIN: Position = Position { x: 0, z: 0 };

    /// Creates a position, validating both coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::OffsetOutOfRange`] for the first coordinate
    /// that cannot be addressed.
    pub fn new(x: i32, z: i32) -> Result<Self, LatticeError> {
        for offset in [x, z] {
            if !(MIN_OFFSET..=MAX_OFFSET).contains(&offset) {
                return Err(LatticeError::OffsetOutOfRange(offset));
            }
        }
        Ok(Self { x, z })
    }

    /// Creates a position from its two lattice symbols (x first, then z).
    pub fn from_symbols(x: char, z: char) -> Result<Self, LatticeError> {
        Ok(Self {
            x: offset_for(x)?,
            z: offset_for(z)?,
        })
    }

    /// Returns the x offset.
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Returns the z offset.
    pub fn z(&self) -> i32 {
        self.z
    }

    /// Returns the two lattice symbols for this position, x first.
    pub fn symbols(&self) -> (char, char) {
        (
            ALPHABET[(self.x - MIN_OFFSET) as usize],
            ALPHABET[(self.z - MIN_OFFSET) as usize],
        )
    }

    /// Returns the neighbouring position one unit away in `direction`.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::OffsetOutOfRange`] when the neighbour falls
    /// off the edge of the lattice.
    pub fn step(&self, direction: Direction) -> Result<Position, LatticeError> {
        let (dx, dz) = direction.delta();
        Position::new(self.x + dx, self.z + dz)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, z) = self.symbols();
        write!(f, "{x}{z}")
    }
}

/// A single-unit step along one lattice axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    PosX,
    NegX,
    PosZ,
    NegZ,
}

impl Direction {
    /// All directions, in handle order.
    pub const ALL: [Direction; 4] = [
        Direction::PosX,
        Direction::NegX,
        Direction::PosZ,
        Direction::NegZ,
    ];

    /// Returns the `(dx, dz)` delta of this step.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::PosX => (1, 0),
            Direction::NegX => (-1, 0),
            Direction::PosZ => (0, 1),
            Direction::NegZ => (0, -1),
        }
    }

    /// Returns the direction leading from `from` to `to`.
    ///
    /// Only single-unit single-axis deltas have a direction; diagonal,
    /// longer, or zero deltas return `None`.
    pub fn between(from: Position, to: Position) -> Option<Direction> {
        match (to.x - from.x, to.z - from.z) {
            (1, 0) => Some(Direction::PosX),
            (-1, 0) => Some(Direction::NegX),
            (0, 1) => Some(Direction::PosZ),
            (0, -1) => Some(Direction::NegZ),
            _ => None,
        }
    }

    /// Returns the direction pointing the opposite way.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::PosX => Direction::NegX,
            Direction::NegX => Direction::PosX,
            Direction::PosZ => Direction::NegZ,
            Direction::NegZ => Direction::PosZ,
        }
    }

    /// Returns the handle name used in activity logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::PosX => "posx",
            Direction::NegX => "negx",
            Direction::PosZ => "posz",
            Direction::NegZ => "negz",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Midpoint of a connector, in doubled lattice coordinates.
///
/// Doubling keeps the midpoint of two adjacent integer positions integral.
/// No two connectors of a graph may share a midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Midpoint {
    x2: i32,
    z2: i32,
}

impl Midpoint {
    /// Returns the midpoint between two positions.
    pub fn between(a: Position, b: Position) -> Self {
        Self {
            x2: a.x + b.x,
            z2: a.z + b.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_for_centre_and_edges() {
        assert_eq!(symbol_for(-3), Ok('J'));
        assert_eq!(symbol_for(0), Ok('M'));
        assert_eq!(symbol_for(3), Ok('P'));
    }

    #[test]
    fn test_symbol_for_out_of_range() {
        assert_eq!(symbol_for(4), Err(LatticeError::OffsetOutOfRange(4)));
        assert_eq!(symbol_for(-4), Err(LatticeError::OffsetOutOfRange(-4)));
    }

    #[test]
    fn test_offset_for_unknown_symbol() {
        assert_eq!(offset_for('Q'), Err(LatticeError::UnknownSymbol('Q')));
        assert_eq!(offset_for('m'), Err(LatticeError::UnknownSymbol('m')));
    }

    #[test]
    fn test_position_symbols() {
        let position = Position::new(1, -1).unwrap();
        assert_eq!(position.symbols(), ('N', 'L'));
        assert_eq!(position.to_string(), "NL");
        assert_eq!(Position::from_symbols('N', 'L'), Ok(position));
    }

    #[test]
    fn test_position_step_off_lattice() {
        let edge = Position::new(3, 0).unwrap();
        assert!(edge.step(Direction::PosX).is_err());
        assert_eq!(edge.step(Direction::NegX), Position::new(2, 0));
    }

    #[test]
    fn test_direction_between() {
        let origin = Position::ORIGIN;
        for direction in Direction::ALL {
            let neighbour = origin.step(direction).unwrap();
            assert_eq!(Direction::between(origin, neighbour), Some(direction));
            assert_eq!(
                Direction::between(neighbour, origin),
                Some(direction.opposite())
            );
        }
    }

    #[test]
    fn test_direction_between_rejects_other_deltas() {
        let origin = Position::ORIGIN;
        assert_eq!(Direction::between(origin, origin), None);
        assert_eq!(
            Direction::between(origin, Position::new(1, 1).unwrap()),
            None
        );
        assert_eq!(
            Direction::between(origin, Position::new(2, 0).unwrap()),
            None
        );
    }

    #[test]
    fn test_midpoint_is_symmetric() {
        let a = Position::ORIGIN;
        let b = Position::new(0, 1).unwrap();
        let c = Position::new(1, 0).unwrap();
        assert_eq!(Midpoint::between(a, b), Midpoint::between(b, a));
        assert_ne!(Midpoint::between(a, b), Midpoint::between(a, c));
    }
}
