//! Ports and tiles.
//!
//! Every tile has eight ports, two per side, numbered clockwise from the
//! top-left:
//!
//! ```text
//! +----0----1----+
//! 7              2
//! 6              3
//! +----5----4----+
//! ```
//!
//! A tile is a perfect matching of those eight ports into four edges.
//! Tiles compare equal (and hash equal) when one is a rotation of the other;
//! use [`Tile::same_orientation`] to compare exact layouts.
//!
//! ## The deck
//!
//! There are exactly 35 distinct tiles up to rotation. [`Tile::deck`] lists
//! them in a fixed order; a tile's position in that list is its wire index.

use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::error::{Result, TsuroError};
use super::position::Side;

/// Number of distinct tiles up to rotation.
pub const DECK_SIZE: usize = 35;

/// One of the eight connection points on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Port {
    TopLeft = 0,
    TopRight = 1,
    RightTop = 2,
    RightBottom = 3,
    BottomRight = 4,
    BottomLeft = 5,
    LeftBottom = 6,
    LeftTop = 7,
}

impl Port {
    /// All ports, clockwise from the top-left.
    pub const ALL: [Port; 8] = [
        Port::TopLeft,
        Port::TopRight,
        Port::RightTop,
        Port::RightBottom,
        Port::BottomRight,
        Port::BottomLeft,
        Port::LeftBottom,
        Port::LeftTop,
    ];

    const LETTERS: [char; 8] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];

    /// Look a port up by its numeric id.
    #[must_use]
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// The side of the tile this port sits on.
    #[must_use]
    pub const fn side(self) -> Side {
        match self {
            Port::TopLeft | Port::TopRight => Side::Top,
            Port::RightTop | Port::RightBottom => Side::Right,
            Port::BottomRight | Port::BottomLeft => Side::Bottom,
            Port::LeftBottom | Port::LeftTop => Side::Left,
        }
    }

    /// The port this one touches on the neighbouring tile.
    ///
    /// The top-left port of a tile touches the bottom-left port of the tile
    /// above it, and so on.
    #[must_use]
    pub const fn facing(self) -> Port {
        match self {
            Port::TopLeft => Port::BottomLeft,
            Port::TopRight => Port::BottomRight,
            Port::RightTop => Port::LeftTop,
            Port::RightBottom => Port::LeftBottom,
            Port::BottomRight => Port::TopRight,
            Port::BottomLeft => Port::TopLeft,
            Port::LeftBottom => Port::RightBottom,
            Port::LeftTop => Port::RightTop,
        }
    }

    /// This port after rotating its tile 90 degrees clockwise.
    #[must_use]
    pub fn rotated(self) -> Port {
        Self::ALL[usize::from((self.index() + 2) % 8)]
    }

    /// The network letter ("A".."H") for this port.
    #[must_use]
    pub fn letter(self) -> char {
        Self::LETTERS[usize::from(self.index())]
    }

    /// Parse a network letter.
    #[must_use]
    pub fn from_letter(letter: &str) -> Option<Self> {
        let mut chars = letter.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Self::LETTERS.iter().position(|&l| l == c).map(|i| Self::ALL[i])
    }
}

impl std::fmt::Display for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

type EdgeKey = [(u8, u8); 4];

/// An immutable Tsuro tile.
///
/// Edges are stored normalized (each pair ascending, pairs sorted) so that
/// two tiles with the same layout have identical `edges`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<(Port, Port)>", into = "Vec<(Port, Port)>")]
pub struct Tile {
    edges: [(Port, Port); 4],
    partners: [Port; 8],
    canonical: EdgeKey,
}

impl Tile {
    /// Create a tile from four edges that together use each port exactly once.
    pub fn new(edges: [(Port, Port); 4]) -> Result<Self> {
        let mut seen = [false; 8];
        for (a, b) in edges {
            for port in [a, b] {
                let slot = &mut seen[usize::from(port.index())];
                if *slot {
                    return Err(TsuroError::InvalidTile(format!("port {} appears twice", port)));
                }
                *slot = true;
            }
        }
        Ok(Self::build(edges))
    }

    /// Create a tile from numeric port pairs, e.g. `[(0, 1), (2, 3), (4, 5), (6, 7)]`.
    pub fn from_pairs(pairs: &[(u8, u8)]) -> Result<Self> {
        if pairs.len() != 4 {
            return Err(TsuroError::InvalidTile(format!("expected 4 edges, got {}", pairs.len())));
        }
        let port = |i: u8| {
            Port::from_index(i).ok_or_else(|| TsuroError::InvalidTile(format!("no port {}", i)))
        };
        let mut edges = [(Port::TopLeft, Port::TopLeft); 4];
        for (slot, &(a, b)) in edges.iter_mut().zip(pairs) {
            *slot = (port(a)?, port(b)?);
        }
        Self::new(edges)
    }

    fn build(edges: [(Port, Port); 4]) -> Self {
        let edges = normalize(edges);
        let mut partners = [Port::TopLeft; 8];
        for (a, b) in edges {
            partners[usize::from(a.index())] = b;
            partners[usize::from(b.index())] = a;
        }

        let mut canonical = key(&edges);
        let mut rotated = edges;
        for _ in 0..3 {
            rotated = normalize(rotated.map(|(a, b)| (a.rotated(), b.rotated())));
            canonical = canonical.min(key(&rotated));
        }

        Self { edges, partners, canonical }
    }

    /// The normalized edge list.
    #[must_use]
    pub fn edges(&self) -> &[(Port, Port); 4] {
        &self.edges
    }

    /// The port connected to `port` by this tile's edges.
    #[must_use]
    pub fn connected(&self, port: Port) -> Port {
        self.partners[usize::from(port.index())]
    }

    /// A copy of this tile rotated 90 degrees clockwise.
    #[must_use]
    pub fn rotate(&self) -> Tile {
        Self::build(self.edges.map(|(a, b)| (a.rotated(), b.rotated())))
    }

    /// The rotations by 0, 90, 180 and 270 degrees clockwise, in that order.
    ///
    /// Symmetric tiles produce repeated layouts; the array is always four long.
    #[must_use]
    pub fn all_rotations(&self) -> [Tile; 4] {
        let r90 = self.rotate();
        let r180 = r90.rotate();
        let r270 = r180.rotate();
        [*self, r90, r180, r270]
    }

    /// Exact layout equality (no rotation allowed).
    #[must_use]
    pub fn same_orientation(&self, other: &Tile) -> bool {
        self.edges == other.edges
    }

    /// The 35 distinct tiles, in wire-index order.
    pub fn deck() -> &'static [Tile] {
        static DECK: OnceLock<Vec<Tile>> = OnceLock::new();
        DECK.get_or_init(|| {
            let mut deck: Vec<Tile> = Vec::with_capacity(DECK_SIZE);
            for matching in matchings(&Port::ALL) {
                let mut edges = [(Port::TopLeft, Port::TopLeft); 4];
                edges.copy_from_slice(&matching);
                let tile = Tile::build(edges);
                if !deck.contains(&tile) {
                    deck.push(tile);
                }
            }
            debug_assert_eq!(deck.len(), DECK_SIZE);
            deck
        })
    }

    /// Look up a deck tile by wire index.
    pub fn from_index(index: u8) -> Result<Tile> {
        Self::deck()
            .get(usize::from(index))
            .copied()
            .ok_or_else(|| TsuroError::InvalidTile(format!("no tile with index {}", index)))
    }

    /// The wire index of this tile (rotation-independent).
    #[must_use]
    pub fn index(&self) -> u8 {
        Self::deck()
            .iter()
            .position(|t| t == self)
            .map_or(0, |i| i as u8)
    }

    /// The (index, clockwise angle) pattern that reproduces this exact layout.
    #[must_use]
    pub fn pattern(&self) -> TilePattern {
        let index = self.index();
        let base = Self::deck()[usize::from(index)];
        let angle = base
            .all_rotations()
            .iter()
            .position(|r| r.same_orientation(self))
            .map_or(0, |steps| steps as u16 * 90);
        TilePattern(index, angle)
    }
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for Tile {}

impl Hash for Tile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl TryFrom<Vec<(Port, Port)>> for Tile {
    type Error = TsuroError;

    fn try_from(edges: Vec<(Port, Port)>) -> Result<Self> {
        let edges: [(Port, Port); 4] = edges
            .try_into()
            .map_err(|v: Vec<_>| TsuroError::InvalidTile(format!("expected 4 edges, got {}", v.len())))?;
        Self::new(edges)
    }
}

impl From<Tile> for Vec<(Port, Port)> {
    fn from(tile: Tile) -> Self {
        tile.edges.to_vec()
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pattern = self.pattern();
        write!(f, "Tile#{}@{}", pattern.0, pattern.1)
    }
}

/// A tile as it travels on the wire: `[deck index, clockwise angle]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePattern(pub u8, pub u16);

impl TilePattern {
    /// Resolve to an oriented tile.
    pub fn to_tile(self) -> Result<Tile> {
        let TilePattern(index, angle) = self;
        if angle % 90 != 0 || angle >= 360 {
            return Err(TsuroError::InvalidTile(format!("invalid rotation angle {}", angle)));
        }
        let base = Tile::from_index(index)?;
        Ok(base.all_rotations()[usize::from(angle / 90)])
    }
}

fn normalize(edges: [(Port, Port); 4]) -> [(Port, Port); 4] {
    let mut edges = edges.map(|(a, b)| if a <= b { (a, b) } else { (b, a) });
    edges.sort();
    edges
}

fn key(edges: &[(Port, Port); 4]) -> EdgeKey {
    edges.map(|(a, b)| (a.index(), b.index()))
}

fn matchings(ports: &[Port]) -> Vec<Vec<(Port, Port)>> {
    let Some((&first, rest)) = ports.split_first() else {
        return vec![Vec::new()];
    };
    let mut out = Vec::new();
    for (i, &partner) in rest.iter().enumerate() {
        let remaining: Vec<Port> = rest
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, &p)| p)
            .collect();
        for mut tail in matchings(&remaining) {
            tail.insert(0, (first, partner));
            out.push(tail);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn tile(pairs: &[(u8, u8)]) -> Tile {
        Tile::from_pairs(pairs).unwrap()
    }

    #[test]
    fn test_invalid_tiles_rejected() {
        assert!(Tile::from_pairs(&[(0, 1), (2, 3), (4, 5)]).is_err());
        assert!(Tile::from_pairs(&[(0, 1), (1, 3), (4, 5), (6, 7)]).is_err());
        assert!(Tile::from_pairs(&[(0, 1), (2, 3), (4, 5), (6, 8)]).is_err());
    }

    #[test]
    fn test_connected_is_symmetric() {
        let t = tile(&[(0, 5), (1, 3), (2, 6), (4, 7)]);
        for port in Port::ALL {
            assert_eq!(t.connected(t.connected(port)), port);
            assert_ne!(t.connected(port), port);
        }
    }

    #[test]
    fn test_rotate_shifts_ports() {
        let t = tile(&[(0, 1), (2, 4), (3, 6), (5, 7)]);
        let r = t.rotate();
        assert_eq!(r.connected(Port::RightTop), Port::RightBottom);
        assert_eq!(r.connected(Port::BottomRight), Port::LeftBottom);
        assert!(!r.same_orientation(&t));
        assert_eq!(r, t);
    }

    #[test]
    fn test_symmetric_tile_rotations() {
        let t = tile(&[(0, 1), (2, 3), (4, 5), (6, 7)]);
        let rotations = t.all_rotations();
        assert_eq!(rotations.len(), 4);
        assert!(rotations.iter().all(|r| r.same_orientation(&t)));
    }

    #[test]
    fn test_deck_is_35_distinct_tiles() {
        let deck = Tile::deck();
        assert_eq!(deck.len(), DECK_SIZE);
        let unique: HashSet<Tile> = deck.iter().copied().collect();
        assert_eq!(unique.len(), DECK_SIZE);
        assert!(deck[0].same_orientation(&tile(&[(0, 1), (2, 3), (4, 5), (6, 7)])));
    }

    #[test]
    fn test_pattern_reproduces_orientation() {
        for base in Tile::deck() {
            for rotation in base.all_rotations() {
                let pattern = rotation.pattern();
                let back = pattern.to_tile().unwrap();
                assert!(back.same_orientation(&rotation));
            }
        }
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(TilePattern(35, 0).to_tile().is_err());
        assert!(TilePattern(0, 45).to_tile().is_err());
        assert!(TilePattern(0, 360).to_tile().is_err());
    }

    #[test]
    fn test_port_facing_is_involution() {
        for port in Port::ALL {
            assert_eq!(port.facing().facing(), port);
            assert_ne!(port.facing().side(), port.side());
        }
        assert_eq!(Port::TopLeft.facing(), Port::BottomLeft);
        assert_eq!(Port::RightBottom.facing(), Port::LeftBottom);
    }

    #[test]
    fn test_port_letters() {
        assert_eq!(Port::TopLeft.letter(), 'A');
        assert_eq!(Port::LeftTop.letter(), 'H');
        assert_eq!(Port::from_letter("D"), Some(Port::RightBottom));
        assert_eq!(Port::from_letter("Z"), None);
        assert_eq!(Port::from_letter("AB"), None);
    }

    #[test]
    fn test_tile_serde_round_trip() {
        let t = tile(&[(0, 5), (1, 3), (2, 6), (4, 7)]);
        let json = serde_json::to_string(&t).unwrap();
        let back: Tile = serde_json::from_str(&json).unwrap();
        assert!(back.same_orientation(&t));
    }
}
