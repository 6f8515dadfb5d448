//! Tile and port property tests.
//!
//! Rotation, equality and wire-pattern invariants checked over the whole
//! deck with proptest.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use proptest::prelude::*;
use rust_tsuro::core::{Port, Tile, TilePattern, DECK_SIZE};

fn hash_of(tile: &Tile) -> u64 {
    let mut hasher = DefaultHasher::new();
    tile.hash(&mut hasher);
    hasher.finish()
}

fn deck_tile() -> impl Strategy<Value = Tile> {
    (0..DECK_SIZE).prop_map(|i| Tile::deck()[i])
}

#[test]
fn test_deck_has_35_distinct_tiles() {
    let deck = Tile::deck();
    assert_eq!(deck.len(), DECK_SIZE);
    let unique: HashSet<Tile> = deck.iter().copied().collect();
    assert_eq!(unique.len(), DECK_SIZE);
}

#[test]
fn test_first_tile_is_neighbour_pairs() {
    let expected = Tile::from_pairs(&[(0, 1), (2, 3), (4, 5), (6, 7)]).unwrap();
    assert!(Tile::deck()[0].same_orientation(&expected));
    assert_eq!(expected.index(), 0);
}

#[test]
fn test_facing_pairs() {
    let pairs = [(0, 5), (1, 4), (2, 7), (3, 6)];
    for (a, b) in pairs {
        let (a, b) = (Port::from_index(a).unwrap(), Port::from_index(b).unwrap());
        assert_eq!(a.facing(), b);
        assert_eq!(b.facing(), a);
    }
}

#[test]
fn test_port_letters() {
    for (i, port) in Port::ALL.into_iter().enumerate() {
        let letter = port.letter().to_string();
        assert_eq!(letter, ["A", "B", "C", "D", "E", "F", "G", "H"][i]);
        assert_eq!(Port::from_letter(&letter), Some(port));
    }
    assert_eq!(Port::from_letter("I"), None);
    assert_eq!(Port::from_letter("AB"), None);
}

#[test]
fn test_invalid_tiles_rejected() {
    assert!(Tile::from_pairs(&[(0, 1), (1, 2), (4, 5), (6, 7)]).is_err());
    assert!(Tile::from_pairs(&[(0, 1), (2, 3), (4, 5)]).is_err());
    assert!(Tile::from_index(35).is_err());
    assert!(TilePattern(3, 45).to_tile().is_err());
}

proptest! {
    #[test]
    fn test_four_rotations_are_identity(tile in deck_tile()) {
        let mut turned = tile;
        for _ in 0..4 {
            turned = turned.rotate();
        }
        prop_assert!(turned.same_orientation(&tile));
    }

    #[test]
    fn test_rotations_equal_and_hash_alike(tile in deck_tile(), turns in 0usize..4) {
        let rotated = tile.all_rotations()[turns];
        prop_assert_eq!(rotated, tile);
        prop_assert_eq!(hash_of(&rotated), hash_of(&tile));
        prop_assert_eq!(rotated.index(), tile.index());
    }

    #[test]
    fn test_connections_are_symmetric(tile in deck_tile(), turns in 0usize..4, port in 0u8..8) {
        let tile = tile.all_rotations()[turns];
        let port = Port::from_index(port).unwrap();
        let other = tile.connected(port);
        prop_assert_ne!(other, port);
        prop_assert_eq!(tile.connected(other), port);
    }

    #[test]
    fn test_rotation_moves_ports_clockwise(tile in deck_tile(), port in 0u8..8) {
        let port = Port::from_index(port).unwrap();
        let rotated = tile.rotate();
        prop_assert_eq!(rotated.connected(port.rotated()), tile.connected(port).rotated());
    }

    #[test]
    fn test_pattern_reproduces_layout(tile in deck_tile(), turns in 0usize..4) {
        let tile = tile.all_rotations()[turns];
        let pattern = tile.pattern();
        prop_assert!(pattern.1 % 90 == 0 && pattern.1 < 360);
        prop_assert!(pattern.to_tile().unwrap().same_orientation(&tile));
    }
}
