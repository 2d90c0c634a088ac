//! Board supplier: builds the shuffled deck and lays the cards out in a
//! grid when the game scene starts.
use anyhow::{ensure, Result};
use bevy::prelude::{Plugin as BevyPlugin, *};
use bevy_mod_raycast::RayCastMesh;
use enum_map::Enum;

use crate::{
    card::{Animal, Card, SpawnCard},
    match_flow::MatchProgress,
    picking::BoardRaycast,
    state::GameState,
};

const COLUMNS: usize = 5;
const ROWS: usize = 4;
const H_SPACING: f32 = 2.4;
const V_SPACING: f32 = 3.4;

/// The ordered run of cards handed to the match controller, one entity
/// spawned per entry.
pub struct Deck {
    animals: Vec<Animal>,
}
impl Deck {
    /// Build a deck from an explicit card list.
    ///
    /// Rejects anything that could silently break matching: an odd card
    /// count or an animal not appearing exactly twice.
    fn new(animals: Vec<Animal>) -> Result<Self> {
        ensure!(!animals.is_empty(), "a deck needs at least one pair of cards");
        ensure!(
            animals.len() % 2 == 0,
            "a deck needs an even card count, got {}",
            animals.len()
        );
        for i in 0..Animal::LENGTH {
            let animal = Animal::from_usize(i);
            let count = animals.iter().filter(|a| **a == animal).count();
            ensure!(
                count == 0 || count == 2,
                "{animal:?} appears {count} times, pairs require exactly 2"
            );
        }
        Ok(Self { animals })
    }

    /// The full 10-pair deck in random order.
    fn shuffled() -> Result<Self> {
        let mut animals: Vec<_> = (0..Animal::LENGTH)
            .map(Animal::from_usize)
            .flat_map(|animal| [animal, animal])
            .collect();
        // Fisher-Yates
        for i in (1..animals.len()).rev() {
            animals.swap(i, fastrand::usize(..=i));
        }
        Self::new(animals)
    }

    fn pairs(&self) -> usize {
        self.animals.len() / 2
    }
}

/// Grid slot of the `index`th card, centered on the origin.
fn slot_position(index: usize) -> Vec3 {
    let (col, row) = (index % COLUMNS, index / COLUMNS);
    let x = (col as f32 - (COLUMNS - 1) as f32 / 2.0) * H_SPACING;
    let y = (row as f32 - (ROWS - 1) as f32 / 2.0) * V_SPACING;
    Vec3::new(x, y, 0.0)
}

fn spawn_board(
    mut card_spawner: SpawnCard,
    mut meshes: ResMut<Assets<Mesh>>,
    mut progress: ResMut<MatchProgress>,
) {
    let deck = Deck::shuffled().expect("ten fixed pairs always form a valid deck");
    progress.reset(deck.pairs());
    for (index, animal) in deck.animals.iter().enumerate() {
        card_spawner
            .spawn_card(Card::new(*animal), slot_position(index))
            .insert_bundle((
                RayCastMesh::<BoardRaycast>::default(),
                meshes.add(shape::Quad::new(Vec2::new(2.1, 3.1)).into()),
                Visibility::default(),
                ComputedVisibility::default(),
            ));
    }
}

fn despawn_board(mut cmds: Commands, cards: Query<Entity, With<Card>>) {
    for entity in cards.iter() {
        cmds.entity(entity).despawn_recursive();
    }
}

pub struct Plugin(pub GameState);
impl BevyPlugin for Plugin {
    fn build(&self, app: &mut App) {
        use crate::system_helper::EasySystemSetCtor;
        app.add_system_set(self.0.on_enter(spawn_board))
            .add_system_set(self.0.on_exit(despawn_board));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shuffled_deck_is_all_pairs() {
        let deck = Deck::shuffled().unwrap();
        assert_eq!(deck.animals.len(), 20);
        assert_eq!(deck.pairs(), 10);
        for i in 0..Animal::LENGTH {
            let animal = Animal::from_usize(i);
            let count = deck.animals.iter().filter(|a| **a == animal).count();
            assert_eq!(count, 2, "{animal:?} should appear exactly twice");
        }
    }

    #[test]
    fn odd_deck_is_rejected() {
        use Animal::{Bear, Cat};
        let deck = Deck::new(vec![Bear, Bear, Cat]);
        assert!(deck.is_err());
    }

    #[test]
    fn unpaired_deck_is_rejected() {
        use Animal::{Bear, Cat, Dog, Fox};
        // Even count, but no card has a partner
        let deck = Deck::new(vec![Bear, Cat, Dog, Fox]);
        assert!(deck.is_err());
    }

    #[test]
    fn empty_deck_is_rejected() {
        // A zero-pair round could never be won, refuse it outright
        assert!(Deck::new(Vec::new()).is_err());
    }

    #[test]
    fn slots_form_a_centered_grid() {
        let first = slot_position(0);
        let last = slot_position(19);
        assert_eq!(first.truncate(), -last.truncate());
        assert_eq!(slot_position(7).y, slot_position(9).y);
    }
}
