//! Card entities: spawning, the face-up/face-down flip and the matched
//! state.
//!
//! A card is a root entity holding the [`Card`] component and three mesh
//! children: the front face, the animal art and the back face. Flipping
//! never swaps textures, it turns the whole entity around so the other
//! side shows, exactly like a physical card.
use std::f32::consts::PI;

use bevy::ecs::system::{EntityCommands, SystemParam};
use bevy::prelude::{Plugin as BevyPlugin, *};
use bevy::render::{
    mesh::{
        Indices,
        VertexAttributeValues::{Float32x2, Float32x3},
    },
    render_resource::PrimitiveTopology,
};
#[cfg(feature = "debug")]
use bevy_inspector_egui::{Inspectable, RegisterInspectable};
use enum_map::{enum_map, Enum, EnumMap};

use crate::{animate::Animated, audio::AudioRequest};

/// How fast a card turns over, in poses per second fed to the lerp.
const FLIP_SPEED: f32 = 10.0;

/// Card identity. Two cards share each animal, forming the pairs the
/// player hunts for.
#[cfg_attr(feature = "debug", derive(Inspectable))]
#[derive(Enum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Animal {
    Bear,
    Cat,
    Dog,
    Elephant,
    Fox,
    Koala,
    Lion,
    Monkey,
    Panda,
    Rabbit,
}

#[cfg_attr(feature = "debug", derive(Inspectable))]
#[derive(Component, Debug)]
pub struct Card {
    pub animal: Animal,
    pub face_up: bool,
}
impl Card {
    pub fn new(animal: Animal) -> Self {
        Self { animal, face_up: false }
    }
    /// Root rotation matching the current face state.
    pub fn target_rotation(&self) -> Quat {
        if self.face_up {
            Quat::IDENTITY
        } else {
            Quat::from_rotation_y(PI)
        }
    }
}

/// Permanently solved card. Never flips again, ignores clicks.
#[derive(Component)]
pub struct Matched;

/// Toggle the face state of a card, with the turn-over animation.
pub struct FlipCard(pub Entity);

#[derive(Component)]
struct CardFace;
#[derive(Component)]
struct CardBack;
#[derive(Component)]
struct CardArt;

#[rustfmt::skip]
const CARD_VERTICES: [[f32; 2]; 12] = [
    [-1.0, 1.42],  [-0.97, 1.48],  [-0.9, 1.5],
    [0.9, 1.5],    [0.97, 1.48],   [1.0, 1.42],
    [1.0, -1.42],  [0.97, -1.48],  [0.9, -1.5],
    [-0.9, -1.5],  [-0.97, -1.48], [-1.0, -1.42],
];

#[rustfmt::skip]
const CARD_EDGES: [u16; 30] = [
    0, 2, 1,    0, 3, 2,    3, 5, 4,
    3, 6, 5,    6, 8, 7,    6, 3, 8,
    8, 3, 0,    8, 0, 9,    9, 11, 10,
    9, 0, 11,
];

#[derive(SystemParam)]
pub struct SpawnCard<'w, 's> {
    cmds: Commands<'w, 's>,
    assets: Res<'w, CardAssets>,
}
impl<'w, 's> SpawnCard<'w, 's> {
    /// Spawn `card` face down at `slot`.
    pub fn spawn_card<'a>(&'a mut self, card: Card, slot: Vec3) -> EntityCommands<'w, 's, 'a> {
        let animal = card.animal;
        let rotation = card.target_rotation();
        let mut card_entity = self.cmds.spawn_bundle((
            card,
            Name::new(format!("Card {animal:?}")),
            GlobalTransform::default(),
            Transform { translation: slot, rotation, ..Default::default() },
        ));
        card_entity.with_children(|cmds| {
            cmds.spawn_bundle(PbrBundle {
                mesh: self.assets.quad.clone(),
                material: self.assets.animals[animal].clone(),
                transform: Transform::from_xyz(0.0, 0.0, 0.01)
                    .with_scale(Vec3::new(1.6, 1.6, 1.0)),
                ..Default::default()
            })
            .insert_bundle((CardArt, Name::new("Art")));
            cmds.spawn_bundle(PbrBundle {
                mesh: self.assets.card.clone(),
                material: self.assets.frontface.clone(),
                ..Default::default()
            })
            .insert_bundle((CardFace, Name::new("Front face")));
            cmds.spawn_bundle(PbrBundle {
                mesh: self.assets.card.clone(),
                material: self.assets.backface.clone(),
                transform: Transform::from_rotation(Quat::from_rotation_y(PI)),
                ..Default::default()
            })
            .insert_bundle((CardBack, Name::new("Back face")));
        });
        card_entity
    }
}
/// Handle [`FlipCard`] events.
///
/// A flip is a pure toggle: it does not look at matched or selected
/// state, callers are responsible for only flipping what they mean to.
fn flip_cards(
    mut events: EventReader<FlipCard>,
    mut cards: Query<(&mut Card, &Transform)>,
    mut audio_events: EventWriter<AudioRequest>,
    mut cmds: Commands,
) {
    for FlipCard(entity) in events.iter() {
        // Cards of a torn down board may still have flips in flight
        if let Ok((mut card, transform)) = cards.get_mut(*entity) {
            card.face_up = !card.face_up;
            let target = Transform {
                rotation: card.target_rotation(),
                ..*transform
            };
            cmds.entity(*entity)
                .insert(Animated::MoveInto { target, speed: FLIP_SPEED });
            audio_events.send(AudioRequest::PlayFlip);
        }
    }
}

/// Give matched pairs their little victory pulse, once their flip
/// animation has run its course.
fn celebrate_matched(
    matched: Query<Entity, (With<Matched>, With<Card>, Without<Animated>)>,
    mut cmds: Commands,
) {
    for entity in matched.iter() {
        cmds.entity(entity)
            .insert(Animated::Pulse { period: 1.5, strength: 0.04 });
    }
}

pub struct CardAssets {
    card: Handle<Mesh>,
    animals: EnumMap<Animal, Handle<StandardMaterial>>,
    backface: Handle<StandardMaterial>,
    frontface: Handle<StandardMaterial>,
    quad: Handle<Mesh>,
}
impl FromWorld for CardAssets {
    fn from_world(world: &mut World) -> Self {
        macro_rules! add_texture_material {
            ($texture_path:expr $(, alpha: $alpha_mask:expr)?) => {{
                let asset_server = world.get_resource::<AssetServer>().unwrap();
                let image = asset_server.load::<Image, _>($texture_path);
                let mut mats = world.get_resource_mut::<Assets<_>>().unwrap();
                mats.add(StandardMaterial {
                    base_color_texture: Some(image),
                    unlit: true,
                    $(alpha_mode: AlphaMode::Mask($alpha_mask),)?
                    ..Default::default()
                })
            }};
        }
        let uv_map = |&[x, y]: &[f32; 2]| [x / 2.0 + 0.5, -y / 3.0 + 0.5];
        let mut card_mesh = Mesh::new(PrimitiveTopology::TriangleList);
        let card_pos: Vec<[f32; 3]> = CARD_VERTICES.iter().map(|&[x, y]| [x, y, 0.0]).collect();
        let card_uvs: Vec<[f32; 2]> = CARD_VERTICES.iter().map(uv_map).collect();
        card_mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, Float32x3(card_pos));
        card_mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, Float32x2(card_uvs));
        card_mesh.insert_attribute(
            Mesh::ATTRIBUTE_NORMAL,
            Float32x3([[0.0, 0.0, 1.0]; 12].into()),
        );
        card_mesh.set_indices(Some(Indices::U16(CARD_EDGES.into())));

        let mut meshes = world.get_resource_mut::<Assets<Mesh>>().unwrap();
        Self {
            card: meshes.add(card_mesh),
            quad: meshes.add(shape::Quad::new(Vec2::splat(1.0)).into()),
            backface: add_texture_material!("cards/BackFace.png"),
            frontface: add_texture_material!("cards/FrontFace.png"),
            animals: enum_map! {
                animal => add_texture_material!(&format!("cards/{animal:?}.png"), alpha: 0.5),
            },
        }
    }
}

pub struct Plugin;
impl BevyPlugin for Plugin {
    fn build(&self, app: &mut App) {
        #[cfg(feature = "debug")]
        app.register_inspectable::<Card>()
            .register_inspectable::<Animal>();

        app.init_resource::<CardAssets>()
            .add_event::<FlipCard>()
            .add_system(flip_cards)
            .add_system(celebrate_matched);
    }
}
