//! Cursor picking: a screen-space ray from the camera reports which card
//! the player clicked.
use bevy::prelude::{Plugin as BevyPlugin, *};
use bevy_mod_raycast::{DefaultRaycastingPlugin, RayCastMethod, RayCastSource};

use crate::{camera::PlayerCam, state::GameState};

pub enum BoardRaycast {}

/// The player clicked a card. Whether anything comes of it is the match
/// controller's business; this fires regardless of the input lock.
pub struct CardClicked(pub Entity);

fn equip_camera(cam: Query<Entity, Added<PlayerCam>>, mut cmds: Commands) {
    for cam in cam.iter() {
        cmds.entity(cam).insert(RayCastSource::<BoardRaycast>::new());
    }
}

fn update_raycast(
    mut query: Query<&mut RayCastSource<BoardRaycast>>,
    mut cursor: EventReader<CursorMoved>,
) {
    if let Some(cursor) = cursor.iter().last() {
        for mut pick_source in query.iter_mut() {
            pick_source.cast_method = RayCastMethod::Screenspace(cursor.position);
        }
    }
}

fn click_card(
    mouse: Res<Input<MouseButton>>,
    raycaster: Query<&RayCastSource<BoardRaycast>>,
    mut events: EventWriter<CardClicked>,
) {
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }
    let query = raycaster.get_single().map(|ray| ray.intersect_top());
    if let Ok(Some((card, _))) = query {
        events.send(CardClicked(card));
    }
}

pub struct Plugin(pub GameState);
impl BevyPlugin for Plugin {
    fn build(&self, app: &mut App) {
        use crate::system_helper::EasySystemSetCtor;
        app.add_plugin(DefaultRaycastingPlugin::<BoardRaycast>::default())
            .add_event::<CardClicked>()
            .add_system(equip_camera)
            .add_system_set(self.0.on_update(update_raycast))
            .add_system_set(self.0.on_update(click_card));
    }
}
