use bevy::prelude::*;
use bevy_debug_text_overlay::OverlayPlugin;

use crate::state::{GameState, PlayState};

mod animate;
mod audio;
mod board;
mod camera;
mod card;
mod game_ui;
mod match_flow;
mod picking;
mod state;
mod system_helper;
mod ui;

/// How the round ended.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum EndReason {
    Victory,
    TimeOut,
}

/// Game end event, handled in [`ui::gameover`].
pub struct GameOver(pub EndReason);

fn main() {
    let mut app = App::new();
    app.insert_resource(Msaa { samples: 4 })
        .insert_resource(ClearColor(Color::rgb(0.12, 0.35, 0.23)))
        .insert_resource(WindowDescriptor {
            title: "Animal Match".to_owned(),
            ..Default::default()
        })
        .add_plugins(DefaultPlugins)
        .add_plugin(OverlayPlugin { font_size: 18.0, ..Default::default() })
        .add_state(GameState::Playing)
        .add_state(PlayState::Starting)
        .add_plugin(animate::Plugin)
        .add_plugin(audio::Plugin)
        .add_plugin(camera::Plugin)
        .add_plugin(card::Plugin)
        .add_plugin(board::Plugin(GameState::Playing))
        .add_plugin(picking::Plugin(GameState::Playing))
        .add_plugin(match_flow::Plugin(GameState::Playing))
        .add_plugin(game_ui::Plugin(GameState::Playing))
        .add_plugin(ui::Plugin);

    #[cfg(feature = "debug")]
    app.add_plugin(bevy_inspector_egui::WorldInspectorPlugin::new());

    app.run();
}
