//! The gameover panel: outcome recap and restart/quit buttons.
use bevy::app::AppExit;
use bevy::prelude::*;
use bevy_ui_build_macros::{build_ui, size, style, unit};
use bevy_ui_navigation::{Focusable, NavEvent, NavRequest};

use super::common::{MenuCursor, UiAssets};
use crate::{state::GameState, EndReason};

#[derive(Component, Clone)]
struct MenuRoot;

#[derive(Component, Clone)]
enum Button {
    Restart,
    ExitApp,
}

fn init(mut commands: Commands, ui_assets: Res<UiAssets>, reason: Res<EndReason>) {
    let (title, continue_text) = match *reason {
        EndReason::Victory => ("Great Job", "Play again"),
        EndReason::TimeOut => ("Game Over", "Try again"),
    };

    let node = NodeBundle {
        color: Color::NONE.into(),
        style: style! {
            flex_direction: FlexDirection::ColumnReverse,
            align_items: AlignItems::Center,
            align_self: AlignSelf::Center,

            size: Size::new(Val::Percent(100.0), Val::Percent(100.0)),
            position_type: PositionType::Absolute,
            justify_content: JustifyContent::Center,
        },
        ..Default::default()
    };

    build_ui! {
        #[cmd(commands)]
        node{ min_size: size!(100 pct, 100 pct) }[; Name::new("root node"), MenuRoot](
            node{ position_type: PositionType::Absolute }[;
                UiColor(Color::rgba(1.0, 1.0, 1.0, 0.1)),
                MenuCursor::default(),
                Name::new("Cursor")
            ],
            node[; Name::new("Menu columns")](
                node[ui_assets.large_text(title);],
                node[ui_assets.large_text(continue_text); Focusable::default(), Button::Restart],
                node[ui_assets.large_text("Exit to desktop"); Focusable::default(), Button::ExitApp]
            )
        )
    };
}

fn update(
    mut nav_events: EventReader<NavEvent>,
    mut state: ResMut<State<GameState>>,
    mut app_exit: EventWriter<AppExit>,
    buttons: Query<&Button>,
) {
    for event in nav_events.iter() {
        if let NavEvent::NoChanges { from, request: NavRequest::Action } = event {
            match buttons.get(*from.first()) {
                // Reloads the game scene from scratch, state included
                Ok(Button::Restart) => state.set(GameState::Playing).unwrap(),
                Ok(Button::ExitApp) => app_exit.send(AppExit),
                _ => (),
            }
        }
    }
}

fn exit_menu(root: Query<Entity, With<MenuRoot>>, mut commands: Commands) {
    for entity in root.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

pub struct Plugin;
impl bevy::app::Plugin for Plugin {
    fn build(&self, app: &mut App) {
        app.add_system_set(SystemSet::on_enter(GameState::RestartMenu).with_system(init));
        app.add_system_set(SystemSet::on_exit(GameState::RestartMenu).with_system(exit_menu));
        app.add_system_set(SystemSet::on_update(GameState::RestartMenu).with_system(update));
    }
}
