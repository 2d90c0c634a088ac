//! Ui showing the countdown and pair progress during gameplay.
use std::fmt::Write;

use bevy::prelude::{Plugin as BevyPlugin, *};
use bevy_debug_text_overlay::screen_print;
use bevy_ui_build_macros::{build_ui, size, style, unit};

use crate::{
    match_flow::{Countdown, MatchProgress},
    state::GameState,
    ui,
};

#[derive(Component, Clone)]
struct UiRoot;

/// Integer seconds display, ceil of the remaining time.
#[derive(Component, Clone)]
struct TimerText;

/// Fill of the timeout slider, width follows the remaining fraction.
#[derive(Component, Clone)]
struct TimerFill;

#[derive(Component, Clone)]
struct PairsText;

fn spawn_game_ui(mut cmds: Commands, ui_assets: Res<ui::Assets>) {
    let text = |content: &str| ui_assets.large_text(content);
    let node = NodeBundle {
        color: Color::NONE.into(),
        style: style! {
            display: Display::Flex,
            flex_direction: FlexDirection::Row,
            align_items: AlignItems::Center,
            justify_content: JustifyContent::SpaceBetween,
        },
        ..Default::default()
    };
    build_ui! {
        #[cmd(cmds)]
        node{
            size: size!(100 pct, 100 pct),
            flex_direction: FlexDirection::ColumnReverse,
            justify_content: JustifyContent::FlexEnd,
            align_items: AlignItems::Center
        }[; UiRoot, Name::new("game ui root")](
            node{ size: size!(80 pct, 10 pct) }[; Name::new("game ui top bar")](
                node[text("60"); TimerText],
                node{
                    size: size!(50 pct, 25 px),
                    align_items: AlignItems::FlexStart
                }[;
                    UiColor(Color::rgba(0.0, 0.0, 0.0, 0.4)),
                    Name::new("Timeout slider")
                ](
                    node{ size: size!(100 pct, 100 pct) }[;
                        UiColor(Color::ORANGE),
                        TimerFill
                    ]
                ),
                node[text("Pairs: 0/10"); PairsText]
            )
        )
    };
}

fn despawn_game_ui(mut cmds: Commands, query: Query<Entity, With<UiRoot>>) {
    for entity in query.iter() {
        cmds.entity(entity).despawn_recursive();
    }
}

fn update_timer_ui(
    countdown: Res<Countdown>,
    mut texts: Query<&mut Text, With<TimerText>>,
    mut fills: Query<&mut Style, With<TimerFill>>,
) {
    for mut text in texts.iter_mut() {
        let txt = &mut text.sections[0].value;
        txt.clear();
        write!(txt, "{}", countdown.display_secs()).unwrap();
    }
    for mut style in fills.iter_mut() {
        style.size.width = Val::Percent(countdown.fraction() * 100.0);
    }
}

fn update_pairs_ui(progress: Res<MatchProgress>, mut texts: Query<&mut Text, With<PairsText>>) {
    if !progress.is_changed() {
        return;
    }
    screen_print!("pairs: {}/{}", progress.found(), progress.total());
    for mut text in texts.iter_mut() {
        let txt = &mut text.sections[0].value;
        txt.clear();
        write!(txt, "Pairs: {}/{}", progress.found(), progress.total()).unwrap();
    }
}

pub struct Plugin(pub GameState);
impl BevyPlugin for Plugin {
    fn build(&self, app: &mut App) {
        use crate::system_helper::EasySystemSetCtor;
        app.add_system_set(self.0.on_enter(spawn_game_ui))
            .add_system_set(
                self.0
                    .on_update(update_timer_ui)
                    .with_system(update_pairs_ui),
            )
            .add_system_set(self.0.on_exit(despawn_game_ui));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hud_teardown_tolerates_a_missing_root() {
        let mut world = World::new();
        let mut stage = SystemStage::single(despawn_game_ui);
        stage.run(&mut world);
    }
}
