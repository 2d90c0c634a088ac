//! Gameover screen: outcome message, then the restart menu.
//!
//! To end the round send [`GameOver`] via an `EventWriter`. The first
//! event wins; any later one (say, the countdown running out the same
//! frame the last pair lands) is a no-op.
use bevy::prelude::*;

use crate::{
    audio::AudioRequest,
    match_flow::Countdown,
    state::GameState,
    EndReason, GameOver,
};

/// How long the outcome message stands alone before the menu shows.
const PANEL_DELAY: f64 = 0.5;

/// Cleanup marker
#[derive(Component, Clone)]
struct ScreenRoot;

#[derive(Component)]
struct OutcomeText;

/// Idempotence guard of the whole end-of-round path: only the first
/// [`GameOver`] while playing flips the state, everything downstream
/// hangs off that single transition.
fn enter_endgame(
    mut events: EventReader<GameOver>,
    mut state: ResMut<State<GameState>>,
    mut reason: ResMut<EndReason>,
    mut countdown: ResMut<Countdown>,
) {
    for GameOver(end) in events.iter() {
        if *state.current() != GameState::Playing {
            continue;
        }
        *reason = *end;
        countdown.running = false;
        state.set(GameState::GameOver).unwrap();
        // Leftover events are drained (and ignored) next frame
        break;
    }
}

fn init(
    mut cmds: Commands,
    mut audio_events: EventWriter<AudioRequest>,
    reason: Res<EndReason>,
    ui_assets: Res<super::common::UiAssets>,
) {
    let message = match *reason {
        EndReason::Victory => "Great Job",
        EndReason::TimeOut => "Game Over",
    };
    audio_events.send(match *reason {
        EndReason::Victory => AudioRequest::PlayVictory,
        EndReason::TimeOut => AudioRequest::PlayDefeat,
    });

    cmds.spawn_bundle(NodeBundle {
        color: Color::NONE.into(),
        style: Style {
            align_items: AlignItems::Center,
            align_self: AlignSelf::Center,
            size: Size::new(Val::Percent(100.0), Val::Percent(100.0)),
            position_type: PositionType::Absolute,
            justify_content: JustifyContent::Center,
            ..Default::default()
        },
        ..Default::default()
    })
    .insert(ScreenRoot)
    .with_children(|parent| {
        parent
            .spawn_bundle(ui_assets.large_text(message))
            .insert(OutcomeText);
    });
}

/// Bring up the restart menu once the message had its moment.
fn show_panel(
    time: Res<Time>,
    mut deadline: Local<Option<f64>>,
    mut state: ResMut<State<GameState>>,
) {
    match *deadline {
        Some(at) if at < time.seconds_since_startup() => {
            state.set(GameState::RestartMenu).unwrap();
            *deadline = None;
        }
        None => *deadline = Some(time.seconds_since_startup() + PANEL_DELAY),
        _ => {}
    }
}

fn pulse_message(mut texts: Query<&mut Text, With<OutcomeText>>, time: Res<Time>) {
    let t = time.seconds_since_startup() as f32 / 2.5;
    let t = (t * std::f32::consts::TAU).sin() * 0.4 + 0.6;
    for mut text in texts.iter_mut() {
        text.sections.get_mut(0).unwrap().style.color.set_r(t);
    }
}

fn cleanup(root: Query<Entity, With<ScreenRoot>>, mut cmds: Commands) {
    for entity in root.iter() {
        cmds.entity(entity).despawn_recursive();
    }
}

pub struct Plugin;
impl bevy::app::Plugin for Plugin {
    fn build(&self, app: &mut App) {
        app.add_event::<GameOver>()
            .insert_resource(EndReason::TimeOut)
            .add_system(enter_endgame.label("check_gameover"));

        app.add_system_set(SystemSet::on_enter(GameState::GameOver).with_system(init));
        app.add_system_set(SystemSet::on_exit(GameState::GameOver).with_system(cleanup));
        app.add_system_set(
            SystemSet::on_update(GameState::GameOver)
                .with_system(show_panel)
                .with_system(pulse_message),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::event::Events;

    // A victory and a timeout the very same frame: the first event decides
    // the outcome, the second must neither overwrite it nor re-queue the
    // transition (State::set panics on a double queue).
    #[test]
    fn first_game_over_of_a_frame_wins() {
        let mut world = World::new();
        world.insert_resource(State::new(GameState::Playing));
        world.insert_resource(EndReason::TimeOut);
        let mut countdown = Countdown::default();
        countdown.running = true;
        world.insert_resource(countdown);
        world.insert_resource(Events::<GameOver>::default());

        let mut events = world.get_resource_mut::<Events<GameOver>>().unwrap();
        events.send(GameOver(EndReason::Victory));
        events.send(GameOver(EndReason::TimeOut));

        let mut stage = SystemStage::single(enter_endgame);
        stage.run(&mut world);

        assert_eq!(*world.get_resource::<EndReason>().unwrap(), EndReason::Victory);
        assert!(!world.get_resource::<Countdown>().unwrap().running);
    }
}
