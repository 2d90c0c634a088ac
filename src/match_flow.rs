//! Match controller, drives the whole game round: the intro reveal, click
//! handling, pair resolution and the countdown.
//!
//! # Architecture
//!
//! This module does:
//! * Walk the board through the scripted intro reveal (see [#Transitions]).
//! * Turn [`CardClicked`] events into flips, a remembered first pick and a
//!   resolved pair.
//! * Tick the countdown and publish its value for the HUD (see
//!   [`Countdown`]).
//! * End the round, exactly once, on either outcome.
//!
//! ## Transitions
//!
//! All sequencing runs on the per-frame schedule; a "wait" is a deadline
//! checked every frame ([`advance_after`]), never a blocked thread. The
//! states are from the [`PlayState`] `enum`.
//!
//! ### Flowchart
//! ```text
//!                        board spawned
//!                             ↓
//!                        ----------
//!                        |Starting|  wait 0.5s, flip all cards up
//!                        ----------
//!                             ↓
//!                        ---------
//!                        |Preview|  wait 3.0s, flip all cards down
//!                        ---------
//!                             ↓
//!                        ----------
//!                        |Covering|  wait 0.5s, start the countdown
//!                        ----------
//!                             ↓
//!      →-----------------→ -------
//!      |                    |Ready| ←--------------------------------←
//!      |                    -------                                  |
//!      |                       ↓                                     |
//!      |          click: flip card, remember first pick              |
//!      |                       ↓                                     |
//!      |              second pick: same animal?                      |
//!      |                 ↓               ↓                           |
//!      |                yes              no                          |
//!      |                 ↓               ↓                           |
//!      |    mark pair matched       ----------                       |
//!      |    last pair? → GameOver   |Mismatch|  wait 1.0s, flip back |
//!      |                            ----------                       |
//!      |                                 ↓                           |
//!      |                            ----------                       |
//!      |                            |Settling|  wait 0.4s -----------↑
//!      |                            ----------
//!      ↑
//!   (the countdown hitting zero ends the round from any of these)
//! ```
//!
//! ## End of round
//!
//! Both outcomes go through the [`GameOver`](crate::GameOver) event; the
//! gameover screen (see [`crate::ui::gameover`]) owns the idempotence
//! guard, stops the [`Countdown`] and leaves [`GameState::Playing`], which
//! despawns the board and resets every resource here ([`cleanup`]).
use bevy::ecs::system::SystemParam;
use bevy::prelude::{Plugin as BevyPlugin, *};
use bevy_debug_text_overlay::screen_print;

use crate::{
    audio::AudioRequest,
    card::{Card, FlipCard, Matched},
    picking::CardClicked,
    state::{GameState, PlayState},
    EndReason, GameOver,
};

/// Seconds on the clock when the round starts.
const TIME_LIMIT: f32 = 60.0;
/// Pause before the intro reveal.
const REVEAL_DELAY: f64 = 0.5;
/// How long all faces stay visible during the intro.
const PREVIEW_TIME: f64 = 3.0;
/// Settle after the intro flip-back before accepting input.
const COVER_DELAY: f64 = 0.5;
/// How long a failed pair stays visible.
const MISMATCH_DELAY: f64 = 1.0;
/// Settle after the mismatch flip-back before accepting input.
const SETTLE_DELAY: f64 = 0.4;

/// First face-up card of a pair, awaiting its partner.
#[derive(Default)]
struct Selected(Option<Entity>);

/// The two cards of a failed pair, kept around until they flip back.
struct OpenPair {
    first: Entity,
    second: Entity,
}

/// Pairs found so far. The round is won the instant `found == total`.
pub struct MatchProgress {
    found: usize,
    total: usize,
}
impl Default for MatchProgress {
    fn default() -> Self {
        Self { found: 0, total: 10 }
    }
}
impl MatchProgress {
    pub fn found(&self) -> usize {
        self.found
    }
    pub fn total(&self) -> usize {
        self.total
    }
    /// Size the round; called by the board supplier when a deck spawns.
    pub fn reset(&mut self, total: usize) {
        self.found = 0;
        self.total = total;
    }
    /// Record one found pair. True exactly once, when the last pair lands.
    fn record_match(&mut self) -> bool {
        let was_complete = self.found == self.total;
        self.found = (self.found + 1).min(self.total);
        !was_complete && self.found == self.total
    }
}

/// The round clock.
///
/// Ticked once per frame while `running`; clamped at zero. The HUD reads
/// [`Countdown::fraction`] for the slider fill and
/// [`Countdown::display_secs`] for the seconds text.
pub struct Countdown {
    remaining: f32,
    limit: f32,
    pub running: bool,
}
impl Default for Countdown {
    fn default() -> Self {
        Self { remaining: TIME_LIMIT, limit: TIME_LIMIT, running: false }
    }
}
impl Countdown {
    /// Time left as a fraction of the limit, always within `[0, 1]`.
    pub fn fraction(&self) -> f32 {
        (self.remaining / self.limit).clamp(0.0, 1.0)
    }
    /// Whole seconds for the HUD, rounded up so "0" only shows at zero.
    pub fn display_secs(&self) -> i32 {
        self.remaining.max(0.0).ceil() as i32
    }
    /// Advance the clock. True the single tick it runs out.
    fn tick(&mut self, delta: f32) -> bool {
        if !self.running {
            return false;
        }
        self.remaining -= delta;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.running = false;
            true
        } else {
            false
        }
    }
}

/// Deadline of the phase currently waiting. At most one phase waits at a
/// time, so a single slot serves them all and a round teardown can clear
/// it (a per-system `Local` would leak a stale deadline into the next
/// round).
#[derive(Default)]
struct PhaseDeadline(Option<f64>);

#[derive(SystemParam)]
struct PhaseTimer<'w, 's> {
    play_state: ResMut<'w, State<PlayState>>,
    game_state: Res<'w, State<GameState>>,
    time: Res<'w, Time>,
    deadline: ResMut<'w, PhaseDeadline>,
    #[system_param(ignore)]
    _marker: std::marker::PhantomData<&'s ()>,
}
impl<'w, 's> PhaseTimer<'w, 's> {
    /// Phase systems keep running on their [`PlayState`] after the round
    /// ended; everything timed must freeze then, or a dangling flip-back
    /// could land on the gameover screen.
    fn frozen(&self) -> bool {
        *self.game_state.current() != GameState::Playing
    }
}

/// Enter `goes_into` once `wait` seconds elapsed in the current phase.
/// True the single frame the transition fires.
fn advance_after(wait: f64, goes_into: PlayState, timer: &mut PhaseTimer) -> bool {
    if timer.frozen() {
        timer.deadline.0 = None;
        return false;
    }
    match timer.deadline.0 {
        Some(deadline) if deadline < timer.time.seconds_since_startup() => {
            timer.play_state.set(goes_into).unwrap();
            timer.deadline.0 = None;
            true
        }
        None => {
            timer.deadline.0 = Some(timer.time.seconds_since_startup() + wait);
            false
        }
        _ => false,
    }
}

fn reveal_board(
    mut timer: PhaseTimer,
    mut flips: EventWriter<FlipCard>,
    cards: Query<Entity, With<Card>>,
) {
    if advance_after(REVEAL_DELAY, PlayState::Preview, &mut timer) {
        for entity in cards.iter() {
            flips.send(FlipCard(entity));
        }
    }
}

fn cover_board(
    mut timer: PhaseTimer,
    mut flips: EventWriter<FlipCard>,
    cards: Query<Entity, With<Card>>,
) {
    if advance_after(PREVIEW_TIME, PlayState::Covering, &mut timer) {
        for entity in cards.iter() {
            flips.send(FlipCard(entity));
        }
    }
}

fn open_play(mut timer: PhaseTimer, mut countdown: ResMut<Countdown>) {
    if advance_after(COVER_DELAY, PlayState::Ready, &mut timer) {
        countdown.running = true;
    }
}

/// Handle [`CardClicked`] events.
///
/// Only runs in [`PlayState::Ready`], which is the input lock of the
/// whole game: during the intro and while a pair resolves, clicks simply
/// never reach this system.
fn handle_clicked(
    mut events: EventReader<CardClicked>,
    mut flips: EventWriter<FlipCard>,
    mut audio_events: EventWriter<AudioRequest>,
    mut gameover_events: EventWriter<GameOver>,
    mut selected: ResMut<Selected>,
    mut progress: ResMut<MatchProgress>,
    mut play_state: ResMut<State<PlayState>>,
    game_state: Res<State<GameState>>,
    mut cmds: Commands,
    cards: Query<(&Card, Option<&Matched>)>,
) {
    if *game_state.current() != GameState::Playing {
        return;
    }
    for &CardClicked(card) in events.iter() {
        let picked = match cards.get(card) {
            Ok((_, Some(_))) => continue,
            Ok((picked, None)) => picked,
            Err(_) => continue,
        };
        // Also covers clicking the selected card a second time
        if picked.face_up {
            continue;
        }
        flips.send(FlipCard(card));
        let first = match selected.0 {
            None => {
                selected.0 = Some(card);
                continue;
            }
            Some(first) => first,
        };
        let matches = cards.get(first).map_or(false, |(c, _)| c.animal == picked.animal);
        if matches {
            cmds.entity(first).insert(Matched);
            cmds.entity(card).insert(Matched);
            selected.0 = None;
            audio_events.send(AudioRequest::PlayMatchFound);
            let won = progress.record_match();
            screen_print!("matched {:?} ({}/{})", picked.animal, progress.found(), progress.total());
            if won {
                gameover_events.send(GameOver(EndReason::Victory));
            }
        } else {
            cmds.insert_resource(OpenPair { first, second: card });
            play_state.set(PlayState::Mismatch).unwrap();
            // Input is locked, whatever else was clicked this frame is void
            break;
        }
    }
}

fn flip_back(
    mut timer: PhaseTimer,
    mut flips: EventWriter<FlipCard>,
    pair: Option<Res<OpenPair>>,
) {
    if advance_after(MISMATCH_DELAY, PlayState::Settling, &mut timer) {
        if let Some(pair) = pair {
            flips.send(FlipCard(pair.first));
            flips.send(FlipCard(pair.second));
        }
    }
}

fn reopen_input(mut timer: PhaseTimer, mut selected: ResMut<Selected>, mut cmds: Commands) {
    if advance_after(SETTLE_DELAY, PlayState::Ready, &mut timer) {
        selected.0 = None;
        cmds.remove_resource::<OpenPair>();
    }
}

/// Run the clock down. The countdown keeps ticking while a pair resolves;
/// running out of time mid-resolution still ends the round.
fn tick_countdown(
    time: Res<Time>,
    mut countdown: ResMut<Countdown>,
    mut gameover_events: EventWriter<GameOver>,
) {
    if countdown.tick(time.delta_seconds()) {
        gameover_events.send(GameOver(EndReason::TimeOut));
    }
    if countdown.running {
        screen_print!(sec: 1.0, "time left: {}s", countdown.display_secs());
    }
}

/// Reset every controller resource when the game scene is torn down; a
/// fresh round starts from a clean slate (the restart path).
fn cleanup(
    mut cmds: Commands,
    mut selected: ResMut<Selected>,
    mut countdown: ResMut<Countdown>,
    mut deadline: ResMut<PhaseDeadline>,
    mut play_state: ResMut<State<PlayState>>,
) {
    selected.0 = None;
    *countdown = Countdown::default();
    deadline.0 = None;
    cmds.remove_resource::<OpenPair>();
    play_state.overwrite_set(PlayState::Starting).ok();
}

pub struct Plugin(pub GameState);
impl BevyPlugin for Plugin {
    fn build(&self, app: &mut App) {
        use crate::system_helper::EasySystemSetCtor;
        use PlayState::{Covering, Mismatch, Preview, Ready, Settling, Starting};
        app.init_resource::<Selected>()
            .init_resource::<MatchProgress>()
            .init_resource::<Countdown>()
            .init_resource::<PhaseDeadline>()
            .add_system_set(Starting.on_update(reveal_board))
            .add_system_set(Preview.on_update(cover_board))
            .add_system_set(Covering.on_update(open_play))
            .add_system_set(Ready.on_update(handle_clicked.before("check_gameover")))
            .add_system_set(Mismatch.on_update(flip_back))
            .add_system_set(Settling.on_update(reopen_input))
            .add_system_set(self.0.on_update(tick_countdown.before("check_gameover")))
            .add_system_set(self.0.on_exit(cleanup));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::event::Events;

    #[test]
    fn countdown_runs_out_once() {
        let mut countdown = Countdown::default();
        countdown.running = true;
        assert!(!countdown.tick(59.9));
        assert!(countdown.tick(0.2), "crossing zero fires");
        assert!(!countdown.tick(0.2), "already stopped, no second fire");
        assert_eq!(countdown.display_secs(), 0);
    }

    #[test]
    fn countdown_ignores_ticks_unless_running() {
        let mut countdown = Countdown::default();
        assert!(!countdown.tick(1000.0));
        assert_eq!(countdown.display_secs(), 60);
    }

    #[test]
    fn countdown_fraction_stays_in_bounds_and_decreases() {
        let mut countdown = Countdown::default();
        countdown.running = true;
        let mut previous = countdown.fraction();
        assert_eq!(previous, 1.0);
        loop {
            let out = countdown.tick(0.73);
            let fraction = countdown.fraction();
            assert!((0.0..=1.0).contains(&fraction));
            assert!(fraction <= previous);
            previous = fraction;
            if out {
                break;
            }
        }
        assert_eq!(countdown.fraction(), 0.0);
    }

    #[test]
    fn display_secs_rounds_up() {
        let mut countdown = Countdown::default();
        countdown.running = true;
        countdown.tick(0.1);
        assert_eq!(countdown.display_secs(), 60);
        countdown.tick(59.5);
        assert_eq!(countdown.display_secs(), 1);
    }

    #[test]
    fn clicking_a_matched_card_changes_nothing() {
        use crate::card::Animal;

        let mut world = World::new();
        world.insert_resource(State::new(GameState::Playing));
        world.insert_resource(State::new(PlayState::Ready));
        world.init_resource::<Selected>();
        world.init_resource::<MatchProgress>();
        world.insert_resource(Events::<CardClicked>::default());
        world.insert_resource(Events::<FlipCard>::default());
        world.insert_resource(Events::<AudioRequest>::default());
        world.insert_resource(Events::<GameOver>::default());
        let solved = world
            .spawn()
            .insert_bundle((Card { animal: Animal::Bear, face_up: true }, Matched))
            .id();
        world
            .get_resource_mut::<Events<CardClicked>>()
            .unwrap()
            .send(CardClicked(solved));

        let mut stage = SystemStage::single(handle_clicked);
        stage.run(&mut world);

        assert!(world.get_resource::<Selected>().unwrap().0.is_none());
        assert_eq!(world.get_resource::<MatchProgress>().unwrap().found(), 0);
        let flips = world.get_resource::<Events<FlipCard>>().unwrap();
        let mut reader = flips.get_reader();
        assert_eq!(reader.iter(flips).count(), 0, "a solved card never flips");
    }

    #[test]
    fn progress_completes_exactly_once() {
        let mut progress = MatchProgress::default();
        progress.reset(3);
        assert!(!progress.record_match());
        assert!(!progress.record_match());
        assert!(progress.record_match(), "last pair completes the round");
        assert!(!progress.record_match(), "no second completion");
        assert_eq!(progress.found(), 3, "found never exceeds total");
    }
}
