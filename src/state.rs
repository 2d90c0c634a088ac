#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
pub enum GameState {
    Playing,
    /// Gameover message
    GameOver,
    /// Restart menu after gameover
    RestartMenu,
}

/// The play sequence, one variant per step of the game timeline.
///
/// Input is accepted in [`PlayState::Ready`] and nowhere else.
#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
pub enum PlayState {
    /// Board just spawned, short pause before the reveal
    Starting,
    /// All cards face up for the player to memorize
    Preview,
    /// Cards flipped back, short settle before play begins
    Covering,
    /// Waiting for player clicks
    Ready,
    /// Two different cards are showing, pause so the player sees them
    Mismatch,
    /// Flip-back done, settle before accepting input again
    Settling,
}
