use bevy::prelude::{Plugin as BevyPlugin, *};
use bevy_kira_audio::{AudioApp, AudioChannel, AudioPlugin, AudioSource};

const SFX_VOLUME: f32 = 0.5;
const MUSIC_VOLUME: f32 = 0.35;

struct SfxChannel;
struct MusicChannel;

struct AudioAssets {
    card_flip: Handle<AudioSource>,
    match_found: Handle<AudioSource>,
    victory: Handle<AudioSource>,
    defeat: Handle<AudioSource>,
    music: Handle<AudioSource>,
}
impl FromWorld for AudioAssets {
    fn from_world(world: &mut World) -> Self {
        let assets = world.get_resource::<AssetServer>().unwrap();
        Self {
            card_flip: assets.load("sfx/card_flip.ogg"),
            match_found: assets.load("sfx/match_found.ogg"),
            victory: assets.load("sfx/victory.ogg"),
            defeat: assets.load("sfx/defeat.ogg"),
            music: assets.load("sfx/music.ogg"),
        }
    }
}

pub enum AudioRequest {
    PlayFlip,
    PlayMatchFound,
    PlayVictory,
    PlayDefeat,
    StartMusic,
}
fn play_audio(
    assets: Res<AudioAssets>,
    sfx: Res<AudioChannel<SfxChannel>>,
    music: Res<AudioChannel<MusicChannel>>,
    mut events: EventReader<AudioRequest>,
) {
    for event in events.iter() {
        match event {
            AudioRequest::StartMusic => {
                music.play_looped(assets.music.clone());
            }
            AudioRequest::PlayFlip => {
                sfx.play(assets.card_flip.clone());
            }
            AudioRequest::PlayMatchFound => {
                sfx.play(assets.match_found.clone());
            }
            AudioRequest::PlayVictory => {
                sfx.play(assets.victory.clone());
            }
            AudioRequest::PlayDefeat => {
                sfx.play(assets.defeat.clone());
            }
        }
    }
}

fn setup_channels(
    sfx: Res<AudioChannel<SfxChannel>>,
    music: Res<AudioChannel<MusicChannel>>,
    mut events: EventWriter<AudioRequest>,
) {
    sfx.set_volume(SFX_VOLUME);
    music.set_volume(MUSIC_VOLUME);
    events.send(AudioRequest::StartMusic);
}

pub struct Plugin;
impl BevyPlugin for Plugin {
    fn build(&self, app: &mut App) {
        app.add_plugin(AudioPlugin)
            .add_audio_channel::<SfxChannel>()
            .add_audio_channel::<MusicChannel>()
            .init_resource::<AudioAssets>()
            .add_event::<AudioRequest>()
            .add_startup_system(setup_channels)
            .add_system(play_audio);
    }
}
