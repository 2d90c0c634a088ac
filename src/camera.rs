use bevy::prelude::{Plugin as BevyPlugin, *};

#[derive(Component)]
pub struct PlayerCam;

fn spawn_camera(mut cmds: Commands) {
    cmds.spawn_bundle(PerspectiveCameraBundle {
        transform: Transform::from_xyz(0.0, 0.0, 15.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..PerspectiveCameraBundle::new_3d()
    })
    .insert(PlayerCam);
}

pub struct Plugin;
impl BevyPlugin for Plugin {
    fn build(&self, app: &mut App) {
        app.add_startup_system(spawn_camera);
    }
}
