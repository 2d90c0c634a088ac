use std::f64::consts::PI;

use bevy::prelude::{Plugin as BevyPlugin, *};
#[cfg(feature = "debug")]
use bevy_inspector_egui::{Inspectable, RegisterInspectable};

#[cfg_attr(feature = "debug", derive(Inspectable))]
#[derive(Component)]
pub enum Animated {
    /// Move and turn into a target pose, removed on arrival.
    ///
    /// This is what makes a card flip look like a flip rather than a
    /// texture swap.
    MoveInto { target: Transform, speed: f32 },
    /// Gentle scale pulse, used on matched pairs.
    Pulse { period: f64, strength: f32 },
}

#[cfg_attr(feature = "debug", derive(Inspectable))]
#[derive(Component)]
struct InitialTransform(Transform);

fn enable_animation(animated: Query<(Entity, &Transform), Added<Animated>>, mut cmds: Commands) {
    let mut cmd_buffer = Vec::new();
    for (entity, transform) in animated.iter() {
        cmd_buffer.push((entity, (InitialTransform(*transform),)));
    }
    cmds.insert_or_spawn_batch(cmd_buffer);
}

fn run_animation(
    time: Res<Time>,
    mut cmds: Commands,
    mut animated: Query<(Entity, &mut Transform, &InitialTransform, &Animated)>,
) {
    let delta = time.delta_seconds();
    let time = time.seconds_since_startup();
    for (entity, mut trans, init, anim) in animated.iter_mut() {
        match *anim {
            Animated::MoveInto { target, speed } => {
                let (cur_pos, cur_rot) = (trans.translation, trans.rotation);
                let (target_pos, target_rot) = (target.translation, target.rotation);
                let pos_diff = cur_pos.distance_squared(target_pos);
                let rot_diff = cur_rot.angle_between(target_rot);
                if pos_diff < 0.01 && rot_diff < 0.005 {
                    *trans = target;
                    cmds.entity(entity).remove::<Animated>();
                } else {
                    trans.translation = cur_pos.lerp(target_pos, speed * delta);
                    trans.rotation = cur_rot.lerp(target_rot, speed * delta);
                }
            }
            Animated::Pulse { period, strength } => {
                let anim_offset = time % period / period * PI * 2.0;
                let scale_offset = (anim_offset as f32).sin() * strength;
                trans.scale = init.0.scale * (1.0 + scale_offset);
            }
        }
    }
}

pub struct Plugin;
impl BevyPlugin for Plugin {
    fn build(&self, app: &mut App) {
        #[cfg(feature = "debug")]
        app.register_inspectable::<Animated>()
            .register_inspectable::<InitialTransform>();

        app.add_system(enable_animation)
            .add_system(run_animation.label("animation"));
    }
}
