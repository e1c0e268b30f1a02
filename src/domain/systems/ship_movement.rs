use crate::domain::entities::Player;
use crate::domain::state::PlayerInput;
use crate::domain::tuning::{PlayerTuning, WorldTuning};
use crate::domain::vector::Vec2;

pub fn tick_player(
    player: &mut Player,
    input: &PlayerInput,
    tuning: &PlayerTuning,
    world: &WorldTuning,
) {
    // rotation
    if input.rotate_left {
        player.body.angle -= tuning.rotation_step;
    }
    if input.rotate_right {
        player.body.angle += tuning.rotation_step;
    }

    // thrust along the current heading; reverse is weaker than forward
    let mut throttle = 0.0;
    if input.thrust_forward {
        throttle += 1.0;
    }
    if input.thrust_backward {
        throttle -= tuning.reverse_factor;
    }

    player.thrusting = throttle != 0.0 && player.fuel > 0.0;
    if player.thrusting {
        let heading = Vec2::from_angle(player.body.angle);
        player.body.vel += heading * (tuning.thrust * player.thrust_multiplier * throttle);
        player.fuel = (player.fuel - tuning.fuel_per_thrust_tick).max(0.0);
    }

    player.singularity_active = input.ability;

    player.body.damp_and_integrate(tuning.friction);
    bounce_off_edges(player, tuning.boundary_restitution, world);
}

// Hard world edge: clamp and reflect at reduced speed. No wrapping.
fn bounce_off_edges(player: &mut Player, restitution: f32, world: &WorldTuning) {
    let body = &mut player.body;
    if body.pos.x < 0.0 {
        body.pos.x = 0.0;
        body.vel.x = body.vel.x.abs() * restitution;
    } else if body.pos.x > world.width {
        body.pos.x = world.width;
        body.vel.x = -body.vel.x.abs() * restitution;
    }

    if body.pos.y < 0.0 {
        body.pos.y = 0.0;
        body.vel.y = body.vel.y.abs() * restitution;
    } else if body.pos.y > world.height {
        body.pos.y = world.height;
        body.vel.y = -body.vel.y.abs() * restitution;
    }
}
