//! Run domain: countdown, finish, death and restart systems.

use avian2d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::content::RunSettings;
use crate::core::now_ms;
use crate::movement::{Player, freeze_player, spawn_player, unfreeze_player};
use crate::run::clock::format_time_ms;
use crate::run::events::{CountdownTick, LevelRestarted, PlayerDied, RunFinished, RunStarted};
use crate::run::level::{FinishRegion, LevelBounds};
use crate::run::timer::{CountdownStep, RunState, RunTimer};

/// Set once the player leaves the level. Cleared by a restart.
#[derive(Resource, Debug, Default)]
pub struct DeathState {
    pub is_dead: bool,
}

/// Run condition: movement only updates while the run is live.
pub fn movement_active(timer: Res<RunTimer>, death: Res<DeathState>) -> bool {
    timer.state() == RunState::Running && !death.is_dead
}

/// Put a frozen player at the spawn point and build a fresh countdown.
fn begin_countdown(
    commands: &mut Commands,
    settings: &RunSettings,
    bounds: &LevelBounds,
    ticks: &mut MessageWriter<CountdownTick>,
) -> RunTimer {
    spawn_player(commands, bounds.spawn);

    let timer = RunTimer::new(settings);
    ticks.write(CountdownTick {
        remaining: timer.countdown_remaining(),
    });

    info!("Countdown started ({} ticks)", settings.countdown_ticks);
    timer
}

pub(crate) fn start_run(
    mut commands: Commands,
    settings: Res<RunSettings>,
    bounds: Res<LevelBounds>,
    mut ticks: MessageWriter<CountdownTick>,
) {
    let timer = begin_countdown(&mut commands, &settings, &bounds, &mut ticks);
    commands.insert_resource(timer);
    commands.insert_resource(DeathState::default());
}

/// Escape resets the level at any point of the run.
pub(crate) fn handle_restart(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    settings: Res<RunSettings>,
    bounds: Res<LevelBounds>,
    player_query: Query<Entity, With<Player>>,
    mut timer: ResMut<RunTimer>,
    mut death: ResMut<DeathState>,
    mut ticks: MessageWriter<CountdownTick>,
    mut restarted: MessageWriter<LevelRestarted>,
) {
    if !keyboard.just_pressed(KeyCode::Escape) {
        return;
    }

    for entity in &player_query {
        commands.entity(entity).despawn();
    }

    // Replaced in place so the rest of this frame already sees a countdown
    *timer = begin_countdown(&mut commands, &settings, &bounds, &mut ticks);
    *death = DeathState::default();
    restarted.write(LevelRestarted);

    info!("Level restarted");
}

pub(crate) fn tick_countdown(
    mut commands: Commands,
    time: Res<Time>,
    mut timer: ResMut<RunTimer>,
    player_query: Query<Entity, With<Player>>,
    mut ticks: MessageWriter<CountdownTick>,
    mut started: MessageWriter<RunStarted>,
) {
    if timer.state() != RunState::Countdown {
        return;
    }

    let now = now_ms(&time);
    for step in timer.tick_countdown(time.delta(), now) {
        match step {
            CountdownStep::Show(remaining) => {
                ticks.write(CountdownTick { remaining });
            }
            CountdownStep::Go => {
                for entity in &player_query {
                    unfreeze_player(&mut commands, entity);
                }
                started.write(RunStarted { start_ms: now });
                info!("Run started");
            }
        }
    }
}

pub(crate) fn detect_finish(
    mut commands: Commands,
    time: Res<Time>,
    mut collision_events: MessageReader<CollisionStart>,
    finish_query: Query<(), With<FinishRegion>>,
    player_query: Query<Entity, With<Player>>,
    mut timer: ResMut<RunTimer>,
    mut finished: MessageWriter<RunFinished>,
) {
    let Ok(player) = player_query.single() else {
        // Consume events if no player
        for _ in collision_events.read() {}
        return;
    };

    let reached = collision_events.read().any(|event| {
        let other = if finish_query.get(event.collider1).is_ok() {
            event.collider2
        } else if finish_query.get(event.collider2).is_ok() {
            event.collider1
        } else {
            return false;
        };
        other == player
    });

    if !reached {
        return;
    }

    let Some(final_ms) = timer.finish(now_ms(&time)) else {
        return;
    };

    freeze_player(&mut commands, player);
    finished.write(RunFinished { final_ms });
    info!("Run finished in {}", format_time_ms(final_ms));
}

pub(crate) fn detect_fall_death(
    mut commands: Commands,
    settings: Res<RunSettings>,
    bounds: Res<LevelBounds>,
    timer: Res<RunTimer>,
    mut death: ResMut<DeathState>,
    player_query: Query<(Entity, &Transform), With<Player>>,
    mut died: MessageWriter<PlayerDied>,
) {
    if death.is_dead || timer.state() != RunState::Running {
        return;
    }

    let margin = settings.death_margin();
    for (entity, transform) in &player_query {
        if bounds.is_out_of_bounds(transform.translation.truncate(), margin) {
            death.is_dead = true;
            freeze_player(&mut commands, entity);
            died.write(PlayerDied);
            info!("Player left the level at {:?}", transform.translation.truncate());
        }
    }
}
