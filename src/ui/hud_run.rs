//! UI domain: countdown, run timer, finish banner and death prompt.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::core::now_ms;
use crate::run::{
    CountdownTick, LevelRestarted, PlayerDied, RunFinished, RunStarted, RunState, RunTimer,
    format_time_ms,
};

pub(crate) const HUD_PADDING: f32 = 16.0;

/// Marker for the big countdown number
#[derive(Component)]
pub struct CountdownText;

/// Marker for the elapsed-time readout
#[derive(Component)]
pub struct RunTimerText;

/// Marker for the finish banner
#[derive(Component)]
pub struct FinishBannerText;

/// Marker for the "Press ESC to restart" prompt
#[derive(Component)]
pub struct DeathPromptText;

/// Full-screen node that centers its single child.
fn centered_layer(top_offset: f32) -> Node {
    Node {
        position_type: PositionType::Absolute,
        left: Val::Px(0.0),
        right: Val::Px(0.0),
        top: Val::Px(top_offset),
        bottom: Val::Px(0.0),
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        ..default()
    }
}

pub(crate) fn spawn_run_hud(mut commands: Commands) {
    commands.spawn((centered_layer(0.0), ZIndex(10))).with_child((
        CountdownText,
        Text::new("3"),
        TextFont {
            font_size: 72.0,
            ..default()
        },
        TextColor(Color::srgb(0.95, 0.95, 0.95)),
        Visibility::Hidden,
    ));

    commands.spawn((
        RunTimerText,
        Text::new(format_time_ms(0.0)),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::srgb(0.95, 0.95, 0.95)),
        Node {
            position_type: PositionType::Absolute,
            right: Val::Px(HUD_PADDING),
            top: Val::Px(HUD_PADDING),
            ..default()
        },
        Visibility::Hidden,
        ZIndex(10),
    ));

    // Sits above the finish panel
    commands.spawn((centered_layer(-280.0), ZIndex(10))).with_child((
        FinishBannerText,
        Text::new(""),
        TextFont {
            font_size: 28.0,
            ..default()
        },
        TextColor(Color::srgb(0.95, 0.95, 0.95)),
        TextLayout::new_with_justify(Justify::Center),
        Visibility::Hidden,
    ));

    commands.spawn((centered_layer(0.0), ZIndex(20))).with_child((
        DeathPromptText,
        Text::new("Press ESC to restart"),
        TextFont {
            font_size: 24.0,
            ..default()
        },
        TextColor(Color::srgb(1.0, 0.23, 0.23)),
        Visibility::Hidden,
    ));
}

pub(crate) fn update_countdown_text(
    mut ticks: MessageReader<CountdownTick>,
    mut started: MessageReader<RunStarted>,
    mut query: Query<(&mut Text, &mut Visibility), With<CountdownText>>,
) {
    let latest_tick = ticks.read().last().map(|tick| tick.remaining);
    let started = started.read().count() > 0;

    for (mut text, mut visibility) in &mut query {
        if let Some(remaining) = latest_tick {
            **text = remaining.to_string();
            *visibility = Visibility::Visible;
        }
        if started {
            *visibility = Visibility::Hidden;
        }
    }
}

/// Live elapsed time while running; the final time once finished.
pub(crate) fn update_run_timer_text(
    time: Res<Time>,
    timer: Res<RunTimer>,
    mut query: Query<(&mut Text, &mut Visibility), With<RunTimerText>>,
) {
    let shown = match timer.state() {
        RunState::Countdown => None,
        RunState::Running => timer.elapsed_ms(now_ms(&time)),
        RunState::Finished => timer.clock().final_ms(),
    };

    for (mut text, mut visibility) in &mut query {
        match shown {
            Some(ms) => {
                **text = format_time_ms(ms);
                *visibility = Visibility::Visible;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}

pub(crate) fn update_finish_banner(
    mut finished: MessageReader<RunFinished>,
    mut restarted: MessageReader<LevelRestarted>,
    mut query: Query<(&mut Text, &mut Visibility), With<FinishBannerText>>,
) {
    let final_ms = finished.read().last().map(|event| event.final_ms);
    let restarted = restarted.read().count() > 0;

    for (mut text, mut visibility) in &mut query {
        if restarted {
            *visibility = Visibility::Hidden;
        }
        if let Some(ms) = final_ms {
            **text = format!(
                "Finished!\nTime: {}\n\nPress ESC to retry",
                format_time_ms(ms)
            );
            *visibility = Visibility::Visible;
        }
    }
}

pub(crate) fn update_death_prompt(
    mut died: MessageReader<PlayerDied>,
    mut restarted: MessageReader<LevelRestarted>,
    mut query: Query<&mut Visibility, With<DeathPromptText>>,
) {
    let died = died.read().count() > 0;
    let restarted = restarted.read().count() > 0;

    for mut visibility in &mut query {
        if restarted {
            *visibility = Visibility::Hidden;
        }
        if died {
            *visibility = Visibility::Visible;
        }
    }
}
