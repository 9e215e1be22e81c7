//! UI domain: the standings overlay along the bottom of the screen.

use bevy::prelude::*;

use crate::leaderboard::{StandingRow, Standings};
use crate::run::format_time_ms;
use crate::ui::hud_run::HUD_PADDING;

pub(crate) const STANDINGS_HEIGHT: f32 = 240.0;

/// Marker for the "Loading…" / "Top N" caption
#[derive(Component)]
pub struct StandingsCaptionText;

/// Marker for the table body
#[derive(Component)]
pub struct StandingsRowsText;

pub(crate) fn spawn_standings_overlay(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                right: Val::Px(0.0),
                bottom: Val::Px(0.0),
                height: Val::Px(STANDINGS_HEIGHT),
                flex_direction: FlexDirection::Column,
                padding: UiRect::axes(Val::Px(12.0), Val::Px(10.0)),
                row_gap: Val::Px(8.0),
                border: UiRect::top(Val::Px(1.0)),
                overflow: Overflow::clip(),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.92)),
            BorderColor::all(Color::srgba(1.0, 1.0, 1.0, 0.12)),
            ZIndex(5),
        ))
        .with_children(|parent| {
            parent
                .spawn(Node {
                    justify_content: JustifyContent::SpaceBetween,
                    align_items: AlignItems::Baseline,
                    ..default()
                })
                .with_children(|header| {
                    header.spawn((
                        Text::new("LEADERBOARD"),
                        TextFont {
                            font_size: 14.0,
                            ..default()
                        },
                        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.92)),
                    ));
                    header.spawn((
                        StandingsCaptionText,
                        Text::new("Loading…"),
                        TextFont {
                            font_size: 12.0,
                            ..default()
                        },
                        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.7)),
                        Node {
                            margin: UiRect::left(Val::Px(HUD_PADDING)),
                            ..default()
                        },
                    ));
                });

            parent.spawn((
                StandingsRowsText,
                Text::new(""),
                TextFont {
                    font_size: 13.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.92)),
            ));
        });
}

/// Player names longer than this are cut with an ellipsis.
const MAX_LABEL_CHARS: usize = 24;

fn truncate_label(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_CHARS {
        return label.to_string();
    }
    let cut: String = label.chars().take(MAX_LABEL_CHARS - 1).collect();
    format!("{}…", cut)
}

/// Table body: one line per row, or a placeholder when the board is empty.
pub(crate) fn standings_table(rows: &[StandingRow], loading: bool) -> String {
    let mut out = format!("{:<4} {:<24} {:>10}", "#", "Player", "Time");
    if rows.is_empty() {
        if !loading {
            out.push_str("\nNo scores yet.");
        }
        return out;
    }

    for row in rows {
        out.push_str(&format!(
            "\n{:<4} {:<24} {:>10}",
            row.rank,
            truncate_label(&row.label),
            format_time_ms(row.score_ms as f64)
        ));
    }
    out
}

pub(crate) fn update_standings_overlay(
    standings: Res<Standings>,
    mut caption_query: Query<&mut Text, (With<StandingsCaptionText>, Without<StandingsRowsText>)>,
    mut rows_query: Query<&mut Text, (With<StandingsRowsText>, Without<StandingsCaptionText>)>,
) {
    if !standings.is_changed() {
        return;
    }

    let caption = if standings.loading {
        "Loading…".to_string()
    } else {
        format!("Top {}", standings.top_n)
    };
    for mut text in &mut caption_query {
        **text = caption.clone();
    }

    let table = standings_table(&standings.rows, standings.loading);
    for mut text in &mut rows_query {
        **text = table.clone();
    }
}
