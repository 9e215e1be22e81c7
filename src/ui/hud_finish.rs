//! UI domain: the finish panel with the first-place entry and the
//! leaderboard submission prompt.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::content::LeaderboardSettings;
use crate::leaderboard::{FinishSession, SubmitRequested, TopEntryDisplay, format_sats};
use crate::run::format_time_ms;

const TEXT_COLOR: Color = Color::srgb(0.95, 0.95, 0.95);
const BUTTON_TEXT_COLOR: Color = Color::srgb(0.05, 0.76, 0.79);
const DISABLED_ALPHA: f32 = 0.6;

/// Marker for the finish panel root
#[derive(Component)]
pub struct FinishPanelUI;

#[derive(Component)]
pub struct TopEntryText;

#[derive(Component)]
pub struct SubmitPromptText;

/// Marker for the clickable submit button
#[derive(Component)]
pub struct SubmitButton;

#[derive(Component)]
pub struct SubmitButtonText;

#[derive(Component)]
pub struct SubmitStatusText;

fn panel_text(text: &'static str, font_size: f32) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(TEXT_COLOR),
        TextLayout::new_with_justify(Justify::Center),
    )
}

pub(crate) fn spawn_finish_panel(mut commands: Commands) {
    commands
        .spawn((
            FinishPanelUI,
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                right: Val::Px(0.0),
                top: Val::Px(80.0),
                bottom: Val::Px(0.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(24.0),
                ..default()
            },
            Visibility::Hidden,
            ZIndex(10),
        ))
        .with_children(|parent| {
            parent.spawn((TopEntryText, panel_text("", 18.0)));
            parent.spawn((SubmitPromptText, panel_text("", 18.0)));

            parent
                .spawn((
                    SubmitButton,
                    Button,
                    Node {
                        padding: UiRect::axes(Val::Px(24.0), Val::Px(8.0)),
                        border: UiRect::all(Val::Px(2.0)),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.4)),
                    BorderColor::all(BUTTON_TEXT_COLOR),
                ))
                .with_child((
                    SubmitButtonText,
                    Text::new("Submit (Y)"),
                    TextFont {
                        font_size: 18.0,
                        ..default()
                    },
                    TextColor(BUTTON_TEXT_COLOR),
                ));

            parent.spawn((SubmitStatusText, panel_text("", 16.0)));
        });
}

pub(crate) fn top_entry_label(display: &TopEntryDisplay) -> Option<String> {
    match display {
        TopEntryDisplay::Hidden => None,
        TopEntryDisplay::Loading => Some("1st place: Loading…".to_string()),
        TopEntryDisplay::NoData => Some("1st place: —".to_string()),
        TopEntryDisplay::Entry { label, score_ms } => Some(format!(
            "1st place: {}\nTime: {}",
            label,
            format_time_ms(*score_ms as f64)
        )),
    }
}

fn shown(visible: bool) -> Visibility {
    if visible {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    }
}

/// Mirror the finish session onto the panel.
pub(crate) fn update_finish_panel(
    session: Res<FinishSession>,
    settings: Res<LeaderboardSettings>,
    mut panel_query: Query<&mut Visibility, With<FinishPanelUI>>,
    mut top_query: Query<
        (&mut Text, &mut Visibility),
        (With<TopEntryText>, Without<FinishPanelUI>),
    >,
    mut prompt_query: Query<
        (&mut Text, &mut Visibility),
        (
            With<SubmitPromptText>,
            Without<FinishPanelUI>,
            Without<TopEntryText>,
        ),
    >,
    mut button_query: Query<
        &mut Visibility,
        (
            With<SubmitButton>,
            Without<FinishPanelUI>,
            Without<TopEntryText>,
            Without<SubmitPromptText>,
        ),
    >,
    mut button_text_query: Query<&mut TextColor, With<SubmitButtonText>>,
    mut status_query: Query<
        (&mut Text, &mut Visibility),
        (
            With<SubmitStatusText>,
            Without<FinishPanelUI>,
            Without<TopEntryText>,
            Without<SubmitPromptText>,
            Without<SubmitButton>,
        ),
    >,
) {
    if !session.is_changed() {
        return;
    }

    for mut visibility in &mut panel_query {
        *visibility = if session.is_active() {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }

    let top_label = top_entry_label(session.top_entry());
    for (mut text, mut visibility) in &mut top_query {
        *visibility = shown(top_label.is_some());
        if let Some(label) = &top_label {
            **text = label.clone();
        }
    }

    for (mut text, mut visibility) in &mut prompt_query {
        *visibility = shown(session.prompt_visible());
        **text = format!(
            "Submit your time to the leaderboard?\nFee: {} sats",
            format_sats(settings.submit_fee_sats)
        );
    }

    for mut visibility in &mut button_query {
        *visibility = shown(session.prompt_visible());
    }

    let alpha = if session.controls_enabled() {
        1.0
    } else {
        DISABLED_ALPHA
    };
    for mut color in &mut button_text_query {
        color.0 = BUTTON_TEXT_COLOR.with_alpha(alpha);
    }

    for (mut text, mut visibility) in &mut status_query {
        *visibility = shown(!session.status().is_empty());
        **text = session.status().to_string();
    }
}

pub(crate) fn handle_submit_button(
    session: Res<FinishSession>,
    button_query: Query<&Interaction, (With<SubmitButton>, Changed<Interaction>)>,
    mut submit: MessageWriter<SubmitRequested>,
) {
    let pressed = button_query
        .iter()
        .any(|interaction| *interaction == Interaction::Pressed);

    if pressed && session.accepts_prompt_input() {
        submit.write(SubmitRequested);
    }
}
