//! Animation keys and playback.
//!
//! Playback only restarts when a different key is requested, so the
//! selector can ask for the same key every frame.

use bevy::ecs::message::{Message, MessageReader};
use bevy::prelude::*;

/// How far the last frame of a loop is blended toward white.
const FRAME_BRIGHTEN: f32 = 0.3;

/// Player animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimationKey {
    #[default]
    Idle,
    Run,
    WallHold,
    Jump,
    Fall,
}

impl AnimationKey {
    pub fn name(self) -> &'static str {
        match self {
            AnimationKey::Idle => "idle",
            AnimationKey::Run => "run",
            AnimationKey::WallHold => "wallhold",
            AnimationKey::Jump => "jump",
            AnimationKey::Fall => "fall",
        }
    }

    pub fn frame_count(self) -> u32 {
        match self {
            AnimationKey::Idle => 6,
            AnimationKey::Run => 8,
            AnimationKey::WallHold | AnimationKey::Jump | AnimationKey::Fall => 1,
        }
    }

    /// Frames per second; single-frame poses don't advance.
    pub fn frame_rate(self) -> f32 {
        match self {
            AnimationKey::Idle => 8.0,
            AnimationKey::Run => 12.0,
            AnimationKey::WallHold | AnimationKey::Jump | AnimationKey::Fall => 0.0,
        }
    }

    /// Placeholder body color until the sprite sheet is wired in.
    pub fn tint(self) -> Color {
        match self {
            AnimationKey::Idle => Color::srgb(0.1, 0.1, 0.1),
            AnimationKey::Run => Color::srgb(0.15, 0.2, 0.35),
            AnimationKey::WallHold => Color::srgb(0.45, 0.2, 0.15),
            AnimationKey::Jump => Color::srgb(0.2, 0.35, 0.2),
            AnimationKey::Fall => Color::srgb(0.3, 0.3, 0.15),
        }
    }

    /// Color for `frame` of this animation. Looping animations brighten
    /// through the cycle so playback is visible without a sprite sheet.
    pub fn frame_color(self, frame: u32) -> Color {
        let count = self.frame_count();
        if count <= 1 {
            return self.tint();
        }
        let phase = (frame % count) as f32 / count as f32;
        self.tint().mix(&Color::WHITE, FRAME_BRIGHTEN * phase)
    }
}

/// Component for animation playback on the player sprite.
#[derive(Component, Debug, Default)]
pub struct AnimationController {
    /// Last key passed to `play`, if any.
    current: Option<AnimationKey>,
    /// Current frame index (0-based).
    pub frame: u32,
    /// Time accumulator for frame timing.
    pub frame_timer: f32,
}

impl AnimationController {
    pub fn current(&self) -> Option<AnimationKey> {
        self.current
    }

    /// Start `key` from its first frame. Returns false, leaving playback
    /// untouched, if `key` is already playing.
    pub fn play(&mut self, key: AnimationKey) -> bool {
        if self.current == Some(key) {
            return false;
        }
        self.current = Some(key);
        self.frame = 0;
        self.frame_timer = 0.0;
        true
    }

    /// Advance looping playback by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        let Some(key) = self.current else {
            return;
        };
        let rate = key.frame_rate();
        if rate <= 0.0 || key.frame_count() <= 1 {
            return;
        }

        let frame_duration = 1.0 / rate;
        self.frame_timer += dt;
        while self.frame_timer >= frame_duration {
            self.frame_timer -= frame_duration;
            self.frame = (self.frame + 1) % key.frame_count();
        }
    }
}

/// Message fired when the player's animation changes.
#[derive(Debug)]
pub struct AnimationChanged {
    pub entity: Entity,
    pub from: Option<AnimationKey>,
    pub to: AnimationKey,
}

impl Message for AnimationChanged {}

/// System that advances playback and paints the current frame. Entities
/// that changed animation this frame are repainted even if the frame index
/// stayed put.
pub(crate) fn update_animation_frames(
    time: Res<Time>,
    mut changed: MessageReader<AnimationChanged>,
    mut query: Query<(Entity, &mut AnimationController, &mut Sprite)>,
) {
    let restarted: Vec<Entity> = changed.read().map(|change| change.entity).collect();
    let dt = time.delta_secs();

    for (entity, mut controller, mut sprite) in &mut query {
        let before = controller.frame;
        controller.advance(dt);

        let Some(key) = controller.current() else {
            continue;
        };
        if controller.frame != before || restarted.contains(&entity) {
            sprite.color = key.frame_color(controller.frame);
        }
    }
}
