//! Run domain: the time-trial level, built from tile-aligned blocks.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::content::RunSettings;
use crate::movement::{GameLayer, Ground, PLAYER_SIZE, Wall};

/// Finish line sensor. Overlapping it ends the run.
#[derive(Component, Debug)]
pub struct FinishRegion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Ground,
    Wall,
    Finish,
}

/// A block in tile units, anchored at its bottom-left tile.
#[derive(Debug, Clone, Copy)]
struct Block {
    kind: BlockKind,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
}

const fn block(kind: BlockKind, x: i32, y: i32, w: i32, h: i32) -> Block {
    Block { kind, x, y, w, h }
}

const LEVEL_WIDTH_TILES: i32 = 64;
const LEVEL_HEIGHT_TILES: i32 = 24;

/// Tile the player's feet start on.
const SPAWN_TILE: IVec2 = IVec2::new(4, 2);

const LEVEL_BLOCKS: &[Block] = &[
    // Floor, with a gap to fall through
    block(BlockKind::Ground, 0, 0, 24, 2),
    block(BlockKind::Ground, 28, 0, 36, 2),
    // Boundaries
    block(BlockKind::Wall, -1, 0, 1, LEVEL_HEIGHT_TILES),
    block(BlockKind::Wall, LEVEL_WIDTH_TILES, 0, 1, LEVEL_HEIGHT_TILES),
    // Stepping platforms
    block(BlockKind::Ground, 10, 5, 6, 1),
    block(BlockKind::Ground, 18, 8, 5, 1),
    // Wall-jump chimney
    block(BlockKind::Wall, 36, 2, 1, 14),
    block(BlockKind::Wall, 41, 5, 1, 14),
    // Upper ledge and the finish on it
    block(BlockKind::Ground, 42, 15, 16, 1),
    block(BlockKind::Finish, 54, 16, 3, 4),
];

/// World-space extent of the level. Leaving it by more than the death
/// margin kills the player.
#[derive(Resource, Debug, Clone, Copy)]
pub struct LevelBounds {
    pub rect: Rect,
    pub spawn: Vec2,
}

impl LevelBounds {
    pub fn new(tile_size: f32) -> Self {
        let spawn = Vec2::new(
            (SPAWN_TILE.x as f32 + 0.5) * tile_size,
            SPAWN_TILE.y as f32 * tile_size + PLAYER_SIZE.y * 0.5 + 1.0,
        );
        Self {
            rect: Rect::new(
                0.0,
                0.0,
                LEVEL_WIDTH_TILES as f32 * tile_size,
                LEVEL_HEIGHT_TILES as f32 * tile_size,
            ),
            spawn,
        }
    }

    /// Whether `position` is further than `margin` outside the level.
    pub fn is_out_of_bounds(&self, position: Vec2, margin: f32) -> bool {
        !self.rect.inflate(margin).contains(position)
    }
}

impl Default for LevelBounds {
    fn default() -> Self {
        Self::new(RunSettings::default().tile_size)
    }
}

pub(crate) fn spawn_level(mut commands: Commands, settings: Res<RunSettings>) {
    let tile = settings.tile_size;

    let ground_color = Color::srgb(0.4, 0.5, 0.4);
    let wall_color = Color::srgb(0.3, 0.3, 0.4);
    let finish_color = Color::srgba(0.9, 0.8, 0.2, 0.35);

    let ground_layers = CollisionLayers::new(GameLayer::Ground, [GameLayer::Player]);
    let wall_layers = CollisionLayers::new(GameLayer::Wall, [GameLayer::Player]);

    for b in LEVEL_BLOCKS {
        let size = Vec2::new(b.w as f32, b.h as f32) * tile;
        let center = Vec2::new(b.x as f32, b.y as f32) * tile + size * 0.5;
        let transform = Transform::from_xyz(center.x, center.y, 0.0);

        match b.kind {
            BlockKind::Ground => {
                commands.spawn((
                    Ground,
                    Sprite::from_color(ground_color, size),
                    transform,
                    RigidBody::Static,
                    Collider::rectangle(size.x, size.y),
                    ground_layers,
                ));
            }
            BlockKind::Wall => {
                commands.spawn((
                    Wall,
                    Sprite::from_color(wall_color, size),
                    transform,
                    RigidBody::Static,
                    Collider::rectangle(size.x, size.y),
                    wall_layers,
                ));
            }
            BlockKind::Finish => {
                commands.spawn((
                    FinishRegion,
                    Sprite::from_color(finish_color, size),
                    transform,
                    RigidBody::Static,
                    Collider::rectangle(size.x, size.y),
                    Sensor,
                    CollisionEventsEnabled,
                    CollisionLayers::new(GameLayer::Sensor, [GameLayer::Player]),
                ));
            }
        }
    }

    let bounds = LevelBounds::new(tile);
    info!(
        "Level spawned: {} blocks, bounds {:?}",
        LEVEL_BLOCKS.len(),
        bounds.rect
    );
    commands.insert_resource(bounds);
}
