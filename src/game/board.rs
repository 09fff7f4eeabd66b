//! Board components and pointer handlers

use crate::engine::components::{Label, Sprite};
use crate::engine::{Component, Context, ObjectId};

use super::logic::{GameState, Placement};

/// Opacity of the mark shown while hovering an empty tile
pub const PREVIEW_OPACITY: f32 = 0.5;

/// Which cell a tile object stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardTile {
    pub row: usize,
    pub col: usize,
}

impl Component for BoardTile {}

/// Owns the game state; lives on the board object.
#[derive(Debug, Default)]
pub struct TicTacToe {
    pub state: GameState,
}

impl Component for TicTacToe {}

fn tile_of(ctx: &Context, tile: ObjectId) -> Option<BoardTile> {
    ctx.scene.component::<BoardTile>(tile).copied()
}

fn game(ctx: &Context, board: ObjectId) -> Option<&GameState> {
    ctx.scene.component::<TicTacToe>(board).map(|game| &game.state)
}

/// Show the current player's mark, faded, over an empty tile.
pub fn on_tile_enter(ctx: &mut Context, board: ObjectId, tile: ObjectId) {
    let (Some(BoardTile { row, col }), Some(state)) = (tile_of(ctx, tile), game(ctx, board)) else {
        return;
    };
    if !state.is_running() {
        return;
    }
    log::debug!("Mouse enter: {}, {}", row, col);

    if let Some(mark) = state.preview(row, col) {
        if let Some(sprite) = ctx.scene.component_mut::<Sprite>(tile) {
            sprite.set_image(mark.image());
            sprite.set_opacity(PREVIEW_OPACITY);
            sprite.set_visible(true);
        }
    }
}

/// Hide the preview again unless the tile got a mark meanwhile.
pub fn on_tile_leave(ctx: &mut Context, board: ObjectId, tile: ObjectId) {
    let (Some(BoardTile { row, col }), Some(state)) = (tile_of(ctx, tile), game(ctx, board)) else {
        return;
    };
    if !state.is_running() {
        return;
    }
    log::debug!("Mouse leave: {}, {}", row, col);

    if state.cell(row, col).is_none() {
        if let Some(sprite) = ctx.scene.component_mut::<Sprite>(tile) {
            sprite.set_visible(false);
        }
    }
}

/// Commit the current player's mark.
pub fn on_tile_down(ctx: &mut Context, board: ObjectId, tile: ObjectId) {
    let Some(BoardTile { row, col }) = tile_of(ctx, tile) else {
        return;
    };
    let Some(game) = ctx.scene.component_mut::<TicTacToe>(board) else {
        return;
    };
    if !game.state.is_running() {
        return;
    }
    log::debug!("Mouse down: {}, {}", row, col);

    match game.state.place(row, col) {
        Placement::Placed(mark) => {
            if let Some(sprite) = ctx.scene.component_mut::<Sprite>(tile) {
                sprite.set_image(mark.image());
                sprite.set_opacity(1.0);
                sprite.set_visible(true);
            }
        }
        Placement::Occupied => log::debug!("Tile {}, {} is already taken", row, col),
        Placement::GameOver => {}
    }
}

pub fn check_winner(ctx: &mut Context, board: ObjectId) {
    if let Some(game) = ctx.scene.component_mut::<TicTacToe>(board) {
        game.state.check_winner();
    }
}

pub fn status_text(state: &GameState) -> String {
    match state.winner() {
        Some(mark) => format!("{} wins!", mark),
        None => format!("{} to move", state.turn()),
    }
}

/// Mirror the game state into the status label.
pub fn update_status(ctx: &mut Context, board: ObjectId, status: ObjectId) {
    let Some(text) = game(ctx, board).map(status_text) else {
        return;
    };
    if let Some(label) = ctx.scene.component_mut::<Label>(status) {
        label.set_text(text);
    }
}
