//! Triple T
//!
//! A 3x3 board of tiles. Each tile carries a hidden [`Sprite`] for its mark,
//! a [`MouseListener2D`] and a [`BoardTile`] naming its cell; the board
//! object carries the [`TicTacToe`] state. Pointer events from the tiles
//! drive the game:
//!
//! - enter: preview the current player's mark
//! - leave: hide the preview
//! - down: place the mark, then check for a winner, then refresh the status

pub mod board;
pub mod logic;

use macroquad::prelude::DARKGRAY;

use crate::engine::components::{Label, MouseListener2D, Sprite};
use crate::engine::event::{MouseDownEvent, MouseEnterEvent, MouseLeaveEvent};
use crate::engine::{Context, ObjectId, Propagation, Size, Vector};
use crate::error::SceneError;

pub use board::{BoardTile, TicTacToe};
use logic::{GameState, BOARD_SIZE};

/// Gap between the status baseline and the top of the board, in units
const STATUS_OFFSET: f32 = 0.3;

/// Top-left corner of a board centred on the screen, in world units.
pub fn board_origin(ctx: &Context) -> Vector {
    let side = BOARD_SIZE as f32;
    let width = ctx.screen.width / ctx.pixel_per_unit;
    let height = ctx.screen.height / ctx.pixel_per_unit;
    Vector::new((width - side) / 2.0, (height - side) / 2.0)
}

/// Build the scene and wire the handlers. Returns the board object.
pub fn setup(ctx: &mut Context) -> Result<ObjectId, SceneError> {
    ctx.create_camera("main camera")?;

    let origin = board_origin(ctx);
    let board = ctx.spawn_at("board", origin);
    ctx.add_component(board, Sprite::new("board").with_size(Size::square(BOARD_SIZE as f32)))?;
    ctx.add_component(board, TicTacToe::default())?;

    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            let position = Vector::new(col as f32, row as f32);
            let tile = ctx.spawn_child_at(board, format!("tile {},{}", row, col), position)?;
            ctx.add_component(tile, Sprite::empty().with_size(Size::square(1.0)).hidden())?;
            ctx.add_component(tile, MouseListener2D::new(Size::square(1.0)))?;
            ctx.add_component(tile, BoardTile { row, col })?;
        }
    }

    let status = ctx.spawn_at("status", Vector::new(origin.x, origin.y - STATUS_OFFSET));
    let text = board::status_text(&GameState::new());
    ctx.add_component(status, Label::new(text).with_font("main", 32).with_color(DARKGRAY))?;

    ctx.events.subscribe::<MouseListener2D, MouseEnterEvent, _>(move |ctx, args| {
        if let Some(tile) = args.sender {
            board::on_tile_enter(ctx, board, tile);
        }
        Propagation::Continue
    });
    ctx.events.subscribe::<MouseListener2D, MouseLeaveEvent, _>(move |ctx, args| {
        if let Some(tile) = args.sender {
            board::on_tile_leave(ctx, board, tile);
        }
        Propagation::Continue
    });
    // Order matters: place, then check, then report
    ctx.events.subscribe::<MouseListener2D, MouseDownEvent, _>(move |ctx, args| {
        if let Some(tile) = args.sender {
            board::on_tile_down(ctx, board, tile);
        }
        Propagation::Continue
    });
    ctx.events.subscribe::<MouseListener2D, MouseDownEvent, _>(move |ctx, _| {
        board::check_winner(ctx, board);
        Propagation::Continue
    });
    ctx.events.subscribe::<MouseListener2D, MouseDownEvent, _>(move |ctx, _| {
        board::update_status(ctx, board, status);
        Propagation::Continue
    });

    log::info!("Triple T ready, {} objects", ctx.scene.len());
    Ok(board)
}
