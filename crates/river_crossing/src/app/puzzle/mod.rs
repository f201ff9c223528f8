mod board;
mod graph;
mod poses;
mod resolver;
mod scene_impl;
mod scheduler;
mod session;
mod ui;

#[cfg(test)]
mod tests;

use engine::Scene;
use tracing::info;

pub(crate) use graph::Bank;

use crate::app::config::BoardConfig;
use scene_impl::{board_rect, BoardScene, MenuScene};

pub(crate) fn build_scene_pair(
    config: BoardConfig,
    board_width: u32,
    board_height: u32,
) -> (Box<dyn Scene>, Box<dyn Scene>) {
    let table = graph::TransitionTable::standard();
    info!(configurations = table.len(), "transition_table_ready");
    let rect = board_rect(board_width, board_height);
    (
        Box::new(MenuScene::new(rect)),
        Box::new(BoardScene::new(config, rect)),
    )
}
