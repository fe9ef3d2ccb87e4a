//! 跳棋（English draughts）规则引擎
//!
//! 包含:
//! - 坐标、棋子、局面等核心数据结构
//! - 走法生成和规则验证
//! - 回合执行状态机（普通走子、连续吃子、升变、终局判定）
//! - 对局会话与配置
//!
//! 引擎不做任何 I/O：文本解析和渲染由调用方负责。

mod board;
mod config;
mod constants;
mod error;
mod game;
mod moves;
mod piece;
mod request;
mod rules;
mod turn;

pub use board::{check_board_size, BoardSnapshot, Position, SquareView};
pub use config::GameConfig;
pub use constants::*;
pub use error::{CoreError, Result, RuleError};
pub use game::GameSession;
pub use moves::{LegalMoveSet, MoveGenerator, MoveKind, PieceMoves};
pub use piece::{directions, Coordinate, Piece, PieceId, Side};
pub use request::MoveRequest;
pub use rules::Rules;
pub use turn::{CaptureStep, Turn, TurnAction, TurnOutcome, TurnState};
