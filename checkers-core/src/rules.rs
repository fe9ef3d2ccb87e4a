//! 规则验证
//!
//! 每次验证都重新生成合法走法集合，不依赖之前生成的结果。

use tracing::debug;

use crate::board::Position;
use crate::error::RuleError;
use crate::game::GameSession;
use crate::moves::{MoveGenerator, MoveKind};
use crate::piece::{Coordinate, Piece, PieceId};

/// 规则验证器
pub struct Rules;

impl Rules {
    /// 验证普通走子
    pub fn validate_simple_move(game: &GameSession, piece: PieceId, destination: Coordinate) -> bool {
        Self::is_legal(game.position(), piece, destination, MoveKind::Simple)
    }

    /// 验证连续吃子中的下一跳
    pub fn validate_next_capture(game: &GameSession, piece: PieceId, destination: Coordinate) -> bool {
        Self::is_legal(game.position(), piece, destination, MoveKind::Capture)
    }

    /// 目标位置是否在该棋子当前的合法集合中
    pub fn is_legal(position: &Position, piece: PieceId, destination: Coordinate, kind: MoveKind) -> bool {
        let Some(current) = position.piece(piece) else {
            return false;
        };
        let legal = MoveGenerator::legal_actions(position, current.side, kind)
            .contains(piece, destination);
        debug!(
            "Validate {:?} {} {} -> {}: {}",
            kind, piece, current.coordinate, destination, legal
        );
        legal
    }

    /// 验证走法，不合法时返回带坐标的错误
    pub fn check(
        position: &Position,
        piece: PieceId,
        destination: Coordinate,
        kind: MoveKind,
    ) -> Result<(), RuleError> {
        if Self::is_legal(position, piece, destination, kind) {
            return Ok(());
        }
        let from = position
            .piece(piece)
            .map(|p| p.coordinate)
            .ok_or_else(|| RuleError::malformed(format!("unknown piece {piece}")))?;
        Err(RuleError::IllegalDestination {
            from,
            to: destination,
        })
    }

    /// 查找起始位置的棋子
    pub fn resolve_start(position: &Position, from: Coordinate) -> Result<Piece, RuleError> {
        position
            .piece_at(from)
            .copied()
            .ok_or_else(|| RuleError::invalid_start(from))
    }
}
