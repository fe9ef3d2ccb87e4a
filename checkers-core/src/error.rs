//! 错误类型定义

use thiserror::Error;

use crate::piece::Coordinate;

/// 跳棋规则错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// 起始位置没有棋子
    #[error("No piece at start location ({x}, {y})")]
    InvalidStartLocation { x: u8, y: u8 },

    /// 目标位置不在合法集合中
    #[error("Illegal destination: from {from} to {to}")]
    IllegalDestination { from: Coordinate, to: Coordinate },

    /// 无法解释的请求
    #[error("Malformed request: {reason}")]
    MalformedRequest { reason: String },

    /// 棋子不属于当前走子方
    #[error("Piece at ({x}, {y}) does not belong to the side to move")]
    WrongSide { x: u8, y: u8 },

    /// 游戏已结束
    #[error("Game is already over")]
    GameOver,

    /// 不支持的棋盘大小
    #[error("Invalid board size: {size}")]
    InvalidBoardSize { size: u8 },

    /// 坐标超出棋盘
    #[error("Location out of bounds: ({x}, {y})")]
    OutOfBounds { x: u8, y: u8 },

    /// 该位置已有棋子
    #[error("Square already occupied: ({x}, {y})")]
    OccupiedSquare { x: u8, y: u8 },
}

impl RuleError {
    /// 构造起始位置错误
    pub fn invalid_start(at: Coordinate) -> Self {
        RuleError::InvalidStartLocation { x: at.x, y: at.y }
    }

    /// 构造格式错误
    pub fn malformed(reason: impl Into<String>) -> Self {
        RuleError::MalformedRequest {
            reason: reason.into(),
        }
    }
}

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum CoreError {
    /// JSON 序列化错误
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// 跳棋规则错误
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),
}

/// 引擎操作结果类型
pub type Result<T> = std::result::Result<T, CoreError>;
