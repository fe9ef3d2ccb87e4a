//! 引擎常量定义

/// 标准棋盘边长
pub const STANDARD_BOARD_SIZE: u8 = 8;

/// 支持的最小棋盘边长（每方至少一行棋子）
pub const MIN_BOARD_SIZE: u8 = 4;

/// 支持的最大棋盘边长
pub const MAX_BOARD_SIZE: u8 = 26;

/// 棋盘中间留空的行数
pub const NEUTRAL_ROWS: u8 = 2;

/// 普通走子的斜向步长
pub const STEP_DISTANCE: i8 = 1;

/// 吃子跳跃的斜向步长
pub const JUMP_DISTANCE: i8 = 2;
