//! 棋子定义

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RuleError;

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    /// 先手方（红方），向 y 减小的方向前进
    First,
    /// 后手方（黑方），向 y 增大的方向前进
    Second,
}

impl Side {
    /// 获取对方阵营
    pub fn opponent(&self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    /// 前进方向的 y 增量
    pub fn forward(&self) -> i8 {
        match self {
            Side::First => -1,
            Side::Second => 1,
        }
    }

    /// 升变所在的底线行
    pub fn back_rank(&self, board_size: u8) -> u8 {
        match self {
            Side::First => 0,
            Side::Second => board_size.saturating_sub(1),
        }
    }

    /// 棋盘上显示的字符
    pub fn symbol(&self) -> char {
        match self {
            Side::First => 'r',
            Side::Second => 'b',
        }
    }

    /// 显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Side::First => "Red",
            Side::Second => "Black",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Side {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "red" | "r" => Ok(Side::First),
            "second" | "black" | "b" => Ok(Side::Second),
            other => Err(RuleError::malformed(format!("unknown side: {other}"))),
        }
    }
}

/// 棋盘坐标（从 0 开始）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    /// 列
    pub x: u8,
    /// 行
    pub y: u8,
}

impl Coordinate {
    /// 创建新坐标
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// 检查坐标是否在 `board_size` 大小的棋盘内
    pub fn is_within(&self, board_size: u8) -> bool {
        self.x < board_size && self.y < board_size
    }

    /// 获取偏移后的坐标，越过 0 时返回 None
    ///
    /// 不检查上界，上界由棋盘大小决定。
    pub fn offset(&self, dx: i8, dy: i8) -> Option<Coordinate> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(Coordinate { x, y })
    }

    /// 两个坐标之间的中点（被跳过的格子）
    pub fn midpoint(&self, other: Coordinate) -> Coordinate {
        let mid = |a: u8, b: u8| ((a as u16 + b as u16) / 2) as u8;
        Coordinate {
            x: mid(self.x, other.x),
            y: mid(self.y, other.y),
        }
    }

    /// 是否为深色格（标准布局只使用深色格）
    pub fn is_dark(&self) -> bool {
        self.x % 2 == self.y % 2
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// 棋子的稳定标识，与所在位置无关
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u32);

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 所有斜向方向（王棋可用）
const ALL_DIAGONALS: [(i8, i8); 4] = [(1, -1), (-1, -1), (1, 1), (-1, 1)];

/// 计算棋子的可用斜向方向（单位步长）
///
/// 普通棋子只能沿本方前进方向的两条斜线走，王棋四个方向都可以。
pub fn directions(side: Side, crowned: bool) -> Vec<(i8, i8)> {
    if crowned {
        return ALL_DIAGONALS.to_vec();
    }
    let dy = side.forward();
    vec![(1, dy), (-1, dy)]
}

/// 棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub coordinate: Coordinate,
    pub side: Side,
    /// 是否已升变为王
    pub crowned: bool,
}

impl Piece {
    /// 创建新棋子（未升变）
    pub fn new(id: PieceId, coordinate: Coordinate, side: Side) -> Self {
        Self {
            id,
            coordinate,
            side,
            crowned: false,
        }
    }

    /// 当前可用的斜向方向
    pub fn directions(&self) -> Vec<(i8, i8)> {
        directions(self.side, self.crowned)
    }

    /// 是否已到达对方底线且尚未升变
    pub fn reaches_back_rank(&self, board_size: u8) -> bool {
        !self.crowned && self.coordinate.y == self.side.back_rank(board_size)
    }

    /// 升变为王，返回本次是否发生了升变
    ///
    /// 升变是单向的，没有撤销的接口。
    pub fn crown(&mut self) -> bool {
        let changed = !self.crowned;
        self.crowned = true;
        changed
    }

    /// 获取棋子显示的字符（王棋大写）
    pub fn display_char(&self) -> char {
        let c = self.side.symbol();
        if self.crowned {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }
}
