//! 棋盘状态

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_BOARD_SIZE, MIN_BOARD_SIZE, NEUTRAL_ROWS};
use crate::error::RuleError;
use crate::piece::{Coordinate, Piece, PieceId, Side};

/// 检查棋盘大小是否受支持（偶数，4 到 26）
pub fn check_board_size(board_size: u8) -> Result<(), RuleError> {
    if (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&board_size) && board_size % 2 == 0 {
        Ok(())
    } else {
        Err(RuleError::InvalidBoardSize { size: board_size })
    }
}

/// 局面：棋盘大小和棋盘上的所有棋子
///
/// 棋子按 [`PieceId`] 存放，坐标到棋子的映射每次查询时重新计算。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PositionRecord")]
pub struct Position {
    board_size: u8,
    pieces: Vec<Piece>,
    next_id: u32,
}

/// 反序列化时的原始数据，经 [`Position`] 的校验后才能使用
#[derive(Deserialize)]
struct PositionRecord {
    board_size: u8,
    pieces: Vec<Piece>,
    next_id: u32,
}

impl TryFrom<PositionRecord> for Position {
    type Error = RuleError;

    fn try_from(record: PositionRecord) -> Result<Self, Self::Error> {
        let mut position = Self::empty(record.board_size)?;
        for piece in record.pieces {
            if position.piece(piece.id).is_some() {
                return Err(RuleError::malformed(format!("duplicate piece id {}", piece.id)));
            }
            position.insert(piece)?;
        }
        // 保证新棋子的标识不与已有棋子冲突
        let max_id = position.pieces.iter().map(|p| p.id.0 + 1).max().unwrap_or(0);
        position.next_id = record.next_id.max(max_id);
        Ok(position)
    }
}

impl Position {
    /// 创建空棋盘
    pub fn empty(board_size: u8) -> Result<Self, RuleError> {
        check_board_size(board_size)?;
        Ok(Self {
            board_size,
            pieces: Vec::new(),
            next_id: 0,
        })
    }

    /// 创建标准初始局面
    ///
    /// 后手方占据 y 较小的若干行，先手方占据 y 较大的若干行，只使用深色格，
    /// 中间留出两行空白。8x8 棋盘上每方 12 枚棋子。
    pub fn standard(board_size: u8) -> Result<Self, RuleError> {
        let mut position = Self::empty(board_size)?;
        let rows_per_side = (board_size - NEUTRAL_ROWS) / 2;

        for y in 0..board_size {
            let side = if y < rows_per_side {
                Side::Second
            } else if y >= board_size - rows_per_side {
                Side::First
            } else {
                continue;
            };

            for x in (y % 2..board_size).step_by(2) {
                position.place(Coordinate::new(x, y), side)?;
            }
        }

        Ok(position)
    }

    /// 根据 (坐标, 阵营, 是否为王) 列表创建自定义局面
    pub fn with_pieces(
        board_size: u8,
        pieces: impl IntoIterator<Item = (Coordinate, Side, bool)>,
    ) -> Result<Self, RuleError> {
        let mut position = Self::empty(board_size)?;
        for (coordinate, side, crowned) in pieces {
            position.place_piece(coordinate, side, crowned)?;
        }
        Ok(position)
    }

    /// 放置一枚普通棋子
    pub fn place(&mut self, coordinate: Coordinate, side: Side) -> Result<PieceId, RuleError> {
        self.place_piece(coordinate, side, false)
    }

    /// 放置棋子，越界或占用时返回错误
    pub fn place_piece(
        &mut self,
        coordinate: Coordinate,
        side: Side,
        crowned: bool,
    ) -> Result<PieceId, RuleError> {
        let mut piece = Piece::new(PieceId(self.next_id), coordinate, side);
        if crowned {
            piece.crown();
        }
        self.insert(piece)?;
        self.next_id += 1;
        Ok(piece.id)
    }

    /// 越界或占用时返回错误，不分配标识
    fn insert(&mut self, piece: Piece) -> Result<(), RuleError> {
        let coordinate = piece.coordinate;
        if !coordinate.is_within(self.board_size) {
            return Err(RuleError::OutOfBounds {
                x: coordinate.x,
                y: coordinate.y,
            });
        }
        if self.is_occupied(coordinate) {
            return Err(RuleError::OccupiedSquare {
                x: coordinate.x,
                y: coordinate.y,
            });
        }
        self.pieces.push(piece);
        Ok(())
    }

    /// 棋盘边长
    pub fn board_size(&self) -> u8 {
        self.board_size
    }

    /// 所有棋子
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// 指定阵营的所有棋子
    pub fn pieces_of(&self, side: Side) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces.iter().filter(move |p| p.side == side)
    }

    /// 按标识查找棋子
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id == id)
    }

    pub(crate) fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.iter_mut().find(|p| p.id == id)
    }

    /// 获取指定位置的棋子
    pub fn piece_at(&self, coordinate: Coordinate) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.coordinate == coordinate)
    }

    /// 坐标到棋子的映射（每次调用重新构建）
    pub fn occupancy(&self) -> HashMap<Coordinate, &Piece> {
        self.pieces.iter().map(|p| (p.coordinate, p)).collect()
    }

    /// 指定位置是否有棋子
    pub fn is_occupied(&self, coordinate: Coordinate) -> bool {
        self.piece_at(coordinate).is_some()
    }

    /// 指定阵营的棋子数量
    pub fn count(&self, side: Side) -> usize {
        self.pieces_of(side).count()
    }

    /// 指定阵营是否还有棋子
    pub fn has_pieces(&self, side: Side) -> bool {
        self.pieces_of(side).next().is_some()
    }

    /// 移除棋子（被吃）
    pub(crate) fn remove(&mut self, id: PieceId) -> Option<Piece> {
        let index = self.pieces.iter().position(|p| p.id == id)?;
        Some(self.pieces.remove(index))
    }

    /// 生成只读的棋盘视图
    pub fn snapshot(&self) -> BoardSnapshot {
        let size = self.board_size as usize;
        let mut rows = vec![vec![None; size]; size];
        for piece in &self.pieces {
            rows[piece.coordinate.y as usize][piece.coordinate.x as usize] = Some(SquareView {
                side: piece.side,
                crowned: piece.crowned,
            });
        }
        BoardSnapshot {
            board_size: self.board_size,
            rows,
        }
    }
}

/// 棋盘格上的棋子视图
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareView {
    pub side: Side,
    pub crowned: bool,
}

impl SquareView {
    /// 显示字符（王棋大写）
    pub fn display_char(&self) -> char {
        let c = self.side.symbol();
        if self.crowned {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }
}

/// 供外部渲染使用的棋盘快照，`rows[y][x]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub board_size: u8,
    pub rows: Vec<Vec<Option<SquareView>>>,
}

impl BoardSnapshot {
    /// 获取指定格子的视图
    pub fn square(&self, coordinate: Coordinate) -> Option<SquareView> {
        self.rows
            .get(coordinate.y as usize)
            .and_then(|row| row.get(coordinate.x as usize))
            .copied()
            .flatten()
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
