//! 走法生成

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::Position;
use crate::constants::{JUMP_DISTANCE, STEP_DISTANCE};
use crate::piece::{Coordinate, Piece, PieceId, Side};

/// 走法类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    /// 普通走子：斜走一格到空位
    Simple,
    /// 吃子：斜跳两格越过对方棋子
    Capture,
}

impl MoveKind {
    /// 斜向步长
    pub fn distance(&self) -> i8 {
        match self {
            MoveKind::Simple => STEP_DISTANCE,
            MoveKind::Capture => JUMP_DISTANCE,
        }
    }
}

impl std::fmt::Display for MoveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveKind::Simple => f.write_str("moves"),
            MoveKind::Capture => f.write_str("captures"),
        }
    }
}

/// 单个棋子的合法目标
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceMoves {
    pub piece: Piece,
    pub destinations: Vec<Coordinate>,
}

/// 合法走法集合：每个棋子及其目标位置
///
/// 没有合法目标的棋子也会出现在集合中（目标列表为空）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalMoveSet {
    kind: MoveKind,
    entries: Vec<PieceMoves>,
}

impl LegalMoveSet {
    /// 走法类型
    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    /// 获取指定棋子的条目
    pub fn get(&self, id: PieceId) -> Option<&PieceMoves> {
        self.entries.iter().find(|e| e.piece.id == id)
    }

    /// 获取指定棋子的目标位置，棋子不在集合中时返回空切片
    pub fn destinations(&self, id: PieceId) -> &[Coordinate] {
        self.get(id).map(|e| e.destinations.as_slice()).unwrap_or(&[])
    }

    /// 指定棋子能否到达目标位置
    pub fn contains(&self, id: PieceId, to: Coordinate) -> bool {
        self.destinations(id).contains(&to)
    }

    /// 遍历所有条目
    pub fn iter(&self) -> impl Iterator<Item = &PieceMoves> {
        self.entries.iter()
    }

    /// 棋子数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 所有目标位置总数
    pub fn total_destinations(&self) -> usize {
        self.entries.iter().map(|e| e.destinations.len()).sum()
    }

    /// 是否至少存在一个合法目标
    pub fn has_any(&self) -> bool {
        self.entries.iter().any(|e| !e.destinations.is_empty())
    }
}

/// 走法生成器
///
/// 所有方法都是纯计算，不修改局面，可以重复调用。
pub struct MoveGenerator;

impl MoveGenerator {
    /// 生成指定阵营所有棋子的合法走法
    pub fn legal_actions(position: &Position, side: Side, kind: MoveKind) -> LegalMoveSet {
        let occupancy = position.occupancy();
        let entries: Vec<PieceMoves> = position
            .pieces_of(side)
            .map(|piece| PieceMoves {
                piece: *piece,
                destinations: Self::piece_destinations(position, &occupancy, piece, kind),
            })
            .collect();

        let set = LegalMoveSet { kind, entries };
        debug!(
            "Generated {} {} for {} across {} pieces",
            set.total_destinations(),
            kind,
            side,
            set.len()
        );
        set
    }

    /// 生成双方所有棋子的合法走法
    pub fn all_legal_actions(position: &Position, kind: MoveKind) -> LegalMoveSet {
        let occupancy = position.occupancy();
        let entries = position
            .pieces()
            .iter()
            .map(|piece| PieceMoves {
                piece: *piece,
                destinations: Self::piece_destinations(position, &occupancy, piece, kind),
            })
            .collect();
        LegalMoveSet { kind, entries }
    }

    /// 生成单个棋子的候选位置（只过滤掉越过 0 的坐标）
    pub fn candidates(piece: &Piece, kind: MoveKind) -> Vec<Coordinate> {
        let distance = kind.distance();
        piece
            .directions()
            .into_iter()
            .filter_map(|(dx, dy)| piece.coordinate.offset(dx * distance, dy * distance))
            .collect()
    }

    /// 生成单个棋子的合法目标位置
    fn piece_destinations(
        position: &Position,
        occupancy: &HashMap<Coordinate, &Piece>,
        piece: &Piece,
        kind: MoveKind,
    ) -> Vec<Coordinate> {
        Self::candidates(piece, kind)
            .into_iter()
            .filter(|&to| match kind {
                MoveKind::Simple => Self::is_open_square(position.board_size(), occupancy, to),
                MoveKind::Capture => Self::is_valid_capture(position.board_size(), occupancy, piece, to),
            })
            .collect()
    }

    /// 目标位置在棋盘内且为空
    fn is_open_square(
        board_size: u8,
        occupancy: &HashMap<Coordinate, &Piece>,
        to: Coordinate,
    ) -> bool {
        to.is_within(board_size) && !occupancy.contains_key(&to)
    }

    /// 落点合法且中点有对方棋子
    fn is_valid_capture(
        board_size: u8,
        occupancy: &HashMap<Coordinate, &Piece>,
        piece: &Piece,
        to: Coordinate,
    ) -> bool {
        let jumped = piece.coordinate.midpoint(to);
        let has_target = occupancy
            .get(&jumped)
            .is_some_and(|target| target.side != piece.side);
        Self::is_open_square(board_size, occupancy, to) && has_target
    }
}
