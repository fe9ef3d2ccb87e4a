//! 对局
//!
//! 持有局面、当前走子方和终局标记。引擎本身不切换走子方，
//! 由调用方在行动成功后调用 [`GameSession::advance_turn`]。

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::{BoardSnapshot, Position};
use crate::config::GameConfig;
use crate::error::RuleError;
use crate::moves::{LegalMoveSet, MoveGenerator, MoveKind};
use crate::piece::{Coordinate, Piece, Side};
use crate::request::MoveRequest;
use crate::turn::{Turn, TurnOutcome};

/// 一局跳棋
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    position: Position,
    side_to_move: Side,
    complete: bool,
    winner: Option<Side>,
    allow_skip: bool,
}

impl GameSession {
    /// 创建标准开局
    pub fn new_standard(board_size: u8) -> Result<Self, RuleError> {
        let position = Position::standard(board_size)?;
        info!("New {}x{} game", board_size, board_size);
        Ok(Self::from_position(position, Side::First))
    }

    /// 按配置创建标准开局
    pub fn from_config(config: &GameConfig) -> Result<Self, RuleError> {
        let mut game = Self::new_standard(config.board_size)?;
        game.side_to_move = config.first_to_move;
        game.allow_skip = config.allow_skip;
        Ok(game)
    }

    /// 从自定义局面创建
    pub fn from_position(position: Position, side_to_move: Side) -> Self {
        Self {
            position,
            side_to_move,
            complete: false,
            winner: None,
            allow_skip: true,
        }
    }

    /// 设置是否允许跳过回合
    pub fn with_allow_skip(mut self, allow: bool) -> Self {
        self.allow_skip = allow;
        self
    }

    /// 当前局面
    pub fn position(&self) -> &Position {
        &self.position
    }

    pub(crate) fn position_mut(&mut self) -> &mut Position {
        &mut self.position
    }

    /// 当前走子方
    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    /// 游戏是否已结束
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// 获胜方（游戏结束后才有）
    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    /// 是否允许跳过回合
    pub fn skip_allowed(&self) -> bool {
        self.allow_skip
    }

    /// 获取指定位置的棋子
    pub fn piece_at(&self, coordinate: Coordinate) -> Option<&Piece> {
        self.position.piece_at(coordinate)
    }

    /// 棋盘快照，供外部渲染
    pub fn render_snapshot(&self) -> BoardSnapshot {
        self.position.snapshot()
    }

    /// 当前走子方的合法走法
    pub fn legal_actions(&self, kind: MoveKind) -> LegalMoveSet {
        MoveGenerator::legal_actions(&self.position, self.side_to_move, kind)
    }

    /// 指定阵营的合法走法
    pub fn legal_actions_for(&self, side: Side, kind: MoveKind) -> LegalMoveSet {
        MoveGenerator::legal_actions(&self.position, side, kind)
    }

    /// 切换走子方
    pub fn advance_turn(&mut self) {
        self.side_to_move = self.side_to_move.opponent();
        debug!("Side to move: {}", self.side_to_move);
    }

    /// 开始一个逐步执行的回合
    pub fn begin_turn(&mut self) -> Turn<'_> {
        Turn::begin(self)
    }

    /// 执行请求，不限制棋子阵营
    pub fn apply(&mut self, request: &MoveRequest) -> Result<TurnOutcome, RuleError> {
        self.guard(request)?;
        Turn::begin(self).execute(request)
    }

    /// 以指定阵营执行请求，不能操作对方棋子
    pub fn apply_for(&mut self, side: Side, request: &MoveRequest) -> Result<TurnOutcome, RuleError> {
        self.guard(request)?;
        Turn::begin(self).restricted_to(side).execute(request)
    }

    fn guard(&self, request: &MoveRequest) -> Result<(), RuleError> {
        if self.complete && !matches!(request, MoveRequest::Skip) {
            return Err(RuleError::GameOver);
        }
        Ok(())
    }

    pub(crate) fn mark_complete(&mut self, winner: Side) {
        self.complete = true;
        self.winner = Some(winner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::turn::TurnAction;

    fn c(x: u8, y: u8) -> Coordinate {
        Coordinate::new(x, y)
    }

    fn custom(pieces: &[(Coordinate, Side, bool)]) -> GameSession {
        let position = Position::with_pieces(8, pieces.iter().copied()).unwrap();
        GameSession::from_position(position, Side::First)
    }

    #[test]
    fn test_new_standard_game() {
        let game = GameSession::new_standard(8).unwrap();
        assert_eq!(game.side_to_move(), Side::First);
        assert!(!game.is_complete());
        assert_eq!(game.winner(), None);
        assert_eq!(game.piece_at(c(0, 0)).unwrap().side, Side::Second);
        assert!(game.piece_at(c(0, 4)).is_none());
    }

    #[test]
    fn test_from_config() {
        let config = GameConfig {
            board_size: 10,
            first_to_move: Side::Second,
            allow_skip: false,
        };
        let game = GameSession::from_config(&config).unwrap();
        assert_eq!(game.position().board_size(), 10);
        assert_eq!(game.side_to_move(), Side::Second);
        assert!(!game.skip_allowed());
    }

    #[test]
    fn test_deserialize_rejects_invalid_position() {
        let game = GameSession::new_standard(8).unwrap();
        let json = serde_json::to_string(&game).unwrap();
        assert_eq!(serde_json::from_str::<GameSession>(&json).unwrap(), game);

        let broken = r#"{
            "position": {
                "board_size": 8,
                "pieces": [{ "id": 0, "coordinate": { "x": 9, "y": 9 }, "side": "Second", "crowned": false }],
                "next_id": 1
            },
            "side_to_move": "First",
            "complete": false,
            "winner": null,
            "allow_skip": true
        }"#;
        assert!(serde_json::from_str::<GameSession>(broken).is_err());
    }

    #[test]
    fn test_advance_turn() {
        let mut game = GameSession::new_standard(8).unwrap();
        game.advance_turn();
        assert_eq!(game.side_to_move(), Side::Second);
        game.advance_turn();
        assert_eq!(game.side_to_move(), Side::First);
    }

    #[test]
    fn test_engine_does_not_toggle_side() {
        let mut game = GameSession::new_standard(8).unwrap();
        game.apply(&MoveRequest::simple(c(1, 5), c(0, 4))).unwrap();
        assert_eq!(game.side_to_move(), Side::First);
    }

    #[test]
    fn test_simple_move_and_revalidate() {
        let mut game = GameSession::new_standard(8).unwrap();
        let outcome = game.apply(&MoveRequest::simple(c(1, 5), c(2, 4))).unwrap();
        assert_eq!(outcome.action, TurnAction::Moved);
        assert!(!outcome.crowned);

        let moved = *game.piece_at(c(2, 4)).unwrap();
        assert!(game.piece_at(c(1, 5)).is_none());

        // 新位置的合法走法重新计算
        let moves = game.legal_actions(MoveKind::Simple);
        let mut dests = moves.destinations(moved.id).to_vec();
        dests.sort();
        assert_eq!(dests, vec![c(1, 3), c(3, 3)]);

        // (1, 5) 空出后，后排棋子可以前进
        let back = game.piece_at(c(0, 6)).unwrap().id;
        assert_eq!(moves.destinations(back), &[c(1, 5)]);
    }

    #[test]
    fn test_invalid_start_location() {
        let mut game = GameSession::new_standard(8).unwrap();
        let before = game.clone();
        assert_eq!(
            game.apply(&MoveRequest::simple(c(0, 4), c(1, 3))),
            Err(RuleError::InvalidStartLocation { x: 0, y: 4 })
        );
        assert_eq!(game, before);
    }

    #[test]
    fn test_simple_move_onto_occupied_rejected() {
        let mut game = custom(&[
            (c(1, 2), Side::First, true),
            (c(2, 3), Side::Second, false),
        ]);
        let before = game.clone();

        let result = game.apply(&MoveRequest::simple(c(1, 2), c(2, 3)));
        assert_eq!(
            result,
            Err(RuleError::IllegalDestination {
                from: c(1, 2),
                to: c(2, 3),
            })
        );
        assert_eq!(game, before);
    }

    #[test]
    fn test_single_capture() {
        let mut game = custom(&[
            (c(1, 2), Side::First, true),
            (c(2, 3), Side::Second, false),
            (c(6, 1), Side::Second, false),
        ]);

        let outcome = game
            .apply(&MoveRequest::capture(c(1, 2), [c(3, 4)]))
            .unwrap();
        assert_eq!(outcome.action, TurnAction::Captured);
        assert_eq!(outcome.captures.len(), 1);
        assert_eq!(outcome.captures[0].captured.coordinate, c(2, 3));

        assert!(game.piece_at(c(2, 3)).is_none());
        assert!(game.piece_at(c(1, 2)).is_none());
        assert_eq!(game.piece_at(c(3, 4)).unwrap().side, Side::First);
        assert!(!game.is_complete());
    }

    #[test]
    fn test_capture_sequence_partial_success() {
        let mut game = custom(&[
            (c(1, 2), Side::First, true),
            (c(2, 3), Side::Second, false),
            (c(6, 1), Side::Second, false),
        ]);

        // 第二跳 (5, 6) 中间 (4, 5) 没有棋子
        let outcome = game
            .apply(&MoveRequest::capture(c(1, 2), [c(3, 4), c(5, 6)]))
            .unwrap();
        assert_eq!(outcome.executed(), 1);
        assert!(outcome.is_partial());
        assert_eq!(outcome.to, Some(c(3, 4)));
        assert_eq!(game.piece_at(c(3, 4)).unwrap().side, Side::First);
        assert!(game.piece_at(c(5, 6)).is_none());
        assert_eq!(game.position().count(Side::Second), 1);
    }

    #[test]
    fn test_capture_first_step_failure() {
        let mut game = custom(&[(c(1, 2), Side::First, true), (c(6, 1), Side::Second, false)]);
        let before = game.clone();
        assert_eq!(
            game.apply(&MoveRequest::capture(c(1, 2), [c(3, 4)])),
            Err(RuleError::IllegalDestination {
                from: c(1, 2),
                to: c(3, 4),
            })
        );
        assert_eq!(game, before);
    }

    #[test]
    fn test_double_capture() {
        let mut game = custom(&[
            (c(6, 6), Side::First, false),
            (c(5, 5), Side::Second, false),
            (c(5, 3), Side::Second, false),
            (c(0, 0), Side::Second, false),
        ]);

        let outcome = game
            .apply(&MoveRequest::capture(c(6, 6), [c(4, 4), c(6, 2)]))
            .unwrap();
        assert_eq!(outcome.executed(), 2);
        assert!(!outcome.is_partial());
        assert_eq!(game.piece_at(c(6, 2)).unwrap().side, Side::First);
        assert_eq!(game.position().count(Side::Second), 1);
    }

    #[test]
    fn test_crown_on_simple_move() {
        let mut game = custom(&[(c(2, 1), Side::First, false), (c(7, 7), Side::Second, false)]);
        let outcome = game.apply(&MoveRequest::simple(c(2, 1), c(1, 0))).unwrap();
        assert!(outcome.crowned);
        assert!(game.piece_at(c(1, 0)).unwrap().crowned);

        // 王棋可以后退，且不会失去王的身份
        game.apply(&MoveRequest::simple(c(1, 0), c(2, 1))).unwrap();
        assert!(game.piece_at(c(2, 1)).unwrap().crowned);
    }

    #[test]
    fn test_crown_on_capture() {
        let mut game = custom(&[
            (c(3, 2), Side::First, false),
            (c(2, 1), Side::Second, false),
            (c(7, 7), Side::Second, false),
        ]);
        let outcome = game.apply(&MoveRequest::capture(c(3, 2), [c(1, 0)])).unwrap();
        assert!(outcome.crowned);
        assert!(game.piece_at(c(1, 0)).unwrap().crowned);
    }

    #[test]
    fn test_second_side_crowns_on_last_row() {
        let mut game = custom(&[(c(3, 6), Side::Second, false), (c(0, 0), Side::First, false)]);
        game.apply(&MoveRequest::simple(c(3, 6), c(4, 7))).unwrap();
        assert!(game.piece_at(c(4, 7)).unwrap().crowned);
    }

    #[test]
    fn test_completion_halts_sequence() {
        let mut game = custom(&[
            (c(1, 2), Side::First, true),
            (c(2, 3), Side::Second, false),
        ]);

        let outcome = game
            .apply(&MoveRequest::capture(c(1, 2), [c(3, 4), c(1, 6)]))
            .unwrap();
        assert!(outcome.game_over);
        assert_eq!(outcome.executed(), 1);
        assert!(game.is_complete());
        assert_eq!(game.winner(), Some(Side::First));
        assert_eq!(game.piece_at(c(3, 4)).unwrap().side, Side::First);

        // 结束后不再接受走子
        assert_eq!(
            game.apply(&MoveRequest::simple(c(3, 4), c(4, 5))),
            Err(RuleError::GameOver)
        );
    }

    #[test]
    fn test_simple_move_never_completes() {
        let mut game = custom(&[(c(1, 2), Side::First, false)]);
        game.apply(&MoveRequest::simple(c(1, 2), c(0, 1))).unwrap();
        assert!(!game.is_complete());
    }

    #[test]
    fn test_skip_policy() {
        let mut game = GameSession::new_standard(8).unwrap();
        let before = game.clone();
        let outcome = game.apply(&MoveRequest::Skip).unwrap();
        assert_eq!(outcome.action, TurnAction::Skipped);
        assert_eq!(game, before);

        let mut strict = GameSession::new_standard(8).unwrap().with_allow_skip(false);
        assert!(matches!(
            strict.apply(&MoveRequest::Skip),
            Err(RuleError::MalformedRequest { .. })
        ));
    }

    #[test]
    fn test_apply_for_rejects_opponent_piece() {
        let mut game = GameSession::new_standard(8).unwrap();
        assert_eq!(
            game.apply_for(Side::Second, &MoveRequest::simple(c(1, 5), c(0, 4))),
            Err(RuleError::WrongSide { x: 1, y: 5 })
        );
        assert!(game
            .apply_for(Side::Second, &MoveRequest::simple(c(0, 2), c(1, 3)))
            .is_ok());
    }

    #[test]
    fn test_render_snapshot() {
        let game = GameSession::new_standard(8).unwrap();
        let snapshot = game.render_snapshot();
        assert_eq!(snapshot.board_size, 8);
        assert_eq!(snapshot.square(c(0, 0)).unwrap().side, Side::Second);
        assert_eq!(snapshot.square(c(7, 7)).unwrap().side, Side::First);
    }
}
