//! 回合执行（状态机）
//!
//! ```text
//! AwaitingAction --普通走子--> TurnComplete
//! AwaitingAction --首次吃子--> AwaitingFurtherCapture --继续吃子/结束--> TurnComplete
//! ```
//!
//! 验证失败时不修改局面；首次吃子之后的失败只会终止连跳，已完成的吃子保留。

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::RuleError;
use crate::game::GameSession;
use crate::moves::MoveKind;
use crate::piece::{Coordinate, Piece, PieceId, Side};
use crate::request::MoveRequest;
use crate::rules::Rules;

/// 回合状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnState {
    /// 等待行动
    AwaitingAction,
    /// 已完成至少一次吃子，可以继续连跳
    AwaitingFurtherCapture,
    /// 回合结束
    TurnComplete,
}

/// 行动类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnAction {
    Moved,
    Captured,
    Skipped,
}

/// 单次吃子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureStep {
    pub from: Coordinate,
    pub to: Coordinate,
    /// 被吃掉的棋子
    pub captured: Piece,
}

/// 回合结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub action: TurnAction,
    /// 行动的棋子（跳过时没有）
    pub piece: Option<PieceId>,
    /// 起始位置
    pub from: Option<Coordinate>,
    /// 最终位置
    pub to: Option<Coordinate>,
    /// 已执行的吃子，按顺序
    pub captures: Vec<CaptureStep>,
    /// 请求的步数
    pub requested: usize,
    /// 本回合是否升变
    pub crowned: bool,
    /// 本回合是否结束了游戏
    pub game_over: bool,
}

impl TurnOutcome {
    fn skipped() -> Self {
        Self {
            action: TurnAction::Skipped,
            piece: None,
            from: None,
            to: None,
            captures: Vec::new(),
            requested: 0,
            crowned: false,
            game_over: false,
        }
    }

    /// 实际执行的步数
    pub fn executed(&self) -> usize {
        match self.action {
            TurnAction::Moved => 1,
            TurnAction::Captured => self.captures.len(),
            TurnAction::Skipped => 0,
        }
    }

    /// 连跳是否只执行了一部分
    pub fn is_partial(&self) -> bool {
        self.executed() < self.requested
    }
}

/// 单个回合的执行器
///
/// 借用整个对局，回合结束后由调用方切换走子方。
pub struct Turn<'a> {
    session: &'a mut GameSession,
    state: TurnState,
    /// 限定只能操作该阵营的棋子
    side: Option<Side>,
    piece: Option<PieceId>,
    from: Option<Coordinate>,
    captures: Vec<CaptureStep>,
    requested: usize,
    crowned: bool,
    game_over: bool,
    moved_to: Option<Coordinate>,
}

impl<'a> Turn<'a> {
    /// 开始一个回合
    pub fn begin(session: &'a mut GameSession) -> Self {
        Self {
            session,
            state: TurnState::AwaitingAction,
            side: None,
            piece: None,
            from: None,
            captures: Vec::new(),
            requested: 0,
            crowned: false,
            game_over: false,
            moved_to: None,
        }
    }

    /// 限定本回合只能操作指定阵营的棋子
    pub fn restricted_to(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    /// 当前状态
    pub fn state(&self) -> TurnState {
        self.state
    }

    /// 执行完整的请求
    pub fn execute(mut self, request: &MoveRequest) -> Result<TurnOutcome, RuleError> {
        request.validate_shape()?;

        match request {
            MoveRequest::Skip => {
                if !self.session.skip_allowed() {
                    warn!("Skip rejected: skipping is disabled");
                    return Err(RuleError::malformed("skipping is disabled"));
                }
                info!("Turn skipped");
                Ok(TurnOutcome::skipped())
            }
            MoveRequest::Simple { from, to } => {
                self.simple_move(*from, *to)?;
                Ok(self.finish())
            }
            MoveRequest::Capture { from, to } => {
                let (first, rest) = to
                    .split_first()
                    .ok_or_else(|| RuleError::malformed("capture requires at least one destination"))?;
                self.requested = to.len();
                self.start_capture(*from, *first)?;

                for next in rest {
                    if self.state != TurnState::AwaitingFurtherCapture {
                        break;
                    }
                    if let Err(e) = self.continue_capture(*next) {
                        warn!("Capture sequence stopped at {}: {}", next, e);
                        break;
                    }
                }
                Ok(self.finish())
            }
        }
    }

    /// 普通走子，成功后回合立即结束
    pub fn simple_move(&mut self, from: Coordinate, to: Coordinate) -> Result<(), RuleError> {
        self.expect_state(TurnState::AwaitingAction)?;
        let piece = self.select(from)?;
        self.requested = 1;

        let position = self.session.position();
        Rules::check(position, piece.id, to, MoveKind::Simple).inspect_err(|e| {
            warn!("Move rejected: {}", e);
        })?;

        let crowned = self.relocate(piece.id, to);
        info!("{} moved {} -> {}", piece.side, from, to);

        self.piece = Some(piece.id);
        self.from = Some(from);
        self.moved_to = Some(to);
        self.crowned = crowned;
        self.state = TurnState::TurnComplete;
        Ok(())
    }

    /// 首次吃子
    pub fn start_capture(&mut self, from: Coordinate, to: Coordinate) -> Result<CaptureStep, RuleError> {
        self.expect_state(TurnState::AwaitingAction)?;
        let piece = self.select(from)?;
        self.requested = self.requested.max(1);

        let step = self.jump(piece.id, to).inspect_err(|e| {
            warn!("Capture rejected: {}", e);
        })?;

        self.piece = Some(piece.id);
        self.from = Some(from);
        self.state = if self.game_over {
            TurnState::TurnComplete
        } else {
            TurnState::AwaitingFurtherCapture
        };
        Ok(step)
    }

    /// 连跳中的下一跳
    pub fn continue_capture(&mut self, to: Coordinate) -> Result<CaptureStep, RuleError> {
        self.expect_state(TurnState::AwaitingFurtherCapture)?;
        let piece = self
            .piece
            .ok_or_else(|| RuleError::malformed("no capturing piece selected"))?;

        let step = self.jump(piece, to)?;
        if self.game_over {
            self.state = TurnState::TurnComplete;
        }
        Ok(step)
    }

    /// 结束回合，返回结果
    pub fn finish(self) -> TurnOutcome {
        let action = if !self.captures.is_empty() {
            TurnAction::Captured
        } else if self.moved_to.is_some() {
            TurnAction::Moved
        } else {
            TurnAction::Skipped
        };
        let to = self
            .captures
            .last()
            .map(|step| step.to)
            .or(self.moved_to);

        TurnOutcome {
            action,
            piece: self.piece,
            from: self.from,
            to,
            captures: self.captures,
            requested: self.requested,
            crowned: self.crowned,
            game_over: self.game_over,
        }
    }

    fn expect_state(&self, expected: TurnState) -> Result<(), RuleError> {
        if self.session.is_complete() {
            return Err(RuleError::GameOver);
        }
        if self.state != expected {
            return Err(RuleError::malformed(format!(
                "turn is in state {:?}, expected {:?}",
                self.state, expected
            )));
        }
        Ok(())
    }

    /// 查找起始棋子并检查阵营
    fn select(&self, from: Coordinate) -> Result<Piece, RuleError> {
        let piece = Rules::resolve_start(self.session.position(), from).inspect_err(|e| {
            warn!("{}", e);
        })?;
        if let Some(side) = self.side {
            if piece.side != side {
                return Err(RuleError::WrongSide { x: from.x, y: from.y });
            }
        }
        Ok(piece)
    }

    /// 执行一次吃子：移除中间的棋子，移动并检查升变和终局
    fn jump(&mut self, id: PieceId, to: Coordinate) -> Result<CaptureStep, RuleError> {
        let position = self.session.position();
        Rules::check(position, id, to, MoveKind::Capture)?;

        let mover = *position
            .piece(id)
            .ok_or_else(|| RuleError::malformed(format!("unknown piece {id}")))?;
        let from = mover.coordinate;
        let jumped = from.midpoint(to);
        let captured = *position
            .piece_at(jumped)
            .ok_or_else(|| RuleError::malformed(format!("nothing to capture at {jumped}")))?;

        self.session.position_mut().remove(captured.id);
        if self.relocate(id, to) {
            self.crowned = true;
        }
        info!("{} captured {} -> {} over {}", mover.side, from, to, jumped);

        let step = CaptureStep { from, to, captured };
        self.captures.push(step);

        let loser = captured.side;
        if !self.session.position().has_pieces(loser) {
            info!("{} has no pieces left, {} wins", loser, mover.side);
            self.session.mark_complete(mover.side);
            self.game_over = true;
        }
        Ok(step)
    }

    /// 移动棋子，到达底线时升变，返回是否升变
    fn relocate(&mut self, id: PieceId, to: Coordinate) -> bool {
        let board_size = self.session.position().board_size();
        let Some(piece) = self.session.position_mut().piece_mut(id) else {
            return false;
        };
        piece.coordinate = to;
        if piece.reaches_back_rank(board_size) {
            piece.crown();
            debug!("{} crowned at {}", piece.id, to);
            return true;
        }
        false
    }
}
