//! 终端对局流程
//!
//! 每回合显示棋盘和当前走子方的合法走法，读取一行输入并执行，
//! 成功后切换走子方；失败则重新提示。

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use checkers_core::{GameSession, MoveKind, RuleError, Side, TurnAction, TurnOutcome};
use thiserror::Error;
use tracing::debug;

use crate::input::{parse_request, InputError};
use crate::render::{render_board, render_moves};

/// 单次输入的失败原因
#[derive(Error, Debug)]
pub enum TurnError {
    #[error("The provided input is not in the correct format: {0}")]
    Input(#[from] InputError),

    #[error("{0}")]
    Rule(#[from] RuleError),
}

/// 基于行输入输出的对局控制台
pub struct Console<R, W> {
    input: R,
    output: W,
    json_board: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            json_board: false,
        }
    }

    /// 以 JSON 输出棋盘
    pub fn with_json_board(mut self, json_board: bool) -> Self {
        self.json_board = json_board;
        self
    }

    /// 读取一行，输入结束时返回错误
    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let n = self.input.read_line(&mut line).context("failed to read input")?;
        if n == 0 {
            bail!("input closed before the game finished");
        }
        debug!("Input: {}", line.trim_end());
        Ok(line)
    }

    /// 询问先走的一方
    pub fn choose_side(&mut self) -> Result<Side> {
        loop {
            writeln!(self.output, "Which team will start? Enter Red or Black:")?;
            let line = self.read_line()?;
            match line.parse::<Side>() {
                Ok(side) => return Ok(side),
                Err(e) => writeln!(self.output, "{e}")?,
            }
        }
    }

    pub fn welcome(&mut self, game: &GameSession) -> Result<()> {
        writeln!(self.output, "Welcome! Starting a new game of Checkers.")?;
        self.show_board(game)
    }

    /// 进行对局直到结束，返回获胜方
    pub fn play(&mut self, game: &mut GameSession) -> Result<Option<Side>> {
        while !game.is_complete() {
            self.show_turn(game)?;
            loop {
                let line = self.read_line()?;
                match Self::execute(game, &line) {
                    Ok(outcome) => {
                        self.report(&outcome)?;
                        game.advance_turn();
                        break;
                    }
                    Err(e) => {
                        writeln!(self.output, "{e}")?;
                        writeln!(
                            self.output,
                            "The move provided could not be executed. Please provide a valid move."
                        )?;
                        self.prompt()?;
                    }
                }
            }
        }

        self.show_board(game)?;
        let winner = game.winner();
        if let Some(side) = winner {
            writeln!(self.output, "Congratulations {side} team, you won!")?;
        }
        Ok(winner)
    }

    fn execute(game: &mut GameSession, line: &str) -> Result<TurnOutcome, TurnError> {
        let request = parse_request(line)?;
        let side = game.side_to_move();
        Ok(game.apply_for(side, &request)?)
    }

    fn report(&mut self, outcome: &TurnOutcome) -> Result<()> {
        match outcome.action {
            TurnAction::Skipped => writeln!(self.output, "Player has chosen to skip turn.")?,
            TurnAction::Captured if outcome.is_partial() => writeln!(
                self.output,
                "Executed {} of {} requested captures.",
                outcome.executed(),
                outcome.requested
            )?,
            _ => {}
        }
        if outcome.crowned {
            writeln!(self.output, "The piece has been crowned!")?;
        }
        Ok(())
    }

    fn show_board(&mut self, game: &GameSession) -> Result<()> {
        let snapshot = game.render_snapshot();
        if self.json_board {
            writeln!(self.output, "{}", serde_json::to_string(&snapshot)?)?;
        } else {
            write!(self.output, "{}", render_board(&snapshot))?;
        }
        Ok(())
    }

    fn show_turn(&mut self, game: &GameSession) -> Result<()> {
        let side = game.side_to_move();
        self.show_board(game)?;
        writeln!(self.output, "Here are all the possible moves for the {side} team:")?;
        write!(self.output, "{}", render_moves(&game.legal_actions(MoveKind::Simple)))?;
        writeln!(self.output, "Here are all the possible captures for the {side} team:")?;
        write!(self.output, "{}", render_moves(&game.legal_actions(MoveKind::Capture)))?;
        self.prompt()
    }

    fn prompt(&mut self) -> Result<()> {
        writeln!(
            self.output,
            "Please select your move. Enter the move or capture (m or c), the location of the piece \
             you would like to move, and the location you would like to place that piece:"
        )?;
        writeln!(self.output, "Example: m 0 2 1 3")?;
        writeln!(
            self.output,
            "If you want to attempt multiple sequential captures, you may add subsequent locations \
             to jump to in the exact order you wish them to execute."
        )?;
        writeln!(self.output, "Example: c 0 2 2 4 4 6")?;
        self.output.flush()?;
        Ok(())
    }
}
