mod cli;
mod console;
mod input;
mod render;

use std::fs;
use std::io;

use anyhow::{Context, Result};
use checkers_core::{GameConfig, GameSession};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Cli;
use crate::console::Console;

fn main() -> Result<()> {
    // 初始化日志（输出到 stderr，不干扰棋盘显示）
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(log_filter(EnvFilter::from_default_env())?)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    info!("跳棋启动: {}x{} 棋盘", config.board_size, config.board_size);

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout()).with_json_board(cli.json_board);

    let mut game = GameSession::from_config(&config)?;
    console.welcome(&game)?;

    let ask_for_side = cli.first.is_none() && cli.config.is_none();
    if ask_for_side {
        let side = console.choose_side()?;
        if side != game.side_to_move() {
            game.advance_turn();
        }
    }

    let winner = console.play(&mut game)?;
    info!("对局结束，获胜方: {:?}", winner);
    Ok(())
}

/// 默认日志级别：命令行和规则引擎都输出 info
fn log_filter(filter: EnvFilter) -> Result<EnvFilter> {
    Ok(filter
        .add_directive("checkers_cli=info".parse()?)
        .add_directive("checkers_core=info".parse()?))
}

/// 读取配置文件，再用命令行参数覆盖
fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("无法读取配置文件: {:?}", path))?;
            GameConfig::from_json(&content)
                .with_context(|| format!("解析配置文件失败: {:?}", path))?
        }
        None => GameConfig::default(),
    };

    if let Some(board_size) = cli.board_size {
        config.board_size = board_size;
    }
    if let Some(first) = cli.first {
        config.first_to_move = first;
    }
    if cli.no_skip {
        config.allow_skip = false;
    }

    config.validate()?;
    Ok(config)
}
