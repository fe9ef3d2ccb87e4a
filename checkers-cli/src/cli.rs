//! 命令行参数

use std::path::PathBuf;

use checkers_core::Side;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "checkers", version, about = "Two player checkers in the terminal")]
pub struct Cli {
    /// JSON 配置文件
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// 棋盘边长，覆盖配置文件
    #[arg(long)]
    pub board_size: Option<u8>,

    /// 先走的一方（red/black），不指定时在开局询问
    #[arg(long)]
    pub first: Option<Side>,

    /// 禁止跳过回合
    #[arg(long)]
    pub no_skip: bool,

    /// 以 JSON 输出棋盘快照
    #[arg(long)]
    pub json_board: bool,
}
