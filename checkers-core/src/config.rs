//! 对局配置

use serde::{Deserialize, Serialize};

use crate::board::check_board_size;
use crate::constants::STANDARD_BOARD_SIZE;
use crate::error::Result;
use crate::piece::Side;

/// 对局配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// 棋盘边长
    pub board_size: u8,
    /// 先走的一方
    pub first_to_move: Side,
    /// 是否允许跳过回合
    pub allow_skip: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: STANDARD_BOARD_SIZE,
            first_to_move: Side::First,
            allow_skip: true,
        }
    }
}

impl GameConfig {
    /// 检查配置是否有效
    pub fn validate(&self) -> Result<()> {
        check_board_size(self.board_size)?;
        Ok(())
    }

    /// 从 JSON 字符串解析，缺省字段使用默认值
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
