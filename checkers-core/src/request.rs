//! 走子请求
//!
//! 由外部输入层构造，引擎不解析文本。

use serde::{Deserialize, Serialize};

use crate::error::RuleError;
use crate::piece::Coordinate;

/// 一次行动请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MoveRequest {
    /// 普通走子
    Simple { from: Coordinate, to: Coordinate },
    /// 连续吃子，按顺序依次执行
    Capture { from: Coordinate, to: Vec<Coordinate> },
    /// 跳过本回合
    Skip,
}

impl MoveRequest {
    /// 创建普通走子请求
    pub fn simple(from: Coordinate, to: Coordinate) -> Self {
        MoveRequest::Simple { from, to }
    }

    /// 创建吃子请求
    pub fn capture(from: Coordinate, to: impl IntoIterator<Item = Coordinate>) -> Self {
        MoveRequest::Capture {
            from,
            to: to.into_iter().collect(),
        }
    }

    /// 起始位置（跳过时没有）
    pub fn from(&self) -> Option<Coordinate> {
        match self {
            MoveRequest::Simple { from, .. } | MoveRequest::Capture { from, .. } => Some(*from),
            MoveRequest::Skip => None,
        }
    }

    /// 检查请求结构是否完整
    pub fn validate_shape(&self) -> Result<(), RuleError> {
        match self {
            MoveRequest::Capture { to, .. } if to.is_empty() => {
                Err(RuleError::malformed("capture requires at least one destination"))
            }
            _ => Ok(()),
        }
    }
}

impl std::fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveRequest::Simple { from, to } => write!(f, "move {} -> {}", from, to),
            MoveRequest::Capture { from, to } => {
                write!(f, "capture {}", from)?;
                for step in to {
                    write!(f, " -> {}", step)?;
                }
                Ok(())
            }
            MoveRequest::Skip => f.write_str("skip"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_capture_is_malformed() {
        let request = MoveRequest::capture(Coordinate::new(1, 2), Vec::new());
        assert!(matches!(
            request.validate_shape(),
            Err(RuleError::MalformedRequest { .. })
        ));

        let request = MoveRequest::capture(Coordinate::new(1, 2), [Coordinate::new(3, 4)]);
        assert!(request.validate_shape().is_ok());
        assert!(MoveRequest::Skip.validate_shape().is_ok());
    }

    #[test]
    fn test_request_display() {
        let request = MoveRequest::capture(
            Coordinate::new(0, 2),
            [Coordinate::new(2, 4), Coordinate::new(4, 6)],
        );
        assert_eq!(request.to_string(), "capture (0, 2) -> (2, 4) -> (4, 6)");
        assert_eq!(MoveRequest::Skip.from(), None);
    }

    #[test]
    fn test_request_json_tagging() {
        let request = MoveRequest::simple(Coordinate::new(1, 5), Coordinate::new(0, 4));
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"type\":\"simple\""));
        let parsed: MoveRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, request);
    }
}
