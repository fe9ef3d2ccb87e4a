//! 输入处理
//!
//! 把一行文本解析为 [`MoveRequest`]：
//! - `m x1 y1 x2 y2`：普通走子
//! - `c x1 y1 x2 y2 [x3 y3 ...]`：连续吃子
//! - `s`：跳过本回合

use checkers_core::{Coordinate, MoveRequest};
use thiserror::Error;

/// 输入解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Empty input")]
    Empty,

    #[error("Unknown action '{0}', expected m, c or s")]
    UnknownAction(String),

    #[error("Invalid coordinate value '{0}'")]
    InvalidNumber(String),

    #[error("Expected {expected} coordinate values, got {got}")]
    WrongCount { expected: usize, got: usize },

    #[error("Coordinates must come in x y pairs, got {0} values")]
    UnpairedValue(usize),
}

/// 解析一行输入
pub fn parse_request(line: &str) -> Result<MoveRequest, InputError> {
    let mut tokens = line.split_whitespace();
    let action = tokens.next().ok_or(InputError::Empty)?.to_ascii_lowercase();

    match action.as_str() {
        "s" => Ok(MoveRequest::Skip),
        "m" => {
            let coords = parse_coordinates(tokens)?;
            if coords.len() != 2 {
                return Err(InputError::WrongCount {
                    expected: 4,
                    got: coords.len() * 2,
                });
            }
            Ok(MoveRequest::simple(coords[0], coords[1]))
        }
        "c" => {
            let coords = parse_coordinates(tokens)?;
            let Some((from, to)) = coords.split_first().filter(|(_, rest)| !rest.is_empty()) else {
                return Err(InputError::WrongCount {
                    expected: 4,
                    got: coords.len() * 2,
                });
            };
            Ok(MoveRequest::capture(*from, to.iter().copied()))
        }
        other => Err(InputError::UnknownAction(other.to_string())),
    }
}

fn parse_coordinates<'a>(tokens: impl Iterator<Item = &'a str>) -> Result<Vec<Coordinate>, InputError> {
    let values = tokens
        .map(|t| t.parse::<u8>().map_err(|_| InputError::InvalidNumber(t.to_string())))
        .collect::<Result<Vec<u8>, _>>()?;

    if values.len() % 2 != 0 {
        return Err(InputError::UnpairedValue(values.len()));
    }

    Ok(values
        .chunks_exact(2)
        .map(|pair| Coordinate::new(pair[0], pair[1]))
        .collect())
}
