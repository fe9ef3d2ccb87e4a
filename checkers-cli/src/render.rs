//! 终端渲染

use checkers_core::{BoardSnapshot, LegalMoveSet};

/// 绘制棋盘，每格 `|r|`，王棋大写，从 y = 0 开始逐行输出
pub fn render_board(snapshot: &BoardSnapshot) -> String {
    let mut out = String::new();
    for row in &snapshot.rows {
        for square in row {
            let c = square.map(|s| s.display_char()).unwrap_or(' ');
            out.push_str(&format!("|{c}|"));
        }
        out.push('\n');
    }
    out
}

/// 列出每个棋子的目标位置，没有目标的棋子不显示
pub fn render_moves(moves: &LegalMoveSet) -> String {
    let mut out = String::new();
    for entry in moves.iter().filter(|e| !e.destinations.is_empty()) {
        let targets: Vec<String> = entry.destinations.iter().map(|c| c.to_string()).collect();
        out.push_str(&format!("{} -> {}\n", entry.piece.coordinate, targets.join(", ")));
    }
    if out.is_empty() {
        out.push_str("(none)\n");
    }
    out
}
