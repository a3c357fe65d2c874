//! Plain-text board renderer (native demo and logs)

use super::view::BoardView;
use crate::sim::{GameState, Screen};

/// Render the board as a text grid followed by the status line
///
/// Face-down cells show `··`, flipped cells `[icon]`, matched cells ` icon `,
/// wrong cells `!icon!`.
pub fn render_text(state: &GameState) -> String {
    let view = BoardView::build(state);
    let mut out = String::new();

    if view.screen == Screen::LevelSelect {
        out.push_str("Choose a level: easy | medium | hard\n");
        return out;
    }

    for row in view.cells.chunks(view.cols.max(1) as usize) {
        let line: Vec<String> = row
            .iter()
            .map(|cell| {
                if cell.text.is_empty() {
                    " ·· ".to_string()
                } else if cell.class_name.contains("wrong") {
                    format!("!{}!", cell.text)
                } else if cell.class_name.contains("matched") {
                    format!(" {} ", cell.text)
                } else {
                    format!("[{}]", cell.text)
                }
            })
            .collect();
        out.push_str(&line.join(""));
        out.push('\n');
    }

    out.push_str(&view.hud.moves);
    out.push_str("  ");
    out.push_str(&view.hud.pairs);
    if let Some(time) = &view.hud.time {
        out.push_str("  ");
        out.push_str(time);
    }
    out.push('\n');

    if let Some(summary) = &view.summary {
        out.push_str(&format!("{} {} {}\n", summary.title, summary.moves, summary.time));
    }
    out
}
