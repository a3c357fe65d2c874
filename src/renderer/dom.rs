//! DOM renderer (WASM only)
//!
//! Expected page elements (missing ones are skipped):
//! - `#level-select`, `#game-screen`, `#success-modal`: screens
//! - `#game-board`: grid container, rebuilt with one `.card[data-id]` per card
//! - `#move-counter`, `#pairs-matched`, `#timer`: HUD
//! - `#back-btn`: hidden in classic mode
//! - `#final-title`, `#final-moves`, `#final-time`: success summary

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use super::view::{BoardView, CellView};
use crate::sim::{GameState, Screen};

pub struct DomRenderer {
    document: Document,
}

impl DomRenderer {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// Rebuild the whole page state from `state`
    pub fn render(&self, state: &GameState) {
        let view = BoardView::build(state);
        let leveled = state.variant.is_leveled();

        self.set_hidden("level-select", view.screen != Screen::LevelSelect);
        self.set_hidden("game-screen", view.screen == Screen::LevelSelect);
        self.set_hidden("success-modal", view.screen != Screen::Success);
        self.set_hidden("back-btn", !leveled);
        self.set_hidden("timer", !leveled);

        self.render_board(&view);

        self.set_text("move-counter", &view.hud.moves);
        self.set_text("pairs-matched", &view.hud.pairs);
        if let Some(time) = &view.hud.time {
            self.set_text("timer", time);
        }

        if let Some(summary) = &view.summary {
            self.set_text("final-title", &summary.title);
            self.set_text("final-moves", &summary.moves);
            self.set_text("final-time", &summary.time);
        }
    }

    fn render_board(&self, view: &BoardView) {
        let Some(board) = self.document.get_element_by_id("game-board") else {
            log::warn!("#game-board missing");
            return;
        };
        board.set_inner_html("");

        if let Some(el) = board.dyn_ref::<HtmlElement>() {
            let _ = el
                .style()
                .set_property("grid-template-columns", &format!("repeat({}, 1fr)", view.cols));
        }

        for cell in &view.cells {
            match self.create_cell(cell) {
                Some(el) => {
                    let _ = board.append_child(&el);
                }
                None => log::warn!("Failed to create cell {}", cell.id),
            }
        }
    }

    fn create_cell(&self, cell: &CellView) -> Option<Element> {
        let el = self.document.create_element("div").ok()?;
        el.set_class_name(&cell.class_name);
        el.set_attribute("data-id", &cell.id.to_string()).ok()?;
        el.set_text_content(Some(cell.text));
        Some(el)
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(&self, id: &str, hidden: bool) {
        if let Some(el) = self.document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }
}

/// Card id of the `.card` element under a click target, if any
pub fn card_id_from_target(target: &Element) -> Option<usize> {
    let card = target.closest(".card").ok()??;
    card.get_attribute("data-id")?.parse().ok()
}
