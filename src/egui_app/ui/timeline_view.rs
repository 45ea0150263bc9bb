use eframe::egui::{self, Align2, FontId, Rect, Sense, StrokeKind, Ui, pos2, vec2};

use super::EguiApp;
use super::style;

const TIMELINE_HEIGHT: f32 = 32.0;

impl EguiApp {
    /// Proportional subtask blocks with the playhead; click to seek.
    pub(super) fn render_timeline(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        let blocks = self.controller.session().timeline();
        let playback = self.controller.session().playback();
        let duration = playback.duration();
        let position = playback.position();

        let width = ui.available_width();
        let (rect, response) =
            ui.allocate_exact_size(vec2(width, TIMELINE_HEIGHT), Sense::click());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, palette.bg_primary);
        painter.rect_stroke(rect, 0.0, style::inner_border(), StrokeKind::Inside);

        let mut seek_to = None;
        if let Some(blocks) = blocks {
            for block in &blocks {
                let left = rect.left() + block.offset_fraction as f32 * rect.width();
                let right = left + block.width_fraction as f32 * rect.width();
                let block_rect = Rect::from_min_max(
                    pos2(left, rect.top() + 2.0),
                    pos2(right.min(rect.right()), rect.bottom() - 2.0),
                );
                if block_rect.width() <= 0.0 {
                    continue;
                }
                painter.rect_filled(block_rect, 0.0, style::label_color(block.color_index));
                painter.rect_stroke(block_rect, 0.0, style::inner_border(), StrokeKind::Inside);
                painter.text(
                    block_rect.center(),
                    Align2::CENTER_CENTER,
                    &block.index_label,
                    FontId::proportional(12.0),
                    palette.bg_primary,
                );
                let block_response = ui
                    .interact(
                        block_rect,
                        response.id.with(block.storage_index),
                        Sense::click(),
                    )
                    .on_hover_text(&block.tooltip);
                if block_response.clicked() {
                    seek_to = Some(block.start);
                }
            }
        }
        if let Some(duration) = duration {
            let x = rect.left() + (position / duration) as f32 * rect.width();
            painter.line_segment(
                [pos2(x, rect.top()), pos2(x, rect.bottom())],
                egui::Stroke::new(2.0, palette.playhead),
            );
            if seek_to.is_none() && response.clicked() {
                if let Some(pointer) = response.interact_pointer_pos() {
                    let fraction = ((pointer.x - rect.left()) / rect.width()) as f64;
                    self.controller
                        .session_mut()
                        .playback_mut()
                        .seek_fraction(fraction);
                }
            }
        }
        if let Some(start) = seek_to {
            self.controller.session_mut().playback_mut().seek(start);
        }
    }
}
