use std::time::Instant;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Stroke, Vec2};

use crate::deck::channel::Outbox;
use crate::deck::surface::SurfaceState;
use crate::input::HELP_TEXT;
use crate::parser::{Block, Deck, Slide};
use crate::presenter::PresenterView;
use crate::theme::Theme;

pub const TRANSITION_DURATION: f32 = 0.3;
const BASE_HEIGHT: f32 = 1080.0;
const ASPECT: f32 = 16.0 / 9.0;

/// Largest 16:9 rect centered in `available`.
pub fn fit_slide_rect(available: Rect) -> Rect {
    let width = available.width().min(available.height() * ASPECT);
    let height = width / ASPECT;
    Rect::from_center_size(available.center(), Vec2::new(width, height))
}

pub fn scale_for(rect: Rect) -> f32 {
    rect.height() / BASE_HEIGHT
}

pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Draw the active slide, sliding it in over the previous one while a
/// transition is running. Returns true while animating.
pub fn draw_deck(ui: &egui::Ui, deck: &Deck, surface: &SurfaceState, theme: &Theme, rect: Rect) -> bool {
    let scale = scale_for(rect);
    ui.painter().rect_filled(rect, 0.0, theme.background);

    let progress = surface
        .changed_at
        .map(|t| t.elapsed().as_secs_f32() / TRANSITION_DURATION)
        .unwrap_or(1.0);

    let Some(current) = deck.slide(surface.active) else {
        return false;
    };

    let animating = progress < 1.0;
    match surface.last_move.filter(|_| animating) {
        Some(mv) => {
            let t = ease_in_out(progress);
            let width = rect.width();
            match surface.behind {
                // Forward: the old slide stays put and fades while the new
                // one slides over it from the right.
                Some(behind) => {
                    if let Some(previous) = deck.slide(behind) {
                        draw_slide(ui, previous, theme, rect, 1.0 - t, scale);
                    }
                    let incoming = rect.translate(Vec2::new(width * (1.0 - t), 0.0));
                    draw_slide(ui, current, theme, incoming, 1.0, scale);
                }
                None => {
                    draw_slide(ui, current, theme, rect, 1.0, scale);
                    if let Some(previous) = deck.slide(mv.from) {
                        let outgoing = rect.translate(Vec2::new(width * t, 0.0));
                        draw_slide(ui, previous, theme, outgoing, 1.0, scale);
                    }
                }
            }
        }
        None => draw_slide(ui, current, theme, rect, 1.0, scale),
    }
    animating
}

pub fn draw_slide(ui: &egui::Ui, slide: &Slide, theme: &Theme, rect: Rect, opacity: f32, scale: f32) {
    let painter = ui.painter().with_clip_rect(rect.intersect(ui.clip_rect()));
    painter.rect_filled(rect, 0.0, Theme::with_opacity(theme.background, opacity));
    let padding = 80.0 * scale;
    let content = rect.shrink(padding);
    let width = content.width();
    let mut y = content.top();

    let centered = matches!(slide.blocks.as_slice(), [Block::Heading { .. }])
        || matches!(
            slide.blocks.as_slice(),
            [Block::Heading { .. }, Block::Paragraph { .. }]
        );

    for block in &slide.blocks {
        if y > content.bottom() {
            break;
        }
        match block {
            Block::Heading { level, text } => {
                let size = theme.heading_size(*level) * scale;
                let color = Theme::with_opacity(theme.heading_color, opacity);
                let galley = painter.layout(text.clone(), FontId::proportional(size), color, width);
                let x = if centered {
                    content.center().x - galley.rect.width() / 2.0
                } else {
                    content.left()
                };
                let h = galley.rect.height();
                painter.galley(Pos2::new(x, y), galley, color);
                y += h + 24.0 * scale;
            }
            Block::Paragraph { text } => {
                let color = Theme::with_opacity(theme.foreground, opacity);
                let galley = painter.layout(
                    text.clone(),
                    FontId::proportional(theme.body_size * scale),
                    color,
                    width,
                );
                let x = if centered {
                    content.center().x - galley.rect.width() / 2.0
                } else {
                    content.left()
                };
                let h = galley.rect.height();
                painter.galley(Pos2::new(x, y), galley, color);
                y += h + 20.0 * scale;
            }
            Block::Bullet {
                depth,
                ordered,
                text,
            } => {
                let size = theme.body_size * scale * if *depth > 0 { 0.85 } else { 1.0 };
                let indent = 48.0 * scale * (*depth as f32 + 1.0);
                let color = Theme::with_opacity(theme.foreground, opacity);
                let accent = Theme::with_opacity(theme.accent, opacity);
                let marker = if *ordered { "›" } else { "•" };
                painter.text(
                    Pos2::new(content.left() + indent - 32.0 * scale, y),
                    Align2::LEFT_TOP,
                    marker,
                    FontId::proportional(size),
                    accent,
                );
                let galley =
                    painter.layout(text.clone(), FontId::proportional(size), color, width - indent);
                let h = galley.rect.height();
                painter.galley(Pos2::new(content.left() + indent, y), galley, color);
                y += h + 12.0 * scale;
            }
            Block::Code { code, .. } => {
                let color = Theme::with_opacity(theme.code_foreground, opacity);
                let galley = painter.layout(
                    code.clone(),
                    FontId::monospace(theme.code_size * scale),
                    color,
                    width - 32.0 * scale,
                );
                let bg = Rect::from_min_size(
                    Pos2::new(content.left(), y),
                    Vec2::new(width, galley.rect.height() + 32.0 * scale),
                );
                painter.rect_filled(bg, 8.0 * scale, Theme::with_opacity(theme.code_background, opacity));
                let h = bg.height();
                painter.galley(Pos2::new(content.left() + 16.0 * scale, y + 16.0 * scale), galley, color);
                y += h + 20.0 * scale;
            }
            Block::Rule => {
                let stroke = Stroke::new(2.0 * scale, Theme::with_opacity(theme.muted, opacity));
                painter.hline(content.x_range(), y + 10.0 * scale, stroke);
                y += 24.0 * scale;
            }
        }
    }
}

/// Progress bar along the bottom edge of `rect`.
pub fn draw_progress(ui: &egui::Ui, theme: &Theme, rect: Rect, fraction: f32) {
    let height = 6.0_f32.max(rect.height() * 0.006);
    let track = Rect::from_min_max(Pos2::new(rect.left(), rect.bottom() - height), rect.max);
    ui.painter().rect_filled(track, 0.0, Theme::with_opacity(theme.muted, 0.2));
    let fill = Rect::from_min_size(track.min, Vec2::new(track.width() * fraction, height));
    ui.painter().rect_filled(fill, 0.0, theme.accent);
}

pub fn draw_help(ui: &egui::Ui, theme: &Theme, rect: Rect) {
    let painter = ui.painter();
    painter.rect_filled(rect, 0.0, Color32::from_black_alpha(160));

    let row_height = 30.0;
    let panel = Rect::from_center_size(
        rect.center(),
        Vec2::new(520.0, 80.0 + row_height * HELP_TEXT.len() as f32),
    );
    painter.rect_filled(panel, 12.0, theme.panel_background);
    painter.text(
        Pos2::new(panel.left() + 28.0, panel.top() + 24.0),
        Align2::LEFT_TOP,
        "Keyboard Shortcuts",
        FontId::proportional(22.0),
        theme.heading_color,
    );
    for (i, (keys, action)) in HELP_TEXT.iter().enumerate() {
        let y = panel.top() + 68.0 + row_height * i as f32;
        painter.text(
            Pos2::new(panel.left() + 28.0, y),
            Align2::LEFT_TOP,
            *keys,
            FontId::monospace(16.0),
            theme.accent,
        );
        painter.text(
            Pos2::new(panel.left() + 220.0, y),
            Align2::LEFT_TOP,
            *action,
            FontId::proportional(16.0),
            theme.foreground,
        );
    }
}

/// Presenter layout: timer and slide info on top, notes on the left,
/// current slide preview and next slide title on the right.
pub fn draw_presenter(ui: &mut egui::Ui, view: &PresenterView<Outbox>, deck: &Deck, theme: &Theme, now: Instant) {
    let full = ui.max_rect();
    ui.painter().rect_filled(full, 0.0, theme.panel_background);

    let header = Rect::from_min_size(full.min, Vec2::new(full.width(), 96.0));
    let reading = view.reading_at(now);
    let painter = ui.painter();
    painter.text(
        Pos2::new(header.left() + 24.0, header.top() + 16.0),
        Align2::LEFT_TOP,
        &reading.label,
        FontId::monospace(44.0),
        theme.timer_color(reading.severity),
    );
    painter.text(
        Pos2::new(header.left() + 24.0, header.top() + 68.0),
        Align2::LEFT_TOP,
        "Elapsed Time",
        FontId::proportional(14.0),
        theme.muted,
    );
    painter.text(
        Pos2::new(header.right() - 24.0, header.top() + 20.0),
        Align2::RIGHT_TOP,
        view.slide_label(),
        FontId::proportional(26.0),
        theme.heading_color,
    );
    painter.text(
        Pos2::new(header.right() - 24.0, header.top() + 58.0),
        Align2::RIGHT_TOP,
        view.target_label(),
        FontId::proportional(18.0),
        theme.accent,
    );
    painter.hline(
        full.x_range(),
        header.bottom(),
        Stroke::new(1.0, Theme::with_opacity(theme.muted, 0.4)),
    );

    let body = Rect::from_min_max(Pos2::new(full.left(), header.bottom()), full.max).shrink(24.0);
    let notes_rect = Rect::from_min_max(body.min, Pos2::new(body.left() + body.width() * 0.58, body.bottom()));
    let side = Rect::from_min_max(Pos2::new(notes_rect.right() + 24.0, body.top()), body.max);

    let mut notes_ui = ui.new_child(egui::UiBuilder::new().max_rect(notes_rect));
    egui::ScrollArea::vertical()
        .id_salt("presenter-notes")
        .show(&mut notes_ui, |ui| {
            ui.add(
                egui::Label::new(
                    egui::RichText::new(&view.displayed().body)
                        .size(20.0)
                        .color(theme.foreground),
                )
                .wrap(),
            );
        });

    let preview = fit_slide_rect(Rect::from_min_size(side.min, Vec2::new(side.width(), side.width() / ASPECT)));
    ui.painter().rect_filled(preview, 4.0, theme.background);
    if let Some(slide) = deck.slide(view.displayed().slide_index) {
        draw_slide(ui, slide, theme, preview, 1.0, scale_for(preview));
    }
    ui.painter().rect_stroke(
        preview,
        4.0,
        Stroke::new(1.0, Theme::with_opacity(theme.muted, 0.5)),
        egui::StrokeKind::Outside,
    );

    let next = deck
        .slide(view.displayed().slide_index + 1)
        .map(|s| s.title().unwrap_or("(untitled)").to_string())
        .unwrap_or_else(|| "End of deck".to_string());
    ui.painter().text(
        Pos2::new(side.left(), preview.bottom() + 20.0),
        Align2::LEFT_TOP,
        format!("Next: {next}"),
        FontId::proportional(18.0),
        theme.muted,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_slide_rect_letterboxes() {
        let wide = Rect::from_min_size(Pos2::ZERO, Vec2::new(3000.0, 1080.0));
        let fitted = fit_slide_rect(wide);
        assert!((fitted.height() - 1080.0).abs() < 0.01);
        assert!((fitted.width() - 1920.0).abs() < 0.01);
        assert_eq!(fitted.center(), wide.center());

        let tall = Rect::from_min_size(Pos2::ZERO, Vec2::new(1280.0, 1280.0));
        let fitted = fit_slide_rect(tall);
        assert!((fitted.width() - 1280.0).abs() < 0.01);
        assert!((fitted.height() - 720.0).abs() < 0.01);
    }

    #[test]
    fn test_ease_in_out_endpoints() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(ease_in_out(2.0), 1.0);
    }
}
