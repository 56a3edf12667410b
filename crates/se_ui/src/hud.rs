//! Text and button primitives painted on top of the sprite pass.
//!
//! Game code describes what to show as a `HudFrame` in logical coordinates
//! (same space as sprites); `paint_hud` turns it into egui shapes on a
//! background layer so the debug window always stays above it.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Center,
    TopLeft,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub pos: [f32; 2],
    pub anchor: Anchor,
    pub size: f32,
    pub color: [u8; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonItem {
    /// x, y, width, height
    pub rect: [f32; 4],
    pub label: String,
    pub fill: [u8; 3],
    pub border: [u8; 3],
    pub text_color: [u8; 3],
    pub text_size: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HudFrame {
    pub buttons: Vec<ButtonItem>,
    pub texts: Vec<TextItem>,
}

impl HudFrame {
    pub fn text(
        &mut self,
        text: impl Into<String>,
        pos: [f32; 2],
        anchor: Anchor,
        size: f32,
        color: [u8; 3],
    ) {
        self.texts.push(TextItem {
            text: text.into(),
            pos,
            anchor,
            size,
            color,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty() && self.texts.is_empty()
    }
}

fn color32(rgb: [u8; 3]) -> egui::Color32 {
    egui::Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

fn align(anchor: Anchor) -> egui::Align2 {
    match anchor {
        Anchor::Center => egui::Align2::CENTER_CENTER,
        Anchor::TopLeft => egui::Align2::LEFT_TOP,
    }
}

pub fn paint_hud(ctx: &egui::Context, frame: &HudFrame) {
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Background,
        egui::Id::new("hud"),
    ));

    for button in &frame.buttons {
        let [x, y, w, h] = button.rect;
        let rect = egui::Rect::from_min_size(egui::pos2(x, y), egui::vec2(w, h));
        painter.rect_filled(rect, 0.0, color32(button.fill));
        painter.rect_stroke(
            rect,
            0.0,
            egui::Stroke::new(1.0, color32(button.border)),
            egui::StrokeKind::Inside,
        );
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            &button.label,
            egui::FontId::proportional(button.text_size),
            color32(button.text_color),
        );
    }

    for item in &frame.texts {
        painter.text(
            egui::pos2(item.pos[0], item.pos[1]),
            align(item.anchor),
            &item.text,
            egui::FontId::proportional(item.size),
            color32(item.color),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_helper_appends_in_order() {
        let mut hud = HudFrame::default();
        assert!(hud.is_empty());
        hud.text("CANDY: 0/20", [12.0, 10.0], Anchor::TopLeft, 30.0, [50, 50, 50]);
        hud.text("GAME OVER", [400.0, 225.0], Anchor::Center, 70.0, [255, 0, 0]);
        assert_eq!(hud.texts.len(), 2);
        assert_eq!(hud.texts[1].text, "GAME OVER");
        assert!(!hud.is_empty());
    }

    #[test]
    fn paint_runs_without_a_gpu() {
        let ctx = egui::Context::default();
        let mut hud = HudFrame::default();
        hud.buttons.push(ButtonItem {
            rect: [290.0, 170.0, 220.0, 55.0],
            label: "START".to_string(),
            fill: [255, 245, 250],
            border: [255, 120, 170],
            text_color: [140, 60, 100],
            text_size: 34.0,
        });
        hud.text("SWEET ESCAPE", [400.0, 90.0], Anchor::Center, 64.0, [255, 255, 255]);

        let output = ctx.run(egui::RawInput::default(), |ctx| paint_hud(ctx, &hud));
        assert!(!output.shapes.is_empty());
    }
}
