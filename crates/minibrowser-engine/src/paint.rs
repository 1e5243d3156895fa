//! Display-list painting for the layout engine.
//!
//! [`build_display_list`] walks the engine's current wrap and scroll state
//! and emits [`DrawCommand`]s: visible text lines, link underlines, an
//! optional focus outline, and a scrollbar thumb. [`paint`] replays that
//! list against a [`Canvas`].

use minibrowser_types::canvas::{Canvas, Color, DrawCommand};
use minibrowser_types::error::Result;
use minibrowser_types::geometry::Rect;

use crate::layout::LayoutEngine;

/// Smallest scrollbar thumb height, in pixels.
const MIN_THUMB_HEIGHT: f32 = 8.0;

/// Colors and decoration sizes used when painting page content.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintStyle {
    pub text_color: Color,
    pub link_color: Color,
    pub focus_color: Color,
    pub scrollbar_color: Color,
    /// Fill behind the viewport. `None` leaves the surface as is.
    pub background: Option<Color>,
    pub scrollbar_width: u32,
}

impl Default for PaintStyle {
    fn default() -> Self {
        Self {
            text_color: Color::BLACK,
            link_color: Color::rgb(0, 102, 204),
            focus_color: Color::rgb(255, 200, 0),
            scrollbar_color: Color::rgb(160, 160, 160),
            background: None,
            scrollbar_width: 4,
        }
    }
}

/// Build the draw commands for the engine's visible content.
///
/// `focused_link` is a [`RenderedLink::link_index`](crate::layout::RenderedLink::link_index).
/// A focused link that is not rendered in the current layout draws no
/// outline.
pub fn build_display_list(
    engine: &LayoutEngine,
    style: &PaintStyle,
    focused_link: Option<usize>,
) -> Vec<DrawCommand> {
    let mut cmds = Vec::new();
    let viewport = engine.viewport();

    if let Some(bg) = style.background {
        push_fill(&mut cmds, viewport, bg);
    }

    let font_size = engine.config().font_size.round().clamp(1.0, f32::from(u16::MAX)) as u16;
    let x = viewport.x.round() as i32;
    for i in engine.visible_line_range() {
        let line = &engine.wrapped_lines()[i];
        if line.is_empty() {
            continue;
        }
        cmds.push(DrawCommand::DrawText {
            text: line.clone(),
            x,
            y: engine.line_y(i).round() as i32,
            font_size,
            color: style.text_color,
        });
    }

    for seg in engine
        .rendered_links()
        .iter()
        .flat_map(|link| &link.segments)
        .filter(|seg| seg.intersects(&viewport))
    {
        let underline = Rect::new(seg.x, seg.bottom() - 1.0, seg.width, 1.0);
        push_fill(&mut cmds, underline, style.link_color);
    }

    if let Some(index) = focused_link
        && let Some(link) = engine.rendered_links().iter().find(|l| l.link_index == index)
    {
        for seg in link.segments.iter().filter(|seg| seg.intersects(&viewport)) {
            push_outline(&mut cmds, *seg, style.focus_color);
        }
    }

    if let Some(thumb) = scrollbar_thumb(engine, style.scrollbar_width) {
        push_fill(&mut cmds, thumb, style.scrollbar_color);
    }

    cmds
}

/// Paint the engine's content onto `canvas`.
pub fn paint(
    engine: &LayoutEngine,
    style: &PaintStyle,
    focused_link: Option<usize>,
    canvas: &mut dyn Canvas,
) -> Result<()> {
    let cmds = build_display_list(engine, style, focused_link);
    log::trace!("paint: {} commands", cmds.len());
    for cmd in &cmds {
        canvas.execute(cmd)?;
    }
    Ok(())
}

/// Scrollbar thumb on the viewport's right edge, when content overflows.
fn scrollbar_thumb(engine: &LayoutEngine, width: u32) -> Option<Rect> {
    let max_scroll = engine.max_scroll();
    let content_height = engine.content_height();
    let viewport = engine.viewport();
    if max_scroll <= 0.0 || content_height <= 0.0 || width == 0 {
        return None;
    }
    let track = viewport.height;
    let thumb_height = (track * track / content_height)
        .max(MIN_THUMB_HEIGHT)
        .min(track);
    let thumb_y = viewport.y + engine.scroll_fraction() * (track - thumb_height);
    let width = width as f32;
    Some(Rect::new(
        viewport.right() - width,
        thumb_y,
        width,
        thumb_height,
    ))
}

fn push_fill(cmds: &mut Vec<DrawCommand>, rect: Rect, color: Color) {
    let w = rect.width.round().max(0.0) as u32;
    let h = rect.height.round().max(0.0) as u32;
    if w == 0 || h == 0 {
        return;
    }
    cmds.push(DrawCommand::FillRect {
        x: rect.x.round() as i32,
        y: rect.y.round() as i32,
        w,
        h,
        color,
    });
}

/// Four 1px edges just outside `rect`.
fn push_outline(cmds: &mut Vec<DrawCommand>, rect: Rect, color: Color) {
    let (x, y, w, h) = (rect.x - 1.0, rect.y - 1.0, rect.width + 2.0, rect.height + 2.0);
    push_fill(cmds, Rect::new(x, y, w, 1.0), color);
    push_fill(cmds, Rect::new(x, y + h - 1.0, w, 1.0), color);
    push_fill(cmds, Rect::new(x, y, 1.0, h), color);
    push_fill(cmds, Rect::new(x + w - 1.0, y, 1.0, h), color);
}
