use std::fmt::Write as _;

use crate::error::{DashboardError, DashboardResult};
use crate::render::{Color, RenderFrame, Renderer, TextHAlign};

/// Serializes frames into standalone SVG documents.
///
/// Each render replaces the previous document; nothing is diffed.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    document: String,
}

impl SvgRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last rendered document, empty before the first render.
    #[must_use]
    pub fn document(&self) -> &str {
        &self.document
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, frame: &RenderFrame) -> DashboardResult<()> {
        frame.validate()?;
        self.document = write_document(frame).map_err(|err| {
            DashboardError::Render(format!("failed to serialize svg document: {err}"))
        })?;
        Ok(())
    }
}

fn write_document(frame: &RenderFrame) -> Result<String, std::fmt::Error> {
    let width = frame.viewport.width;
    let height = frame.viewport.height;
    let mut out = String::new();
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    )?;

    for layer in frame.layers() {
        if layer.is_empty() {
            continue;
        }
        writeln!(out, r#"<g data-layer="{:?}">"#, layer.kind)?;
        for rect in &layer.rects {
            write!(
                out,
                r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" {}"#,
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                fill_attrs(rect.fill_color)
            )?;
            if rect.border_width > 0.0 {
                write!(
                    out,
                    r#" stroke="{}" stroke-width="{:.2}""#,
                    rect.border_color.with_alpha(1.0),
                    rect.border_width
                )?;
            }
            writeln!(out, "/>")?;
        }
        for line in &layer.lines {
            writeln!(
                out,
                r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-opacity="{:.3}" stroke-width="{:.2}"/>"#,
                line.x1,
                line.y1,
                line.x2,
                line.y2,
                line.color.with_alpha(1.0),
                line.color.alpha,
                line.stroke_width
            )?;
        }
        for circle in &layer.circles {
            writeln!(
                out,
                r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" {}/>"#,
                circle.cx,
                circle.cy,
                circle.radius,
                fill_attrs(circle.fill_color)
            )?;
        }
        for text in &layer.texts {
            let anchor = match text.h_align {
                TextHAlign::Left => "start",
                TextHAlign::Center => "middle",
                TextHAlign::Right => "end",
            };
            write!(
                out,
                r#"<text x="{:.2}" y="{:.2}" font-size="{:.1}" text-anchor="{anchor}" {}"#,
                text.x,
                text.y,
                text.font_size_px,
                fill_attrs(text.color)
            )?;
            if text.rotation_deg != 0.0 {
                write!(
                    out,
                    r#" transform="rotate({:.1} {:.2} {:.2})""#,
                    text.rotation_deg, text.x, text.y
                )?;
            }
            writeln!(out, ">{}</text>", escape_text(&text.text))?;
        }
        writeln!(out, "</g>")?;
    }

    writeln!(out, "</svg>")?;
    Ok(out)
}

fn fill_attrs(color: Color) -> String {
    format!(
        r#"fill="{}" fill-opacity="{:.3}""#,
        color.with_alpha(1.0),
        color.alpha
    )
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
