use colored::*;
use log::debug;
use popuptip_core::surface::{
    Position, SurfaceProvider, SurfaceResult, TextStyle, TextSurface, TipSurface,
};
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

/// Renders tips as boxed text on stdout.
pub struct TerminalSurfaceProvider {
    next_id: AtomicU64,
}

impl TerminalSurfaceProvider {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
        }
    }
}

impl SurfaceProvider for TerminalSurfaceProvider {
    type Owner = String;
    type Surface = TerminalSurface;

    fn create_surface(
        &self,
        owner: &String,
        content: &TextSurface,
        position: Position,
    ) -> SurfaceResult<TerminalSurface> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        debug!("Created terminal surface {id} for {owner}");
        Ok(TerminalSurface {
            id,
            owner: owner.clone(),
            position,
            lines: render_box(content.text(), content.style()),
            visible: false,
        })
    }
}

pub struct TerminalSurface {
    id: u64,
    owner: String,
    position: Position,
    lines: Vec<String>,
    visible: bool,
}

impl TipSurface for TerminalSurface {
    fn show(&mut self) -> SurfaceResult<()> {
        let mut out = io::stdout().lock();
        writeln!(
            out,
            "{}",
            format!(
                "tip #{} on {} at ({}, {})",
                self.id, self.owner, self.position.x, self.position.y
            )
            .dimmed()
        )
        .map_err(|e| e.to_string())?;
        for line in &self.lines {
            writeln!(out, "{line}").map_err(|e| e.to_string())?;
        }
        out.flush().map_err(|e| e.to_string())?;
        self.visible = true;
        Ok(())
    }

    fn hide(&mut self) -> SurfaceResult<()> {
        if self.visible {
            println!("{}", format!("tip #{} hidden", self.id).dimmed());
            self.visible = false;
        }
        Ok(())
    }
}

fn paint(text: &str, fg: (u8, u8, u8), bg: (u8, u8, u8)) -> String {
    text.truecolor(fg.0, fg.1, fg.2)
        .on_truecolor(bg.0, bg.1, bg.2)
        .to_string()
}

/// Draws `text` inside a border `style.border_width` cells thick.
fn render_box(text: &str, style: &TextStyle) -> Vec<String> {
    let text_lines: Vec<&str> = if text.is_empty() {
        vec![""]
    } else {
        text.lines().collect()
    };
    let inner_width = text_lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        + 2;
    let border = style.border_width as usize;
    let full_width = inner_width + border * 2;
    let border_cells = |n: usize| paint(&" ".repeat(n), style.border_color, style.border_color);

    let mut lines = Vec::new();
    for _ in 0..border {
        lines.push(border_cells(full_width));
    }
    for line in text_lines {
        let padded = format!(" {:<width$} ", line, width = inner_width - 2);
        lines.push(format!(
            "{}{}{}",
            border_cells(border),
            paint(&padded, style.foreground, style.background),
            border_cells(border)
        ));
    }
    for _ in 0..border {
        lines.push(border_cells(full_width));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_height_includes_border() {
        let style = TextStyle::default();
        let lines = render_box("one\ntwo", &style);
        assert_eq!(lines.len(), 2 + style.border_width as usize * 2);
    }

    #[test]
    fn test_empty_text_renders_single_row() {
        let style = TextStyle {
            border_width: 0,
            ..TextStyle::default()
        };
        assert_eq!(render_box("", &style).len(), 1);
    }
}
