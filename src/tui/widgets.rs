// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use rand::Rng;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

const SNOW: [char; 6] = [' ', ' ', '.', ':', '░', '▒'];

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Fixed-size box centred in `r`, clipped to `r`.
pub fn centered_box(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

/// A screenful of analogue snow.
pub fn snow<R: Rng>(rng: &mut R, width: u16, height: u16) -> Vec<Line<'static>> {
    (0..height)
        .map(|_| {
            let row: String = (0..width)
                .map(|_| SNOW[rng.random_range(0..SNOW.len())])
                .collect();
            let shade = if rng.random_bool(0.5) {
                Color::Gray
            } else {
                Color::DarkGray
            };
            Line::from(row).style(Style::default().fg(shade))
        })
        .collect()
}

pub fn key_hints() -> Line<'static> {
    let key = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let text = Style::default().fg(Color::DarkGray);
    let hints = [
        ("p", "power"),
        ("↑↓", "channel"),
        ("0-9", "tune"),
        ("m", "mute"),
        ("q", "quit"),
    ];

    let mut spans = Vec::new();
    for (i, (k, label)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", text));
        }
        spans.push(Span::styled(*k, key));
        spans.push(Span::styled(format!(" {}", label), text));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn snow_fills_requested_area() {
        let mut rng = StdRng::seed_from_u64(7);
        let lines = snow(&mut rng, 12, 4);
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|l| l.width() == 12));
    }

    #[test]
    fn centered_box_is_clipped() {
        let area = Rect::new(2, 3, 10, 4);
        let b = centered_box(20, 2, area);
        assert_eq!(b, Rect::new(2, 4, 10, 2));
    }
}
