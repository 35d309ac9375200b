// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use chrono::Local;
use rand::Rng;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use super::widgets::{centered_box, centered_rect, key_hints, snow};
use crate::engine::Frame as Picture;
use crate::scheduler::Program;
use crate::tv::{Power, TransitionKind, TvState};

/// Everything needed to draw one tick.
pub struct Screen<'a, R: Rng> {
    pub picture: &'a Picture,
    pub state: &'a TvState,
    pub tick: u64,
    /// Channel banner shown in the corner after tuning.
    pub osd: Option<(u32, &'a str)>,
    /// Ticks since the set went off, for the collapsing dot.
    pub off_for: u64,
    pub rng: &'a mut R,
}

pub fn draw<R: Rng>(frame: &mut Frame, screen: &mut Screen<'_, R>) {
    let size = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Tube
            Constraint::Length(3), // Footer
        ])
        .split(size);

    let tube = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Thick)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" crtv ")
        .title_alignment(Alignment::Center);
    let inner = tube.inner(chunks[0]);
    frame.render_widget(tube, chunks[0]);

    let picture_area = centered_rect(96, 94, inner);
    draw_picture(frame, screen, picture_area);

    if screen.state.power == Power::On {
        draw_osd(frame, screen, picture_area);
    }

    draw_footer(frame, chunks[1]);
}

fn draw_picture<R: Rng>(frame: &mut Frame, screen: &mut Screen<'_, R>, area: Rect) {
    match screen.picture {
        Picture::Off => draw_off(frame, screen.off_for, area),
        Picture::WarmingUp { elapsed, total } => draw_warm_up(frame, *elapsed, *total, area),
        Picture::Program(program) => {
            draw_program(frame, program, Style::default().fg(Color::White), area)
        }
        Picture::Transition {
            kind: TransitionKind::Flicker,
            under: Some(program),
        } => {
            let style = if screen.tick % 2 == 0 {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
            };
            draw_program(frame, program, style, area);
        }
        Picture::Transition { .. } => draw_snow(frame, &mut *screen.rng, area),
        Picture::NoSignal { .. } => {
            draw_snow(frame, &mut *screen.rng, area);
            let card = centered_box(15, 3, area);
            frame.render_widget(Clear, card);
            frame.render_widget(
                Paragraph::new("NO SIGNAL")
                    .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL)),
                card,
            );
        }
    }
}

fn draw_off(frame: &mut Frame, off_for: u64, area: Rect) {
    // The dot fades over the first few ticks after power-down.
    let dot = match off_for {
        0 => "●",
        1..=2 => "•",
        3..=4 => "·",
        _ => return,
    };
    frame.render_widget(
        Paragraph::new(dot).style(Style::default().fg(Color::White)),
        centered_box(1, 1, area),
    );
}

fn draw_warm_up(frame: &mut Frame, elapsed: u32, total: u32, area: Rect) {
    let progress = if total == 0 {
        1.0
    } else {
        f64::from(elapsed + 1) / f64::from(total)
    };
    let width = ((f64::from(area.width) * progress) as u16).max(1);
    let height = ((f64::from(area.height) * progress * progress) as u16).max(1);
    let glow = centered_box(width, height, area);
    let lines: Vec<Line> = (0..glow.height)
        .map(|_| Line::from("▒".repeat(glow.width as usize)))
        .collect();
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().fg(Color::Gray)),
        glow,
    );
}

fn draw_program(frame: &mut Frame, program: &Program, style: Style, area: Rect) {
    let lines: Vec<Line> = program.text.lines().map(Line::from).collect();
    let height = (lines.len() as u16).min(area.height);
    let width = program
        .text
        .lines()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0) as u16;
    let body = centered_box(width.max(1), height.max(1), area);
    frame.render_widget(Paragraph::new(lines).style(style), body);
}

fn draw_snow<R: Rng>(frame: &mut Frame, rng: &mut R, area: Rect) {
    frame.render_widget(Paragraph::new(snow(rng, area.width, area.height)), area);
}

fn draw_osd<R: Rng>(frame: &mut Frame, screen: &Screen<'_, R>, area: Rect) {
    let osd = Style::default()
        .fg(Color::LightGreen)
        .add_modifier(Modifier::BOLD);

    if let Some((id, name)) = screen.osd {
        let text = vec![Line::from(format!("CH {:02}", id)), Line::from(name.to_string())];
        let width = (name.chars().count().max(5) as u16 + 1).min(area.width);
        let corner = Rect {
            x: area.x + area.width.saturating_sub(width),
            y: area.y,
            width,
            height: area.height.min(2),
        };
        frame.render_widget(Paragraph::new(text).style(osd).alignment(Alignment::Right), corner);
    }

    if screen.state.muted {
        let corner = Rect {
            x: area.x,
            y: area.y,
            width: area.width.min(6),
            height: area.height.min(1),
        };
        frame.render_widget(Paragraph::new("MUTE").style(osd), corner);
    }

    let clock = Local::now().format("%H:%M").to_string();
    let corner = Rect {
        x: area.x + area.width.saturating_sub(5),
        y: area.y + area.height.saturating_sub(1),
        width: area.width.min(5),
        height: area.height.min(1),
    };
    frame.render_widget(
        Paragraph::new(clock).style(Style::default().fg(Color::Green)),
        corner,
    );
}

fn draw_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(key_hints())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(footer, area);
}
