// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

//! Procedurally drawn programming for the default line-up. Every frame is a
//! pure function of its index, so nothing is stored between frames.

use std::fmt;

const WIDTH: usize = 40;
const HEIGHT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Show {
    Sitcom,
    Cartoon,
    Anime,
    Weather,
    Game,
    TestCard,
}

impl Show {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "sitcom" => Some(Self::Sitcom),
            "cartoon" => Some(Self::Cartoon),
            "anime" => Some(Self::Anime),
            "weather" => Some(Self::Weather),
            "game" => Some(Self::Game),
            "testcard" => Some(Self::TestCard),
            _ => None,
        }
    }

    pub fn length(self) -> u64 {
        match self {
            Show::Sitcom => (SITCOM_SCRIPT.len() * SITCOM_BEAT) as u64,
            Show::Cartoon => (2 * (WIDTH - 6)) as u64,
            Show::Anime => 64,
            Show::Weather => (FORECAST.len() * WEATHER_HOLD) as u64,
            Show::Game => (2 * (WIDTH - 4) * (HEIGHT - 3)) as u64,
            Show::TestCard => 24,
        }
    }

    pub fn render(self, index: u64) -> String {
        let index = (index % self.length()) as usize;
        let canvas = match self {
            Show::Sitcom => sitcom(index),
            Show::Cartoon => cartoon(index),
            Show::Anime => anime(index),
            Show::Weather => weather(index),
            Show::Game => game(index),
            Show::TestCard => test_card(index),
        };
        canvas.to_string()
    }
}

impl fmt::Display for Show {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Show::Sitcom => "sitcom",
            Show::Cartoon => "cartoon",
            Show::Anime => "anime",
            Show::Weather => "weather",
            Show::Game => "game",
            Show::TestCard => "testcard",
        };
        f.write_str(name)
    }
}

struct Canvas {
    rows: Vec<Vec<char>>,
}

impl Canvas {
    fn blank() -> Self {
        Self {
            rows: vec![vec![' '; WIDTH]; HEIGHT],
        }
    }

    fn put(&mut self, x: usize, y: usize, text: &str) {
        let Some(row) = self.rows.get_mut(y) else {
            return;
        };
        for (i, ch) in text.chars().enumerate() {
            if let Some(cell) = row.get_mut(x + i) {
                *cell = ch;
            }
        }
    }

    fn centre(&mut self, y: usize, text: &str) {
        let len = text.chars().count();
        self.put(WIDTH.saturating_sub(len) / 2, y, text);
    }

    fn fill_row(&mut self, y: usize, ch: char) {
        if let Some(row) = self.rows.get_mut(y) {
            row.iter_mut().for_each(|c| *c = ch);
        }
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let line: String = row.iter().collect();
            f.write_str(line.trim_end())?;
        }
        Ok(())
    }
}

const SITCOM_BEAT: usize = 8;
const SITCOM_SCRIPT: [(&str, &str); 6] = [
    ("DAD", "Has anyone seen the remote?"),
    ("KID", "Dad, it's in your hand."),
    ("", "(audience laughs)"),
    ("MOM", "Dinner's getting cold!"),
    ("NEIGHBOR", "Did somebody say dinner?"),
    ("", "(applause)"),
];

fn sitcom(index: usize) -> Canvas {
    let mut c = Canvas::blank();
    let (speaker, line) = SITCOM_SCRIPT[index / SITCOM_BEAT];
    c.centre(0, "~ THE SUBURBANITES ~");
    c.put(4, 3, "[=]      ___________      [#]");
    c.put(4, 4, " |      |  _     _  |      |");
    c.put(4, 5, " |      |_(_)___(_)_|      |");
    c.fill_row(6, '_');
    if speaker.is_empty() {
        c.centre(8, line);
    } else {
        c.centre(8, &format!("{speaker}: {line}"));
    }
    c
}

fn cartoon(index: usize) -> Canvas {
    let mut c = Canvas::blank();
    let span = WIDTH - 6;
    let (x, sprite) = if index < span {
        (index, "(o.o)>")
    } else {
        (2 * span - index - 1, "<(o.o)")
    };
    c.centre(0, "SATURDAY MORNING TOONS");
    c.put(x, 5, sprite);
    c.put(x, 6, if index % 2 == 0 { " /  \\ " } else { "  ||  " });
    c.fill_row(7, '=');
    if index % 8 < 4 {
        c.centre(9, "ZOOM!");
    }
    c
}

fn anime(index: usize) -> Canvas {
    let mut c = Canvas::blank();
    let phase = index % 16;
    if index < 16 {
        c.centre(3, "EPISODE 26");
        c.centre(5, "THE LAST TRANSMISSION");
        return c;
    }
    for y in 1..HEIGHT - 1 {
        let offset = (y * 7 + phase * 3) % WIDTH;
        c.put(offset, y, "----");
    }
    c.centre(4, if phase < 8 { "  ( >_<)  " } else { "  (-_- )  " });
    c.centre(HEIGHT - 1, "[ to be continued... ]");
    c
}

const WEATHER_HOLD: usize = 12;
const FORECAST: [(&str, i32, &str); 5] = [
    ("NORTH", 41, "SNOW"),
    ("COAST", 58, "FOG"),
    ("VALLEY", 67, "SUNNY"),
    ("DESERT", 88, "CLEAR"),
    ("METRO", 63, "SHOWERS"),
];

fn weather(index: usize) -> Canvas {
    let mut c = Canvas::blank();
    let (region, temp, sky) = FORECAST[index / WEATHER_HOLD];
    c.fill_row(0, '*');
    c.centre(0, " LOCAL FORECAST ");
    c.put(3, 2, "   ______");
    c.put(3, 3, "  /  __  \\____");
    c.put(3, 4, " |  (__)       \\");
    c.put(3, 5, "  \\____________/");
    c.put(24, 3, &format!("{region:<8}"));
    c.put(24, 4, &format!("{temp:>3} F"));
    c.put(24, 5, sky);
    let ticker = "  SMOOTH JAZZ CONTINUES AFTER THESE LOCAL CONDITIONS  ";
    let shift = index % ticker.len();
    let scrolled: String = ticker.chars().cycle().skip(shift).take(WIDTH).collect();
    c.put(0, HEIGHT - 1, &scrolled);
    c
}

fn game(index: usize) -> Canvas {
    let mut c = Canvas::blank();
    let cols = WIDTH - 4;
    let rows = HEIGHT - 3;
    let bounce = |t: usize, n: usize| {
        let t = t % (2 * n);
        if t < n { t } else { 2 * n - t - 1 }
    };
    let x = 2 + bounce(index, cols);
    let y = 1 + bounce(index, rows);
    c.fill_row(0, '-');
    c.fill_row(HEIGHT - 2, '-');
    let left = 1 + bounce(index + 2, rows).min(rows - 2);
    let right = 1 + bounce(index + 5, rows).min(rows - 2);
    c.put(0, left, "|");
    c.put(0, left + 1, "|");
    c.put(WIDTH - 1, right, "|");
    c.put(WIDTH - 1, right + 1, "|");
    c.put(x, y, "o");
    c.centre(HEIGHT - 1, &format!("P1 {:02}   HI-SCORE 9999   P2 {:02}", (index / 36) % 100, (index / 48) % 100));
    c
}

fn test_card(index: usize) -> Canvas {
    let mut c = Canvas::blank();
    let bars = ['#', '%', '=', '+', ':', '.', ' '];
    let bar_width = WIDTH / bars.len();
    for y in 0..6 {
        for (i, ch) in bars.iter().enumerate() {
            let bar: String = std::iter::repeat_n(*ch, bar_width).collect();
            c.put(i * bar_width, y, &bar);
        }
    }
    c.centre(7, "1 kHz TONE");
    if index % 12 < 8 {
        c.centre(8, "PLEASE STAND BY");
    }
    c
}
