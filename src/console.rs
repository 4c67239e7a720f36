use crate::config::Settings;
use crate::error::AppError;
use crate::fps::FpsCounter;
use crate::graphics::{draw_line, fill_polygon, stroke_polygon, PixelBuffer};
use crate::render::{compose_frame, DebugInfo, DrawCommand, Frame, Rgba};
use crate::state::AppState;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use std::io::{self, Write};
use std::time::Instant;

const BACKGROUND: Rgba = [0, 0, 0, 255];

/// Upper half block: foreground paints the top pixel, background the bottom one
const HALF_BLOCK: char = '▀';

/// One terminal character cell
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgba,
    pub bg: Rgba,
}

/// What the loop should do after a key press
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Restores the terminal when dropped, whatever way the loop exits
struct TerminalGuard;

impl TerminalGuard {
    fn enter(out: &mut impl Write) -> Result<Self, AppError> {
        terminal::enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, Hide)?;
        Ok(TerminalGuard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = execute!(io::stdout(), ResetColor, Show, LeaveAlternateScreen) {
            log::warn!("failed to restore screen: {}", err);
        }
        if let Err(err) = terminal::disable_raw_mode() {
            log::warn!("failed to leave raw mode: {}", err);
        }
    }
}

fn terminal_size() -> Result<(u16, u16), AppError> {
    match termsize::get() {
        Some(size) => Ok((size.cols, size.rows)),
        None => Ok(terminal::size()?),
    }
}

fn to_color(rgba: Rgba) -> Color {
    Color::Rgb {
        r: rgba[0],
        g: rgba[1],
        b: rgba[2],
    }
}

/// Applies a key press to the state
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> Control {
    if key.kind != KeyEventKind::Press {
        return Control::Continue;
    }
    match key.code {
        KeyCode::Esc => Control::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Control::Quit,
        KeyCode::Char(c) => {
            match c.to_ascii_lowercase() {
                'q' => return Control::Quit,
                'p' => state.toggle_pause(),
                'd' => state.toggle_debug(),
                'r' if !state.paused => state.reset(),
                _ => {}
            }
            Control::Continue
        }
        _ => Control::Continue,
    }
}

/// Rasterizes a frame onto a `cols` x `rows` grid of character cells.
///
/// Each cell holds two vertically stacked pixels; text is laid over the
/// pixels afterwards, one character per cell.
pub fn layout_cells(frame: &Frame, cols: u16, rows: u16) -> Vec<Vec<Cell>> {
    let (cols, rows) = (cols as usize, rows as usize);
    let mut buffer = PixelBuffer::new(cols, rows * 2, BACKGROUND);
    let sx = cols as f64 / frame.viewport.width;
    let sy = (rows * 2) as f64 / frame.viewport.height;
    let scale = |p: &[f64; 2]| [p[0] * sx, p[1] * sy];

    for command in &frame.commands {
        match command {
            DrawCommand::Polygon {
                points,
                stroke,
                fill,
                ..
            } => {
                let points: Vec<[f64; 2]> = points.iter().map(scale).collect();
                fill_polygon(&points, &mut buffer, *fill);
                stroke_polygon(&points, &mut buffer, *stroke);
            }
            DrawCommand::Line {
                from,
                to,
                color,
                dashed,
            } => draw_line(scale(from), scale(to), &mut buffer, *color, *dashed),
            DrawCommand::Text { .. } => {}
        }
    }

    let mut cells: Vec<Vec<Cell>> = (0..rows)
        .map(|row| {
            (0..cols)
                .map(|col| Cell {
                    ch: HALF_BLOCK,
                    fg: buffer.get(col, row * 2).unwrap_or(BACKGROUND),
                    bg: buffer.get(col, row * 2 + 1).unwrap_or(BACKGROUND),
                })
                .collect()
        })
        .collect();

    for command in &frame.commands {
        if let DrawCommand::Text {
            position,
            text,
            color,
            ..
        } = command
        {
            let [x, y] = scale(position);
            if x < 0.0 || y < 0.0 {
                continue;
            }
            let (col, row) = (x.round() as usize, (y / 2.0).round() as usize);
            let Some(line) = cells.get_mut(row) else {
                continue;
            };
            for (cell, ch) in line.iter_mut().skip(col).zip(text.chars()) {
                cell.ch = ch;
                cell.fg = *color;
                cell.bg = BACKGROUND;
            }
        }
    }

    cells
}

fn paint(out: &mut impl Write, cells: &[Vec<Cell>]) -> io::Result<()> {
    for (row, line) in cells.iter().enumerate() {
        queue!(out, MoveTo(0, row as u16))?;
        let mut current: Option<(Rgba, Rgba)> = None;
        for cell in line {
            if current != Some((cell.fg, cell.bg)) {
                queue!(
                    out,
                    SetForegroundColor(to_color(cell.fg)),
                    SetBackgroundColor(to_color(cell.bg))
                )?;
                current = Some((cell.fg, cell.bg));
            }
            queue!(out, Print(cell.ch))?;
        }
    }
    queue!(out, ResetColor)?;
    out.flush()
}

/// Runs the animation full-screen in the terminal until `q`, Esc or the
/// tick limit.
pub fn run(settings: &Settings) -> Result<(), AppError> {
    let mut state = AppState::new(settings.speeds);
    state.debug = settings.debug;
    let mut fps = FpsCounter::new();
    // Ticks that moved the animation; paused time does not count
    let mut ticks = 0u64;

    let mut out = io::stdout();
    let _guard = TerminalGuard::enter(&mut out)?;
    log::info!("console frontend started, interval {:?}", settings.interval);

    let mut next_tick = Instant::now();
    loop {
        let remaining = next_tick.saturating_duration_since(Instant::now());
        if event::poll(remaining)? {
            match event::read()? {
                Event::Key(key) => {
                    if handle_key(&mut state, key) == Control::Quit {
                        break;
                    }
                }
                Event::Resize(cols, rows) => {
                    log::debug!("terminal resized to {}x{}", cols, rows)
                }
                _ => {}
            }
            continue;
        }

        // Update before render; the next tick is scheduled only after drawing
        if state.tick() {
            ticks += 1;
        }
        let debug = DebugInfo {
            fps: fps.frame(Instant::now()),
        };
        let frame = compose_frame(&state, settings.viewport, debug);
        let (cols, rows) = terminal_size()?;
        paint(&mut out, &layout_cells(&frame, cols, rows))?;
        next_tick = Instant::now() + settings.interval;

        if settings.frames.is_some_and(|limit| ticks >= limit) {
            break;
        }
    }

    log::info!("console frontend stopped after {} ticks", ticks);
    Ok(())
}
