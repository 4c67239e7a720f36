use crate::config::Settings;
use crate::error::AppError;
use crate::fps::FpsCounter;
use crate::render::{compose_frame, DebugInfo, DrawCommand, Rgba, Viewport};
use crate::state::AppState;
use druid::keyboard_types::Key;
use druid::kurbo::{BezPath, Line, Point};
use druid::piet::{FontFamily, StrokeStyle, Text, TextLayoutBuilder};
use druid::widget::prelude::*;
use druid::{commands, AppLauncher, Color, RenderContext, Widget, WindowDesc};
use std::time::{Duration, Instant};

const DASH: &[f64] = &[5.0];

fn to_color(rgba: Rgba) -> Color {
    Color::rgba8(rgba[0], rgba[1], rgba[2], rgba[3])
}

/// Widget animating both squares on a repaint timer
pub struct TransformWidget {
    fps: FpsCounter,
    interval: Duration,
}

impl TransformWidget {
    pub fn new(interval: Duration) -> Self {
        TransformWidget {
            fps: FpsCounter::new(),
            interval,
        }
    }
}

impl Widget<AppState> for TransformWidget {
    /// Handle events for the animation widget
    fn event(&mut self, ctx: &mut EventCtx, event: &Event, data: &mut AppState, _env: &Env) {
        match event {
            Event::WindowConnected => {
                ctx.request_timer(self.interval);
                // Request focus to receive keyboard events
                ctx.request_focus();
            }
            Event::Timer(_) => {
                data.tick();
                ctx.request_paint();
                ctx.request_timer(self.interval);
            }
            Event::KeyDown(key_event) => match &key_event.key {
                Key::Escape => ctx.submit_command(commands::QUIT_APP),
                Key::Character(s) => match s.to_lowercase().as_str() {
                    "q" => ctx.submit_command(commands::QUIT_APP),
                    "p" => {
                        data.toggle_pause();
                        ctx.request_paint();
                    }
                    "d" => {
                        data.toggle_debug();
                        ctx.request_paint();
                    }
                    "r" if !data.paused => {
                        data.reset();
                        ctx.request_paint();
                    }
                    _ => {}
                },
                _ => {}
            },
            _ => {}
        }
    }

    fn lifecycle(
        &mut self,
        _ctx: &mut LifeCycleCtx,
        _event: &LifeCycle,
        _data: &AppState,
        _env: &Env,
    ) {
    }

    fn update(
        &mut self,
        _ctx: &mut UpdateCtx,
        _old_data: &AppState,
        _data: &AppState,
        _env: &Env,
    ) {
    }

    fn layout(
        &mut self,
        _layout_ctx: &mut LayoutCtx,
        bc: &BoxConstraints,
        _data: &AppState,
        _env: &Env,
    ) -> Size {
        bc.max()
    }

    /// Paint the current frame
    fn paint(&mut self, ctx: &mut PaintCtx, data: &AppState, _env: &Env) {
        self.fps.frame(Instant::now());

        let size = ctx.size();
        ctx.fill(size.to_rect(), &Color::BLACK);

        let viewport = Viewport {
            width: size.width,
            height: size.height,
        };
        let debug = DebugInfo {
            fps: self.fps.fps(),
        };
        let frame = compose_frame(data, viewport, debug);
        let dashed = StrokeStyle::new().dash_pattern(DASH);

        for command in &frame.commands {
            match command {
                DrawCommand::Polygon {
                    points,
                    stroke,
                    fill,
                    stroke_width,
                } => {
                    let mut path = BezPath::new();
                    for (index, p) in points.iter().enumerate() {
                        let point = Point::new(p[0], p[1]);
                        if index == 0 {
                            path.move_to(point);
                        } else {
                            path.line_to(point);
                        }
                    }
                    path.close_path();
                    ctx.fill(&path, &to_color(*fill));
                    ctx.stroke(&path, &to_color(*stroke), *stroke_width);
                }
                DrawCommand::Line {
                    from,
                    to,
                    color,
                    dashed: is_dashed,
                } => {
                    let line = Line::new((from[0], from[1]), (to[0], to[1]));
                    if *is_dashed {
                        ctx.stroke_styled(line, &to_color(*color), 1.0, &dashed);
                    } else {
                        ctx.stroke(line, &to_color(*color), 1.0);
                    }
                }
                DrawCommand::Text {
                    position,
                    text,
                    color,
                    size,
                } => {
                    let layout = ctx
                        .text()
                        .new_text_layout(text.clone())
                        .font(FontFamily::MONOSPACE, *size)
                        .text_color(to_color(*color))
                        .build();
                    match layout {
                        Ok(layout) => ctx.draw_text(&layout, (position[0], position[1])),
                        Err(err) => log::warn!("skipping label {:?}: {}", text, err),
                    }
                }
            }
        }
    }
}

/// Opens the animation window and runs until it is closed
pub fn run(settings: &Settings) -> Result<(), AppError> {
    let main_window = WindowDesc::new(TransformWidget::new(settings.interval))
        .title("Matrix Transformations with Linear Algebra")
        .window_size((settings.viewport.width, settings.viewport.height))
        .resizable(false);

    let mut initial_state = AppState::new(settings.speeds);
    initial_state.debug = settings.debug;

    log::info!("window frontend started, interval {:?}", settings.interval);
    AppLauncher::with_window(main_window).launch(initial_state)?;
    log::info!("window closed");

    Ok(())
}
