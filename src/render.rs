use crate::math::{compose_matrix, AffineMatrix};
use crate::state::{AnimatedShape, AppState, ShapeId};

/// Color as `[r, g, b, a]`
pub type Rgba = [u8; 4];

pub const WHITE: Rgba = [255, 255, 255, 255];

/// Corners of the square every shape starts from, before transforming
pub const SQUARE: [[f64; 2]; 4] = [[0.0, 0.0], [50.0, 0.0], [50.0, 50.0], [0.0, 50.0]];

/// Length of the rotation indicator at scale 1.0
pub const INDICATOR_LENGTH: f64 = 70.0;

/// Fill alpha for the inside of a square
const FILL_ALPHA: u8 = 77;

const TEXT_SIZE: f64 = 14.0;
const LABEL_SIZE: f64 = 12.0;
const LINE_SPACING: f64 = 20.0;

/// A single primitive, in pixel coordinates
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Closed polygon, filled then outlined
    Polygon {
        points: Vec<[f64; 2]>,
        stroke: Rgba,
        fill: Rgba,
        stroke_width: f64,
    },
    Line {
        from: [f64; 2],
        to: [f64; 2],
        color: Rgba,
        dashed: bool,
    },
    /// Text whose top-left corner sits at `position`
    Text {
        position: [f64; 2],
        text: String,
        color: Rgba,
        size: f64,
    },
}

impl DrawCommand {
    fn text(x: f64, y: f64, text: impl Into<String>, color: Rgba, size: f64) -> Self {
        DrawCommand::Text {
            position: [x, y],
            text: text.into(),
            color,
            size,
        }
    }

    /// Moves the command by `(dx, dy)`
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        let shift = |p: [f64; 2]| [p[0] + dx, p[1] + dy];
        match self {
            DrawCommand::Polygon {
                points,
                stroke,
                fill,
                stroke_width,
            } => DrawCommand::Polygon {
                points: points.into_iter().map(shift).collect(),
                stroke,
                fill,
                stroke_width,
            },
            DrawCommand::Line {
                from,
                to,
                color,
                dashed,
            } => DrawCommand::Line {
                from: shift(from),
                to: shift(to),
                color,
                dashed,
            },
            DrawCommand::Text {
                position,
                text,
                color,
                size,
            } => DrawCommand::Text {
                position: shift(position),
                text,
                color,
                size,
            },
        }
    }
}

/// Everything drawn for one shape on one frame
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeDrawing {
    /// Square, rotation indicator and angle label, relative to the scene origin
    pub geometry: Vec<DrawCommand>,
    /// The 3x3 matrix, boxed, one string per line
    pub matrix_text: [String; 5],
    /// Scale and position summary
    pub info: String,
}

/// The display size the frame is laid out for
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// A complete frame, ready for a frontend to paint in order
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub viewport: Viewport,
    pub commands: Vec<DrawCommand>,
}

/// Extra information shown when the debug overlay is enabled
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DebugInfo {
    pub fps: f64,
}

/// Brightens a color for the rotation indicator by scaling each channel by
/// 1/0.7, the usual AWT `brighter()` rule. Zero channels stay zero unless the
/// color is black, which becomes a dark grey.
pub fn brighten(color: Rgba) -> Rgba {
    const FACTOR: f64 = 0.7;
    // Smallest channel value that still grows when scaled
    let floor = (1.0 / (1.0 - FACTOR)) as u8;
    let [r, g, b, a] = color;
    if r == 0 && g == 0 && b == 0 {
        return [floor, floor, floor, a];
    }
    let lift = |c: u8| {
        if c == 0 {
            0
        } else {
            (c.max(floor) as f64 / FACTOR).min(255.0) as u8
        }
    };
    [lift(r), lift(g), lift(b), a]
}

/// Builds a shape's matrix from its current parameters
pub fn shape_matrix(shape: &AnimatedShape) -> AffineMatrix {
    compose_matrix(shape.scale, shape.angle, shape.translate_x, shape.translate_y)
}

/// Formats a matrix as five boxed lines, two decimal places
pub fn matrix_rows(matrix: &AffineMatrix) -> [String; 5] {
    let [a, b, c, d, e, f] = matrix.coefficients();
    [
        "┌                        ┐".to_string(),
        format!("│ {:6.2}  {:6.2}  {:6.2} │", a, c, e),
        format!("│ {:6.2}  {:6.2}  {:6.2} │", b, d, f),
        format!("│ {:6.2}  {:6.2}  {:6.2} │", 0.0, 0.0, 1.0),
        "└                        ┘".to_string(),
    ]
}

/// Draws a shape with the given transform
pub fn render(shape: &AnimatedShape, matrix: &AffineMatrix) -> ShapeDrawing {
    let color = shape.id.rgba();
    let fill = [color[0], color[1], color[2], FILL_ALPHA];

    let points = SQUARE
        .iter()
        .map(|&corner| matrix.transform_point(corner))
        .collect();

    let origin = [shape.translate_x, shape.translate_y];
    let (sin_a, cos_a) = shape.angle.to_radians().sin_cos();
    let length = INDICATOR_LENGTH * shape.scale;
    let tip = [origin[0] + length * cos_a, origin[1] + length * sin_a];

    let geometry = vec![
        DrawCommand::Polygon {
            points,
            stroke: color,
            fill,
            stroke_width: 2.0,
        },
        DrawCommand::Line {
            from: origin,
            to: tip,
            color: brighten(color),
            dashed: true,
        },
        DrawCommand::text(
            origin[0] + 10.0,
            origin[1] - 10.0 - LABEL_SIZE,
            format!("{:.0}°", shape.angle),
            WHITE,
            LABEL_SIZE,
        ),
    ];

    ShapeDrawing {
        geometry,
        matrix_text: matrix_rows(matrix),
        info: format!(
            "{}: Scale={:.2}, Position=({:.0},{:.0})",
            shape.id.label(),
            shape.scale,
            shape.translate_x,
            shape.translate_y
        ),
    }
}

fn matrix_panel(drawing: &ShapeDrawing, id: ShapeId, x: f64, y: f64) -> Vec<DrawCommand> {
    let color = id.rgba();
    let mut commands = vec![DrawCommand::text(
        x,
        y,
        format!("{} Square Matrix:", id.label()),
        color,
        TEXT_SIZE,
    )];
    for (row, line) in drawing.matrix_text.iter().enumerate() {
        commands.push(DrawCommand::text(
            x,
            y + LINE_SPACING * (row + 1) as f64,
            line.clone(),
            color,
            TEXT_SIZE,
        ));
    }
    let legend = [
        "Where:",
        "• Top-left 2x2: Rotation + Scale",
        "• Right column: Translation (x,y)",
    ];
    for (row, line) in legend.iter().enumerate() {
        commands.push(DrawCommand::text(
            x,
            y + LINE_SPACING * (row + 6) as f64,
            *line,
            color,
            LABEL_SIZE,
        ));
    }
    commands
}

/// Lays out a full frame: both squares around the viewport centre, the
/// matrix panels down the left edge and the status lines along the bottom.
///
/// Matrices are recomputed here from the current shape parameters.
pub fn compose_frame(state: &AppState, viewport: Viewport, debug: DebugInfo) -> Frame {
    let (cx, cy) = (viewport.width / 2.0, viewport.height / 2.0);
    let mut commands = Vec::new();
    let mut drawings = Vec::with_capacity(ShapeId::ALL.len());

    for id in ShapeId::ALL {
        let shape = state.shape(id);
        let matrix = shape_matrix(shape);
        debug_assert!(matrix.is_finite(), "non-finite matrix for {:?}", shape);
        let drawing = render(shape, &matrix);
        commands.extend(
            drawing
                .geometry
                .iter()
                .cloned()
                .map(|command| command.translated(cx, cy)),
        );
        drawings.push((id, drawing));
    }

    commands.push(DrawCommand::text(
        20.0,
        6.0,
        format!("Speed: {:.1}x", state.speeds.rotation),
        WHITE,
        TEXT_SIZE,
    ));

    for (index, (id, drawing)) in drawings.iter().enumerate() {
        let panel_y = 46.0 + 180.0 * index as f64;
        commands.extend(matrix_panel(drawing, *id, 20.0, panel_y));

        let info_y = viewport.height - 54.0 + LINE_SPACING * index as f64;
        commands.push(DrawCommand::text(
            20.0,
            info_y,
            drawing.info.clone(),
            WHITE,
            TEXT_SIZE,
        ));
    }

    if state.debug {
        let x = viewport.width - 240.0;
        let lines = [
            format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            format!("Ticks: {}", state.ticks),
            format!("FPS: {:.2}", debug.fps),
        ];
        for (row, line) in lines.into_iter().enumerate() {
            let y = 10.0 + LINE_SPACING * row as f64;
            commands.push(DrawCommand::text(x, y, line, WHITE, LABEL_SIZE));
        }
    }

    if state.paused {
        let size = 36.0;
        let text = "Paused";
        // Roughly centred; frontends measure text differently
        let width = text.chars().count() as f64 * size * 0.6;
        commands.push(DrawCommand::text(
            (viewport.width - width) / 2.0,
            (viewport.height - size) / 2.0,
            text,
            WHITE,
            size,
        ));
    }

    Frame { viewport, commands }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AnimationSpeeds;

    fn texts(frame: &Frame) -> Vec<String> {
        frame
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn identity_matrix_text() {
        let rows = matrix_rows(&AffineMatrix::IDENTITY);
        assert_eq!(rows[1], "│   1.00    0.00    0.00 │");
        assert_eq!(rows[2], "│   0.00    1.00    0.00 │");
        assert_eq!(rows[3], "│   0.00    0.00    1.00 │");
    }

    #[test]
    fn translation_column_is_rightmost() {
        let rows = matrix_rows(&AffineMatrix::translation(12.5, -150.0));
        assert_eq!(rows[1], "│   1.00    0.00   12.50 │");
        assert_eq!(rows[2], "│   0.00    1.00  -150.00 │");
    }

    #[test]
    fn polygon_corners_follow_the_matrix() {
        let shape = AnimatedShape::new(ShapeId::Red);
        let matrix = shape_matrix(&shape);
        let drawing = render(&shape, &matrix);
        match &drawing.geometry[0] {
            DrawCommand::Polygon { points, .. } => {
                assert_eq!(points.len(), 4);
                for (point, corner) in points.iter().zip(SQUARE.iter()) {
                    assert_eq!(*point, matrix.transform_point(*corner));
                }
            }
            other => panic!("expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn indicator_length_scales() {
        let mut shape = AnimatedShape::new(ShapeId::Blue);
        shape.scale = 0.8;
        shape.angle = 30.0;
        let drawing = render(&shape, &shape_matrix(&shape));
        match drawing.geometry[1] {
            DrawCommand::Line { from, to, dashed, .. } => {
                let length = ((to[0] - from[0]).powi(2) + (to[1] - from[1]).powi(2)).sqrt();
                assert!((length - 56.0).abs() < 1e-9);
                assert_eq!(from, [shape.translate_x, shape.translate_y]);
                assert!(dashed);
            }
            ref other => panic!("expected line, got {:?}", other),
        }
    }

    #[test]
    fn info_line_format() {
        let shape = AnimatedShape::new(ShapeId::Blue);
        let drawing = render(&shape, &shape_matrix(&shape));
        assert_eq!(drawing.info, "Blue: Scale=1.00, Position=(50,50)");
    }

    #[test]
    fn frame_contains_panels_and_status() {
        let state = AppState::new(AnimationSpeeds::default());
        let frame = compose_frame(&state, Viewport::default(), DebugInfo::default());
        let texts = texts(&frame);
        assert!(texts.contains(&"Speed: 6.0x".to_string()));
        assert!(texts.contains(&"Blue Square Matrix:".to_string()));
        assert!(texts.contains(&"Red Square Matrix:".to_string()));
        assert!(texts.contains(&"Red: Scale=1.50, Position=(150,150)".to_string()));
        assert!(!texts.iter().any(|t| t == "Paused"));
        assert!(!texts.iter().any(|t| t.starts_with("FPS")));
    }

    #[test]
    fn frame_matrices_are_current() {
        let mut state = AppState::new(AnimationSpeeds::default());
        state.tick();
        let frame = compose_frame(&state, Viewport::default(), DebugInfo::default());
        let blue = state.shape(ShapeId::Blue);
        let expected = matrix_rows(&shape_matrix(blue));
        let texts = texts(&frame);
        assert!(texts.contains(&expected[1]));
        assert!(texts.contains(&expected[2]));
    }

    #[test]
    fn shapes_are_centred_in_the_viewport() {
        let state = AppState::new(AnimationSpeeds::default());
        let viewport = Viewport {
            width: 400.0,
            height: 300.0,
        };
        let frame = compose_frame(&state, viewport, DebugInfo::default());
        let blue = state.shape(ShapeId::Blue);
        let corner = shape_matrix(blue).transform_point(SQUARE[0]);
        match &frame.commands[0] {
            DrawCommand::Polygon { points, .. } => {
                assert_eq!(points[0], [corner[0] + 200.0, corner[1] + 150.0]);
            }
            other => panic!("expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn overlays_follow_state_flags() {
        let mut state = AppState::new(AnimationSpeeds::default());
        state.toggle_debug();
        state.toggle_pause();
        let frame = compose_frame(&state, Viewport::default(), DebugInfo { fps: 99.5 });
        let texts = texts(&frame);
        assert!(texts.contains(&"Paused".to_string()));
        assert!(texts.contains(&"FPS: 99.50".to_string()));
        assert!(texts.contains(&"Ticks: 0".to_string()));
    }

    #[test]
    fn brighten_scales_channels_up() {
        assert_eq!(brighten([0, 0, 255, 255]), [0, 0, 255, 255]);
        assert_eq!(brighten([255, 0, 0, 255]), [255, 0, 0, 255]);
        assert_eq!(brighten([70, 1, 0, 128]), [100, 4, 0, 128]);
        assert_eq!(brighten([0, 0, 0, 255]), [3, 3, 3, 255]);
        assert_eq!(brighten(WHITE), WHITE);
    }
}
