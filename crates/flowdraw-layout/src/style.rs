use flowdraw_model::{Edge, EdgeKind, EdgeStyle};

pub const SELECTED_COLOR: &str = "#3B82F6";
pub const CONDITIONAL_COLOR: &str = "#F59E0B";
pub const DEFAULT_EDGE_COLOR: &str = "#6B7280";
pub const MULTI_SELECTED_COLOR: &str = "#F97316";
pub const EDGE_LABEL_COLOR: &str = "#374151";
pub const NODE_LABEL_COLOR: &str = "#FFFFFF";
pub const TOOL_DOT_COLOR: &str = "#22C55E";
pub const GRID_COLOR: &str = "#E5E7EB";
pub const BACKGROUND_COLOR: &str = "#FFFFFF";

pub const EDGE_WIDTH: f64 = 2.0;
pub const SELECTED_EDGE_WIDTH: f64 = 3.0;
pub const HIT_STROKE_WIDTH: f64 = 20.0;
pub const RING_WIDTH: f64 = 2.0;
pub const RING_OFFSET: f64 = 3.0;
pub const GRID_LINE_WIDTH: f64 = 0.5;

pub const EDGE_LABEL_SIZE: f64 = 11.0;
pub const EDGE_LABEL_RISE: f64 = 8.0;
pub const NODE_LABEL_SIZE: f64 = 12.0;
pub const NODE_LABEL_INSET: f64 = 8.0;
pub const NODE_LABEL_LINE_HEIGHT: f64 = 1.2;

pub const ROUNDED_CORNER_RADIUS: f64 = 8.0;
pub const RECT_CORNER_RADIUS: f64 = 4.0;
pub const TOOL_DOT_RADIUS: f64 = 6.0;
pub const TOOL_DOT_OFFSET: f64 = 2.0;

pub const ARROW_LENGTH: f64 = 10.0;
pub const ARROW_HALF_WIDTH: f64 = 3.5;

const CONDITIONAL_DASH: [f64; 2] = [8.0, 4.0];
const DASHED_DASH: [f64; 2] = [5.0, 5.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn parse_hex(text: &str) -> Option<Self> {
        let hex = text.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let mut out = [0u8; 3];
                for (slot, digit) in out.iter_mut().zip(hex.chars()) {
                    let value = digit.to_digit(16)? as u8;
                    *slot = value * 17;
                }
                Some(Self::opaque(out[0], out[1], out[2]))
            }
            6 => Some(Self::opaque(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            8 => Some(Self {
                r: channel(&hex[0..2])?,
                g: channel(&hex[2..4])?,
                b: channel(&hex[4..6])?,
                a: channel(&hex[6..8])?,
            }),
            _ => None,
        }
    }

    pub fn parse_or(text: &str, fallback: Rgba) -> Self {
        Self::parse_hex(text).unwrap_or(fallback)
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrowMarker {
    Gray,
    Orange,
    Blue,
}

impl ArrowMarker {
    pub fn id(self) -> &'static str {
        match self {
            ArrowMarker::Gray => "arrowhead-gray",
            ArrowMarker::Orange => "arrowhead-orange",
            ArrowMarker::Blue => "arrowhead-blue",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ArrowMarker::Gray => DEFAULT_EDGE_COLOR,
            ArrowMarker::Orange => CONDITIONAL_COLOR,
            ArrowMarker::Blue => SELECTED_COLOR,
        }
    }

    pub const ALL: [ArrowMarker; 3] = [ArrowMarker::Gray, ArrowMarker::Orange, ArrowMarker::Blue];
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeAppearance {
    pub stroke: String,
    pub width: f64,
    pub dash: Option<[f64; 2]>,
    pub marker: ArrowMarker,
}

pub fn edge_appearance(edge: &Edge, selected: bool) -> EdgeAppearance {
    let conditional = edge.kind == EdgeKind::Conditional;
    let (stroke, marker) = if selected {
        (SELECTED_COLOR.to_string(), ArrowMarker::Blue)
    } else if conditional {
        (CONDITIONAL_COLOR.to_string(), ArrowMarker::Orange)
    } else if edge.color.trim().is_empty() {
        (DEFAULT_EDGE_COLOR.to_string(), ArrowMarker::Gray)
    } else {
        (edge.color.clone(), ArrowMarker::Gray)
    };

    let dash = if conditional {
        Some(CONDITIONAL_DASH)
    } else if edge.style == EdgeStyle::Dashed {
        Some(DASHED_DASH)
    } else {
        None
    };

    EdgeAppearance {
        stroke,
        width: if selected {
            SELECTED_EDGE_WIDTH
        } else {
            EDGE_WIDTH
        },
        dash,
        marker,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Highlight {
    #[default]
    None,
    Selected,
    MultiSelected,
}

impl Highlight {
    pub fn ring_color(self) -> Option<&'static str> {
        match self {
            Highlight::None => None,
            Highlight::Selected => Some(SELECTED_COLOR),
            Highlight::MultiSelected => Some(MULTI_SELECTED_COLOR),
        }
    }
}
