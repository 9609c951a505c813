use std::fmt::Write;

use flowdraw_layout::{ARROW_HALF_WIDTH, ARROW_LENGTH, ArrowMarker, EdgePath, Outline};
use flowdraw_model::Point;

use crate::{DisplayList, DrawCommand};

pub fn render_svg(list: &DisplayList) -> String {
    let mut out = String::new();
    let vp = list.viewport;
    let _ = writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"{} {} {} {}\">",
        num(vp.width),
        num(vp.height),
        num(vp.x),
        num(vp.y),
        num(vp.width),
        num(vp.height)
    );
    write_markers(&mut out);

    for command in &list.commands {
        write_command(&mut out, command);
    }

    let _ = writeln!(out, "</svg>");
    out
}

fn write_markers(out: &mut String) {
    let _ = writeln!(out, "<defs>");
    for marker in ArrowMarker::ALL {
        let _ = writeln!(
            out,
            "  <marker id=\"{}\" markerWidth=\"{}\" markerHeight=\"{}\" refX=\"{}\" refY=\"{}\" orient=\"auto\"><polygon points=\"0 0, {} {}, 0 {}\" fill=\"{}\"/></marker>",
            marker.id(),
            num(ARROW_LENGTH),
            num(ARROW_HALF_WIDTH * 2.0),
            num(ARROW_LENGTH),
            num(ARROW_HALF_WIDTH),
            num(ARROW_LENGTH),
            num(ARROW_HALF_WIDTH),
            num(ARROW_HALF_WIDTH * 2.0),
            marker.color()
        );
    }
    let _ = writeln!(out, "</defs>");
}

fn write_command(out: &mut String, command: &DrawCommand) {
    match command {
        DrawCommand::GridLine {
            from,
            to,
            color,
            width,
        } => {
            let _ = writeln!(
                out,
                "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
                num(from.x),
                num(from.y),
                num(to.x),
                num(to.y),
                color,
                num(*width)
            );
        }
        DrawCommand::HitStroke { path, width, .. } => {
            let _ = writeln!(
                out,
                "<path d=\"{}\" fill=\"none\" stroke=\"transparent\" stroke-width=\"{}\"/>",
                path_data(path),
                num(*width)
            );
        }
        DrawCommand::EdgeStroke {
            path,
            color,
            width,
            dash,
            marker,
        } => {
            let dash = match dash {
                Some([on, off]) => format!(" stroke-dasharray=\"{},{}\"", num(*on), num(*off)),
                None => String::new(),
            };
            let _ = writeln!(
                out,
                "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"{} marker-end=\"url(#{})\"/>",
                path_data(path),
                escape_xml(color),
                num(*width),
                dash,
                marker.id()
            );
        }
        DrawCommand::EdgeLabel {
            text,
            anchor,
            backing,
            size,
            color,
        } => {
            let _ = writeln!(
                out,
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#FFFFFF\"/>",
                num(backing.x),
                num(backing.y),
                num(backing.width),
                num(backing.height)
            );
            let _ = writeln!(
                out,
                "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"{}\" fill=\"{}\">{}</text>",
                num(anchor.x),
                num(anchor.y),
                num(*size),
                color,
                escape_xml(text)
            );
        }
        DrawCommand::NodeShape { outline, fill, .. } => {
            write_outline(out, outline, &format!("fill=\"{}\"", escape_xml(fill)));
        }
        DrawCommand::Ring {
            outline,
            color,
            width,
        } => {
            write_outline(
                out,
                outline,
                &format!(
                    "fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"",
                    color,
                    num(*width)
                ),
            );
        }
        DrawCommand::NodeLabel {
            lines,
            center_x,
            first_baseline,
            line_step,
            size,
            color,
        } => {
            let _ = write!(
                out,
                "<text text-anchor=\"middle\" font-size=\"{}\" fill=\"{}\">",
                num(*size),
                color
            );
            for (index, line) in lines.iter().enumerate() {
                let _ = write!(
                    out,
                    "<tspan x=\"{}\" y=\"{}\">{}</tspan>",
                    num(*center_x),
                    num(first_baseline + line_step * index as f64),
                    escape_xml(line)
                );
            }
            let _ = writeln!(out, "</text>");
        }
        DrawCommand::ToolBadge {
            center,
            radius,
            color,
            tooltip,
        } => {
            let _ = writeln!(
                out,
                "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"><title>{}</title></circle>",
                num(center.x),
                num(center.y),
                num(*radius),
                color,
                escape_xml(tooltip)
            );
        }
        DrawCommand::DeleteButton {
            center,
            radius,
            color,
            ..
        } => {
            let _ = writeln!(
                out,
                "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\" stroke=\"white\" stroke-width=\"1.5\"/>",
                num(center.x),
                num(center.y),
                num(*radius),
                color
            );
        }
    }
}

fn write_outline(out: &mut String, outline: &Outline, paint: &str) {
    match outline {
        Outline::RoundedRect { rect, radius } => {
            let _ = writeln!(
                out,
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{}\" {}/>",
                num(rect.x),
                num(rect.y),
                num(rect.width),
                num(rect.height),
                num(*radius),
                paint
            );
        }
        Outline::Ellipse { rect } => {
            let center = rect.center();
            let _ = writeln!(
                out,
                "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" {}/>",
                num(center.x),
                num(center.y),
                num(rect.width / 2.0),
                num(rect.height / 2.0),
                paint
            );
        }
        Outline::Polygon { points } => {
            let points = points
                .iter()
                .map(|p| format!("{},{}", num(p.x), num(p.y)))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = writeln!(out, "<polygon points=\"{}\" {}/>", points, paint);
        }
    }
}

fn path_data(path: &EdgePath) -> String {
    let pt = |p: Point| format!("{} {}", num(p.x), num(p.y));
    match *path {
        EdgePath::Line { start, end } => format!("M {} L {}", pt(start), pt(end)),
        EdgePath::Quadratic {
            start,
            control,
            end,
        } => format!("M {} Q {} {}", pt(start), pt(control), pt(end)),
        EdgePath::Cubic {
            start,
            cp1,
            cp2,
            end,
        } => format!("M {} C {}, {}, {}", pt(start), pt(cp1), pt(cp2), pt(end)),
    }
}

fn num(value: f64) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
