//! egui layout for rendered decorations
//!
//! Turns a [`Rendered`] buffer into a [`LayoutJob`] whose text is the buffer
//! itself, so it can back a `TextEdit` layouter without shifting cursor
//! positions.

use super::styles::{DecorationStyle, DecorationStyles};
use crate::decorations::{DecorationTag, Rendered, Segment};
use egui::text::LayoutJob;
use egui::{FontId, Stroke, TextFormat};

/// Build a layout job for a rendered buffer.
///
/// Nested spans start from their parent's format and apply their own style
/// on top of it.
pub fn layout_job(
    rendered: &Rendered<'_, DecorationTag>,
    styles: &DecorationStyles,
    font_size: f32,
) -> LayoutJob {
    let mut job = LayoutJob::default();
    let base = TextFormat {
        font_id: FontId::proportional(font_size),
        color: styles.text,
        ..Default::default()
    };
    append_segments(&mut job, &rendered.segments, styles, &base, font_size);
    job
}

/// Same as [`layout_job`] but wrapping at `wrap_width`.
pub fn layout_job_wrapped(
    rendered: &Rendered<'_, DecorationTag>,
    styles: &DecorationStyles,
    font_size: f32,
    wrap_width: f32,
) -> LayoutJob {
    let mut job = layout_job(rendered, styles, font_size);
    job.wrap.max_width = wrap_width;
    job
}

fn append_segments(
    job: &mut LayoutJob,
    segments: &[Segment<'_, DecorationTag>],
    styles: &DecorationStyles,
    format: &TextFormat,
    base_size: f32,
) {
    for segment in segments {
        match segment {
            Segment::Text(text) => job.append(text, 0.0, format.clone()),
            Segment::Span(span) => {
                let style = styles.get(&span.tag.kind);
                let nested = apply_style(format, &style, base_size);
                append_segments(job, &span.children, styles, &nested, base_size);
            }
        }
    }
}

fn apply_style(parent: &TextFormat, style: &DecorationStyle, base_size: f32) -> TextFormat {
    let mut format = parent.clone();

    if let Some(scale) = style.size_scale {
        format.font_id.size = base_size * scale;
    }
    if style.monospace {
        format.font_id = FontId::monospace(format.font_id.size);
    }
    if let Some(color) = style.color {
        format.color = color;
    }
    if let Some(background) = style.background {
        format.background = background;
    }
    if style.italics {
        format.italics = true;
    }
    if style.underline {
        format.underline = Stroke::new(1.0, format.color);
    }
    if style.strikethrough {
        format.strikethrough = Stroke::new(1.0, format.color);
    }

    format
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DecoratorTable;
    use crate::decorations::{RangeNode, RangeTree};
    use egui::{Color32, FontFamily};

    #[test]
    fn test_job_text_is_buffer() {
        let registry = DecoratorTable::markdown().compile().unwrap();
        let buffer = "# Title\nsome **bold `code`** and [a](b) _it_";
        let job = layout_job(&registry.render(buffer), &DecorationStyles::light(), 14.0);
        assert_eq!(job.text, buffer);
    }

    #[test]
    fn test_sections_follow_segments() {
        let buffer = "a **b `c`** d";
        let mut tree = RangeTree::for_buffer(buffer);
        assert!(tree.try_insert(RangeNode::new(2, 11, DecorationTag::new("bold"), true)));
        assert!(tree.try_insert(RangeNode::new(6, 9, DecorationTag::new("code"), false)));

        let job = layout_job(&tree.render(buffer), &DecorationStyles::light(), 14.0);
        let ranges: Vec<_> = job.sections.iter().map(|s| s.byte_range.clone()).collect();
        assert_eq!(ranges, vec![0..2, 2..6, 6..9, 9..11, 11..13]);

        let code = &job.sections[2].format;
        assert_eq!(code.font_id.family, FontFamily::Monospace);
        assert_eq!(job.sections[0].format.font_id.family, FontFamily::Proportional);
    }

    #[test]
    fn test_nested_inherits_parent() {
        let buffer = "[**x**](u)";
        let mut tree = RangeTree::for_buffer(buffer);
        let link = DecorationTag::new("link").with_payload("u");
        assert!(tree.try_insert(RangeNode::new(0, buffer.len(), link, false)));
        assert!(tree.try_insert(RangeNode::new(1, 6, DecorationTag::new("italic"), true)));

        let styles = DecorationStyles::light();
        let job = layout_job(&tree.render(buffer), &styles, 14.0);
        let inner = &job.sections[1].format;
        assert!(inner.italics);
        assert_eq!(inner.color, styles.get("link").color.unwrap());
        assert_ne!(inner.underline, Stroke::NONE);
    }

    #[test]
    fn test_bold_inside_link_keeps_link_color() {
        let registry = DecoratorTable::markdown().compile().unwrap();
        let buffer = "[**x**](u)";
        let styles = DecorationStyles::dark();
        let job = layout_job(&registry.render(buffer), &styles, 14.0);

        let bold = job
            .sections
            .iter()
            .find(|s| &buffer[s.byte_range.clone()] == "**x**")
            .expect("bold section");
        assert_eq!(bold.format.color, styles.get("link").color.unwrap());
        assert_ne!(bold.format.underline, Stroke::NONE);
    }

    #[test]
    fn test_heading_scales_font() {
        let registry = DecoratorTable::markdown().compile().unwrap();
        let job = layout_job(&registry.render("# H"), &DecorationStyles::light(), 10.0);
        assert_eq!(job.sections.len(), 1);
        assert!((job.sections[0].format.font_id.size - 13.0).abs() < 1e-4);
    }

    #[test]
    fn test_unknown_kind_keeps_parent_format() {
        let buffer = "xyz";
        let mut tree = RangeTree::for_buffer(buffer);
        assert!(tree.try_insert(RangeNode::new(0, 3, DecorationTag::new("custom"), false)));

        let styles = DecorationStyles::plain(Color32::RED);
        let job = layout_job(&tree.render(buffer), &styles, 12.0);
        assert_eq!(job.sections[0].format.color, Color32::RED);
        assert_eq!(job.sections[0].format.font_id, FontId::proportional(12.0));
    }

    #[test]
    fn test_wrapped() {
        let registry = DecoratorTable::markdown().compile().unwrap();
        let job = layout_job_wrapped(&registry.render("x"), &DecorationStyles::dark(), 12.0, 200.0);
        assert_eq!(job.wrap.max_width, 200.0);
    }
}
