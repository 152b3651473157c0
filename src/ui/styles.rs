//! Visual styles for decoration kinds
//!
//! A [`DecorationStyle`] only says what a decoration changes. Anything left
//! as `None`/`false` is inherited from the enclosing span, so bold inside a
//! link keeps the link color.

use egui::Color32;
use std::collections::HashMap;

/// What a decoration changes about the text it covers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DecorationStyle {
    /// Text color
    pub color: Option<Color32>,
    /// Background fill
    pub background: Option<Color32>,
    /// Render with the monospace font
    pub monospace: bool,
    /// Scale of the font size relative to the base size
    pub size_scale: Option<f32>,
    /// Slant the text
    pub italics: bool,
    /// Underline in the text color
    pub underline: bool,
    /// Strike through in the text color
    pub strikethrough: bool,
}

impl DecorationStyle {
    /// Set the text color.
    pub fn color(mut self, color: Color32) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the background fill.
    pub fn background(mut self, background: Color32) -> Self {
        self.background = Some(background);
        self
    }

    /// Switch to the monospace font.
    pub fn monospace(mut self) -> Self {
        self.monospace = true;
        self
    }

    /// Scale the font relative to the base size.
    pub fn size_scale(mut self, scale: f32) -> Self {
        self.size_scale = Some(scale);
        self
    }

    /// Slant the text.
    pub fn italics(mut self) -> Self {
        self.italics = true;
        self
    }

    /// Underline the text.
    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Strike through the text.
    pub fn strikethrough(mut self) -> Self {
        self.strikethrough = true;
        self
    }
}

/// Decoration styles keyed by tag kind, plus the base text color.
#[derive(Debug, Clone, PartialEq)]
pub struct DecorationStyles {
    /// Color of undecorated text
    pub text: Color32,
    styles: HashMap<String, DecorationStyle>,
}

impl Default for DecorationStyles {
    fn default() -> Self {
        Self::light()
    }
}

impl DecorationStyles {
    /// An empty table: everything renders as plain text.
    pub fn plain(text: Color32) -> Self {
        Self {
            text,
            styles: HashMap::new(),
        }
    }

    /// Styles for the built-in markdown decorators on a light background.
    pub fn light() -> Self {
        Self::markdown(
            Color32::from_rgb(30, 30, 30),
            Palette {
                heading: Color32::from_rgb(0, 100, 180),
                link: Color32::from_rgb(0, 100, 180),
                code: Color32::from_rgb(80, 80, 80),
                code_bg: Color32::from_rgb(233, 236, 239),
                muted: Color32::from_rgb(120, 120, 120),
            },
        )
    }

    /// Styles for the built-in markdown decorators on a dark background.
    pub fn dark() -> Self {
        Self::markdown(
            Color32::from_rgb(220, 220, 220),
            Palette {
                heading: Color32::from_rgb(100, 180, 255),
                link: Color32::from_rgb(100, 180, 255),
                code: Color32::from_rgb(200, 200, 150),
                code_bg: Color32::from_rgb(35, 39, 46),
                muted: Color32::from_rgb(140, 140, 140),
            },
        )
    }

    /// Pick [`light`](Self::light) or [`dark`](Self::dark) to match egui visuals.
    pub fn for_visuals(visuals: &egui::Visuals) -> Self {
        if visuals.dark_mode {
            Self::dark()
        } else {
            Self::light()
        }
    }

    fn markdown(text: Color32, p: Palette) -> Self {
        let mut styles = Self::plain(text);
        styles
            .set("heading", DecorationStyle::default().color(p.heading).size_scale(1.3))
            // No font weights in egui; bold keeps the enclosing format.
            .set("bold", DecorationStyle::default())
            .set("italic", DecorationStyle::default().italics())
            .set("strikethrough", DecorationStyle::default().strikethrough())
            .set(
                "code",
                DecorationStyle::default()
                    .color(p.code)
                    .background(p.code_bg)
                    .monospace(),
            )
            .set("link", DecorationStyle::default().color(p.link).underline())
            .set("reference", DecorationStyle::default().color(p.link).underline())
            .set("image", DecorationStyle::default().color(p.muted).italics());
        styles
    }

    /// Set the style for a tag kind, replacing any previous one.
    pub fn set(&mut self, kind: impl Into<String>, style: DecorationStyle) -> &mut Self {
        self.styles.insert(kind.into(), style);
        self
    }

    /// The style for a tag kind; unknown kinds change nothing.
    pub fn get(&self, kind: &str) -> DecorationStyle {
        self.styles.get(kind).copied().unwrap_or_default()
    }
}

struct Palette {
    heading: Color32,
    link: Color32,
    code: Color32,
    code_bg: Color32,
    muted: Color32,
}
