//! Page geometry and typography for the PDF layout

use crate::config::PdfConfig;

/// Points to millimetres
pub const PT_TO_MM: f32 = 25.4 / 72.0;

/// Font faces available to the layout (the base-14 Helvetica family)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFace {
    Regular,
    Bold,
    Italic,
}

/// Fill colour of a text run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColor {
    Normal,
    Muted,
}

impl TextColor {
    /// RGB components in 0..=1
    pub fn rgb(&self) -> (f32, f32, f32) {
        match self {
            TextColor::Normal => (0.0, 0.0, 0.0),
            TextColor::Muted => (0.45, 0.45, 0.45),
        }
    }
}

/// Font, size and colour of one kind of line, plus the vertical space it takes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub face: FontFace,
    /// Font size in points
    pub size: f32,
    pub color: TextColor,
    /// Vertical advance in millimetres
    pub line_height: f32,
}

impl TextStyle {
    const fn new(face: FontFace, size: f32, color: TextColor, line_height: f32) -> Self {
        Self {
            face,
            size,
            color,
            line_height,
        }
    }

    pub const TITLE: TextStyle = TextStyle::new(FontFace::Bold, 20.0, TextColor::Normal, 12.0);
    pub const TIMESTAMP: TextStyle = TextStyle::new(FontFace::Regular, 9.0, TextColor::Muted, 10.0);
    pub const SECTION: TextStyle = TextStyle::new(FontFace::Bold, 13.0, TextColor::Normal, 8.0);
    pub const BODY: TextStyle = TextStyle::new(FontFace::Regular, 11.0, TextColor::Normal, 6.0);
    pub const FIELD_LABEL: TextStyle = TextStyle::new(FontFace::Bold, 11.0, TextColor::Normal, 7.0);
    pub const FIELD_VALUE: TextStyle = TextStyle::new(FontFace::Regular, 11.0, TextColor::Normal, 7.0);
    pub const FILTER: TextStyle = TextStyle::new(FontFace::Regular, 10.0, TextColor::Normal, 5.5);
    pub const PLACEHOLDER: TextStyle = TextStyle::new(FontFace::Italic, 10.0, TextColor::Muted, 7.0);

    /// Distance from the top of the line box to the baseline, in millimetres
    pub fn ascent(&self) -> f32 {
        self.size * PT_TO_MM * 0.8
    }
}

/// Page dimensions and spacing, in millimetres
#[derive(Debug, Clone, PartialEq)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    /// Offset of a scalar field's value from its label
    pub value_column: f32,
    /// Minimum space between a scalar field's label and its value
    pub column_gap: f32,
    /// Space after a prompt, field block, or filter list
    pub section_gap: f32,
    /// Edge of the square image footprint
    pub image_size: f32,
    /// Space below each image
    pub image_gap: f32,
    /// The images section starts on a fresh page when the cursor is within
    /// this distance of the bottom edge
    pub images_threshold: f32,
}

impl PageGeometry {
    /// Build geometry from the PDF configuration
    pub fn from_config(config: &PdfConfig) -> Self {
        let (page_width, page_height) = config.page_size.dimensions();
        Self {
            page_width,
            page_height,
            margin: config.margin,
            value_column: 40.0,
            column_gap: 2.0,
            section_gap: 6.0,
            image_size: config.image_size,
            image_gap: 10.0,
            images_threshold: 50.0,
        }
    }

    /// Cursor position at the top of every page
    pub fn top(&self) -> f32 {
        self.margin
    }

    /// Lowest position content may reach
    pub fn bottom(&self) -> f32 {
        self.page_height - self.margin
    }

    pub fn writable_width(&self) -> f32 {
        self.page_width - self.margin * 2.0
    }

    pub fn writable_height(&self) -> f32 {
        self.bottom() - self.top()
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::from_config(&PdfConfig::default())
    }
}
