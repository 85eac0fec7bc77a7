//! Layout plan: positioned text and images on fixed-size pages
//!
//! Coordinates are millimetres from the top-left corner of the page. The
//! writer flips them into PDF space.

use super::geometry::{PageGeometry, TextStyle};
use crate::export::images::LoadedImage;
use tracing::debug;

/// A line of text placed on a page
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    /// Top of the line box
    pub y: f32,
    pub text: String,
    pub style: TextStyle,
}

/// An image placed on a page
#[derive(Debug, Clone)]
pub struct PlacedImage {
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// 1-based position in the record's image list
    pub index: usize,
    pub image: LoadedImage,
}

/// Content element on a page
#[derive(Debug, Clone)]
pub enum Element {
    Text(TextRun),
    Image(PlacedImage),
}

/// One page of the layout, elements in reading order
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub elements: Vec<Element>,
}

impl Page {
    /// Text runs on this page
    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text(run) => Some(run),
            Element::Image(_) => None,
        })
    }

    /// Images on this page
    pub fn images(&self) -> impl Iterator<Item = &PlacedImage> {
        self.elements.iter().filter_map(|e| match e {
            Element::Image(image) => Some(image),
            Element::Text(_) => None,
        })
    }
}

/// Complete layout of a document
#[derive(Debug, Clone)]
pub struct DocumentLayout {
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
}

impl DocumentLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All elements in reading order
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.pages.iter().flat_map(|p| p.elements.iter())
    }

    /// All text in reading order
    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.pages.iter().flat_map(|p| p.texts())
    }

    /// Text strings in reading order
    pub fn text_lines(&self) -> Vec<&str> {
        self.texts().map(|t| t.text.as_str()).collect()
    }

    /// All images in reading order
    pub fn images(&self) -> impl Iterator<Item = &PlacedImage> {
        self.pages.iter().flat_map(|p| p.images())
    }
}

/// Places content top to bottom with a running cursor, breaking pages as
/// needed
#[derive(Debug)]
pub struct Composer {
    geometry: PageGeometry,
    pages: Vec<Page>,
    y: f32,
}

impl Composer {
    pub fn new(geometry: PageGeometry) -> Self {
        let y = geometry.top();
        Self {
            geometry,
            pages: vec![Page::default()],
            y,
        }
    }

    /// Current cursor position
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Distance between the cursor and the bottom edge of the page
    pub fn remaining_to_page_edge(&self) -> f32 {
        self.geometry.page_height - self.y
    }

    /// Start a new page and reset the cursor
    pub fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.y = self.geometry.top();
        debug!(page = self.pages.len(), "Started new page");
    }

    /// Break the page if a block of `height` would not fit below the cursor.
    ///
    /// A block taller than the writable height is placed at the top of a page
    /// rather than breaking forever.
    pub fn ensure_space(&mut self, height: f32) {
        if self.y + height > self.geometry.bottom() && self.y > self.geometry.top() {
            self.new_page();
        }
    }

    /// Move the cursor down without placing anything
    pub fn advance(&mut self, amount: f32) {
        self.y += amount;
    }

    fn current_page(&mut self) -> &mut Page {
        // pages always holds at least the first page
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Place a single line at the left margin and advance by its line height
    pub fn line(&mut self, text: impl Into<String>, style: TextStyle) {
        let x = self.geometry.margin;
        self.line_at(x, text, style);
    }

    /// Place a single line at `x` and advance by its line height
    fn line_at(&mut self, x: f32, text: impl Into<String>, style: TextStyle) {
        self.ensure_space(style.line_height);
        self.place_text(x, text, style);
        self.y += style.line_height;
    }

    /// Place several runs on the same line and advance once
    pub fn columns(&mut self, runs: Vec<(f32, String, TextStyle)>) {
        let height = runs
            .iter()
            .map(|(_, _, style)| style.line_height)
            .fold(0.0, f32::max);
        self.ensure_space(height);
        for (x, text, style) in runs {
            self.place_text(x, text, style);
        }
        self.y += height;
    }

    fn place_text(&mut self, x: f32, text: impl Into<String>, style: TextStyle) {
        let y = self.y;
        self.current_page().elements.push(Element::Text(TextRun {
            x,
            y,
            text: text.into(),
            style,
        }));
    }

    /// Place an image at the left margin in the fixed square footprint
    pub fn image(&mut self, index: usize, image: LoadedImage) {
        let size = self.geometry.image_size;
        self.ensure_space(size);

        let x = self.geometry.margin;
        let y = self.y;
        self.current_page().elements.push(Element::Image(PlacedImage {
            x,
            y,
            width: size,
            height: size,
            index,
            image,
        }));
        self.y += size + self.geometry.image_gap;
    }

    /// Finish composing
    pub fn finish(self) -> DocumentLayout {
        DocumentLayout {
            geometry: self.geometry,
            pages: self.pages,
        }
    }
}
