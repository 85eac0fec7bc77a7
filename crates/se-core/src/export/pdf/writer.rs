//! Writes a layout plan to PDF bytes

use super::geometry::{FontFace, TextColor};
use super::layout::{DocumentLayout, Element, PlacedImage, TextRun};
use crate::error::{ExportError, Result};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Rgb,
};
use tracing::debug;

/// Resolution images are registered at before scaling to their footprint
const IMAGE_DPI: f32 = 300.0;

fn surface_error(what: &str, err: impl std::fmt::Debug) -> ExportError {
    ExportError::RenderingSurface(format!("{}: {:?}", what, err))
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl Fonts {
    fn register(doc: &PdfDocumentReference) -> Result<Self> {
        let add = |font: BuiltinFont| {
            doc.add_builtin_font(font)
                .map_err(|e| surface_error("failed to register font", e))
        };
        Ok(Self {
            regular: add(BuiltinFont::Helvetica)?,
            bold: add(BuiltinFont::HelveticaBold)?,
            italic: add(BuiltinFont::HelveticaOblique)?,
        })
    }

    fn get(&self, face: FontFace) -> &IndirectFontRef {
        match face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
            FontFace::Italic => &self.italic,
        }
    }
}

/// Serializes a [`DocumentLayout`] with printpdf
pub struct PdfWriter<'a> {
    title: &'a str,
}

impl<'a> PdfWriter<'a> {
    /// `title` becomes the document information title
    pub fn new(title: &'a str) -> Self {
        Self { title }
    }

    /// Render every page of `layout` and return the finished document
    pub fn write(&self, layout: &DocumentLayout) -> Result<Vec<u8>> {
        let geometry = &layout.geometry;
        let (width, height) = (Mm(geometry.page_width), Mm(geometry.page_height));

        let (doc, first_page, first_layer) = PdfDocument::new(self.title, width, height, "Layer 1");
        let fonts = Fonts::register(&doc)?;

        for (index, page) in layout.pages.iter().enumerate() {
            let (page_index, layer_index) = if index == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(width, height, format!("Layer {}", index + 1))
            };
            let layer = doc.get_page(page_index).get_layer(layer_index);

            for element in &page.elements {
                match element {
                    Element::Text(run) => self.write_text(&layer, &fonts, run, geometry.page_height),
                    Element::Image(image) => self.write_image(&layer, image, geometry.page_height),
                }
            }
        }

        let bytes = doc
            .save_to_bytes()
            .map_err(|e| surface_error("failed to assemble PDF", e))?;
        debug!(pages = layout.page_count(), bytes = bytes.len(), "Wrote PDF");
        Ok(bytes)
    }

    fn write_text(&self, layer: &PdfLayerReference, fonts: &Fonts, run: &TextRun, page_height: f32) {
        let (r, g, b) = run.style.color.rgb();
        layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));

        let baseline = page_height - (run.y + run.style.ascent());
        layer.use_text(
            run.text.clone(),
            run.style.size,
            Mm(run.x),
            Mm(baseline),
            fonts.get(run.style.face),
        );

        if run.style.color != TextColor::Normal {
            let (r, g, b) = TextColor::Normal.rgb();
            layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
        }
    }

    fn write_image(&self, layer: &PdfLayerReference, placed: &PlacedImage, page_height: f32) {
        let px_to_mm = |px: u32| px as f32 / IMAGE_DPI * 25.4;
        let natural_width = px_to_mm(placed.image.width());
        let natural_height = px_to_mm(placed.image.height());

        let transform = ImageTransform {
            translate_x: Some(Mm(placed.x)),
            translate_y: Some(Mm(page_height - placed.y - placed.height)),
            scale_x: Some(placed.width / natural_width),
            scale_y: Some(placed.height / natural_height),
            dpi: Some(IMAGE_DPI),
            ..Default::default()
        };

        Image::from_dynamic_image(&placed.image.image).add_to_layer(layer.clone(), transform);
    }
}
