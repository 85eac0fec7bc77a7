//! PDF renderer
//!
//! Rendering happens in two passes. The layout pass walks the session record
//! section by section, loading images as it reaches them, and produces a
//! [`DocumentLayout`]. The write pass turns that plan into PDF bytes.
//!
//! Section order is fixed: title, timestamp, prompt, scalar fields, filters,
//! images. Sections whose data is absent are skipped entirely.

mod encoding;
mod geometry;
mod layout;
mod metrics;
mod writer;

pub use geometry::{FontFace, PageGeometry, TextColor, TextStyle};
pub use layout::{Composer, DocumentLayout, Element, Page, PlacedImage, TextRun};
pub use metrics::{wrap_text, HelveticaMetrics, TextMetrics};
pub use writer::PdfWriter;

use super::images::ImageLoader;
use crate::config::PdfConfig;
use crate::error::Result;
use crate::session::{LabelSet, SessionRecord};
use encoding::WinAnsiText;
use metrics::truncate_to_width;
use tracing::{debug, warn};

/// Lays out session records and writes them as PDF
pub struct PdfRenderer<L> {
    geometry: PageGeometry,
    labels: LabelSet,
    loader: L,
    metrics: HelveticaMetrics,
}

impl<L: ImageLoader> PdfRenderer<L> {
    pub fn new(config: &PdfConfig, labels: LabelSet, loader: L) -> Self {
        Self {
            geometry: PageGeometry::from_config(config),
            labels,
            loader,
            metrics: HelveticaMetrics,
        }
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn set_labels(&mut self, labels: LabelSet) {
        self.labels = labels;
    }

    /// Render `record` to PDF bytes
    pub async fn render(&self, record: &SessionRecord) -> Result<Vec<u8>> {
        let layout = self.layout(record).await;
        PdfWriter::new(&self.labels.title).write(&layout)
    }

    /// Compute the page layout for `record`.
    ///
    /// Images are loaded one at a time in list order. A failed load becomes a
    /// placeholder line and never ends the layout. Every line is encoded for
    /// the built-in fonts and kept within its column.
    pub async fn layout(&self, record: &SessionRecord) -> DocumentLayout {
        let mut composer = Composer::new(self.geometry.clone());
        let mut text = WinAnsiText::default();
        let labels = &self.labels;
        let width = self.geometry.writable_width();

        let title = text.line(&labels.title);
        composer.line(self.fit(&title, width, TextStyle::TITLE), TextStyle::TITLE);
        let stamp = text.line(&format!("{}: {}", labels.generated_at, record.generated_at));
        composer.line(
            self.fit(&stamp, width, TextStyle::TIMESTAMP),
            TextStyle::TIMESTAMP,
        );

        if let Some(prompt) = &record.prompt {
            self.prompt_section(&mut composer, &mut text, prompt);
        }

        self.scalar_fields(&mut composer, &mut text, record);

        if !record.filters.is_empty() {
            self.heading(&mut composer, &mut text, &labels.filters);
            for (label, value) in &record.filters {
                let line = text.line(&format!("\u{2022} {}: {}", label, value));
                composer.line(self.fit(&line, width, TextStyle::FILTER), TextStyle::FILTER);
            }
            composer.advance(self.geometry.section_gap);
        }

        if !record.image_urls.is_empty() {
            self.images_section(&mut composer, &mut text, &record.image_urls)
                .await;
        }

        if text.replaced() > 0 {
            warn!(
                characters = text.replaced(),
                "Text outside the WinAnsi character set was replaced with '?'"
            );
        }

        let layout = composer.finish();
        debug!(pages = layout.page_count(), "Laid out PDF");
        layout
    }

    /// Shorten an encoded line with "..." so it fits `max_width`
    fn fit(&self, line: &str, max_width: f32, style: TextStyle) -> String {
        truncate_to_width(line, max_width, style.face, style.size, &self.metrics)
    }

    fn heading(&self, composer: &mut Composer, text: &mut WinAnsiText, label: &str) {
        let label = text.line(label);
        composer.line(
            self.fit(&label, self.geometry.writable_width(), TextStyle::SECTION),
            TextStyle::SECTION,
        );
    }

    fn prompt_section(&self, composer: &mut Composer, text: &mut WinAnsiText, prompt: &str) {
        self.heading(composer, text, &self.labels.prompt);

        let style = TextStyle::BODY;
        let lines = wrap_text(
            &text.paragraphs(prompt),
            self.geometry.writable_width(),
            style.face,
            style.size,
            &self.metrics,
        );
        for line in lines {
            composer.line(line, style);
        }
        composer.advance(self.geometry.section_gap);
    }

    fn scalar_fields(
        &self,
        composer: &mut Composer,
        text: &mut WinAnsiText,
        record: &SessionRecord,
    ) {
        let label_x = self.geometry.margin;
        let label_width = self.geometry.value_column - self.geometry.column_gap;
        let value_x = label_x + self.geometry.value_column;
        let value_width = self.geometry.writable_width() - self.geometry.value_column;
        let mut rendered = false;

        for (field, value) in record.scalar_fields() {
            let Some(value) = value else { continue };

            let label = text.line(&format!("{}:", self.labels.scalar(field)));
            let value = text.line(value);
            composer.columns(vec![
                (
                    label_x,
                    self.fit(&label, label_width, TextStyle::FIELD_LABEL),
                    TextStyle::FIELD_LABEL,
                ),
                (
                    value_x,
                    self.fit(&value, value_width, TextStyle::FIELD_VALUE),
                    TextStyle::FIELD_VALUE,
                ),
            ]);
            rendered = true;
        }

        if rendered {
            composer.advance(self.geometry.section_gap);
        }
    }

    async fn images_section(
        &self,
        composer: &mut Composer,
        text: &mut WinAnsiText,
        urls: &[String],
    ) {
        if composer.remaining_to_page_edge() < self.geometry.images_threshold {
            composer.new_page();
        }
        self.heading(composer, text, &self.labels.images);

        for (i, url) in urls.iter().enumerate() {
            let index = i + 1;
            match self.loader.load(url).await {
                Ok(image) => composer.image(index, image),
                Err(err) => {
                    warn!(index, error = %err, "Image failed to load, inserting placeholder");
                    composer.line(
                        format!("[Image {}: Failed to load]", index),
                        TextStyle::PLACEHOLDER,
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImageLoadError;
    use crate::export::images::LoadedImage;
    use image::DynamicImage;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Succeeds for URLs starting with "valid", records the call order
    #[derive(Default)]
    struct StubLoader {
        calls: Mutex<Vec<String>>,
    }

    impl ImageLoader for StubLoader {
        async fn load(&self, url: &str) -> std::result::Result<LoadedImage, ImageLoadError> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(url.to_string());
            }
            if url.starts_with("valid") {
                LoadedImage::from_image(url, DynamicImage::new_rgb8(8, 6))
            } else {
                Err(ImageLoadError::Fetch {
                    url: url.to_string(),
                    message: "connection refused".to_string(),
                })
            }
        }
    }

    fn renderer() -> PdfRenderer<StubLoader> {
        PdfRenderer::new(&PdfConfig::default(), LabelSet::default(), StubLoader::default())
    }

    fn record() -> SessionRecord {
        SessionRecord::new("2024-05-01T12:00:00Z")
    }

    #[tokio::test]
    async fn test_minimal_record_has_title_and_timestamp_only() {
        let layout = renderer().layout(&record()).await;

        assert_eq!(layout.page_count(), 1);
        assert_eq!(
            layout.text_lines(),
            vec!["Session Export", "Generated At: 2024-05-01T12:00:00Z"]
        );
        assert_eq!(layout.images().count(), 0);

        let styles: Vec<_> = layout.texts().map(|t| t.style).collect();
        assert_eq!(styles, vec![TextStyle::TITLE, TextStyle::TIMESTAMP]);
    }

    #[tokio::test]
    async fn test_full_section_order() {
        let record = record()
            .with_prompt("a misty forest")
            .with_seed("42")
            .with_aspect_ratio("3:2")
            .with_profile("Film")
            .with_blueprint("Landscape")
            .with_filter("Brightness", "120%")
            .with_image("valid-1");

        let layout = renderer().layout(&record).await;
        assert_eq!(
            layout.text_lines(),
            vec![
                "Session Export",
                "Generated At: 2024-05-01T12:00:00Z",
                "Prompt",
                "a misty forest",
                "Seed:",
                "42",
                "Aspect Ratio:",
                "3:2",
                "Profile:",
                "Film",
                "Blueprint:",
                "Landscape",
                "Filters",
                "\u{2022} Brightness: 120%",
                "Images",
            ]
        );
        assert_eq!(layout.images().count(), 1);
    }

    #[tokio::test]
    async fn test_scalar_value_in_value_column() {
        let layout = renderer().layout(&record().with_seed("42")).await;
        let label = layout.texts().find(|t| t.text == "Seed:").unwrap();
        let value = layout.texts().find(|t| t.text == "42").unwrap();

        assert_eq!(label.x, 20.0);
        assert_eq!(value.x, 60.0);
        assert_eq!(label.y, value.y);
    }

    #[tokio::test]
    async fn test_empty_scalar_is_still_rendered() {
        let layout = renderer().layout(&record().with_profile("")).await;
        assert!(layout.text_lines().contains(&"Profile:"));
    }

    #[tokio::test]
    async fn test_filter_order_follows_insertion() {
        let forward = record()
            .with_filter("Brightness", "120%")
            .with_filter("Contrast", "80%");
        let reversed = record()
            .with_filter("Contrast", "80%")
            .with_filter("Brightness", "120%");

        let filter_lines = |layout: &DocumentLayout| -> Vec<String> {
            layout
                .texts()
                .filter(|t| t.style == TextStyle::FILTER)
                .map(|t| t.text.clone())
                .collect()
        };

        let renderer = renderer();
        assert_eq!(
            filter_lines(&renderer.layout(&forward).await),
            vec!["\u{2022} Brightness: 120%", "\u{2022} Contrast: 80%"]
        );
        assert_eq!(
            filter_lines(&renderer.layout(&reversed).await),
            vec!["\u{2022} Contrast: 80%", "\u{2022} Brightness: 120%"]
        );
    }

    #[tokio::test]
    async fn test_filters_with_empty_values_render_section() {
        let layout = renderer().layout(&record().with_filter("Blur", "")).await;
        assert!(layout.text_lines().contains(&"Filters"));
        assert!(layout.text_lines().contains(&"\u{2022} Blur: "));
    }

    #[tokio::test]
    async fn test_long_prompt_breaks_across_pages_in_order() {
        let prompt: String = (0..800)
            .map(|i| format!("word{:03}", i))
            .collect::<Vec<_>>()
            .join(" ");
        let renderer = renderer();
        let layout = renderer.layout(&record().with_prompt(prompt.clone())).await;

        assert!(layout.page_count() >= 2);

        let expected = wrap_text(
            &prompt,
            renderer.geometry.writable_width(),
            TextStyle::BODY.face,
            TextStyle::BODY.size,
            &HelveticaMetrics,
        );
        let body: Vec<String> = layout
            .texts()
            .filter(|t| t.style == TextStyle::BODY)
            .map(|t| t.text.clone())
            .collect();
        assert_eq!(body, expected);
        assert_eq!(body.join(" "), prompt);

        // The second page continues at the top margin
        let first_on_page_two = layout.pages[1].texts().next().unwrap();
        assert_eq!(first_on_page_two.y, 20.0);
        assert_eq!(first_on_page_two.style, TextStyle::BODY);

        for page in &layout.pages {
            for run in page.texts() {
                assert!(run.y + run.style.line_height <= layout.geometry.bottom());
            }
        }
    }

    #[tokio::test]
    async fn test_failed_image_becomes_placeholder() {
        let renderer = renderer();
        let record = record()
            .with_image("valid-1")
            .with_image("invalid")
            .with_image("valid-2");

        let layout = renderer.layout(&record).await;

        let sequence: Vec<String> = layout
            .elements()
            .filter_map(|e| match e {
                Element::Image(img) => Some(format!("image {}", img.index)),
                Element::Text(t) if t.style == TextStyle::PLACEHOLDER => Some(t.text.clone()),
                Element::Text(_) => None,
            })
            .collect();
        assert_eq!(
            sequence,
            vec!["image 1", "[Image 2: Failed to load]", "image 3"]
        );

        let placeholder = layout
            .texts()
            .find(|t| t.style == TextStyle::PLACEHOLDER)
            .unwrap();
        assert_eq!(placeholder.style.face, FontFace::Italic);

        let calls = renderer.loader.calls.lock().unwrap().clone();
        assert_eq!(calls, vec!["valid-1", "invalid", "valid-2"]);

        let bytes = renderer.render(&record).await.unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_images_overflow_to_next_page() {
        let record = record()
            .with_image("valid-1")
            .with_image("valid-2")
            .with_image("valid-3");
        let layout = renderer().layout(&record).await;

        // Title 12 + timestamp 10 + label 8 puts the cursor at 50; two 90mm
        // image blocks fill the page and the third moves on
        assert_eq!(layout.page_count(), 2);
        assert_eq!(layout.pages[0].images().count(), 2);
        let third = layout.pages[1].images().next().unwrap();
        assert_eq!(third.index, 3);
        assert_eq!(third.y, 20.0);
        for image in layout.images() {
            assert_eq!((image.width, image.height), (80.0, 80.0));
        }
    }

    #[tokio::test]
    async fn test_images_section_starts_new_page_near_bottom() {
        // Enough filters to push the cursor within 50mm of the bottom edge
        let mut record = record().with_image("valid-1");
        for i in 0..38 {
            record = record.with_filter(format!("Filter {}", i), "on");
        }

        let layout = renderer().layout(&record).await;
        let last_page = layout.pages.last().unwrap();
        let heading = last_page.texts().next().unwrap();

        assert_eq!(layout.page_count(), 2);
        assert_eq!(heading.text, "Images");
        assert_eq!(heading.y, 20.0);
        assert!(layout.pages[0].texts().all(|t| t.text != "Images"));
    }

    #[tokio::test]
    async fn test_localized_labels() {
        let labels = LabelSet {
            title: "Sitzungsexport".to_string(),
            seed: "Startwert".to_string(),
            generated_at: "Erstellt am".to_string(),
            ..LabelSet::default()
        };
        let renderer = PdfRenderer::new(&PdfConfig::default(), labels, StubLoader::default());
        let layout = renderer.layout(&record().with_seed("7")).await;

        let lines = layout.text_lines();
        assert_eq!(lines[0], "Sitzungsexport");
        assert_eq!(lines[1], "Erstellt am: 2024-05-01T12:00:00Z");
        assert!(lines.contains(&"Startwert:"));
    }

    #[tokio::test]
    async fn test_non_latin_text_is_replaced_visibly() {
        let labels = LabelSet {
            title: "Экспорт".to_string(),
            ..LabelSet::default()
        };
        let renderer = PdfRenderer::new(&PdfConfig::default(), labels, StubLoader::default());
        let record = record()
            .with_prompt("Привет мир 14 東京")
            .with_seed("東京")
            .with_filter("Стиль", "noir");

        let layout = renderer.layout(&record).await;
        let lines = layout.text_lines();
        assert_eq!(lines[0], "???????");
        assert!(lines.contains(&"?????? ??? 14 ??"));
        assert!(lines.contains(&"??"));
        assert!(lines.contains(&"\u{2022} ?????: noir"));
        for run in layout.texts() {
            assert!(run.text.chars().all(super::encoding::is_win_ansi), "{}", run.text);
        }

        let bytes = renderer.render(&record).await.unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_latin1_text_kept() {
        let layout = renderer()
            .layout(&record().with_prompt("Café crème \u{2014} 5 \u{20AC}"))
            .await;
        assert!(layout.text_lines().contains(&"Café crème \u{2014} 5 \u{20AC}"));
    }

    #[tokio::test]
    async fn test_long_title_truncated_to_page_width() {
        let labels = LabelSet {
            title: "Exportation de session ".repeat(10),
            ..LabelSet::default()
        };
        let renderer = PdfRenderer::new(&PdfConfig::default(), labels, StubLoader::default());
        let layout = renderer.layout(&record()).await;

        let title = layout.texts().next().unwrap();
        assert_eq!(title.style, TextStyle::TITLE);
        assert!(title.text.starts_with("Exportation de session"));
        assert!(title.text.ends_with("..."));
        let width = HelveticaMetrics.width(&title.text, FontFace::Bold, TextStyle::TITLE.size);
        assert!(width <= layout.geometry.writable_width());
    }

    #[tokio::test]
    async fn test_wide_scalar_label_stays_in_its_column() {
        let labels = LabelSet {
            aspect_ratio: "Relación de aspecto".to_string(),
            ..LabelSet::default()
        };
        let renderer = PdfRenderer::new(&PdfConfig::default(), labels, StubLoader::default());
        let layout = renderer.layout(&record().with_aspect_ratio("16:9")).await;

        let label = layout
            .texts()
            .find(|t| t.style == TextStyle::FIELD_LABEL)
            .unwrap();
        assert!(label.text.starts_with("Relación de"));
        assert!(label.text.ends_with("..."));

        let geometry = &layout.geometry;
        let width = HelveticaMetrics.width(&label.text, FontFace::Bold, TextStyle::FIELD_LABEL.size);
        assert!(label.x + width <= geometry.margin + geometry.value_column - geometry.column_gap);
        assert!(layout.text_lines().contains(&"16:9"));
    }
}
