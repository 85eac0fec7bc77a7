//! Session record model
//!
//! A session record describes one creative-generation session: prompt,
//! generation parameters, applied filters and the produced images. It is
//! assembled by the caller and handed to the export engine unchanged.
//!
//! # Example
//!
//! ```ignore
//! use se_core::session::SessionRecord;
//!
//! let record = SessionRecord::now()
//!     .with_prompt("a lighthouse at dusk")
//!     .with_seed("42")
//!     .with_filter("Brightness", "120%")
//!     .with_image("https://example.com/render-1.png");
//! ```

mod labels;
mod record;

pub use labels::LabelSet;
pub use record::{Filters, ScalarField, SessionRecord};
