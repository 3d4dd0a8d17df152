// Paginated document composition.
// Implements: font metrics, word wrapping, the page-break cursor, section rendering, PDF encoding.
// Generation is CPU-bound and synchronous; handlers run it inside tokio::task::spawn_blocking.

pub mod composer;
pub mod font_metrics;
pub mod page;
pub mod pdf;
pub mod sections;
pub mod wrap;

// Re-export the public API consumed by the document builders and handlers.
pub use composer::{ComposeError, Composer, DownloadableArtifact};
pub use font_metrics::{default_page_config, PageConfig};
pub use page::TextStyle;
pub use sections::{render_sections, DocumentSection, SectionBody, TableSpec};
