//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod property_store;
pub mod test_dependencies;
pub mod traits;

pub use deps::{GeminiAdapter, NotionAdapter, ServerDeps};
pub use property_store::{
    require_property, FilePropertyStore, MemoryPropertyStore, GEMINI_API_KEY, LOGGING_ENABLED,
    LOG_KEY_PREFIX, NOTION_TOKEN,
};
pub use test_dependencies::{MockAI, MockDocumentService, TestDependencies};
pub use traits::*;
