//! SceneKit Docs - Documentation pages for entity kinds
//!
//! Turns entity kinds, or validated entity records, into documentation
//! blocks (one per field, in declaration order) and writes them as plain
//! text, HTML fragments or JSON for a static site generator. Rendering does
//! not validate; pass records through `scenekit_schema::Validator` first.

mod block;
mod config;
mod render;

pub use block::{format_value, DocBlock};
pub use config::{DocsConfig, OutputFormat};
pub use render::{
    render, render_page, render_record, render_record_page, render_registry, FieldBlocks,
    RecordBlocks,
};
