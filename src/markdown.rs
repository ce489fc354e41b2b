//! Markdown conversion through comrak.
//!
//! This module adapts normalized kramdown configuration into comrak options
//! and applies the selected highlighting backend to fenced code blocks.

mod adapter;
mod engine;

pub use adapter::MarkdownAdapter;
pub use engine::EngineOptions;
