//! # diffdeck-render
//!
//! Turns project snapshots into a single self-contained HTML document.
//!
//! The document talks back to the control server through `fetch` calls;
//! diffs are drawn client-side by diff2html from the raw unified diff, with
//! a plain `<pre>` fallback when the library cannot be loaded.

mod assets;
mod escape;
mod html;

pub use escape::{escape_html, escape_script_json};
pub use html::{render_document, RenderOptions};
