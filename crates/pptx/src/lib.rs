//! PPTX (Office Open XML) template backend for slide compilation.
//!
//! Reads the slide layouts of a .pptx template (a ZIP archive of XML
//! parts) into a layout catalog.

pub mod template;

pub use template::TemplateCatalog;
