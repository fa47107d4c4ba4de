//! Built-in normalizer stages, in pipeline order.

pub mod color;
pub mod comment;
pub mod extensions;
pub mod font_size;
pub mod references;

pub use color::ColorStage;
pub use comment::CommentStage;
pub use extensions::ExtensionsStage;
pub use font_size::FontSizeStage;
pub use references::{TextReferencesStage, ValueReferencesStage};
