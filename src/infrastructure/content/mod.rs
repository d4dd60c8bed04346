pub mod escaping_renderer;

pub use escaping_renderer::EscapingContentRenderer;
