use crate::application::ports::content::ContentRenderer;
use crate::shared::error::AppError;
use async_trait::async_trait;

/// HTML エスケープと改行の `<br>` 変換だけを行う最小のレンダラー
#[derive(Debug, Clone, Copy, Default)]
pub struct EscapingContentRenderer;

impl EscapingContentRenderer {
    pub fn render_sync(raw: &str) -> String {
        let mut out = String::with_capacity(raw.len());
        for ch in raw.chars() {
            match ch {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#x27;"),
                '\n' => out.push_str("<br>"),
                '\r' => {}
                _ => out.push(ch),
            }
        }
        out
    }
}

#[async_trait]
impl ContentRenderer for EscapingContentRenderer {
    async fn render(&self, raw: &str) -> Result<String, AppError> {
        Ok(Self::render_sync(raw))
    }
}
