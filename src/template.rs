use anyhow::Context;
use std::sync::Arc;

/// Page template shared by every request. Loaded once at startup and never
/// mutated afterwards; binding always works on a per-request copy.
#[derive(Debug, Clone)]
pub enum PageTemplate {
    Loaded { html: Arc<str> },
    /// Load failed. Binding checks for this state instead of rendering an
    /// empty string as if it were a template.
    Unloaded { reason: String },
}

impl PageTemplate {
    pub async fn load(path: &str) -> Self {
        match tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Unable to read page template {path}"))
        {
            Ok(html) => {
                log::info!("Page template loaded from {path} ({} bytes)", html.len());
                Self::Loaded { html: html.into() }
            }
            Err(err) => {
                log::error!("{err:?}");
                Self::Unloaded {
                    reason: format!("{err:#}"),
                }
            }
        }
    }

    pub fn from_html<S: AsRef<str>>(html: S) -> Self {
        Self::Loaded {
            html: html.as_ref().into(),
        }
    }

    pub fn html(&self) -> Option<&str> {
        match self {
            Self::Loaded { html } => Some(html.as_ref()),
            Self::Unloaded { .. } => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}
