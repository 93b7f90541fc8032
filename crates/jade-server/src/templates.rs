use anyhow::{Context, Result, bail};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::constants::{INDEX_TEMPLATE, SEARCH_FORM_TEMPLATE};

/// Placeholder for the page title in the index template
pub const TITLE: &str = "title";
/// Placeholder for the page body in the index template
pub const CONTENT: &str = "content";

/// An HTML template with `{{placeholder}}` substitution.
///
/// Whitespace inside the braces is ignored, so `{{ title }}` and `{{title}}`
/// name the same placeholder. Values are inserted verbatim; escape them
/// before rendering when they come from a request.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Render the template by replacing placeholders with provided values
    /// Returns an error if any required placeholders are missing
    pub fn render(&self, params: &HashMap<&str, &str>) -> Result<String> {
        let mut rendered = String::with_capacity(self.source.len());
        let mut missing_placeholders: Vec<&str> = Vec::new();
        let mut rest = self.source.as_str();

        while let Some(start) = rest.find("{{") {
            rendered.push_str(&rest[..start]);
            let after = &rest[start + 2..];

            match after.find("}}") {
                Some(end) if is_placeholder_name(after[..end].trim()) => {
                    let name = after[..end].trim();
                    match params.get(name) {
                        Some(value) => rendered.push_str(value),
                        None if !missing_placeholders.contains(&name) => {
                            missing_placeholders.push(name)
                        }
                        None => {}
                    }
                    rest = &after[end + 2..];
                }
                _ => {
                    // Not a placeholder, keep the braces
                    rendered.push_str("{{");
                    rest = after;
                }
            }
        }
        rendered.push_str(rest);

        if !missing_placeholders.is_empty() {
            bail!(
                "Missing required placeholders: {}",
                missing_placeholders.join(", ")
            );
        }

        Ok(rendered)
    }

    /// Get all placeholders required by this template
    pub fn placeholders(&self) -> Vec<String> {
        extract_placeholders(&self.source)
    }
}

/// The two files the server renders: the page layout and the search form.
///
/// Files are read on every call so edits show up without a restart.
#[derive(Debug, Clone)]
pub struct PageTemplates {
    dir: PathBuf,
}

impl PageTemplates {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Check that both files exist and the layout has the placeholders the
    /// routes fill in
    pub async fn validate(&self) -> Result<()> {
        let index = self.index().await?;
        let placeholders = index.placeholders();
        for required in [TITLE, CONTENT] {
            if !placeholders.iter().any(|p| p == required) {
                bail!(
                    "Template {} has no {{{{{}}}}} placeholder",
                    self.dir.join(INDEX_TEMPLATE).display(),
                    required
                );
            }
        }
        self.search_form().await?;
        Ok(())
    }

    /// The search form fragment, as stored on disk
    pub async fn search_form(&self) -> Result<String> {
        self.read(SEARCH_FORM_TEMPLATE).await
    }

    /// Render the layout. `title` is HTML-escaped, `content` is inserted as is.
    pub async fn render_page(&self, title: &str, content: &str) -> Result<String> {
        let title = escape_html(title);
        let params = HashMap::from([(TITLE, title.as_str()), (CONTENT, content)]);
        self.index().await?.render(&params)
    }

    async fn index(&self) -> Result<Template> {
        Ok(Template::new(self.read(INDEX_TEMPLATE).await?))
    }

    async fn read(&self, name: &str) -> Result<String> {
        let path = self.dir.join(name);
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read template file: {}", path.display()))
    }
}

/// Escape text for use inside HTML element content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_alphanumeric() || ch == '_' || ch == '-')
}

/// Extract placeholder names from a template string
/// Finds all occurrences of {{placeholder}} and returns the placeholder names
fn extract_placeholders(template: &str) -> Vec<String> {
    let mut placeholders = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) if is_placeholder_name(after[..end].trim()) => {
                let name = after[..end].trim().to_string();
                if !placeholders.contains(&name) {
                    placeholders.push(name);
                }
                rest = &after[end + 2..];
            }
            _ => rest = after,
        }
    }

    placeholders
}
