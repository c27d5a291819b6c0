//! Rendering options and configuration.

/// Options for rendering study notes.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Title written at the top of the notes
    pub title: String,

    /// Append the source page number to each note
    pub include_page_refs: bool,

    /// Render consecutive code highlights as one block
    pub merge_code_blocks: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the notes title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Enable or disable page references.
    pub fn with_page_refs(mut self, include: bool) -> Self {
        self.include_page_refs = include;
        self
    }

    /// Enable or disable merging of consecutive code highlights.
    pub fn with_merge_code_blocks(mut self, merge: bool) -> Self {
        self.merge_code_blocks = merge;
        self
    }

    pub(crate) fn page_ref(&self, page: u32) -> String {
        if self.include_page_refs {
            format!(" (p. {})", page)
        } else {
            String::new()
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: "Study Notes".to_string(),
            include_page_refs: false,
            merge_code_blocks: true,
        }
    }
}
