//! Extraction options and configuration.

use crate::analysis::{
    default_monospace_markers, CategorizeOptions, ContextOptions, RuleSetKind, StructureOptions,
};

/// Options for extracting and categorizing highlights.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Points trimmed from every edge of a highlight region before selecting
    /// words, so neighboring glyphs grazed by the edge are left out
    pub margin: f32,

    /// Words whose bottoms differ by at most this many points share a line
    pub line_tolerance: f32,

    /// Select words per quad instead of by the annotation rectangle
    pub use_quad_points: bool,

    /// Whether to process pages in parallel
    pub parallel: bool,

    /// Context window settings
    pub context: ContextOptions,

    /// Heading-candidate settings for the document profile
    pub structure: StructureOptions,

    /// Categorizer thresholds
    pub categorize: CategorizeOptions,

    /// Which rule set categorizes fragments
    pub rules: RuleSetKind,

    /// Lowercase font-name fragments that mark a monospace face
    pub monospace_markers: Vec<String>,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the inset margin.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin.max(0.0);
        self
    }

    /// Set the line grouping tolerance.
    pub fn with_line_tolerance(mut self, tolerance: f32) -> Self {
        self.line_tolerance = tolerance.max(0.0);
        self
    }

    /// Enable or disable quad-point word selection.
    pub fn with_quad_points(mut self, enabled: bool) -> Self {
        self.use_quad_points = enabled;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn with_context(mut self, context: ContextOptions) -> Self {
        self.context = context;
        self
    }

    pub fn with_structure(mut self, structure: StructureOptions) -> Self {
        self.structure = structure;
        self
    }

    pub fn with_categorize(mut self, categorize: CategorizeOptions) -> Self {
        self.categorize = categorize;
        self
    }

    /// Set the rule set.
    pub fn with_rules(mut self, rules: RuleSetKind) -> Self {
        self.rules = rules;
        self
    }

    /// Use the text-only rule set.
    pub fn lexical(mut self) -> Self {
        self.rules = RuleSetKind::Lexical;
        self
    }

    /// Replace the monospace markers. Markers are matched lowercase.
    pub fn with_monospace_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.monospace_markers = markers
            .into_iter()
            .map(|m| m.into().to_lowercase())
            .collect();
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            margin: 2.0,
            line_tolerance: 3.0,
            use_quad_points: false,
            parallel: true,
            context: ContextOptions::default(),
            structure: StructureOptions::default(),
            categorize: CategorizeOptions::default(),
            rules: RuleSetKind::Contextual,
            monospace_markers: default_monospace_markers(),
        }
    }
}
