//! Loading options and configuration.

use std::ops::RangeInclusive;

/// Options for loading PDF documents.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Page selection (which pages to load)
    pub pages: PageSelection,
}

impl LoadOptions {
    /// Create new load options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Fail the whole load when a page cannot be decoded.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Keep pages whose content cannot be decoded, without text.
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            pages: PageSelection::All,
        }
    }
}

/// Error handling mode during loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    #[default]
    Strict,
    /// Skip invalid content and continue
    Lenient,
}

/// Page selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed)
    Pages(Vec<u32>),
    /// Several disjoint ranges, ascending (1-indexed)
    Ranges(Vec<RangeInclusive<u32>>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
            PageSelection::Ranges(ranges) => ranges.iter().any(|r| r.contains(&page)),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();

        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }

        // Simple range (e.g., "1-10")
        if !s.contains(',') && s.contains('-') {
            return parse_range(s).map(PageSelection::Range);
        }

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();

        // Plain list of pages (e.g., "1,3,5")
        if !parts.iter().any(|part| part.contains('-')) {
            let mut pages = parts
                .iter()
                .map(|part| parse_page_number(part))
                .collect::<Result<Vec<_>, _>>()?;
            pages.sort_unstable();
            pages.dedup();
            return Ok(PageSelection::Pages(pages));
        }

        // Mixed list; ranges are kept unexpanded and merged
        let mut ranges = parts
            .iter()
            .map(|part| {
                if part.contains('-') {
                    parse_range(part)
                } else {
                    parse_page_number(part).map(|p| p..=p)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        ranges.sort_by_key(|r| *r.start());

        let mut merged: Vec<RangeInclusive<u32>> = Vec::with_capacity(ranges.len());
        for range in ranges {
            match merged.last_mut() {
                Some(last) if *range.start() <= last.end().saturating_add(1) => {
                    let end = (*last.end()).max(*range.end());
                    *last = *last.start()..=end;
                }
                _ => merged.push(range),
            }
        }
        Ok(PageSelection::Ranges(merged))
    }
}

fn parse_range(s: &str) -> Result<RangeInclusive<u32>, String> {
    let (start, end) = s
        .split_once('-')
        .ok_or_else(|| format!("Invalid page range: {}", s))?;
    let start = parse_page_number(start)?;
    let end = parse_page_number(end)?;
    if start > end {
        return Err(format!("Page range {} is reversed", s.trim()));
    }
    Ok(start..=end)
}

fn parse_page_number(s: &str) -> Result<u32, String> {
    match s.trim().parse::<u32>() {
        Ok(0) => Err("Page numbers start at 1".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("Invalid page number: {}", s.trim())),
    }
}
