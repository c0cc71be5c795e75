//! Query and result shapes shared by repository ports.

use berkana_domain::CharacterSummary;

/// Default page size for character listings.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Largest page a caller may request.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Filter and pagination for listing characters.
///
/// Results are ordered by `updatedAt`, most recent first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterListQuery {
    /// Case-insensitive substring match on character or player name.
    pub search: Option<String>,
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
}

impl CharacterListQuery {
    /// Rows to skip for the requested page.
    pub fn offset(&self) -> u32 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Trimmed search term, or `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

impl Default for CharacterListQuery {
    fn default() -> Self {
        Self {
            search: None,
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// One page of character summaries plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterPage {
    pub characters: Vec<CharacterSummary>,
    pub total: u64,
}
