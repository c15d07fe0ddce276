//! Canvas pagination helpers.
//!
//! Canvas paginates list endpoints with an RFC 8288 `Link` header:
//!
//! ```text
//! <https://canvas.example/api/v1/courses?page=2&per_page=10>; rel="next",
//! <https://canvas.example/api/v1/courses?page=1&per_page=10>; rel="first"
//! ```

/// Page cap used when the caller does not ask for a limit.
pub const DEFAULT_MAX_PAGES: usize = 20;

/// Default number of items requested per page.
pub const DEFAULT_PER_PAGE: usize = 50;

/// Largest page size Canvas accepts.
pub const MAX_PER_PAGE: usize = 100;

/// How many pages (and items) a paginated fetch may collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOptions {
    /// Value sent as the `per_page` query parameter.
    pub per_page: usize,

    /// Stop after this many pages even if more are linked.
    pub max_pages: usize,

    /// Stop once this many items were collected, truncating the last page.
    pub limit: Option<usize>,
}

impl PageOptions {
    /// Plan a fetch for an optional item limit.
    ///
    /// Without a limit everything is fetched up to [`DEFAULT_MAX_PAGES`].
    /// A limit that fits in one page becomes a single request with
    /// `per_page = limit`; larger limits fetch just enough pages.
    pub fn for_limit(limit: Option<usize>, per_page: usize) -> Self {
        let per_page = per_page.clamp(1, MAX_PER_PAGE);
        match limit {
            None => Self {
                per_page,
                max_pages: DEFAULT_MAX_PAGES,
                limit: None,
            },
            Some(limit) if limit <= per_page => Self {
                per_page: limit.max(1),
                max_pages: 1,
                limit: Some(limit),
            },
            Some(limit) => Self {
                per_page,
                max_pages: limit.div_ceil(per_page),
                limit: Some(limit),
            },
        }
    }

    /// Describe the retrieval plan for tool output.
    pub fn describe(&self) -> String {
        match self.limit {
            None => format!(
                "Retrieved all available courses (up to {} pages)",
                self.max_pages
            ),
            Some(limit) if self.max_pages == 1 => format!("Single request for {limit} courses"),
            Some(limit) => format!("Paginated request, limited to {limit} courses"),
        }
    }
}

impl Default for PageOptions {
    fn default() -> Self {
        Self::for_limit(None, DEFAULT_PER_PAGE)
    }
}

/// One `<url>; rel="..."` entry of a `Link` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    pub url: String,
    pub rels: Vec<String>,
}

/// Parse every entry of a `Link` header.
///
/// Commas inside `<...>` are part of the URL, so entries are split on the
/// angle brackets rather than on commas.
pub fn parse_link_header(header: &str) -> Vec<LinkEntry> {
    let mut entries = Vec::new();
    let mut rest = header;

    while let Some(open) = rest.find('<') {
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find('>') else {
            break;
        };
        let url = after_open[..close].trim().to_string();
        let tail = &after_open[close + 1..];
        let params_end = tail.find('<').unwrap_or(tail.len());

        let rels = tail[..params_end]
            .split(';')
            .filter_map(|param| {
                let param = param.trim().trim_end_matches(',').trim();
                let (key, value) = param.split_once('=')?;
                key.trim()
                    .eq_ignore_ascii_case("rel")
                    .then(|| value.trim().trim_matches('"').to_string())
            })
            .flat_map(|value| {
                value
                    .split_whitespace()
                    .map(str::to_ascii_lowercase)
                    .collect::<Vec<_>>()
            })
            .collect();

        entries.push(LinkEntry { url, rels });
        rest = &tail[params_end..];
    }

    entries
}

/// URL of the `rel="next"` page, if any.
pub fn next_link(header: &str) -> Option<String> {
    parse_link_header(header)
        .into_iter()
        .find(|entry| entry.rels.iter().any(|r| r == "next"))
        .map(|entry| entry.url)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS_LINKS: &str = "<https://canvas.test/api/v1/courses?page=1&per_page=10>; rel=\"current\",\
        <https://canvas.test/api/v1/courses?page=2&per_page=10>; rel=\"next\",\
        <https://canvas.test/api/v1/courses?page=1&per_page=10>; rel=\"first\",\
        <https://canvas.test/api/v1/courses?page=5&per_page=10>; rel=\"last\"";

    #[test]
    fn test_next_link() {
        assert_eq!(
            next_link(CANVAS_LINKS).as_deref(),
            Some("https://canvas.test/api/v1/courses?page=2&per_page=10")
        );
    }

    #[test]
    fn test_no_next_on_last_page() {
        let header = "<https://canvas.test/api/v1/courses?page=5>; rel=\"current\", \
                      <https://canvas.test/api/v1/courses?page=5>; rel=\"last\"";
        assert_eq!(next_link(header), None);
    }

    #[test]
    fn test_parse_entries_and_multi_rel() {
        let entries =
            parse_link_header("<https://a.test/x?a=1,2>; rel=\"next last\", <https://a.test/y>; rel=prev");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].url, "https://a.test/x?a=1,2");
        assert_eq!(entries[0].rels, vec!["next", "last"]);
        assert_eq!(entries[1].rels, vec!["prev"]);
    }

    #[test]
    fn test_malformed_header() {
        assert!(parse_link_header("garbage").is_empty());
        assert!(parse_link_header("<unterminated; rel=\"next\"").is_empty());
    }

    #[test]
    fn test_plan_without_limit() {
        let plan = PageOptions::for_limit(None, 50);
        assert_eq!(plan.max_pages, DEFAULT_MAX_PAGES);
        assert_eq!(plan.per_page, 50);
        assert_eq!(plan.limit, None);
    }

    #[test]
    fn test_plan_small_limit_is_single_request() {
        let plan = PageOptions::for_limit(Some(10), 50);
        assert_eq!(plan.per_page, 10);
        assert_eq!(plan.max_pages, 1);
        assert_eq!(plan.describe(), "Single request for 10 courses");
    }

    #[test]
    fn test_plan_large_limit_rounds_pages_up() {
        let plan = PageOptions::for_limit(Some(120), 50);
        assert_eq!(plan.per_page, 50);
        assert_eq!(plan.max_pages, 3);
        assert_eq!(plan.limit, Some(120));
    }

    #[test]
    fn test_plan_clamps_per_page() {
        assert_eq!(PageOptions::for_limit(None, 500).per_page, MAX_PER_PAGE);
        assert_eq!(PageOptions::for_limit(None, 0).per_page, 1);
    }
}
