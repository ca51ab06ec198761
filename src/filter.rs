use url::Url;

/// Resolves and classifies the URLs found on one page.
///
/// Built once per page from the page URL. If the page URL itself does not
/// parse, every resolution falls back to the raw string and every link is
/// classified as external.
#[derive(Debug, Clone)]
pub struct UrlFilter {
    base: Option<Url>,
}

impl UrlFilter {
    /// Create a filter for the page at `page_url`
    pub fn new(page_url: &str) -> Self {
        let base = match Url::parse(page_url) {
            Ok(url) => Some(url),
            Err(e) => {
                ::log::warn!("Page URL {} does not parse ({}), links stay unresolved", page_url, e);
                None
            }
        };
        Self { base }
    }

    /// Hostname of the page, if it has one
    pub fn page_host(&self) -> Option<&str> {
        self.base.as_ref().and_then(|u| u.host_str())
    }

    /// Resolve `raw` against the page URL.
    ///
    /// Resolution failures return the raw string unchanged so the entry is
    /// kept rather than dropped.
    pub fn resolve(&self, raw: &str) -> String {
        let Some(base) = &self.base else {
            return raw.to_string();
        };
        match base.join(raw) {
            Ok(resolved) => resolved.to_string(),
            Err(e) => {
                ::log::trace!("Could not resolve {:?} against {}: {}", raw, base, e);
                raw.to_string()
            }
        }
    }

    /// Whether `href` points at the page's own host.
    ///
    /// Exact hostname comparison; `www.example.com` and `example.com` are
    /// different hosts. Anything that fails to parse is not internal.
    pub fn is_internal(&self, href: &str) -> bool {
        let Some(page_host) = self.page_host() else {
            return false;
        };
        match Url::parse(href) {
            Ok(url) => url.host_str() == Some(page_host),
            Err(_) => false,
        }
    }

    /// Links with an empty or bare `#` target are dropped
    pub fn keep_link(&self, resolved_href: &str) -> bool {
        !resolved_href.is_empty() && resolved_href != "#"
    }

    /// Images with an empty or inline `data:` source are dropped
    pub fn keep_image(&self, resolved_src: &str) -> bool {
        !resolved_src.is_empty() && !resolved_src.starts_with("data:")
    }
}
