use crate::domain::errors::ResolutionError;

/// Decides which single URL a request goes to.
///
/// A non-empty direct URL always wins. Otherwise the effective base URL
/// (override first, then the persisted one) is joined with the path by plain
/// concatenation: no slash normalization, no percent-encoding.
pub struct UrlResolver;

impl UrlResolver {
    pub fn resolve(
        direct_url: Option<&str>,
        override_base_url: Option<&str>,
        persisted_base_url: Option<&str>,
        path: Option<&str>,
    ) -> Result<String, ResolutionError> {
        if let Some(direct) = direct_url.filter(|url| !url.is_empty()) {
            return Ok(direct.to_string());
        }

        let base = override_base_url
            .filter(|url| !url.is_empty())
            .or(persisted_base_url)
            .filter(|url| !url.is_empty());
        match (base, path) {
            (Some(base), Some(path)) => Ok(format!("{base}{path}")),
            _ => Err(ResolutionError::NoValidUrl),
        }
    }
}

/// Returns true when a lone CLI argument should be treated as an implicit GET.
pub fn is_bare_url(arg: &str) -> bool {
    arg.contains("://") && !arg.starts_with('-')
}
