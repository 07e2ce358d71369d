use url::Url;

pub(crate) fn normalize_base_url(mut url: Url) -> Url {
    let path = url.path();
    if !path.ends_with('/') {
        let path = format!("{path}/");
        url.set_path(&path);
    }
    url
}

/// `true` when `path` carries its own `http`/`https` scheme.
pub(crate) fn is_absolute_http(path: &str) -> bool {
    let Some((scheme, _)) = path.split_once("://") else {
        return false;
    };
    scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
}

/// Resolve an endpoint path against the base URL.
///
/// Full paths are parsed verbatim; relative paths are appended to the base
/// URL as text, so any query string inside `path` is preserved.
pub(crate) fn endpoint_url(base_url: &Url, path: &str, full_path: bool) -> Result<Url, url::ParseError> {
    if full_path || is_absolute_http(path) {
        return Url::parse(path);
    }
    let path = path.trim_start_matches('/');
    Url::parse(&format!("{base_url}{path}"))
}

/// Strip fragment and userinfo before a URL is logged.
pub(crate) fn sanitize_url_for_log(url: &Url) -> Url {
    let mut safe = url.clone();
    safe.set_fragment(None);
    let _ = safe.set_username("");
    let _ = safe.set_password(None);
    safe
}
