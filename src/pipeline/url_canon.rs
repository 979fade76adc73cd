//! URL canonicalisation, the primary duplicate-detection key.
//!
//! Canonicalises URLs so that equivalent pages (differing only in
//! tracking parameters, query order, fragments, duplicate slashes, or
//! capitalisation) compare byte-equal.

use url::Url;

/// Tracking query parameters stripped during canonicalisation, in
/// addition to any key starting with `utm_`.
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "ref", "si", "feature"];

/// Canonicalise a URL for identity and deduplication.
///
/// Applies the following transformations:
///
/// 1. Lowercase scheme and host (path is preserved as-is).
/// 2. Strip known tracking parameters (`utm_*`, fbclid, gclid, ref, …).
/// 3. Sort the remaining query parameters by key for a stable form.
/// 4. Remove default ports (`:80` for HTTP, `:443` for HTTPS).
/// 5. Collapse duplicate slashes in the path (`/a//b` → `/a/b`).
/// 6. Remove the trailing slash (unless the path is exactly `"/"`).
/// 7. Remove the fragment.
///
/// If the input cannot be parsed as a valid URL, it is returned
/// unchanged — canonicalisation is total and never fails.
pub fn canonical_url(raw: &str) -> String {
    let Ok(mut parsed) = Url::parse(raw) else {
        return raw.to_string();
    };

    parsed.set_fragment(None);

    if is_default_port(&parsed) {
        let _ = parsed.set_port(None);
    }

    // Filter tracking parameters, then sort for a stable query string.
    let mut params: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    params.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    if params.is_empty() {
        parsed.set_query(None);
    } else {
        let qs: String = params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        parsed.set_query(Some(&qs));
    }

    // Collapse duplicate slashes, then drop the trailing one. Path
    // surgery only makes sense for hierarchical URLs.
    if !parsed.cannot_be_a_base() {
        let mut path = parsed.path().to_string();
        while path.contains("//") {
            path = path.replace("//", "/");
        }
        if path.len() > 1 && path.ends_with('/') {
            path.pop();
        }
        parsed.set_path(&path);
    }

    // Url::parse already lowercases scheme and host, so the serialised
    // form is canonical.
    parsed.to_string()
}

/// Extracts the lowercased host of a URL, if it has one.
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
}

/// True for keys the canonicaliser treats as tracking noise.
fn is_tracking_param(key: &str) -> bool {
    let k = key.to_lowercase();
    k.starts_with("utm_") || TRACKING_PARAMS.contains(&k.as_str())
}

/// Returns `true` if the URL uses the default port for its scheme.
fn is_default_port(url: &Url) -> bool {
    matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    )
}
