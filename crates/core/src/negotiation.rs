//! Minimal `Accept` header negotiation.
//!
//! The JSON endpoints only have one representation, so the only question is
//! whether the client is willing to take it.

/// Whether a client sending this `Accept` header will take `application/json`.
///
/// A missing header accepts anything. Media ranges with `q=0` are refusals.
pub fn accepts_json(accept: Option<&str>) -> bool {
    let Some(accept) = accept else {
        return true;
    };

    if accept.trim().is_empty() {
        return true;
    }

    accept.split(',').any(|range| {
        let mut parts = range.split(';');
        let media = parts.next().unwrap_or("").trim().to_ascii_lowercase();

        let refused = parts.any(|param| {
            let param = param.trim();
            param
                .strip_prefix("q=")
                .and_then(|q| q.trim().parse::<f32>().ok())
                .is_some_and(|q| q <= 0.0)
        });

        !refused && matches!(media.as_str(), "*/*" | "application/*" | "application/json")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_header_accepts_json() {
        assert!(accepts_json(None));
        assert!(accepts_json(Some("")));
    }

    #[test]
    fn explicit_json_and_wildcards_accept() {
        assert!(accepts_json(Some("application/json")));
        assert!(accepts_json(Some("application/json, text/plain, */*")));
        assert!(accepts_json(Some("*/*")));
        assert!(accepts_json(Some("application/*;q=0.5")));
        assert!(accepts_json(Some("Application/JSON")));
    }

    #[test]
    fn html_only_clients_are_refused() {
        assert!(!accepts_json(Some("text/html")));
        assert!(!accepts_json(Some("text/html, application/xhtml+xml")));
    }

    #[test]
    fn zero_quality_is_a_refusal() {
        assert!(!accepts_json(Some("application/json;q=0")));
        assert!(accepts_json(Some("application/json;q=0, */*;q=0.1")));
    }
}
