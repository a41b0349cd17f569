use axum::http::{header, HeaderMap};
use cookie::{Cookie, SameSite};
use time::Duration;

/// Value of the first cookie called `name` across all `Cookie` headers.
pub fn read(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|raw| Cookie::split_parse(raw))
        .filter_map(Result::ok)
        .find(|c| c.name() == name)
        .map(|c| c.value().to_string())
}

/// `Set-Cookie` value for an HttpOnly, SameSite=Lax cookie scoped to `/`.
pub fn set(name: &'static str, value: String, max_age: Duration, secure: bool) -> String {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(max_age)
        .build()
        .to_string()
}

/// `Set-Cookie` value that makes the browser drop `name`.
pub fn removal(name: &'static str) -> String {
    let mut c = Cookie::build((name, "")).path("/").build();
    c.make_removal();
    c.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn read_finds_cookie_among_several_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("a=1; b=2"));
        headers.append(header::COOKIE, HeaderValue::from_static("session=tok"));
        assert_eq!(read(&headers, "b").as_deref(), Some("2"));
        assert_eq!(read(&headers, "session").as_deref(), Some("tok"));
        assert_eq!(read(&headers, "missing"), None);
    }

    #[test]
    fn set_and_removal_attributes() {
        let v = set("session", "abc".into(), Duration::minutes(5), true);
        assert!(v.starts_with("session=abc"));
        assert!(v.contains("HttpOnly"));
        assert!(v.contains("SameSite=Lax"));
        assert!(v.contains("Secure"));
        assert!(v.contains("Path=/"));
        assert!(v.contains("Max-Age=300"));

        let gone = removal("session");
        assert!(gone.starts_with("session=;"));
        assert!(gone.contains("Max-Age=0"));
    }
}
