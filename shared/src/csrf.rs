//! Anti-forgery token lookup and the headers every request carries.

pub const CSRF_HEADER: &str = "X-CSRFToken";
pub const CSRF_COOKIE: &str = "csrftoken";
pub const CSRF_FORM_FIELD: &str = "csrfmiddlewaretoken";
pub const REQUESTED_WITH_HEADER: &str = "X-Requested-With";
pub const REQUESTED_WITH_VALUE: &str = "XMLHttpRequest";

/// Supplies the current anti-forgery token, if the page has one.
pub trait CsrfSource {
    fn token(&self) -> Option<String>;
}

/// A token known up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticToken(pub String);

impl CsrfSource for StaticToken {
    fn token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

impl CsrfSource for Option<String> {
    fn token(&self) -> Option<String> {
        self.clone()
    }
}

/// Pick the token out of a `document.cookie` string.
pub fn token_from_cookie(cookies: &str) -> Option<String> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == CSRF_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// The hidden form field wins over the cookie.
pub fn resolve_token(form_field: Option<String>, cookies: &str) -> Option<String> {
    form_field
        .filter(|value| !value.trim().is_empty())
        .or_else(|| token_from_cookie(cookies))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_lookup_matches_exact_name() {
        let cookies = "sessionid=abc; xcsrftoken=wrong; csrftoken=Tok3n; theme=dark";
        assert_eq!(token_from_cookie(cookies), Some("Tok3n".to_string()));
        assert_eq!(token_from_cookie("sessionid=abc"), None);
        assert_eq!(token_from_cookie("csrftoken="), None);
    }

    #[test]
    fn form_field_takes_precedence() {
        assert_eq!(
            resolve_token(Some("fromform".into()), "csrftoken=fromcookie"),
            Some("fromform".to_string())
        );
        assert_eq!(
            resolve_token(Some(String::new()), "csrftoken=fromcookie"),
            Some("fromcookie".to_string())
        );
    }
}
