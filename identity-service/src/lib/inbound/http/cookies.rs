//! Refresh token and session marker cookies.

use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::CookieJar;
use axum_extra::extract::cookie::SameSite;
use time::Duration;

/// Cookie carrying the refresh token.
pub const REFRESH_COOKIE: &str = "refreshToken";
/// Cookie carrying the pre-authentication session marker.
pub const SESSION_COOKIE: &str = "SESSION";

/// Attributes shared by every refresh cookie the service writes.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub domain: Option<String>,
    pub secure: bool,
    pub refresh_max_age_secs: i64,
}

impl CookieSettings {
    fn base(&self, value: String) -> Cookie<'static> {
        let mut cookie = Cookie::build((REFRESH_COOKIE.to_string(), value))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .path("/".to_string())
            .build();
        if let Some(domain) = &self.domain {
            cookie.set_domain(domain.clone());
        }
        cookie
    }

    /// Build the httpOnly cookie holding `token`, living as long as the token.
    pub fn refresh_cookie(&self, token: &str) -> Cookie<'static> {
        let mut cookie = self.base(token.to_string());
        cookie.set_max_age(Duration::seconds(self.refresh_max_age_secs));
        cookie
    }

    /// Build an expired refresh cookie.
    pub fn clear_refresh_cookie(&self) -> Cookie<'static> {
        let mut cookie = self.base(String::new());
        cookie.set_max_age(Duration::ZERO);
        cookie
    }
}

/// Non-empty refresh token from the jar.
pub fn refresh_token(jar: &CookieJar) -> Option<String> {
    jar.get(REFRESH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

/// Raw session marker from the jar, if any.
pub fn session_marker(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string())
}
