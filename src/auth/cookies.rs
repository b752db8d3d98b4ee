use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};

pub const TOKEN_COOKIE: &str = "token";
pub const ROLE_COOKIE: &str = "role";
pub const REGION_COOKIE: &str = "wilayah";

const SESSION_COOKIES: [&str; 3] = [TOKEN_COOKIE, ROLE_COOKIE, REGION_COOKIE];

fn session_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

/// Stores the backend token together with the cached role and assigned region.
pub fn session_cookies(token: &str, role: &str, region: &str, secure: bool) -> CookieJar {
    CookieJar::new()
        .add(session_cookie(TOKEN_COOKIE, token.to_string(), secure))
        .add(session_cookie(ROLE_COOKIE, role.to_string(), secure))
        .add(session_cookie(REGION_COOKIE, region.to_string(), secure))
}

/// Expires every session cookie.
pub fn clear_session_cookies() -> CookieJar {
    SESSION_COOKIES.iter().fold(CookieJar::new(), |jar, name| {
        let mut cookie = Cookie::build((*name, "")).path("/").build();
        cookie.make_removal();
        jar.add(cookie)
    })
}
