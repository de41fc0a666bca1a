use actix_web::cookie::{Cookie, SameSite};

pub const TOKEN_COOKIE: &str = "token";

/// Cookie attributes for the session token. Production runs cross-site over
/// HTTPS; local development runs same-site over plain HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    pub secure: bool,
    pub same_site: SameSite,
}

impl CookiePolicy {
    pub fn for_environment(production: bool) -> Self {
        if production {
            CookiePolicy {
                secure: true,
                same_site: SameSite::None,
            }
        } else {
            CookiePolicy {
                secure: false,
                same_site: SameSite::Strict,
            }
        }
    }

    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build(TOKEN_COOKIE, token)
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .finish()
    }

    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = self.session_cookie(String::new());
        cookie.make_removal();
        cookie
    }
}
