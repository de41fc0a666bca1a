pub mod claims;
pub mod jwt;
pub mod middleware;
pub mod ownership;
pub mod session;

pub use claims::Claims;
pub use jwt::JwtService;
pub use middleware::{AuthMiddleware, AuthenticatedUser};
pub use ownership::{require_owner, Claimant};
pub use session::{CookiePolicy, TOKEN_COOKIE};
