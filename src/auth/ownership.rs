use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
};

/// A request that acts on behalf of an email address. Each guarded request
/// type declares where that address lives (query, body, nested object).
pub trait Claimant {
    fn claimant_email(&self) -> &str;
}

/// Rejects the request unless the token's email matches the claimed one.
pub fn require_owner<C: Claimant + ?Sized>(claims: &Claims, request: &C) -> AppResult<()> {
    let claimed = request.claimant_email();
    if claims.email != claimed {
        log::warn!(
            "Ownership check failed: token for '{}' claimed '{}'",
            claims.email,
            claimed
        );
        return Err(AppError::Forbidden(format!(
            "'{}' may not act for '{}'",
            claims.email, claimed
        )));
    }
    Ok(())
}
