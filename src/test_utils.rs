#[cfg(test)]
pub mod fixtures {
    use mongodb::bson::doc;

    use crate::models::domain::{Application, Marathon};

    /// Creates a marathon owned by `owner`
    pub fn test_marathon(owner: &str, title: &str) -> Marathon {
        Marathon::new(owner, title, doc! { "location": "Dhaka", "distance": "10k" })
    }

    /// Creates an application of `email` to `marathon`
    pub fn test_application(email: &str, marathon: &Marathon) -> Application {
        Application::new(
            email,
            &marathon.id.to_hex(),
            &marathon.title,
            doc! { "phone": "01700000000" },
        )
    }
}

#[cfg(test)]
pub mod test_helpers {
    use std::sync::Arc;

    use actix_web::cookie::Cookie;
    use serde_json::Map;

    use crate::{
        app_state::AppState,
        auth::TOKEN_COOKIE,
        config::Config,
        models::dto::request::SignInRequest,
        repositories::{MockApplicationRepository, MockMarathonRepository},
    };

    /// State whose repositories panic on any call.
    pub fn test_state() -> AppState {
        test_state_with(MockMarathonRepository::new(), MockApplicationRepository::new())
    }

    pub fn test_state_with(
        marathons: MockMarathonRepository,
        applications: MockApplicationRepository,
    ) -> AppState {
        AppState::with_repositories(
            Config::test_config(),
            Arc::new(marathons),
            Arc::new(applications),
            None,
        )
    }

    /// A valid session cookie for `email`, signed with the state's secret.
    pub fn session_cookie(state: &AppState, email: &str) -> Cookie<'static> {
        let token = state
            .jwt_service
            .create_token(SignInRequest {
                email: email.to_string(),
                profile: Map::new(),
            })
            .expect("token should be created");
        Cookie::new(TOKEN_COOKIE, token)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixtures_link_application_to_marathon() {
        let marathon = test_marathon("owner@example.com", "City Run");
        let application = test_application("runner@example.com", &marathon);

        assert_eq!(application.marathon_id, marathon.id.to_hex());
        assert_eq!(application.marathon_title, "City Run");
    }
}
