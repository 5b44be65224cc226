use super::ApiError;

/// Authentication and authorization failures
impl ApiError {
    pub fn missing_token() -> Self {
        ApiError::unauthorized("no jwt auth token specified")
    }

    pub fn bad_token_scheme() -> Self {
        ApiError::unauthorized("jwt auth token does not follow the format `Bearer <token>`")
    }

    pub fn unparseable_token() -> Self {
        ApiError::unauthorized("could not parse jwt auth token")
    }

    pub fn expired_token() -> Self {
        ApiError::unauthorized("jwt auth token is no longer valid")
    }

    pub fn unparseable_claims() -> Self {
        ApiError::unauthorized("could not parse jwt auth claims")
    }

    pub fn unknown_token_user() -> Self {
        ApiError::unauthorized("user not found")
    }

    pub fn admin_required() -> Self {
        ApiError::forbidden("you must be an admin to access this resource")
    }

    pub fn invalid_credentials() -> Self {
        ApiError::bad_request("invalid email or password")
    }

    pub fn already_authenticated() -> Self {
        ApiError::forbidden("user is already authenticated")
    }
}
