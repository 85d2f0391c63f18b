//! Login and signup. Both store the issued credential in the session.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::session::Credential;
use crate::types::TokenResponse;

impl ApiClient {
    /// Logs in with the OAuth2 password form (`username`, `password`).
    ///
    /// # Errors
    ///
    /// - [`ApiError::Status`] for bad credentials (the backend answers `400`).
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::Deserialize`] if no token comes back.
    pub async fn login(&self, email: &str, password: &str) -> Result<Credential, ApiError> {
        let request = self
            .client()
            .post(self.endpoint("auth/login")?)
            .form(&[("username", email), ("password", password)]);
        let token: TokenResponse = self.send_json(request, "POST /auth/login").await?;
        Ok(self.adopt(token))
    }

    /// Creates an account; the backend takes `email` and `password` as query
    /// parameters and logs the new user in.
    ///
    /// # Errors
    ///
    /// As [`ApiClient::login`]; an existing email is a `400`.
    pub async fn signup(&self, email: &str, password: &str) -> Result<Credential, ApiError> {
        let request = self
            .client()
            .post(self.endpoint("auth/signup")?)
            .query(&[("email", email), ("password", password)]);
        let token: TokenResponse = self.send_json(request, "POST /auth/signup").await?;
        Ok(self.adopt(token))
    }

    fn adopt(&self, token: TokenResponse) -> Credential {
        let credential = Credential::new(token.access_token);
        self.session().set_credential(credential.clone());
        tracing::info!(
            token_type = token.token_type.as_deref().unwrap_or("bearer"),
            "logged in"
        );
        credential
    }
}
