//! Brief and influencer endpoints.

use infleval_core::{Brief, BriefId, BriefInput, Influencer, InfluencerInput};

use crate::client::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// Lists the current user's briefs.
    ///
    /// # Errors
    ///
    /// - [`ApiError::NotAuthenticated`] if the session holds no credential.
    /// - [`ApiError::Unauthorized`] on `401`; the session is invalidated.
    /// - [`ApiError::Status`], [`ApiError::Http`], [`ApiError::Deserialize`]
    ///   as for any request.
    pub async fn list_briefs(&self) -> Result<Vec<Brief>, ApiError> {
        let request = self.authorized(self.client().get(self.endpoint("brief")?))?;
        self.send_json(request, "GET /brief").await
    }

    /// Fetches one brief owned by the current user.
    ///
    /// # Errors
    ///
    /// As [`ApiClient::list_briefs`]; a foreign or unknown brief is a `404`
    /// [`ApiError::Status`].
    pub async fn get_brief(&self, id: BriefId) -> Result<Brief, ApiError> {
        let request = self.authorized(self.client().get(self.endpoint(&format!("brief/{id}"))?))?;
        self.send_json(request, &format!("GET /brief/{id}")).await
    }

    /// Creates a brief. The server assigns its identifier.
    ///
    /// # Errors
    ///
    /// As [`ApiClient::list_briefs`].
    pub async fn create_brief(&self, input: &BriefInput) -> Result<Brief, ApiError> {
        let request = self.authorized(self.client().post(self.endpoint("brief")?))?;
        let brief: Brief = self.send_json(request.json(input), "POST /brief").await?;
        tracing::info!(brief_id = brief.id, brand = %brief.brand, "brief created");
        Ok(brief)
    }

    /// Registers influencer handles. Returns the created records in request
    /// order.
    ///
    /// # Errors
    ///
    /// As [`ApiClient::list_briefs`].
    pub async fn add_influencers(
        &self,
        items: &[InfluencerInput],
    ) -> Result<Vec<Influencer>, ApiError> {
        let request = self.authorized(self.client().post(self.endpoint("influencers")?))?;
        let created: Vec<Influencer> = self
            .send_json(request.json(items), "POST /influencers")
            .await?;
        tracing::info!(count = created.len(), "influencers added");
        Ok(created)
    }

    /// Lists every known influencer.
    ///
    /// # Errors
    ///
    /// As [`ApiClient::list_briefs`].
    pub async fn list_influencers(&self) -> Result<Vec<Influencer>, ApiError> {
        let request = self.authorized(self.client().get(self.endpoint("influencers")?))?;
        self.send_json(request, "GET /influencers").await
    }
}
