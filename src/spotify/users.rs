use crate::{
    error::AnalyzeError,
    spotify::SpotifyClient,
    types::{Credential, UserProfile},
};

impl SpotifyClient {
    /// Retrieves the public profile of a Spotify user.
    ///
    /// # Arguments
    ///
    /// * `credential` - Bearer credential, user or app scoped
    /// * `user_id` - Spotify user id, as found in a playlist item's `added_by`
    ///
    /// # Returns
    ///
    /// The profile with its `id` and optional `display_name`.
    ///
    /// # Errors
    ///
    /// An unknown user comes back as [`AnalyzeError::Upstream`] with status 404.
    ///
    /// # Example
    ///
    /// ```
    /// let profile = client.get_user(&credential, "spotify").await?;
    /// println!("{}", profile.display_name.unwrap_or(profile.id));
    /// ```
    pub async fn get_user(
        &self,
        credential: &Credential,
        user_id: &str,
    ) -> Result<UserProfile, AnalyzeError> {
        tracing::debug!(user_id, "fetching user profile");
        self.get_json(credential, &["users", user_id], &[]).await
    }
}
