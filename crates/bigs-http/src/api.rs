//! Typed operations of the blog API.

use std::sync::Arc;

use serde::de::IgnoredAny;
use tracing::{info, instrument, warn};

use bigs_core::error::{InvalidInputError, RequestError};
use bigs_core::{
    Attachment, Categories, Credentials, Page, Post, PostDraft, Profile, ProfileImage, Result,
    ScrapBook, SessionState, SignUp, TokenPair, TokenRefresh, jwt,
};

use crate::client::{ApiClient, ClientConfig};
use crate::dispatch::Dispatcher;
use crate::endpoints::{self, SignInRequest, SignUpRequest, TokenResponse};
use crate::request::{FormPart, RequestDescriptor};

/// Multipart part carrying the post fields as JSON.
const POST_REQUEST_PART: &str = "request";
/// Multipart part carrying an uploaded file.
const FILE_PART: &str = "file";

/// Client for the blog API, bound to one session.
///
/// Public routes (sign-in, sign-up) go straight through the [`ApiClient`];
/// everything else goes through the [`Dispatcher`].
#[derive(Debug, Clone)]
pub struct BlogApi {
    dispatcher: Dispatcher,
}

impl BlogApi {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Build a client, an HTTP refresher and a dispatcher for `session`.
    pub fn connect(config: &ClientConfig, session: SessionState) -> Result<Self> {
        let client = ApiClient::with_config(config)?;
        Ok(Self::new(Dispatcher::with_http_refresh(client, session)))
    }

    /// Like [`connect`](Self::connect) with a custom refresh strategy.
    pub fn with_refresher(
        config: &ClientConfig,
        session: SessionState,
        refresher: Arc<dyn TokenRefresh>,
    ) -> Result<Self> {
        let client = ApiClient::with_config(config)?;
        Ok(Self::new(Dispatcher::new(client, session, refresher)))
    }

    pub fn session(&self) -> &SessionState {
        self.dispatcher.session()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Absolute URL of an image reference returned by the API.
    pub fn asset_url(&self, reference: &str) -> String {
        self.dispatcher.client().base_url().resolve_asset(reference)
    }

    // ========================================================================
    // Auth
    // ========================================================================

    /// Sign in and start a session.
    ///
    /// The display name is read from the access token's `name` claim and
    /// falls back to the username; the username doubles as the email.
    #[instrument(skip(self, credentials), fields(username = credentials.username()))]
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Profile> {
        let body = SignInRequest {
            username: credentials.username(),
            password: credentials.password(),
        };
        let response: TokenResponse = self
            .dispatcher
            .client()
            .post_public(endpoints::SIGN_IN, &body)
            .await?;

        let tokens = TokenPair::from_parts(response.access_token, response.refresh_token)
            .ok_or_else(|| RequestError::Decode {
                message: "sign-in response is missing a token".to_string(),
            })?;

        let name = match jwt::display_name(tokens.access()) {
            Ok(Some(name)) => name,
            Ok(None) => credentials.username().to_string(),
            Err(e) => {
                warn!(error = %e, "Could not read name from access token");
                credentials.username().to_string()
            }
        };

        let session = self.session();
        session.login(name, credentials.username(), tokens, None);
        Ok(session.profile())
    }

    /// Register a new account. Does not sign in.
    #[instrument(skip(self, form), fields(username = %form.username))]
    pub async fn sign_up(&self, form: &SignUp) -> Result<()> {
        form.validate()?;

        let body = SignUpRequest {
            username: &form.username,
            name: &form.name,
            password: &form.password,
            confirm_password: &form.confirm_password,
        };
        let _: IgnoredAny = self
            .dispatcher
            .client()
            .post_public(endpoints::SIGN_UP, &body)
            .await?;

        info!("Account created");
        Ok(())
    }

    /// End the session locally.
    pub fn sign_out(&self) {
        self.session().clear_auth();
    }

    /// Refresh the token pair now.
    pub async fn refresh_session(&self) -> Result<()> {
        self.dispatcher.refresh().await.map(|_| ())
    }

    // ========================================================================
    // Boards
    // ========================================================================

    /// One page of posts, newest first. `page` is zero-based.
    pub async fn list_posts(&self, page: u32, size: u32) -> Result<Page<Post>> {
        let request = RequestDescriptor::get(endpoints::BOARDS)
            .query("page", page)
            .query("size", size);
        self.dispatcher.dispatch(&request).await
    }

    /// Posts of one page that belong to `category`.
    pub async fn posts_in_category(&self, category: &str, page: u32, size: u32) -> Result<Vec<Post>> {
        let page = self.list_posts(page, size).await?;
        Ok(page
            .content
            .into_iter()
            .filter(|post| post.category == category)
            .collect())
    }

    pub async fn categories(&self) -> Result<Categories> {
        let request = RequestDescriptor::get(endpoints::BOARD_CATEGORIES);
        self.dispatcher.dispatch(&request).await
    }

    pub async fn get_post(&self, id: i64) -> Result<Post> {
        let request = RequestDescriptor::get(endpoints::board(id));
        self.dispatcher.dispatch(&request).await
    }

    #[instrument(skip(self, draft, image), fields(title = %draft.title))]
    pub async fn create_post(&self, draft: &PostDraft, image: Option<Attachment>) -> Result<()> {
        let request =
            RequestDescriptor::post(endpoints::BOARDS).multipart(post_form(draft, image)?);
        let _: IgnoredAny = self.dispatcher.dispatch(&request).await?;
        info!("Post created");
        Ok(())
    }

    #[instrument(skip(self, draft, image))]
    pub async fn update_post(
        &self,
        id: i64,
        draft: &PostDraft,
        image: Option<Attachment>,
    ) -> Result<()> {
        let request =
            RequestDescriptor::patch(endpoints::board(id)).multipart(post_form(draft, image)?);
        let _: IgnoredAny = self.dispatcher.dispatch(&request).await?;
        info!("Post updated");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, id: i64) -> Result<()> {
        let request = RequestDescriptor::delete(endpoints::board(id));
        let _: IgnoredAny = self.dispatcher.dispatch(&request).await?;
        info!("Post deleted");
        Ok(())
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Posts the server has on record as scrapped by the user.
    pub async fn scraps(&self) -> Result<Vec<Post>> {
        let request = RequestDescriptor::get(endpoints::USER_SCRAPS);
        self.dispatcher.dispatch(&request).await
    }

    /// Posts of one listing page whose ids are in the local scrap book.
    pub async fn scrapped_posts(&self, book: &ScrapBook, page: u32, size: u32) -> Result<Vec<Post>> {
        let ids = book.list()?;
        let page = self.list_posts(page, size).await?;
        Ok(page
            .content
            .into_iter()
            .filter(|post| ids.contains(&post.id))
            .collect())
    }

    /// Rename the user; the session profile follows on success.
    ///
    /// Surrounding whitespace is trimmed. A blank name fails with
    /// [`Error::InvalidInput`](bigs_core::Error::InvalidInput) and sends nothing.
    #[instrument(skip(self))]
    pub async fn update_name(&self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(InvalidInputError::Other {
                message: "name must not be blank".to_string(),
            }
            .into());
        }

        let request = RequestDescriptor::patch(endpoints::USER_UPDATE_NAME)
            .json(&endpoints::UpdateNameRequest { name })?;
        let _: IgnoredAny = self.dispatcher.dispatch(&request).await?;

        let profile = self.session().profile();
        self.session().set_profile(name, profile.email, profile.avatar);
        Ok(())
    }

    /// Change the password, then end the session.
    ///
    /// Tokens issued for the old password are stale, so the user signs in
    /// again with the new one.
    #[instrument(skip_all)]
    pub async fn change_password(&self, current: &str, new: &str) -> Result<()> {
        let request = RequestDescriptor::patch(endpoints::USER_CHANGE_PASSWORD).json(
            &endpoints::ChangePasswordRequest {
                current_password: current,
                new_password: new,
            },
        )?;
        let _: IgnoredAny = self.dispatcher.dispatch(&request).await?;
        info!("Password changed, signing out");
        self.session().clear_auth();
        Ok(())
    }

    /// Upload a profile image; the session avatar follows on success.
    ///
    /// Returns the image reference as the API gave it.
    #[instrument(skip(self, image), fields(file = %image.file_name))]
    pub async fn upload_profile_image(&self, image: Attachment) -> Result<String> {
        let request = RequestDescriptor::post(endpoints::USER_PROFILE_IMAGE)
            .multipart(vec![FormPart::file(FILE_PART, image)]);
        let uploaded: ProfileImage = self.dispatcher.dispatch(&request).await?;

        let profile = self.session().profile();
        self.session()
            .set_profile(profile.display_name, profile.email, uploaded.image_url.clone());
        Ok(uploaded.image_url)
    }
}

fn post_form(draft: &PostDraft, image: Option<Attachment>) -> Result<Vec<FormPart>> {
    let mut parts = vec![FormPart::json(POST_REQUEST_PART, draft)?];
    if let Some(image) = image {
        parts.push(FormPart::file(FILE_PART, image));
    }
    Ok(parts)
}
