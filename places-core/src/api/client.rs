//! Call sites of the places API
//!
//! Every operation runs through a caller-owned [`RequestController`], so the
//! caller's loading/error state reflects it. Session-mutating operations
//! capture the session epoch before dispatch and only authenticate if no
//! transition happened in between.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use super::models::{
    AuthResponse, LoginForm, MessageResponse, NewPlaceForm, Place, PlaceResponse,
    PlacesResponse, SignupForm, UpdatePlaceForm, User, UsersResponse,
};
use crate::config::Endpoints;
use crate::error::{PlacesError, RequestError};
use crate::request::{ApiRequest, MultipartForm, RequestController, Transport};
use crate::routes::Destination;
use crate::session::{AuthSource, Credentials, SessionEpoch, SessionMachine};

/// Result of a login or signup call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The session now belongs to this user
    Authenticated { user_id: String },
    /// The server accepted the credentials, but the session changed while
    /// the request was in flight; the response was discarded
    Stale,
}

/// A saved record plus the page to navigate to next
#[derive(Debug, Clone, PartialEq)]
pub struct Saved<T> {
    pub value: T,
    pub next: Destination,
}

pub struct PlacesApi {
    endpoints: Endpoints,
    transport: Arc<dyn Transport>,
    session: Arc<SessionMachine>,
}

impl PlacesApi {
    pub fn new(
        endpoints: Endpoints,
        transport: Arc<dyn Transport>,
        session: Arc<SessionMachine>,
    ) -> Self {
        Self {
            endpoints,
            transport,
            session,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn session(&self) -> &Arc<SessionMachine> {
        &self.session
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    pub async fn login(
        &self,
        controller: &RequestController<AuthResponse>,
        form: &LoginForm,
    ) -> Result<AuthOutcome, PlacesError> {
        let issued_at = self.session.snapshot().epoch();
        let request = ApiRequest::post(self.endpoints.api_url("/users/login")).json(json!({
            "email": form.email,
            "password": form.password,
        }));

        let response = controller.send(request).await?;
        self.complete_auth(issued_at, AuthSource::Login, response)
            .await
    }

    pub async fn register(
        &self,
        controller: &RequestController<AuthResponse>,
        form: &SignupForm,
    ) -> Result<AuthOutcome, PlacesError> {
        let issued_at = self.session.snapshot().epoch();
        let body = MultipartForm::new()
            .text("name", &form.name)
            .text("email", &form.email)
            .text("password", &form.password)
            .file(
                "file",
                &form.image.file_name,
                &form.image.mime,
                form.image.bytes.clone(),
            );
        let request = ApiRequest::post(self.endpoints.api_url("/users/signup")).multipart(body);

        let response = controller.send(request).await?;
        self.complete_auth(issued_at, AuthSource::Register, response)
            .await
    }

    /// Explicit logout; nothing is sent to the server
    pub async fn logout(&self) -> Result<bool, PlacesError> {
        Ok(self.session.logout().await?)
    }

    async fn complete_auth(
        &self,
        issued_at: SessionEpoch,
        source: AuthSource,
        response: AuthResponse,
    ) -> Result<AuthOutcome, PlacesError> {
        let user_id = response.user_id.clone();
        let applied = self
            .session
            .authenticate_if_current(issued_at, source, response.into_credentials())
            .await?;
        if applied {
            Ok(AuthOutcome::Authenticated { user_id })
        } else {
            info!(%source, "Session changed during request, response discarded");
            Ok(AuthOutcome::Stale)
        }
    }

    /// The user directory (landing page)
    pub async fn users(
        &self,
        controller: &RequestController<UsersResponse>,
    ) -> Result<Vec<User>, RequestError> {
        let request = ApiRequest::get(self.endpoints.api_url("/users"));
        Ok(controller.send(request).await?.users)
    }

    pub async fn user_places(
        &self,
        controller: &RequestController<PlacesResponse>,
        user_id: &str,
    ) -> Result<Vec<Place>, RequestError> {
        let request = ApiRequest::get(
            self.endpoints
                .api_url(&format!("/places/user/{}", encode_segment(user_id))),
        );
        Ok(controller.send(request).await?.places)
    }

    pub async fn place(
        &self,
        controller: &RequestController<PlaceResponse>,
        place_id: &str,
    ) -> Result<Place, RequestError> {
        let request = ApiRequest::get(self.place_url(place_id));
        Ok(controller.send(request).await?.place)
    }

    pub async fn create_place(
        &self,
        controller: &RequestController<PlaceResponse>,
        form: &NewPlaceForm,
    ) -> Result<Saved<Place>, RequestError> {
        let credentials = self.require_session(controller)?;
        let body = MultipartForm::new()
            .text("title", &form.title)
            .text("description", &form.description)
            .text("address", &form.address)
            .text("creator", credentials.user_id())
            .file(
                "file",
                &form.image.file_name,
                &form.image.mime,
                form.image.bytes.clone(),
            );
        let request = ApiRequest::post(self.endpoints.api_url("/places"))
            .multipart(body)
            .bearer(credentials.token());

        let place = controller.send(request).await?.place;
        Ok(Saved {
            value: place,
            next: Destination::Users,
        })
    }

    pub async fn update_place(
        &self,
        controller: &RequestController<PlaceResponse>,
        place_id: &str,
        form: &UpdatePlaceForm,
    ) -> Result<Saved<Place>, RequestError> {
        let credentials = self.require_session(controller)?;
        let request = ApiRequest::put(self.place_url(place_id))
            .json(json!({
                "title": form.title,
                "description": form.description,
            }))
            .bearer(credentials.token());

        let place = controller.send(request).await?.place;
        Ok(Saved {
            value: place,
            next: Destination::UserPlaces {
                user_id: credentials.user_id().to_string(),
            },
        })
    }

    pub async fn delete_place(
        &self,
        controller: &RequestController<MessageResponse>,
        place_id: &str,
    ) -> Result<MessageResponse, RequestError> {
        let credentials = self.require_session(controller)?;
        let request = ApiRequest::delete(self.place_url(place_id)).bearer(credentials.token());
        controller.send(request).await
    }

    fn place_url(&self, place_id: &str) -> String {
        self.endpoints
            .api_url(&format!("/places/{}", encode_segment(place_id)))
    }

    /// Current credentials, or an `Unauthenticated` failure recorded on
    /// the controller
    fn require_session<T>(
        &self,
        controller: &RequestController<T>,
    ) -> Result<Credentials, RequestError> {
        self.session
            .snapshot()
            .state()
            .credentials()
            .cloned()
            .ok_or_else(|| controller.reject(RequestError::Unauthenticated))
    }
}

/// Percent-encode an id used as a path segment
fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
