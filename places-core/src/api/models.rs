//! Wire types of the places API

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::Endpoints;
use crate::session::{Credentials, SessionSnapshot};

/// A registered user as listed in the directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    /// Server-stored image path, relative to the asset root
    #[serde(default)]
    pub image: String,
    /// Ids of the places this user created
    #[serde(default)]
    pub places: Vec<String>,
}

impl User {
    pub fn place_count(&self) -> usize {
        self.places.len()
    }

    pub fn image_url(&self, endpoints: &Endpoints) -> String {
        endpoints.asset_url(&self.image)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

/// A place record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub location: Option<Location>,
    /// Id of the user who created the place
    pub creator: String,
}

impl Place {
    /// Edit and delete are offered only to the creator
    pub fn is_owned_by(&self, session: &SessionSnapshot) -> bool {
        session.user_id() == Some(self.creator.as_str())
    }

    pub fn image_url(&self, endpoints: &Endpoints) -> String {
        endpoints.asset_url(&self.image)
    }
}

/// `{ userId, token }` returned by login and signup
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user_id: String,
    pub token: String,
}

impl AuthResponse {
    pub fn into_credentials(self) -> Credentials {
        Credentials::new(self.user_id, self.token)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlacesResponse {
    pub places: Vec<Place>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlaceResponse {
    pub place: Place,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Image file attached to a multipart form
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Read an image from disk, deriving the MIME type from the extension
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        Ok(Self {
            mime: mime.essence_str().to_string(),
            file_name,
            bytes,
        })
    }
}

/// Validated login input
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Validated signup input
#[derive(Debug, Clone)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub image: ImageUpload,
}

/// Validated input for a new place
#[derive(Debug, Clone)]
pub struct NewPlaceForm {
    pub title: String,
    pub description: String,
    pub address: String,
    pub image: ImageUpload,
}

/// Validated input for editing a place
#[derive(Debug, Clone, Serialize)]
pub struct UpdatePlaceForm {
    pub title: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::ClientConfig;
    use crate::session::{SessionEpoch, SessionState};

    fn place(creator: &str) -> Place {
        serde_json::from_value(json!({
            "id": "p1",
            "title": "Empire State Building",
            "description": "One of the most famous sky scrapers in the world!",
            "image": "uploads/images/p1.jpg",
            "address": "20 W 34th St, New York, NY 10001",
            "location": {"lat": 40.7484405, "lng": -73.9878584},
            "creator": creator
        }))
        .unwrap()
    }

    #[test]
    fn place_decodes_full_record() {
        let place = place("u1");
        assert_eq!(place.title, "Empire State Building");
        assert_eq!(place.location.unwrap().lat, 40.7484405);
    }

    #[test]
    fn place_ownership_follows_session_user() {
        let place = place("u1");
        let owner = SessionSnapshot::new(
            SessionState::Authenticated(Credentials::new("u1", "t1")),
            SessionEpoch::default(),
        );
        let other = SessionSnapshot::new(
            SessionState::Authenticated(Credentials::new("u2", "t2")),
            SessionEpoch::default(),
        );

        assert!(place.is_owned_by(&owner));
        assert!(!place.is_owned_by(&other));
        assert!(!place.is_owned_by(&SessionSnapshot::default()));
    }

    #[test]
    fn image_urls_use_asset_root() {
        let endpoints = ClientConfig::new("http://api.test/api", "http://assets.test")
            .endpoints()
            .unwrap();
        assert_eq!(
            place("u1").image_url(&endpoints),
            "http://assets.test/uploads/images/p1.jpg"
        );
    }

    #[test]
    fn user_counts_places() {
        let user: User = serde_json::from_value(json!({
            "id": "u1",
            "name": "Max",
            "image": "uploads/images/u1.png",
            "places": ["p1", "p2", "p3"],
            "email": "max@example.com"
        }))
        .unwrap();
        assert_eq!(user.place_count(), 3);
    }

    #[test]
    fn auth_response_uses_camel_case() {
        let response: AuthResponse =
            serde_json::from_value(json!({"userId": "u1", "email": "a@b.c", "token": "t1"}))
                .unwrap();
        let credentials = response.into_credentials();
        assert_eq!(credentials.user_id(), "u1");
        assert_eq!(credentials.token(), "t1");
    }

    #[tokio::test]
    async fn image_upload_guesses_mime_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        for (name, mime) in [
            ("a.PNG", "image/png"),
            ("a.jpeg", "image/jpeg"),
            ("a.svg", "image/svg+xml"),
            ("a.bmp", "image/bmp"),
            ("a.tiff", "image/tiff"),
            ("a", "application/octet-stream"),
        ] {
            let path = dir.path().join(name);
            std::fs::write(&path, [0u8]).unwrap();

            let upload = ImageUpload::from_path(&path).await.unwrap();

            assert_eq!(upload.mime, mime, "{name}");
        }
    }

    #[tokio::test]
    async fn image_upload_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF]).unwrap();

        let upload = ImageUpload::from_path(&path).await.unwrap();

        assert_eq!(upload.file_name, "photo.jpg");
        assert_eq!(upload.mime, "image/jpeg");
        assert_eq!(upload.bytes, vec![0xFF, 0xD8, 0xFF]);
    }
}
