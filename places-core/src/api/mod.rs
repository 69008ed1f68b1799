//! Places API call sites and wire types

pub mod client;
pub mod models;

pub use client::{AuthOutcome, PlacesApi, Saved};
pub use models::{
    AuthResponse, ImageUpload, Location, LoginForm, MessageResponse, NewPlaceForm, Place,
    PlaceResponse, PlacesResponse, SignupForm, UpdatePlaceForm, User, UsersResponse,
};
