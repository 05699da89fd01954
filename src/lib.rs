// lib.rs - Catwalk shared core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod capabilities;
pub mod catalog;
pub mod favorites;

use serde::{Deserialize, Serialize};

pub use app::App;
pub use capabilities::{Capabilities, Effect, FetchResult, KvResult};
pub use catalog::{Breed, Photo};
pub use favorites::FavoritesStore;

/// Fixed base of the public cat catalogue API.
pub const API_BASE_URL: &str = "https://api.thecatapi.com/v1";

/// How many sample photos to request per breed selection.
pub const PHOTO_SEARCH_LIMIT: u8 = 12;

/// The single key the favorites store is persisted under. The version suffix
/// leaves room for a migration if the persisted shape ever changes.
pub const FAVORITES_STORE_KEY: &str = "catwalk.favorites.v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Network,
    Timeout,
    Decode,
    Storage,
    Unknown,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Network => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::Decode => "DECODE_ERROR",
            Self::Storage => "STORAGE_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Network | Self::Timeout | Self::Storage)
    }
}

/// An application-level failure, carrying a short description plus optional
/// internal detail that never reaches the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    pub internal_message: Option<String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            internal_message: None,
        }
    }

    #[must_use]
    pub fn with_internal(mut self, internal: impl Into<String>) -> Self {
        self.internal_message = Some(internal.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// The static, friendly message shown to the user. Failures never crash
    /// the app; they surface here and wait for the next user-triggered retry.
    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::Network => {
                "Couldn't reach the cat catalogue. Please check your connection and try again."
                    .into()
            }
            ErrorKind::Timeout => "The request took too long. Please try again.".into(),
            ErrorKind::Decode => {
                "The catalogue sent an unreadable response. Please try again.".into()
            }
            ErrorKind::Storage => "Your favorites couldn't be saved on this device.".into(),
            ErrorKind::Unknown => "Something went wrong. Please try again.".into(),
        }
    }

    /// Classify a non-success HTTP exchange.
    #[must_use]
    pub fn from_http_status(status: u16) -> Self {
        let kind = match status {
            408 => ErrorKind::Timeout,
            _ => ErrorKind::Network,
        };
        Self::new(kind, format!("HTTP error: {status}"))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(internal) = &self.internal_message {
            write!(f, " (internal: {internal})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

/// Error projection handed to the shell.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserFacingError {
    pub message: String,
    pub error_code: String,
    pub is_retryable: bool,
}

impl From<&AppError> for UserFacingError {
    fn from(e: &AppError) -> Self {
        Self {
            message: e.user_facing_message(),
            error_code: e.code().to_string(),
            is_retryable: e.is_retryable(),
        }
    }
}

/// The whole application state. Selection state resets on reload; only the
/// favorites store is persisted.
#[derive(Debug, Default)]
pub struct Model {
    pub breeds: Vec<Breed>,
    pub breeds_loading: bool,
    pub breeds_error: Option<AppError>,

    /// `None` means "all origins".
    pub selected_origin: Option<String>,
    pub selected_breed_id: Option<String>,

    pub photos: Vec<Photo>,
    pub photos_loading: bool,
    pub photo_error: Option<AppError>,
    /// Monotonically increasing token tying photo responses to the selection
    /// that requested them. Responses carrying an older token are discarded.
    pub photo_request_token: u64,

    pub showing_favorites: bool,
    pub modal_photo: Option<Photo>,

    /// Owned here, constructed once at startup, never ambient.
    pub favorites: FavoritesStore,
}

impl Model {
    #[must_use]
    pub fn selected_breed(&self) -> Option<&Breed> {
        let id = self.selected_breed_id.as_deref()?;
        self.breeds.iter().find(|b| b.id == id)
    }

    /// Locate a photo the user can currently see: the gallery grid, the
    /// favorites grid, or the open modal.
    #[must_use]
    pub fn find_photo(&self, photo_id: &str) -> Option<&Photo> {
        self.photos
            .iter()
            .find(|p| p.id == photo_id)
            .or_else(|| self.favorites.get(photo_id))
            .or_else(|| self.modal_photo.as_ref().filter(|p| p.id == photo_id))
    }

    /// Invalidate any in-flight photo request and return the token for the
    /// next one.
    pub fn advance_photo_token(&mut self) -> u64 {
        self.photo_request_token = self.photo_request_token.wrapping_add(1);
        self.photo_request_token
    }

    /// Drop the breed selection and everything derived from it.
    pub fn clear_gallery(&mut self) {
        self.selected_breed_id = None;
        self.photos.clear();
        self.photos_loading = false;
        self.photo_error = None;
    }
}

/// Everything that can happen: shell-originated gestures plus the response
/// events our own effects resolve into. Response variants are core-internal
/// and never cross the FFI boundary, hence the serde skips.
#[derive(Debug, Serialize, Deserialize)]
pub enum Event {
    AppStarted,
    RefreshRequested,

    OriginSelected { origin: Option<String> },
    BreedSelected { breed_id: String },

    FavoritesViewToggled,
    FavoriteToggled { photo_id: String },

    PhotoOpened { photo_id: String },
    /// Explicit close action or the cancellation key; the shell maps both to
    /// this one event.
    ModalClosed,

    DismissError,

    #[serde(skip)]
    BreedsFetched(Box<FetchResult>),
    #[serde(skip)]
    PhotosFetched { token: u64, result: Box<FetchResult> },
    #[serde(skip)]
    FavoritesLoaded(Box<KvResult>),
    #[serde(skip)]
    FavoritesWritten(Box<KvResult>),
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AppStarted => "app_started",
            Self::RefreshRequested => "refresh_requested",
            Self::OriginSelected { .. } => "origin_selected",
            Self::BreedSelected { .. } => "breed_selected",
            Self::FavoritesViewToggled => "favorites_view_toggled",
            Self::FavoriteToggled { .. } => "favorite_toggled",
            Self::PhotoOpened { .. } => "photo_opened",
            Self::ModalClosed => "modal_closed",
            Self::DismissError => "dismiss_error",
            Self::BreedsFetched(_) => "breeds_fetched",
            Self::PhotosFetched { .. } => "photos_fetched",
            Self::FavoritesLoaded(_) => "favorites_loaded",
            Self::FavoritesWritten(_) => "favorites_written",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BreedOption {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BreedDetail {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub temperament: Option<String>,
    pub origin: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhotoTile {
    pub id: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub is_favorite: bool,
}

/// The breed-driven main view.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GalleryState {
    Initial,
    LoadingPhotos,
    PhotosShown { photos: Vec<PhotoTile> },
    EmptyResult,
    ErrorShown { error: UserFacingError },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewModel {
    pub origins: Vec<String>,
    pub breeds: Vec<BreedOption>,
    pub selected_origin: Option<String>,
    pub selected_breed: Option<BreedDetail>,
    pub gallery: GalleryState,

    /// While active the shell shows the favorites grid instead of the
    /// breed-driven view; the gallery state underneath is untouched.
    pub showing_favorites: bool,
    pub favorites: Vec<PhotoTile>,
    pub favorite_count: usize,

    /// Orthogonal overlay, independent of gallery and favorites state.
    pub modal_photo: Option<PhotoTile>,

    pub breeds_loading: bool,
    pub breeds_error: Option<UserFacingError>,
}

pub mod app {
    use serde::de::DeserializeOwned;
    use tracing::{debug, error, warn};

    use super::{
        api, catalog, AppError, Breed, BreedDetail, BreedOption, ErrorKind, Event, FavoritesStore,
        GalleryState, Model, Photo, PhotoTile, UserFacingError, ViewModel, FAVORITES_STORE_KEY,
        PHOTO_SEARCH_LIMIT,
    };
    use crate::capabilities::{Capabilities, FetchResult};

    #[derive(Default)]
    pub struct App;

    impl App {
        fn send_breeds_request(caps: &Capabilities) {
            caps.http
                .get(api::breeds_url().as_str())
                .send(|result| Event::BreedsFetched(Box::new(result)));
        }

        fn send_photos_request(token: u64, breed_id: &str, caps: &Capabilities) {
            caps.http
                .get(api::photo_search_url(breed_id, PHOTO_SEARCH_LIMIT).as_str())
                .send(move |result| Event::PhotosFetched {
                    token,
                    result: Box::new(result),
                });
        }

        /// Rewrite the entire persisted favorites mapping. Runs on every
        /// mutation; there is exactly one writer.
        fn persist_favorites(model: &Model, caps: &Capabilities) {
            match model.favorites.to_bytes() {
                Ok(bytes) => {
                    caps.key_value.set(FAVORITES_STORE_KEY.to_string(), bytes, |result| {
                        Event::FavoritesWritten(Box::new(result))
                    });
                }
                Err(e) => {
                    error!(error = %e, "favorites serialization failed, skipping write");
                }
            }
        }

        /// Collapse an HTTP exchange into either a decoded body or an
        /// [`AppError`]. Transport failures and non-success statuses become
        /// network errors; a malformed body on a successful exchange becomes
        /// a decode error. Callers treat both the same way.
        fn decode_response<T: DeserializeOwned>(result: FetchResult) -> Result<T, AppError> {
            match result {
                Ok(mut response) => {
                    let status: u16 = response.status().into();
                    if !(200..300).contains(&status) {
                        return Err(AppError::from_http_status(status));
                    }
                    let body = response.take_body().unwrap_or_default();
                    serde_json::from_slice(&body).map_err(|e| {
                        AppError::new(ErrorKind::Decode, "Malformed response body")
                            .with_internal(e.to_string())
                    })
                }
                Err(e) => Err(AppError::new(ErrorKind::Network, "Request failed")
                    .with_internal(e.to_string())),
            }
        }

        fn photo_tile(model: &Model, photo: &Photo) -> PhotoTile {
            PhotoTile {
                id: photo.id.clone(),
                url: photo.url.clone(),
                width: photo.width,
                height: photo.height,
                is_favorite: model.favorites.contains(&photo.id),
            }
        }

        fn build_gallery(model: &Model) -> GalleryState {
            if model.photos_loading {
                return GalleryState::LoadingPhotos;
            }
            if let Some(error) = &model.photo_error {
                return GalleryState::ErrorShown {
                    error: error.into(),
                };
            }
            if model.selected_breed_id.is_none() {
                return GalleryState::Initial;
            }
            if model.photos.is_empty() {
                return GalleryState::EmptyResult;
            }
            GalleryState::PhotosShown {
                photos: model
                    .photos
                    .iter()
                    .map(|p| Self::photo_tile(model, p))
                    .collect(),
            }
        }
    }

    impl crux_core::App for App {
        type Event = Event;
        type Model = Model;
        type ViewModel = ViewModel;
        type Capabilities = Capabilities;

        fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
            debug!(event = event.name(), "handling event");

            match event {
                Event::AppStarted => {
                    model.breeds_loading = true;
                    model.breeds_error = None;

                    caps.key_value.get(FAVORITES_STORE_KEY.to_string(), |result| {
                        Event::FavoritesLoaded(Box::new(result))
                    });
                    Self::send_breeds_request(caps);
                    caps.render.render();
                }

                Event::RefreshRequested => {
                    model.breeds_loading = true;
                    model.breeds_error = None;

                    Self::send_breeds_request(caps);
                    caps.render.render();
                }

                Event::BreedsFetched(result) => {
                    model.breeds_loading = false;

                    match Self::decode_response::<Vec<Breed>>(*result) {
                        Ok(breeds) => {
                            debug!(count = breeds.len(), "breed list loaded");
                            model.breeds = breeds;
                            model.breeds_error = None;
                        }
                        Err(e) => {
                            warn!(code = e.code(), error = %e, "breed list fetch failed");
                            model.breeds = Vec::new();
                            model.breeds_error = Some(e);
                        }
                    }
                    caps.render.render();
                }

                Event::OriginSelected { origin } => {
                    model.selected_origin = origin
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty());
                    model.showing_favorites = false;
                    model.clear_gallery();
                    // Any in-flight photo response now belongs to a stale
                    // selection.
                    model.advance_photo_token();
                    caps.render.render();
                }

                Event::BreedSelected { breed_id } => {
                    if !model.breeds.iter().any(|b| b.id == breed_id) {
                        warn!(%breed_id, "breed selection ignored: unknown id");
                        return;
                    }

                    model.showing_favorites = false;
                    model.selected_breed_id = Some(breed_id.clone());
                    model.photos.clear();
                    model.photo_error = None;
                    model.photos_loading = true;

                    let token = model.advance_photo_token();
                    Self::send_photos_request(token, &breed_id, caps);
                    caps.render.render();
                }

                Event::PhotosFetched { token, result } => {
                    if token != model.photo_request_token {
                        debug!(
                            token,
                            current = model.photo_request_token,
                            "discarding stale photo response"
                        );
                        return;
                    }

                    model.photos_loading = false;

                    match Self::decode_response::<Vec<Photo>>(*result) {
                        Ok(photos) => {
                            debug!(count = photos.len(), "photos loaded");
                            model.photos = photos;
                            model.photo_error = None;
                        }
                        Err(e) => {
                            warn!(code = e.code(), error = %e, "photo fetch failed");
                            model.photos = Vec::new();
                            model.photo_error = Some(e);
                        }
                    }
                    caps.render.render();
                }

                Event::FavoritesViewToggled => {
                    model.showing_favorites = !model.showing_favorites;
                    caps.render.render();
                }

                Event::FavoriteToggled { photo_id } => {
                    let Some(photo) = model.find_photo(&photo_id).cloned() else {
                        warn!(%photo_id, "favorite toggle ignored: photo not in view");
                        return;
                    };

                    let now_favorite = model.favorites.toggle(photo);
                    debug!(%photo_id, now_favorite, "favorite toggled");

                    Self::persist_favorites(model, caps);
                    caps.render.render();
                }

                Event::PhotoOpened { photo_id } => {
                    let Some(photo) = model.find_photo(&photo_id).cloned() else {
                        warn!(%photo_id, "modal open ignored: photo not in view");
                        return;
                    };

                    model.modal_photo = Some(photo);
                    caps.render.render();
                }

                Event::ModalClosed => {
                    model.modal_photo = None;
                    caps.render.render();
                }

                Event::DismissError => {
                    model.breeds_error = None;
                    model.photo_error = None;
                    caps.render.render();
                }

                Event::FavoritesLoaded(result) => {
                    match *result {
                        Ok(Some(bytes)) => match FavoritesStore::from_bytes(&bytes) {
                            Ok(store) => {
                                debug!(count = store.len(), "favorites restored");
                                model.favorites = store;
                            }
                            Err(e) => {
                                warn!(error = %e, "persisted favorites unreadable, starting empty");
                            }
                        },
                        // First run: nothing persisted yet.
                        Ok(None) => {}
                        Err(e) => {
                            warn!(error = %e, "favorites load failed");
                        }
                    }
                    caps.render.render();
                }

                Event::FavoritesWritten(result) => {
                    if let Err(e) = *result {
                        error!(error = %e, "favorites write failed");
                    }
                }
            }
        }

        fn view(&self, model: &Model) -> ViewModel {
            let origins = catalog::unique_origins(&model.breeds);

            let visible = match model.selected_origin.as_deref() {
                Some(origin) => catalog::filter_by_origin(&model.breeds, origin),
                None => model.breeds.iter().collect(),
            };
            let breeds = visible
                .into_iter()
                .map(|b| BreedOption {
                    id: b.id.clone(),
                    name: b.name.clone(),
                })
                .collect();

            let selected_breed = model.selected_breed().map(|b| BreedDetail {
                id: b.id.clone(),
                name: b.name.clone(),
                description: b.description.clone(),
                temperament: b.temperament.clone(),
                origin: b.origin.clone(),
            });

            let favorites = model
                .favorites
                .photos()
                .map(|p| Self::photo_tile(model, p))
                .collect();

            let modal_photo = model
                .modal_photo
                .as_ref()
                .map(|p| Self::photo_tile(model, p));

            ViewModel {
                origins,
                breeds,
                selected_origin: model.selected_origin.clone(),
                selected_breed,
                gallery: Self::build_gallery(model),
                showing_favorites: model.showing_favorites,
                favorites,
                favorite_count: model.favorites.len(),
                modal_photo,
                breeds_loading: model.breeds_loading,
                breeds_error: model.breeds_error.as_ref().map(UserFacingError::from),
            }
        }
    }
}
