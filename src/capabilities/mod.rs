//! Capability wiring for the Catwalk core.
//!
//! We use Crux's built-in capabilities directly: HTTP for the two catalogue
//! endpoints, KeyValue for the persisted favorites, and Render to signal the
//! shell that the view model changed. The core never performs IO itself; it
//! emits these effects and consumes the response events the shell sends back.

use crux_core::render::Render;
use crux_http::Http;
use crux_kv::KeyValue;

use crate::Event;

pub type AppHttp = Http<Event>;
pub type AppKv = KeyValue<Event>;
pub type AppRender = Render<Event>;

/// Raw HTTP exchange result as delivered back by the shell.
///
/// Bodies are decoded by the caller, so transport failures and malformed
/// payloads can be told apart at the single place that cares.
pub type RawResponse = crux_http::Response<Vec<u8>>;
pub type FetchResult = Result<RawResponse, crux_http::HttpError>;

/// Key-value read/write result as delivered back by the shell.
pub type KvResult = Result<Option<Vec<u8>>, crux_kv::error::KeyValueError>;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub http: Http<Event>,
    pub key_value: KeyValue<Event>,
    pub render: Render<Event>,
}
