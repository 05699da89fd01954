//! Request construction for the public cat catalogue API.

use crate::API_BASE_URL;

/// URL of the breed-listing endpoint.
#[must_use]
pub fn breeds_url() -> String {
    format!("{API_BASE_URL}/breeds")
}

/// URL of the photo-search endpoint for a breed. The breed ID and limit go
/// through query encoding.
#[must_use]
pub fn photo_search_url(breed_id: &str, limit: u8) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("breed_ids", breed_id)
        .append_pair("limit", &limit.to_string())
        .finish();
    format!("{API_BASE_URL}/images/search?{query}")
}
