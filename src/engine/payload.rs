use serde::Deserialize;

/// Raw post as delivered by the upstream stream.
///
/// Only the fields read during normalization are modelled; everything else in
/// the payload is ignored. A reshare carries the original post in
/// `retweeted_status`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPost {
    pub id: Option<u64>,
    pub user: Option<RawUser>,
    pub created_at: Option<String>,
    pub coordinates: Option<RawPoint>,
    pub lang: Option<String>,
    pub text: Option<String>,
    pub extended_tweet: Option<ExtendedText>,
    pub retweeted_status: Option<Box<RawPost>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    pub id: Option<u64>,
}

/// GeoJSON point; `coordinates` is `[longitude, latitude]`
#[derive(Debug, Clone, Deserialize)]
pub struct RawPoint {
    pub coordinates: Vec<f64>,
}

/// Untruncated text attached to long posts
#[derive(Debug, Clone, Deserialize)]
pub struct ExtendedText {
    pub full_text: String,
}
