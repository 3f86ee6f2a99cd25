use tracing::trace;

use super::error::NormalizeError;
use super::payload::RawPost;
use crate::domain::{CanonicalRecord, Coordinates, UNDETERMINED_LANGUAGE, parse_created_at};

/// Turn a raw post into a canonical record.
///
/// Returns `Ok(None)` when the post has no precise point: those posts are not
/// applicable and are dropped without error. A post that has a point but is
/// otherwise malformed is an error for that post only.
///
/// The text is returned as delivered; sanitizing is left to the caller.
pub fn normalize(post: &RawPost) -> Result<Option<CanonicalRecord>, NormalizeError> {
    let Some(point) = post.coordinates.as_ref() else {
        trace!(post_id = ?post.id, "Skipping post without precise coordinates");
        return Ok(None);
    };

    let coordinates = match point.coordinates[..] {
        [longitude, latitude, ..] => Coordinates::from_lon_lat(longitude, latitude)?,
        _ => return Err(NormalizeError::IncompletePoint(point.coordinates.len())),
    };

    let post_id = post.id.ok_or(NormalizeError::MissingField("id"))?;
    let author_id = post
        .user
        .as_ref()
        .and_then(|user| user.id)
        .ok_or(NormalizeError::MissingField("user.id"))?;

    let raw_date = post
        .created_at
        .as_deref()
        .ok_or(NormalizeError::MissingField("created_at"))?;
    let created_at =
        parse_created_at(raw_date).map_err(|source| NormalizeError::InvalidTimestamp {
            value: raw_date.to_string(),
            source,
        })?;

    let language = post
        .lang
        .as_deref()
        .filter(|lang| !lang.is_empty())
        .unwrap_or(UNDETERMINED_LANGUAGE)
        .to_string();

    let text = extract_text(post)
        .ok_or(NormalizeError::MissingField("text"))?
        .to_string();

    Ok(Some(CanonicalRecord {
        post_id,
        author_id,
        created_at,
        coordinates,
        language,
        text,
    }))
}

/// Pick the most complete text available.
///
/// A reshare always reports the original post's text, preferring its
/// untruncated form; otherwise the post's own untruncated text wins over the
/// truncated one.
pub fn extract_text(post: &RawPost) -> Option<&str> {
    let source = post.retweeted_status.as_deref().unwrap_or(post);
    match &source.extended_tweet {
        Some(extended) => Some(extended.full_text.as_str()),
        None => source.text.as_deref(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use proptest::prelude::*;
    use serde_json::json;

    fn post(value: serde_json::Value) -> RawPost {
        serde_json::from_value(value).unwrap()
    }

    fn geotagged() -> serde_json::Value {
        json!({
            "coordinates": {"type": "Point", "coordinates": [-122.4, 37.7]},
            "id": 42,
            "user": {"id": 7},
            "created_at": "Wed Oct 10 20:19:24 +0000 2018",
            "lang": "en",
            "text": "hi\tthere\n"
        })
    }

    #[test]
    fn normalizes_geotagged_post() {
        let record = normalize(&post(geotagged())).unwrap().unwrap();

        assert_eq!(record.post_id, 42);
        assert_eq!(record.author_id, 7);
        assert_eq!(record.created_at.to_rfc3339(), "2018-10-10T20:19:24+00:00");
        assert_eq!(record.coordinates.latitude(), 37.7);
        assert_eq!(record.coordinates.longitude(), -122.4);
        assert_eq!(record.language, "en");
        assert_eq!(record.text, "hi\tthere\n");
    }

    #[test]
    fn skips_post_without_point() {
        let mut value = geotagged();
        value["coordinates"] = serde_json::Value::Null;
        assert!(normalize(&post(value)).unwrap().is_none());
    }

    #[test]
    fn skips_post_with_only_place() {
        let mut value = geotagged();
        value.as_object_mut().unwrap().remove("coordinates");
        value["place"] = json!({"full_name": "San Francisco, CA", "bounding_box": {}});
        assert!(normalize(&post(value)).unwrap().is_none());
    }

    #[test]
    fn skip_wins_over_malformed_fields() {
        let value = json!({"coordinates": null, "created_at": "not a date"});
        assert!(normalize(&post(value)).unwrap().is_none());
    }

    #[test]
    fn missing_language_defaults_to_und() {
        let mut value = geotagged();
        value.as_object_mut().unwrap().remove("lang");
        let record = normalize(&post(value)).unwrap().unwrap();
        assert_eq!(record.language, "und");

        let mut value = geotagged();
        value["lang"] = serde_json::Value::Null;
        let record = normalize(&post(value)).unwrap().unwrap();
        assert_eq!(record.language, "und");
    }

    #[test]
    fn bad_timestamp_is_an_error_not_a_skip() {
        let mut value = geotagged();
        value["created_at"] = json!("2018-10-10 20:19:24");
        match normalize(&post(value)) {
            Err(NormalizeError::InvalidTimestamp { value, .. }) => {
                assert_eq!(value, "2018-10-10 20:19:24");
            }
            other => panic!("Expected InvalidTimestamp, got {other:?}"),
        }
    }

    #[test]
    fn missing_user_is_an_error() {
        let mut value = geotagged();
        value.as_object_mut().unwrap().remove("user");
        assert!(matches!(
            normalize(&post(value)),
            Err(NormalizeError::MissingField("user.id"))
        ));
    }

    #[test]
    fn user_without_numeric_id_is_an_error() {
        let mut value = geotagged();
        value["user"] = json!({"id_str": "7"});
        assert!(matches!(
            normalize(&post(value)),
            Err(NormalizeError::MissingField("user.id"))
        ));
    }

    #[test]
    fn short_point_is_an_error() {
        let mut value = geotagged();
        value["coordinates"] = json!({"coordinates": [12.5]});
        assert!(matches!(
            normalize(&post(value)),
            Err(NormalizeError::IncompletePoint(1))
        ));
    }

    #[test]
    fn out_of_range_point_is_an_error() {
        // latitude 120 after the swap
        let mut value = geotagged();
        value["coordinates"] = json!({"coordinates": [10.0, 120.0]});
        assert!(matches!(
            normalize(&post(value)),
            Err(NormalizeError::Domain(DomainError::InvalidCoordinates { .. }))
        ));
    }

    #[test]
    fn reshare_prefers_original_extended_text() {
        let mut value = geotagged();
        value["text"] = json!("RT @someone: truncated…");
        value["extended_tweet"] = json!({"full_text": "own extended"});
        value["retweeted_status"] = json!({
            "text": "truncated…",
            "extended_tweet": {"full_text": "the whole original text"}
        });
        let record = normalize(&post(value)).unwrap().unwrap();
        assert_eq!(record.text, "the whole original text");
    }

    #[test]
    fn reshare_without_extended_uses_original_text() {
        let mut value = geotagged();
        value["text"] = json!("RT @someone: short");
        value["extended_tweet"] = json!({"full_text": "own extended"});
        value["retweeted_status"] = json!({"text": "short"});
        assert_eq!(extract_text(&post(value)), Some("short"));
    }

    #[test]
    fn own_extended_text_beats_truncated() {
        let mut value = geotagged();
        value["text"] = json!("cut off…");
        value["extended_tweet"] = json!({"full_text": "not cut off at all"});
        assert_eq!(extract_text(&post(value)), Some("not cut off at all"));
    }

    #[test]
    fn falls_back_to_plain_text() {
        assert_eq!(extract_text(&post(geotagged())), Some("hi\tthere\n"));
    }

    #[test]
    fn missing_text_is_an_error() {
        let mut value = geotagged();
        value.as_object_mut().unwrap().remove("text");
        assert!(matches!(
            normalize(&post(value)),
            Err(NormalizeError::MissingField("text"))
        ));
    }

    proptest! {
        #[test]
        fn swaps_upstream_lon_lat(lon in -180.0f64..=180.0, lat in -90.0f64..=90.0) {
            let mut value = geotagged();
            value["coordinates"] = json!({"coordinates": [lon, lat]});
            let record = normalize(&post(value)).unwrap().unwrap();
            prop_assert_eq!(record.coordinates.latitude(), lat);
            prop_assert_eq!(record.coordinates.longitude(), lon);
        }

        #[test]
        fn no_point_never_yields_record(id in any::<u64>(), text in ".*") {
            let value = json!({"id": id, "user": {"id": 1}, "text": text, "coordinates": null});
            prop_assert!(normalize(&post(value)).unwrap().is_none());
        }
    }
}
