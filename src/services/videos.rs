use crate::models::{MediaType, Video, VideoList};
use crate::services::catalog::CatalogClient;

/// Best-effort trailer lookup for one catalog item.
///
/// Fetches the videos list for the item and picks the first YouTube entry
/// typed `Trailer` or `Teaser`, in upstream order. Failures are swallowed:
/// a missing trailer never blocks shelf assembly.
pub async fn resolve_trailer(
    client: &CatalogClient,
    id: i64,
    media_type: MediaType,
) -> Option<String> {
    let path = match media_type {
        MediaType::Movie => format!("/movie/{id}/videos"),
        MediaType::Tv => format!("/tv/{id}/videos"),
    };

    match client.get::<VideoList>(&path, &[]).await {
        Ok(list) => first_trailer_key(list.results),
        Err(e) => {
            tracing::debug!(id, error = %e, "Trailer lookup failed, continuing without one");
            None
        }
    }
}

fn first_trailer_key(videos: Vec<Video>) -> Option<String> {
    videos
        .into_iter()
        .find(|v| {
            v.site.eq_ignore_ascii_case("YouTube")
                && matches!(v.video_type.as_str(), "Trailer" | "Teaser")
        })
        .map(|v| v.key)
}
