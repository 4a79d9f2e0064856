/// Photo paths come in two shapes: external URLs copied from source sites
/// and storage paths relative to the hosted bucket.
pub fn is_external_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

/// Resolve a storage path to a public URL. External URLs pass through.
pub fn photo_url(storage_public_url: &str, storage_path: &str) -> String {
    let storage_path = storage_path.trim();

    if is_external_url(storage_path) {
        return storage_path.to_string();
    }

    format!(
        "{}/{}",
        storage_public_url.trim_end_matches('/'),
        storage_path.trim_start_matches('/')
    )
}

/// Resolve many storage paths, dropping blank entries.
pub fn photo_urls(storage_public_url: &str, storage_paths: &[String]) -> Vec<String> {
    storage_paths
        .iter()
        .filter(|path| !path.trim().is_empty())
        .map(|path| photo_url(storage_public_url, path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://cdn.example.com/listings";

    #[test]
    fn external_urls_pass_through() {
        assert_eq!(
            photo_url(BASE, "https://s3.example.com/photo.jpg"),
            "https://s3.example.com/photo.jpg"
        );
    }

    #[test]
    fn storage_paths_join_the_public_base() {
        assert_eq!(
            photo_url(BASE, "abc123/photo.jpg"),
            "https://cdn.example.com/listings/abc123/photo.jpg"
        );
        assert_eq!(
            photo_url("https://cdn.example.com/listings/", "/abc123/photo.jpg"),
            "https://cdn.example.com/listings/abc123/photo.jpg"
        );
    }

    #[test]
    fn blank_paths_are_dropped() {
        let urls = photo_urls(
            BASE,
            &[
                "a.jpg".to_string(),
                "   ".to_string(),
                String::new(),
                "https://x.test/b.jpg".to_string(),
            ],
        );
        assert_eq!(
            urls,
            vec![
                "https://cdn.example.com/listings/a.jpg".to_string(),
                "https://x.test/b.jpg".to_string(),
            ]
        );
    }
}
