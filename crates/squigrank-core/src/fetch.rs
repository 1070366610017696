use crate::error::Error;

/// Transport capability injected into the engine. The core never opens a
/// socket itself; the CLI provides an HTTP implementation, tests provide a
/// static one.
pub trait Fetcher: Send + Sync {
    /// Fetch the resource at `url`. Unreachable hosts and non-success
    /// responses map to `Error::TransportUnavailable`.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, Error>;
}

pub fn phone_book_url(base_url: &str) -> String {
    format!("{}/data/phone_book.json", base_url.trim_end_matches('/'))
}

pub fn measurement_url(base_url: &str, measurement_id: &str) -> String {
    format!(
        "{}/data/{}.txt",
        base_url.trim_end_matches('/'),
        urlencoding::encode(measurement_id)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        assert_eq!(
            phone_book_url("https://crinacle.squig.link/"),
            "https://crinacle.squig.link/data/phone_book.json"
        );
        assert_eq!(
            measurement_url("https://crinacle.squig.link", "64 Audio U12t"),
            "https://crinacle.squig.link/data/64%20Audio%20U12t.txt"
        );
    }
}
