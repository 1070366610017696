use squigrank_core::error::Error;
use squigrank_core::Fetcher;
use std::io::Read;
use std::time::Duration;

/// Hard cap on response size; catalog documents and FR text files are tiny.
const MAX_RESPONSE_BYTES: u64 = 8 * 1024 * 1024;

/// HTTP transport for the core pipeline. One agent, shared connection pool,
/// per-request timeout. Some hosts refuse requests without a browser-ish
/// User-Agent.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (compatible; squigrank)")
            .build();
        HttpFetcher { agent }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, Error> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| Error::TransportUnavailable(format!("{url}: {e}")))?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_RESPONSE_BYTES)
            .read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}
