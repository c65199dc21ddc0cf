//! HTTP downloads of remote artifacts into the local cache.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;

use crate::error::FetchError;
use crate::io::fetch::{ArtifactRole, Fetcher};
use crate::paths::filename_from_url;

/// Downloads `http(s)://` references into a cache directory.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    cache: PathBuf,
}

impl HttpFetcher {
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the HTTP client can not be built.
    pub fn new(cache: impl Into<PathBuf>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(crate::USER_AGENT)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self::with_client(client, cache))
    }

    pub fn with_client(client: Client, cache: impl Into<PathBuf>) -> Self {
        Self {
            client,
            cache: cache.into(),
        }
    }

    /// Download `url` to `dest`, returning the number of bytes written.
    ///
    /// The body is streamed into a `.part` file next to `dest` and renamed
    /// once complete, so `dest` never holds a truncated download.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Status`] for a non-success response, or
    /// [`FetchError::Http`] / [`FetchError::Io`] if the transfer fails.
    pub fn download(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        let http_err = |source| FetchError::Http {
            url: url.to_string(),
            source,
        };

        let mut response = self.client.get(url).send().map_err(http_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut part = dest.as_os_str().to_owned();
        part.push(".part");
        let part = PathBuf::from(part);

        let mut file = File::create(&part)?;
        let written = response.copy_to(&mut file).map_err(http_err)?;
        drop(file);
        fs::rename(&part, dest)?;

        tracing::debug!("Downloaded {url} ({written} bytes) to {}", dest.display());
        Ok(written)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, role: ArtifactRole, reference: &str) -> Result<PathBuf, FetchError> {
        let filename = filename_from_url(reference);
        if filename.is_empty() {
            return Err(FetchError::Missing {
                role: role.label(),
                reference: reference.to_string(),
                path: self.cache.clone(),
            });
        }

        let dest = self.cache.join(filename);
        self.download(reference, &dest)?;
        Ok(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[test]
    fn test_fetch_into_cache() {
        let mut server = Server::new();
        let _m = server
            .mock("GET", "/dl/lib.sh")
            .with_status(200)
            .with_body("#!/bin/sh\necho installed\n")
            .create();

        let cache = tempfile::tempdir().unwrap();
        let fetcher = HttpFetcher::new(cache.path()).unwrap();
        let url = format!("{}/dl/lib.sh", server.url());

        let path = fetcher.fetch(ArtifactRole::InstallScript, &url).unwrap();
        assert_eq!(path, cache.path().join("lib.sh"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "#!/bin/sh\necho installed\n"
        );
        assert!(!cache.path().join("lib.sh.part").exists());
    }

    #[test]
    fn test_fetch_not_found() {
        let mut server = Server::new();
        let _m = server.mock("GET", "/dl/gone.tar.gz").with_status(404).create();

        let cache = tempfile::tempdir().unwrap();
        let fetcher = HttpFetcher::new(cache.path()).unwrap();
        let url = format!("{}/dl/gone.tar.gz", server.url());

        let err = fetcher.fetch(ArtifactRole::Source, &url).unwrap_err();
        match err {
            FetchError::Status { status, .. } => assert_eq!(status.as_u16(), 404),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!cache.path().join("gone.tar.gz").exists());
    }

    #[test]
    fn test_fetch_url_without_filename() {
        let cache = tempfile::tempdir().unwrap();
        let fetcher = HttpFetcher::new(cache.path()).unwrap();

        let err = fetcher
            .fetch(ArtifactRole::Source, "https://example.com/")
            .unwrap_err();
        assert!(matches!(err, FetchError::Missing { .. }));
    }
}
