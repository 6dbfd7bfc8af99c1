use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};

use crate::error::Result;
use crate::remote::FileTransfer;

/// Plain HTTP GET into a local file.
pub struct HttpTransfer {
    client: Client,
}

impl HttpTransfer {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FileTransfer for HttpTransfer {
    #[instrument(skip(self, target))]
    async fn fetch(&self, url: &str, target: &Path) -> Result<u64> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            warn!("GET {} returned {}", url, response.status());
            File::create(target).await?;
            return Ok(0);
        }

        let bytes = write_body(response, target).await?;
        info!("Fetched {} bytes from {}", bytes, url);
        Ok(bytes)
    }
}

/// Stream a response body to `target` via a `.partial` sibling so an
/// interrupted transfer never looks like a finished file.
pub(crate) async fn write_body(response: Response, target: &Path) -> Result<u64> {
    let partial = partial_path(target);

    let written = match stream_to(response, &partial).await {
        Ok(written) => written,
        Err(e) => {
            warn!("Transfer into {} failed: {}", partial.display(), e);
            if let Err(remove_err) = fs::remove_file(&partial).await {
                debug!("Could not remove {}: {}", partial.display(), remove_err);
            }
            return Err(e);
        }
    };

    fs::rename(&partial, target).await?;
    debug!("Wrote {} bytes to {}", written, target.display());
    Ok(written)
}

async fn stream_to(response: Response, path: &Path) -> Result<u64> {
    let mut file = File::create(path).await?;
    let mut stream = response.bytes_stream();
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;

    Ok(written)
}

fn partial_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    target.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a local port and return its URL
    async fn serve_once(response: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            socket.write_all(response).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{}/no2/2021/05/no2_202105.asc.gz", addr)
    }

    fn transfer() -> HttpTransfer {
        HttpTransfer::with_client(Client::new())
    }

    #[tokio::test]
    async fn test_not_found_leaves_empty_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("no2_202105.asc.gz");
        let url = serve_once(
            b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;

        let bytes = transfer().fetch(&url, &target).await.unwrap();

        assert_eq!(bytes, 0);
        assert!(target.is_file());
        assert_eq!(std::fs::metadata(&target).unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_success_writes_body() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("no2_202105.asc.gz");
        let url = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\ngrid!",
        )
        .await;

        let bytes = transfer().fetch(&url, &target).await.unwrap();

        assert_eq!(bytes, 5);
        assert_eq!(std::fs::read(&target).unwrap(), b"grid!");
        assert!(!partial_path(&target).exists());
    }

    #[tokio::test]
    async fn test_truncated_body_removes_partial_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("no2_202105.asc.gz");
        let url = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\nConnection: close\r\n\r\nshort",
        )
        .await;

        let result = transfer().fetch(&url, &target).await;

        assert!(result.is_err());
        assert!(!target.exists());
        assert!(!partial_path(&target).exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path(Path::new("/data/no2_202105.asc.gz")),
            PathBuf::from("/data/no2_202105.asc.gz.partial")
        );
    }
}
