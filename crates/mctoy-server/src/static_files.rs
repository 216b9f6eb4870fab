//! Static file serving for a bundled front end

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::Response;
use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Result of attempting to serve a file
pub enum FileResponse {
    /// File found and served
    Found(Response<Full<Bytes>>),
    /// No file, or a directory without an index file
    NotFound,
    /// Path escapes the root or is not valid UTF-8
    Forbidden,
    /// Error occurred
    Error(String),
}

/// Serve `path` from under `root`, trying `index_files` for directories
pub async fn serve_file(root: &str, path: &str, index_files: &[String]) -> FileResponse {
    let decoded_path = match percent_decode_str(path).decode_utf8() {
        Ok(p) => p.into_owned(),
        Err(_) => return FileResponse::Forbidden,
    };

    let clean_path = decoded_path.trim_start_matches('/');
    if clean_path.split(&['/', '\\'][..]).any(|segment| segment == "..") {
        return FileResponse::Forbidden;
    }

    let mut file_path = PathBuf::from(root);
    if !clean_path.is_empty() {
        file_path.push(clean_path);
    }

    match fs::metadata(&file_path).await {
        Ok(meta) if meta.is_dir() => {
            for index in index_files {
                let index_path = file_path.join(index);
                if let Ok(index_meta) = fs::metadata(&index_path).await {
                    if index_meta.is_file() {
                        return serve_single_file(&index_path).await;
                    }
                }
            }
            FileResponse::NotFound
        }
        Ok(_) => serve_single_file(&file_path).await,
        Err(_) => FileResponse::NotFound,
    }
}

async fn serve_single_file(path: &Path) -> FileResponse {
    match fs::read(path).await {
        Ok(contents) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            let mut response = Response::new(Full::new(Bytes::from(contents)));
            if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
                response.headers_mut().insert(CONTENT_TYPE, value);
            }
            FileResponse::Found(response)
        }
        Err(e) => FileResponse::Error(format!("Failed to read file: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn scratch_root(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("mctoy-static-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(root.join("assets")).unwrap();
        std::fs::write(root.join("index.html"), "<h1>toys</h1>").unwrap();
        std::fs::write(root.join("assets/app.js"), "console.log(1)").unwrap();
        root
    }

    #[tokio::test]
    async fn test_serves_index_and_assets() {
        let root = scratch_root("serve");
        let root_str = root.to_str().unwrap();
        let index = vec!["index.html".to_string()];

        let FileResponse::Found(response) = serve_file(root_str, "/", &index).await else {
            panic!("index not served");
        };
        assert_eq!(response.headers()[CONTENT_TYPE], "text/html");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"<h1>toys</h1>");

        let FileResponse::Found(response) = serve_file(root_str, "/assets/app.js", &index).await else {
            panic!("asset not served");
        };
        assert!(response.headers()[CONTENT_TYPE]
            .to_str()
            .unwrap()
            .contains("javascript"));

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn test_missing_and_traversal() {
        let root = scratch_root("guard");
        let root_str = root.to_str().unwrap();

        assert!(matches!(
            serve_file(root_str, "/missing.css", &[]).await,
            FileResponse::NotFound
        ));
        assert!(matches!(
            serve_file(root_str, "/assets", &[]).await,
            FileResponse::NotFound
        ));
        assert!(matches!(
            serve_file(root_str, "/%2E%2E/etc/passwd", &[]).await,
            FileResponse::Forbidden
        ));

        std::fs::remove_dir_all(&root).unwrap();
    }
}
