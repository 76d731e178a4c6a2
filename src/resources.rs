//! read-only access to the content directory and the file root

use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

pub const ROOT_PAGE: &str = "root.html";
pub const RANDOM_PAGE: &str = "index.html";
pub const LINKS_TOKEN: &str = "${links}";

#[derive(Debug, Clone)]
pub struct ResourceProvider {
    www_dir: PathBuf,
    file_root: PathBuf,
    strict_paths: bool,
}

impl ResourceProvider {
    pub fn new(www_dir: impl Into<PathBuf>, file_root: impl Into<PathBuf>, strict_paths: bool) -> Self {
        Self {
            www_dir: www_dir.into(),
            file_root: file_root.into(),
            strict_paths,
        }
    }

    pub fn www_dir(&self) -> &Path {
        &self.www_dir
    }

    /// read a whole file into memory
    pub async fn read_all(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path).await
    }

    /// names of the entries in a directory, sorted
    pub async fn list_directory(&self, path: &Path) -> io::Result<Vec<String>> {
        let mut entries = fs::read_dir(path).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    /// read a page from the content directory
    pub async fn read_page(&self, name: &str) -> io::Result<Vec<u8>> {
        self.read_all(&self.www_dir.join(name)).await
    }

    /// the `${links}` replacement for the index page
    pub async fn file_list_html(&self) -> io::Result<String> {
        let names = self.list_directory(&self.www_dir).await?;
        if names.is_empty() {
            return Ok("No files in directory".to_string());
        }

        let mut html = String::from("<ul>\n");
        for name in &names {
            html.push_str(&format!("<li>{}</li>", name));
        }
        html.push_str("</ul>\n");
        Ok(html)
    }

    /// where a `file/<name>` request points, or None when strict containment rejects it
    pub async fn resolve_file(&self, name: &str) -> Option<PathBuf> {
        let candidate = self.file_root.join(name);
        if !self.strict_paths {
            return Some(candidate);
        }

        // reject obvious escapes before touching the filesystem
        if Path::new(name)
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)))
        {
            log::warn!("rejected file path escaping the file root: {}", name);
            return None;
        }

        let root = fs::canonicalize(&self.file_root).await.ok()?;
        let resolved = fs::canonicalize(&candidate).await.ok()?;
        if resolved.starts_with(&root) {
            Some(resolved)
        } else {
            log::warn!("rejected file path escaping the file root: {}", name);
            None
        }
    }

    /// read a file requested through `file/<name>`
    pub async fn read_file(&self, name: &str) -> Option<Vec<u8>> {
        let path = self.resolve_file(name).await?;
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => self.read_all(&path).await.ok(),
            _ => None,
        }
    }
}
