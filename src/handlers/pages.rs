use rand::seq::SliceRandom;
use serde::Serialize;

use super::HandlerError;
use crate::resources::{ResourceProvider, LINKS_TOKEN, RANDOM_PAGE, ROOT_PAGE};
use crate::response::Response;

/// header -> image URL, served by the `json` route
pub const IMAGES: &[(&str, &str)] = &[
    ("streets", "https://iili.io/JV1pSV.jpg"),
    ("bread", "https://iili.io/Jj9MWG.jpg"),
];

#[derive(Debug, Serialize)]
pub struct ImageRecord<'a> {
    pub header: &'a str,
    pub image: &'a str,
}

/// `root.html` with `${links}` replaced by the content directory listing
pub async fn index(resources: &ResourceProvider) -> Result<Response, HandlerError> {
    let page = resources
        .read_page(ROOT_PAGE)
        .await
        .map_err(|e| not_found(resources, ROOT_PAGE, e))?;
    let links = resources
        .file_list_html()
        .await
        .map_err(|e| not_found(resources, "", e))?;

    let page = String::from_utf8_lossy(&page).replace(LINKS_TOKEN, &links);
    Ok(Response::ok_html(page))
}

pub async fn random_page(resources: &ResourceProvider) -> Result<Response, HandlerError> {
    let page = resources
        .read_page(RANDOM_PAGE)
        .await
        .map_err(|e| not_found(resources, RANDOM_PAGE, e))?;
    Ok(Response::ok_html(page))
}

pub fn random_image() -> Response {
    let (header, image) = IMAGES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(IMAGES[0]);
    image_response(header, image)
}

fn image_response(header: &str, image: &str) -> Response {
    let record = ImageRecord { header, image };
    match serde_json::to_string(&record) {
        Ok(json) => Response::ok_json(json),
        Err(e) => HandlerError::MalformedResponseShape(e.to_string()).into_response(),
    }
}

/// raw bytes of `file/<name>`, every `file/` in the target is removed first
pub async fn file(resources: &ResourceProvider, target: &str) -> Result<Response, HandlerError> {
    let name = target.replace("file/", "");
    match resources.read_file(&name).await {
        Some(bytes) => Ok(Response::ok_html(bytes)),
        None => Err(HandlerError::ResourceNotFound(name)),
    }
}

fn not_found(resources: &ResourceProvider, name: &str, err: std::io::Error) -> HandlerError {
    let path = resources.www_dir().join(name);
    log::warn!("failed to read {}: {}", path.display(), err);
    HandlerError::ResourceNotFound(path.display().to_string())
}
