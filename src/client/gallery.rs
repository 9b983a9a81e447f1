//! Gallery admin: paginated image list plus single and bulk adds

use super::admin::AdminCollection;
use super::{ApiClient, ClientResult};
use crate::entities::GalleryImage;
use crate::server::upload::UPLOADS_PATH;

/// Images per admin page
pub const GALLERY_PAGE_SIZE: u64 = 9;

/// Prefix a server-relative upload path with the API origin; other URLs pass through
pub fn resolve_image_url(origin: &str, url: &str) -> String {
    if url.starts_with(UPLOADS_PATH) {
        format!("{}{}", origin.trim_end_matches('/'), url)
    } else {
        url.to_string()
    }
}

pub struct GalleryAdmin {
    pub collection: AdminCollection<GalleryImage>,
    origin: String,
}

impl GalleryAdmin {
    pub fn new(client: &ApiClient) -> Self {
        Self {
            collection: AdminCollection::paginated(GALLERY_PAGE_SIZE),
            origin: client.origin(),
        }
    }

    pub fn page(&self) -> u64 {
        self.collection.page
    }

    pub fn pages(&self) -> u64 {
        self.collection.pages
    }

    pub async fn load(&mut self, client: &ApiClient) {
        self.collection.load(client).await;

        // A deletion can leave us past the last page
        if self.collection.items.is_empty() && self.collection.page > self.collection.pages {
            self.go_to(client, self.collection.pages).await;
        }
    }

    /// Load `page`, clamped to `[1, pages]`
    pub async fn go_to(&mut self, client: &ApiClient, page: u64) {
        let page = page.clamp(1, self.collection.pages.max(1));
        self.collection.query.page = Some(page);
        self.collection.load(client).await;
    }

    pub async fn next_page(&mut self, client: &ApiClient) {
        if self.page() < self.pages() {
            self.go_to(client, self.page() + 1).await;
        }
    }

    pub async fn prev_page(&mut self, client: &ApiClient) {
        if self.page() > 1 {
            self.go_to(client, self.page() - 1).await;
        }
    }

    /// Add one image by URL
    pub async fn add_url(&mut self, client: &ApiClient, url: &str, caption: &str) -> bool {
        let image = GalleryImage {
            url: url.to_string(),
            caption: caption.to_string(),
        };
        self.collection.cancel_edit();
        self.collection.submit(client, &image).await
    }

    /// Upload one file, then add it
    pub async fn add_file(&mut self, client: &ApiClient, file_name: &str, bytes: Vec<u8>, caption: &str) -> bool {
        match client.upload(file_name, bytes).await {
            Ok(url) => self.add_url(client, &url, caption).await,
            Err(err) => {
                self.collection.notification = Some(err.to_string());
                false
            }
        }
    }

    /// Upload several files and create one image per file, all with the same caption
    pub async fn add_files(&mut self, client: &ApiClient, files: Vec<(String, Vec<u8>)>, caption: &str) -> bool {
        let result = Self::create_from_uploads(client, files, caption).await;

        match result {
            Ok(count) => {
                self.collection.notification = Some(format!("{count} images added"));
                self.load(client).await;
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "Bulk gallery upload failed");
                self.collection.notification = Some(err.to_string());
                false
            }
        }
    }

    async fn create_from_uploads(client: &ApiClient, files: Vec<(String, Vec<u8>)>, caption: &str) -> ClientResult<usize> {
        let urls = client.upload_bulk(files).await?;
        for url in &urls {
            client
                .create(&GalleryImage {
                    url: url.clone(),
                    caption: caption.to_string(),
                })
                .await?;
        }
        Ok(urls.len())
    }

    /// Display URL for an image
    pub fn display_url(&self, image: &GalleryImage) -> String {
        resolve_image_url(&self.origin, &image.url)
    }
}
