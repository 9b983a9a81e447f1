//! Sermon admin: full list, client-side search, YouTube thumbnails

use super::ApiClient;
use super::admin::AdminCollection;
use crate::core::entity::Document;
use crate::entities::Sermon;
use reqwest::Url;

/// Video id from `youtu.be/<id>`, `youtube.com/watch?v=<id>`, `/embed/<id>` or `/shorts/<id>`
pub fn extract_youtube_id(video_url: &str) -> Option<String> {
    let url = Url::parse(video_url.trim()).ok()?;
    let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");

    let id = match host {
        "youtu.be" => url.path_segments()?.next().map(str::to_string),
        "youtube.com" | "youtube-nocookie.com" => {
            let from_query = url
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned());
            from_query.or_else(|| {
                let mut segments = url.path_segments()?;
                match segments.next()? {
                    "embed" | "shorts" | "live" | "v" => segments.next().map(str::to_string),
                    _ => None,
                }
            })
        }
        _ => None,
    }?;

    let valid = !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then_some(id)
}

/// `https://img.youtube.com/vi/<id>/hqdefault.jpg` for a YouTube video URL
pub fn youtube_thumbnail(video_url: &str) -> Option<String> {
    extract_youtube_id(video_url).map(|id| format!("https://img.youtube.com/vi/{id}/hqdefault.jpg"))
}

/// Case-insensitive substring match over title and speaker
pub fn filter_sermons<'a>(sermons: &'a [Document<Sermon>], term: &str) -> Vec<&'a Document<Sermon>> {
    let needle = term.to_lowercase();
    sermons
        .iter()
        .filter(|doc| {
            let haystack = format!("{}{}", doc.content.title, doc.content.speaker).to_lowercase();
            haystack.contains(&needle)
        })
        .collect()
}

pub struct SermonAdmin {
    pub collection: AdminCollection<Sermon>,
    pub search: String,
}

impl Default for SermonAdmin {
    fn default() -> Self {
        Self::new()
    }
}

impl SermonAdmin {
    pub fn new() -> Self {
        Self {
            collection: AdminCollection::unpaginated(),
            search: String::new(),
        }
    }

    pub async fn load(&mut self, client: &ApiClient) {
        self.collection.load(client).await;
    }

    /// Sermons matching the current search
    pub fn visible(&self) -> Vec<&Document<Sermon>> {
        filter_sermons(&self.collection.items, &self.search)
    }

    /// Save the form, deriving a thumbnail from the video URL when none is given
    pub async fn submit(&mut self, client: &ApiClient, mut form: Sermon) -> bool {
        let has_thumbnail = form
            .thumbnail_url
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty());
        if !has_thumbnail {
            form.thumbnail_url = form.video_url.as_deref().and_then(youtube_thumbnail);
        }
        self.collection.submit(client, &form).await
    }
}
