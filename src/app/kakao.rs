use image::DynamicImage;
use serde::Deserialize;

use crate::app::error::FetchError;

const KAKAO_IMAGE_SEARCH_URL: &str = "https://dapi.kakao.com/v2/search/image";

/// Source of poster images.
pub trait ImageService: Send + Sync {
    /// Looks up a poster for the movie title. `Ok(None)` means the search
    /// succeeded but found nothing.
    fn search_poster(&self, movie_title: &str) -> Result<Option<String>, FetchError>;

    fn download(&self, url: &str) -> Result<DynamicImage, FetchError>;
}

/// Poster lookup through the Kakao image search API.
pub struct KakaoImageService {
    api_key: Option<String>,
    client: reqwest::blocking::Client,
}

#[derive(Debug, Deserialize)]
struct ImageSearchResponse {
    #[serde(default)]
    documents: Vec<ImageDocument>,
}

#[derive(Debug, Deserialize)]
struct ImageDocument {
    image_url: String,
}

impl KakaoImageService {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl ImageService for KakaoImageService {
    fn search_poster(&self, movie_title: &str) -> Result<Option<String>, FetchError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(FetchError::MissingApiKey("KAKAO_API_KEY"))?;
        let query = format!("{} 영화 포스터", movie_title);
        let url = format!(
            "{}?query={}&size=1",
            KAKAO_IMAGE_SEARCH_URL,
            urlencoding::encode(&query)
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("KakaoAK {}", key))
            .send()?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        parse_image_search(&response.text()?)
    }

    /// Downloads and decodes an image
    fn download(&self, url: &str) -> Result<DynamicImage, FetchError> {
        let response = self.client.get(url).send()?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let bytes = response.bytes()?;
        Ok(image::load_from_memory(&bytes)?)
    }
}

fn parse_image_search(body: &str) -> Result<Option<String>, FetchError> {
    let response: ImageSearchResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;
    Ok(response.documents.into_iter().next().map(|doc| doc.image_url))
}
