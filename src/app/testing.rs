//! In-memory services for tests.

use std::sync::Mutex;
use std::time::Duration;

use chrono::NaiveDate;
use image::DynamicImage;

use crate::app::boxoffice::{BoxofficeSnapshot, MovieInfo, RankType, recode};
use crate::app::error::FetchError;
use crate::app::kakao::ImageService;
use crate::app::kobis::{BoxofficeQuery, MovieService};

type BoxofficeResponder = Box<dyn Fn(&BoxofficeQuery) -> Result<BoxofficeSnapshot, FetchError> + Send + Sync>;

pub const WAIT: Duration = Duration::from_secs(5);

pub struct FakeMovieService {
    respond: BoxofficeResponder,
    pub queries: Mutex<Vec<BoxofficeQuery>>,
    pub info_requests: Mutex<Vec<String>>,
}

impl FakeMovieService {
    pub fn new(
        respond: impl Fn(&BoxofficeQuery) -> Result<BoxofficeSnapshot, FetchError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            respond: Box::new(respond),
            queries: Mutex::new(Vec::new()),
            info_requests: Mutex::new(Vec::new()),
        }
    }

    /// Answers every date with the two-movie chart.
    pub fn with_chart() -> Self {
        Self::new(|query| Ok(chart(query.date)))
    }

    pub fn failing() -> Self {
        Self::new(|_| Err(FetchError::Service("boom".to_string())))
    }

    pub fn queried_dates(&self) -> Vec<NaiveDate> {
        self.queries.lock().unwrap().iter().map(|q| q.date).collect()
    }
}

impl MovieService for FakeMovieService {
    fn fetch_boxoffice(&self, query: &BoxofficeQuery) -> Result<BoxofficeSnapshot, FetchError> {
        self.queries.lock().unwrap().push(query.clone());
        (self.respond)(query)
    }

    fn fetch_movie_info(&self, movie_code: &str) -> Result<MovieInfo, FetchError> {
        self.info_requests.lock().unwrap().push(movie_code.to_string());
        if movie_code == "missing" {
            return Err(FetchError::Service("no such movie".to_string()));
        }
        Ok(MovieInfo {
            movie_code: movie_code.to_string(),
            movie_name: format!("Movie {}", movie_code),
            genres: vec!["드라마".to_string()],
            ..MovieInfo::default()
        })
    }
}

pub struct FakeImageService {
    pub poster_url: Option<String>,
}

impl ImageService for FakeImageService {
    fn search_poster(&self, _movie_title: &str) -> Result<Option<String>, FetchError> {
        Ok(self.poster_url.clone())
    }

    fn download(&self, _url: &str) -> Result<DynamicImage, FetchError> {
        Ok(DynamicImage::new_rgb8(2, 3))
    }
}

/// Alpha is new at 1, Beta dropped to 2.
pub fn chart(date: NaiveDate) -> BoxofficeSnapshot {
    BoxofficeSnapshot::new(
        date,
        vec![
            recode(1, RankType::New, "A", "Alpha", 1000, 5000),
            recode(2, RankType::Old(-1), "B", "Beta", 800, 20000),
        ],
    )
    .unwrap()
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
