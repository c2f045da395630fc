use std::sync::Arc;
use std::sync::mpsc;

use image::DynamicImage;
use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;

use crate::app::boxoffice::MovieInfo;
use crate::app::error::FetchError;
use crate::app::kakao::ImageService;
use crate::app::kobis::MovieService;
use crate::app::render::RowViewModel;

/// Everything the detail screen needs to load itself.
#[derive(Clone)]
pub struct DetailRequest {
    pub movie_service: Arc<dyn MovieService>,
    pub image_service: Arc<dyn ImageService>,
    pub movie_code: String,
    pub movie_title: String,
}

/// Builds a detail request for the activated row. Rows missing a code or
/// a title are ignored.
pub fn activate(
    row: Option<&RowViewModel>,
    movie_service: &Arc<dyn MovieService>,
    image_service: &Arc<dyn ImageService>,
) -> Option<DetailRequest> {
    let row = row?;
    let movie_code = row.movie_code.clone()?;
    let movie_title = row.movie_name.clone()?;

    Some(DetailRequest {
        movie_service: Arc::clone(movie_service),
        image_service: Arc::clone(image_service),
        movie_code,
        movie_title,
    })
}

/// Screens pushed on top of the box office list. The list itself is the
/// root and is never popped.
pub struct NavigationStack<S> {
    screens: Vec<S>,
}

impl<S> Default for NavigationStack<S> {
    fn default() -> Self {
        Self { screens: Vec::new() }
    }
}

impl<S> NavigationStack<S> {
    pub fn push(&mut self, screen: S) {
        self.screens.push(screen);
    }

    pub fn pop(&mut self) -> Option<S> {
        self.screens.pop()
    }

    pub fn top_mut(&mut self) -> Option<&mut S> {
        self.screens.last_mut()
    }

    #[cfg(test)]
    pub fn top(&self) -> Option<&S> {
        self.screens.last()
    }

    pub fn is_root(&self) -> bool {
        self.screens.is_empty()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Loadable<T> {
    Loading,
    Ready(T),
    Failed(String),
}

enum DetailMessage {
    Info(Result<MovieInfo, FetchError>),
    Poster(Result<Option<DynamicImage>, FetchError>),
}

/// Movie information and poster for one movie.
pub struct MovieDetailScreen {
    movie_code: String,
    movie_title: String,
    pub info: Loadable<MovieInfo>,
    pub poster: Loadable<Option<DynamicImage>>,
    pub poster_protocol: Option<StatefulProtocol>,
    receiver: mpsc::Receiver<DetailMessage>,
}

impl MovieDetailScreen {
    /// Starts the info and poster fetches in the background.
    pub fn open(request: DetailRequest) -> Self {
        let (sender, receiver) = mpsc::channel();
        tracing::info!(movie_code = %request.movie_code, "opening movie detail");

        let movie_service = Arc::clone(&request.movie_service);
        let code = request.movie_code.clone();
        let info_sender = sender.clone();
        std::thread::spawn(move || {
            let result = movie_service.fetch_movie_info(&code);
            let _ = info_sender.send(DetailMessage::Info(result));
        });

        let image_service = Arc::clone(&request.image_service);
        let title = request.movie_title.clone();
        std::thread::spawn(move || {
            let result = image_service
                .search_poster(&title)
                .and_then(|url| url.map(|url| image_service.download(&url)).transpose());
            let _ = sender.send(DetailMessage::Poster(result));
        });

        Self {
            movie_code: request.movie_code,
            movie_title: request.movie_title,
            info: Loadable::Loading,
            poster: Loadable::Loading,
            poster_protocol: None,
            receiver,
        }
    }

    pub fn movie_code(&self) -> &str {
        &self.movie_code
    }

    pub fn movie_title(&self) -> &str {
        &self.movie_title
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.info, Loadable::Loading) || matches!(self.poster, Loadable::Loading)
    }

    /// Applies finished fetches. A decoded poster is turned into a render
    /// protocol when the terminal supports images.
    pub fn poll(&mut self, picker: Option<&Picker>) -> bool {
        let mut changed = false;
        while let Ok(message) = self.receiver.try_recv() {
            self.apply(message);
            changed = true;
        }

        if self.poster_protocol.is_none() {
            if let (Some(picker), Loadable::Ready(Some(image))) = (picker, &self.poster) {
                self.poster_protocol = Some(picker.new_resize_protocol(image.clone()));
                changed = true;
            }
        }
        changed
    }

    fn apply(&mut self, message: DetailMessage) {
        match message {
            DetailMessage::Info(Ok(info)) => self.info = Loadable::Ready(info),
            DetailMessage::Info(Err(error)) => {
                tracing::error!(movie_code = %self.movie_code, %error, "failed to fetch movie info");
                self.info = Loadable::Failed(error.to_string());
            }
            DetailMessage::Poster(Ok(image)) => {
                if image.is_none() {
                    tracing::debug!(title = %self.movie_title, "no poster found");
                }
                self.poster = Loadable::Ready(image);
            }
            DetailMessage::Poster(Err(error)) => {
                tracing::warn!(title = %self.movie_title, %error, "failed to fetch poster");
                self.poster = Loadable::Failed(error.to_string());
            }
        }
    }

    #[cfg(test)]
    pub fn wait_until_loaded(&mut self) {
        while self.is_loading() {
            let message = self
                .receiver
                .recv_timeout(crate::app::testing::WAIT)
                .expect("detail fetch did not complete");
            self.apply(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::render::{PresentationMode, RankChange};
    use crate::app::testing::{FakeImageService, FakeMovieService};

    fn services(poster_url: Option<&str>) -> (Arc<dyn MovieService>, Arc<dyn ImageService>) {
        (
            Arc::new(FakeMovieService::with_chart()),
            Arc::new(FakeImageService {
                poster_url: poster_url.map(str::to_string),
            }),
        )
    }

    fn row(code: Option<&str>, name: Option<&str>) -> RowViewModel {
        RowViewModel {
            rank: "1".to_string(),
            rank_change: RankChange::NewEntry,
            title: name.unwrap_or_default().to_string(),
            audience: "오늘 1 / 총 1".to_string(),
            movie_code: code.map(str::to_string),
            movie_name: name.map(str::to_string),
            mode: PresentationMode::Card,
        }
    }

    #[test]
    fn activation_builds_request() {
        let (movies, images) = services(None);
        let request = activate(Some(&row(Some("A"), Some("Alpha"))), &movies, &images).unwrap();
        assert_eq!(request.movie_code, "A");
        assert_eq!(request.movie_title, "Alpha");
    }

    #[test]
    fn activation_without_code_or_name_is_a_no_op() {
        let (movies, images) = services(None);
        assert!(activate(Some(&row(None, Some("Alpha"))), &movies, &images).is_none());
        assert!(activate(Some(&row(Some("A"), None)), &movies, &images).is_none());
        assert!(activate(None, &movies, &images).is_none());
    }

    #[test]
    fn stack_never_pops_the_root() {
        let mut stack = NavigationStack::default();
        assert!(stack.is_root());
        stack.push("detail");
        assert!(!stack.is_root());
        assert_eq!(stack.top(), Some(&"detail"));
        assert_eq!(stack.pop(), Some("detail"));
        assert_eq!(stack.pop(), None);
        assert!(stack.is_root());
    }

    #[test]
    fn detail_screen_loads_info_and_poster() {
        let (movies, images) = services(Some("https://example.com/a.jpg"));
        let request = activate(Some(&row(Some("A"), Some("Alpha"))), &movies, &images).unwrap();
        let mut screen = MovieDetailScreen::open(request);
        assert!(screen.is_loading());

        screen.wait_until_loaded();
        match &screen.info {
            Loadable::Ready(info) => assert_eq!(info.movie_code, "A"),
            other => panic!("unexpected info state: {:?}", other),
        }
        assert!(matches!(screen.poster, Loadable::Ready(Some(_))));
    }

    #[test]
    fn missing_poster_is_not_an_error() {
        let (movies, images) = services(None);
        let request = activate(Some(&row(Some("A"), Some("Alpha"))), &movies, &images).unwrap();
        let mut screen = MovieDetailScreen::open(request);
        screen.wait_until_loaded();
        assert_eq!(screen.poster, Loadable::Ready(None));
    }

    #[test]
    fn info_failure_is_kept_on_screen() {
        let (movies, images) = services(None);
        let request = activate(Some(&row(Some("missing"), Some("Ghost"))), &movies, &images).unwrap();
        let mut screen = MovieDetailScreen::open(request);
        screen.wait_until_loaded();
        assert!(matches!(&screen.info, Loadable::Failed(message) if message.contains("no such movie")));
    }
}
