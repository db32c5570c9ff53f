//! Sequences "enter mode" transitions over the content area.
//!
//! Each transition clears the grid, options and hero synchronously, then
//! hands the network work to a background thread. Results come back over a
//! channel tagged with the generation of the transition that asked for them;
//! anything older than the current view is dropped.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use chrono::{Datelike, Local};
use image::DynamicImage;
use tracing::{debug, error, info, warn};

use crate::app::catalog::{
    Catalog, Endpoint, LoadingGuard, LoadingIndicator, fetch_detail, fetch_movies, fetch_options,
};
use crate::app::error::FetchError;
use crate::app::models::{MovieDetail, MovieSummary, TaxonomyOption};
use crate::app::poster::load_poster;
use crate::app::view::{
    DetailView, Grid, HeroView, Modal, OptionButton, OptionKind, ViewState, render_list,
    render_options, year_window,
};

pub struct HomeFeed {
    pub movies: Option<Vec<MovieSummary>>,
    pub hero: Option<MovieDetail>,
}

pub enum CatalogMessage {
    HomeLoaded {
        generation: u64,
        result: Result<HomeFeed, FetchError>,
    },
    MoviesLoaded {
        generation: u64,
        result: Result<Option<Vec<MovieSummary>>, FetchError>,
    },
    OptionsLoaded {
        generation: u64,
        kind: OptionKind,
        result: Result<Option<Vec<TaxonomyOption>>, FetchError>,
    },
    DetailLoaded {
        generation: u64,
        result: Result<Option<MovieDetail>, FetchError>,
    },
    PosterLoaded {
        generation: u64,
        poster: Option<DynamicImage>,
    },
    PreviewLoaded {
        generation: u64,
        poster: Option<DynamicImage>,
    },
    BackdropLoaded {
        generation: u64,
        backdrop: Option<DynamicImage>,
    },
}

/// A decoded image plus a counter that changes whenever it does.
#[derive(Default)]
struct ImageSlot {
    image: Option<DynamicImage>,
    revision: u64,
}

impl ImageSlot {
    fn set(&mut self, image: Option<DynamicImage>) {
        self.image = image;
        self.revision += 1;
    }

    fn clear(&mut self) {
        if self.image.take().is_some() {
            self.revision += 1;
        }
    }
}

/// Poster of the highlighted card, shown beside the grid.
#[derive(Default)]
struct Preview {
    slug: Option<String>,
    generation: u64,
    slot: ImageSlot,
}

pub struct Controller {
    catalog: Arc<dyn Catalog>,
    placeholder_url: String,
    loading: LoadingIndicator,
    sender: Sender<CatalogMessage>,
    receiver: Receiver<CatalogMessage>,
    in_flight: usize,
    state: ViewState,
    grid: Grid,
    options: Vec<OptionButton>,
    hero: Option<HeroView>,
    modal: Option<Modal>,
    modal_generation: u64,
    poster: Option<DynamicImage>,
    poster_revision: u64,
    preview: Preview,
    backdrop: ImageSlot,
}

impl Controller {
    pub fn new(catalog: Arc<dyn Catalog>, placeholder_url: &str) -> Self {
        let (sender, receiver) = mpsc::channel();

        Self {
            catalog,
            placeholder_url: placeholder_url.to_string(),
            loading: LoadingIndicator::default(),
            sender,
            receiver,
            in_flight: 0,
            state: ViewState::default(),
            grid: Grid::Blank,
            options: Vec::new(),
            hero: None,
            modal: None,
            modal_generation: 0,
            poster: None,
            poster_revision: 0,
            preview: Preview::default(),
            backdrop: ImageSlot::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn options(&self) -> &[OptionButton] {
        &self.options
    }

    pub fn hero(&self) -> Option<&HeroView> {
        self.hero.as_ref()
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn poster(&self) -> Option<&DynamicImage> {
        self.poster.as_ref()
    }

    /// Changes whenever the modal poster is replaced or cleared.
    pub fn poster_revision(&self) -> u64 {
        self.poster_revision
    }

    pub fn preview(&self) -> Option<&DynamicImage> {
        self.preview.slot.image.as_ref()
    }

    /// Changes whenever the card preview is replaced or cleared.
    pub fn preview_revision(&self) -> u64 {
        self.preview.slot.revision
    }

    /// Backdrop image of the hero banner.
    pub fn backdrop(&self) -> Option<&DynamicImage> {
        self.backdrop.image.as_ref()
    }

    pub fn backdrop_revision(&self) -> u64 {
        self.backdrop.revision
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_visible()
    }

    pub fn loading(&self) -> &LoadingIndicator {
        &self.loading
    }

    pub fn enter_home(&mut self) {
        self.transition(self.state.home());
        info!("entering home feed");

        let generation = self.state.generation;
        self.spawn(move |catalog| CatalogMessage::HomeLoaded {
            generation,
            result: load_home(catalog),
        });
    }

    pub fn enter_taxonomy_browse(&mut self, kind: OptionKind) {
        let Some(endpoint) = kind.list_endpoint() else {
            self.enter_year_browse();
            return;
        };

        self.transition(self.state.browse(kind));
        info!(?kind, "entering taxonomy browse");

        let generation = self.state.generation;
        self.spawn(move |catalog| CatalogMessage::OptionsLoaded {
            generation,
            kind,
            result: logged(&endpoint, fetch_options(catalog, &endpoint)),
        });
    }

    pub fn enter_year_browse(&mut self) {
        self.enter_year_browse_at(Local::now().year());
    }

    /// Year browse anchored at `current_year`; no request is made.
    pub fn enter_year_browse_at(&mut self, current_year: i32) {
        self.transition(self.state.browse(OptionKind::Year));
        info!(current_year, "entering year browse");
        self.options = render_options(year_window(current_year), OptionKind::Year);
    }

    /// Returns `false` (and changes nothing) when the term is blank.
    pub fn enter_search(&mut self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() {
            return false;
        }

        self.transition(self.state.search(term));
        info!(%term, "searching");

        let generation = self.state.generation;
        let endpoint = Endpoint::Search(term.to_string());
        self.spawn(move |catalog| CatalogMessage::MoviesLoaded {
            generation,
            result: logged(&endpoint, fetch_movies(catalog, &endpoint)),
        });
        true
    }

    /// Selects the option at `index` and loads its results into the grid.
    /// The option row itself is left as it is.
    pub fn select_option(&mut self, index: usize) -> bool {
        let Some(button) = self.options.get(index).cloned() else {
            return false;
        };

        self.state = self.state.select(button.kind, &button);
        self.grid = Grid::Blank;
        self.reset_preview();
        info!(kind = ?button.kind, slug = %button.slug, "option selected");

        let generation = self.state.generation;
        let endpoint = button.kind.results_endpoint(&button.slug);
        self.spawn(move |catalog| CatalogMessage::MoviesLoaded {
            generation,
            result: logged(&endpoint, fetch_movies(catalog, &endpoint)),
        });
        true
    }

    /// Opens the modal in its loading state and fetches the movie.
    pub fn open_detail(&mut self, slug: &str) {
        self.modal_generation += 1;
        self.modal = Some(Modal::Loading {
            slug: slug.to_string(),
        });
        self.set_poster(None);
        debug!(%slug, "opening detail");

        let generation = self.modal_generation;
        let slug = slug.to_string();
        self.spawn(move |catalog| {
            let endpoint = Endpoint::Detail(slug.clone());
            CatalogMessage::DetailLoaded {
                generation,
                result: logged(&endpoint, fetch_detail(catalog, &slug)),
            }
        });
    }

    pub fn open_hero_detail(&mut self) -> bool {
        match self.hero.as_ref().map(|hero| hero.slug.clone()) {
            Some(slug) => {
                self.open_detail(&slug);
                true
            }
            None => false,
        }
    }

    /// Loads the poster of the card at `index` for the preview pane.
    /// Asking again for the card already previewed does nothing.
    pub fn preview_card(&mut self, index: usize) -> bool {
        let Some(card) = self.grid.cards().get(index) else {
            return false;
        };
        if self.preview.slug.as_deref() == Some(card.slug.as_str()) {
            return false;
        }

        let slug = card.slug.clone();
        let poster_url = card.poster_url.clone();
        let placeholder_url = self.placeholder_url.clone();
        debug!(%slug, "previewing card");

        self.reset_preview();
        self.preview.slug = Some(slug);
        let generation = self.preview.generation;
        self.spawn_quiet(move |catalog| CatalogMessage::PreviewLoaded {
            generation,
            poster: load_poster(catalog, &poster_url, &placeholder_url),
        });
        true
    }

    pub fn close_modal(&mut self) {
        // late detail/poster replies for the closed modal are ignored
        self.modal_generation += 1;
        self.modal = None;
        self.set_poster(None);
    }

    /// Applies every message that has arrived. Returns true if any did.
    pub fn drain(&mut self) -> bool {
        let mut applied = false;
        while let Ok(message) = self.receiver.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.apply(message);
            applied = true;
        }
        applied
    }

    /// Blocks until every spawned job has reported back, or the timeout
    /// elapses. Returns true if nothing is left outstanding.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;

        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(message) => {
                    self.in_flight -= 1;
                    self.apply(message);
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
        true
    }

    fn transition(&mut self, next: ViewState) {
        self.state = next;
        self.grid = Grid::Blank;
        self.options.clear();
        self.hero = None;
        self.backdrop.clear();
        self.reset_preview();
    }

    fn reset_preview(&mut self) {
        self.preview.generation += 1;
        self.preview.slug = None;
        self.preview.slot.clear();
    }

    /// Catalog request; the loading indicator stays up until it reports back.
    fn spawn<F>(&mut self, job: F)
    where
        F: FnOnce(&dyn Catalog) -> CatalogMessage + Send + 'static,
    {
        let busy = self.loading.begin();
        self.spawn_job(Some(busy), job);
    }

    /// Image download; does not touch the loading indicator.
    fn spawn_quiet<F>(&mut self, job: F)
    where
        F: FnOnce(&dyn Catalog) -> CatalogMessage + Send + 'static,
    {
        self.spawn_job(None, job);
    }

    fn spawn_job<F>(&mut self, busy: Option<LoadingGuard>, job: F)
    where
        F: FnOnce(&dyn Catalog) -> CatalogMessage + Send + 'static,
    {
        let catalog = Arc::clone(&self.catalog);
        let sender = self.sender.clone();
        self.in_flight += 1;

        thread::spawn(move || {
            let message = {
                let _busy = busy;
                job(catalog.as_ref())
            };
            let _ = sender.send(message);
        });
    }

    fn apply(&mut self, message: CatalogMessage) {
        match message {
            CatalogMessage::HomeLoaded { generation, result } => {
                if self.is_stale(generation) {
                    return;
                }
                match result {
                    Ok(feed) => {
                        self.hero = feed.hero.as_ref().map(HeroView::from_detail);
                        self.grid = render_list(feed.movies);
                        if let Some(hero) = &self.hero {
                            let backdrop_url = hero.backdrop_url.clone();
                            let placeholder_url = self.placeholder_url.clone();
                            self.spawn_quiet(move |catalog| CatalogMessage::BackdropLoaded {
                                generation,
                                backdrop: load_poster(catalog, &backdrop_url, &placeholder_url),
                            });
                        }
                    }
                    Err(_) => {
                        self.hero = None;
                        self.grid = Grid::Failed;
                    }
                }
            }
            CatalogMessage::MoviesLoaded { generation, result } => {
                if self.is_stale(generation) {
                    return;
                }
                self.grid = match result {
                    Ok(movies) => render_list(movies),
                    Err(_) => Grid::Failed,
                };
            }
            CatalogMessage::OptionsLoaded {
                generation,
                kind,
                result,
            } => {
                if self.is_stale(generation) {
                    return;
                }
                match result {
                    Ok(Some(options)) if !options.is_empty() => {
                        self.options = render_options(options, kind);
                    }
                    Ok(_) => self.grid = Grid::NoResults,
                    Err(_) => self.grid = Grid::Failed,
                }
            }
            CatalogMessage::DetailLoaded { generation, result } => {
                if generation != self.modal_generation || self.modal.is_none() {
                    debug!(generation, "dropping detail for a closed or replaced modal");
                    return;
                }
                match result {
                    Ok(Some(movie)) => {
                        let view = DetailView::from_detail(&movie);
                        let poster_url = view.poster_url.clone();
                        let placeholder_url = self.placeholder_url.clone();
                        self.modal = Some(Modal::Ready(Box::new(view)));
                        self.spawn_quiet(move |catalog| CatalogMessage::PosterLoaded {
                            generation,
                            poster: load_poster(catalog, &poster_url, &placeholder_url),
                        });
                    }
                    Ok(None) | Err(_) => self.modal = Some(Modal::Failed),
                }
            }
            CatalogMessage::PosterLoaded { generation, poster } => {
                if generation == self.modal_generation && self.modal.is_some() {
                    self.set_poster(poster);
                }
            }
            CatalogMessage::PreviewLoaded { generation, poster } => {
                if generation == self.preview.generation {
                    self.preview.slot.set(poster);
                }
            }
            CatalogMessage::BackdropLoaded { generation, backdrop } => {
                if !self.is_stale(generation) && self.hero.is_some() {
                    self.backdrop.set(backdrop);
                }
            }
        }
    }

    fn is_stale(&self, generation: u64) -> bool {
        let stale = generation != self.state.generation;
        if stale {
            debug!(
                generation,
                current = self.state.generation,
                "dropping response from a superseded view"
            );
        }
        stale
    }

    fn set_poster(&mut self, poster: Option<DynamicImage>) {
        self.poster = poster;
        self.poster_revision += 1;
    }
}

fn load_home(catalog: &dyn Catalog) -> Result<HomeFeed, FetchError> {
    let movies = logged(&Endpoint::Home, fetch_movies(catalog, &Endpoint::Home))?;

    let hero = match movies.as_ref().and_then(|items| items.first()) {
        Some(first) => match fetch_detail(catalog, &first.slug) {
            Ok(detail) => detail,
            Err(e) => {
                warn!(slug = %first.slug, error = %e, "hero detail unavailable, hiding banner");
                None
            }
        },
        None => None,
    };

    Ok(HomeFeed { movies, hero })
}

fn logged<T>(endpoint: &Endpoint, result: Result<T, FetchError>) -> Result<T, FetchError> {
    if let Err(e) = &result {
        error!(%endpoint, error = %e, transport = e.is_transport(), "Error fetching data");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::catalog::fake::FakeCatalog;
    use crate::app::view::{HOME_TITLE, LOAD_FAILED_MESSAGE, Mode, NO_RESULTS_MESSAGE, NavItem};
    use serde_json::json;

    const WAIT: Duration = Duration::from_secs(5);

    fn controller(catalog: FakeCatalog) -> (Controller, Arc<FakeCatalog>) {
        let catalog = Arc::new(catalog);
        let controller = Controller::new(catalog.clone(), "https://placeholder/img.png");
        (controller, catalog)
    }

    fn items(values: serde_json::Value) -> serde_json::Value {
        json!({ "data": { "items": values } })
    }

    fn movie_a_detail() -> serde_json::Value {
        json!({ "movie": {
            "name": "Movie A",
            "origin_name": "Movie A",
            "slug": "a",
            "content": "<p>Chuyện về A</p>",
            "year": 2020
        }})
    }

    #[test]
    fn home_shows_hero_and_grid() {
        let (mut c, fake) = controller(
            FakeCatalog::new()
                .json(Endpoint::Home, items(json!([{ "slug": "a", "name": "Movie A", "year": 2020 }])))
                .json(Endpoint::Detail("a".into()), movie_a_detail()),
        );

        c.enter_home();
        assert!(c.settle(WAIT));

        assert_eq!(c.state().title, HOME_TITLE);
        assert_eq!(c.state().active_nav, Some(NavItem::Home));
        assert_eq!(c.hero().unwrap().name, "Movie A");
        let cards = c.grid().cards();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].slug, "a");
        assert_eq!(fake.requests()[..2], ["/home", "/phim/a"]);
        assert!(!c.is_loading());
    }

    #[test]
    fn home_hides_hero_when_detail_fails_but_keeps_grid() {
        let (mut c, _) = controller(
            FakeCatalog::new()
                .json(Endpoint::Home, items(json!([{ "slug": "a", "name": "A" }, { "slug": "b", "name": "B" }])))
                .status(Endpoint::Detail("a".into()), 500),
        );

        c.enter_home();
        assert!(c.settle(WAIT));

        assert!(c.hero().is_none());
        assert_eq!(c.grid().cards().len(), 2);
    }

    #[test]
    fn empty_home_feed_shows_placeholder_without_detail_fetch() {
        let (mut c, fake) = controller(FakeCatalog::new().json(Endpoint::Home, json!({ "data": {} })));

        c.enter_home();
        assert!(c.settle(WAIT));

        assert_eq!(c.grid().message(), Some(NO_RESULTS_MESSAGE));
        assert!(c.hero().is_none());
        assert_eq!(fake.requests(), vec!["/home"]);
    }

    #[test]
    fn genre_list_failure_leaves_options_empty_and_shows_error() {
        let (mut c, _) = controller(FakeCatalog::new().status(Endpoint::GenreList, 500));

        c.enter_taxonomy_browse(OptionKind::Genre);
        assert!(c.is_loading());
        assert!(c.settle(WAIT));

        assert!(c.options().is_empty());
        assert_eq!(c.grid().message(), Some(LOAD_FAILED_MESSAGE));
        assert!(!c.is_loading());
        assert_eq!(c.loading().outstanding(), 0);
    }

    #[test]
    fn taxonomy_browse_renders_options_tagged_with_kind() {
        let (mut c, _) = controller(FakeCatalog::new().json(
            Endpoint::CountryList,
            items(json!([{ "name": "Hàn Quốc", "slug": "han-quoc" }, { "name": "Mỹ", "slug": "au-my" }])),
        ));

        c.enter_taxonomy_browse(OptionKind::Country);
        assert!(c.settle(WAIT));

        assert_eq!(c.state().mode, Mode::Country);
        assert_eq!(c.options().len(), 2);
        assert!(c.options().iter().all(|o| o.kind == OptionKind::Country));
        assert_eq!(*c.grid(), Grid::Blank);
    }

    #[test]
    fn selecting_country_option_targets_results_endpoint() {
        let (mut c, fake) = controller(
            FakeCatalog::new()
                .json(
                    Endpoint::CountryList,
                    items(json!([{ "name": "Trung Quốc", "slug": "trung-quoc" }, { "name": "Hàn Quốc", "slug": "han-quoc" }])),
                )
                .json(Endpoint::ByCountry("trung-quoc".into()), items(json!([])))
                .json(Endpoint::ByCountry("han-quoc".into()), items(json!([{ "slug": "k", "name": "K" }]))),
        );

        c.enter_taxonomy_browse(OptionKind::Country);
        assert!(c.settle(WAIT));

        assert!(c.select_option(0));
        assert!(c.settle(WAIT));
        assert_eq!(c.state().active_option.as_deref(), Some("trung-quoc"));

        assert!(c.select_option(1));
        assert!(c.settle(WAIT));

        assert_eq!(fake.requests().last().unwrap(), "/quoc-gia/han-quoc");
        assert_eq!(c.state().title, "Quốc gia: Hàn Quốc");
        assert_eq!(c.state().active_option.as_deref(), Some("han-quoc"));
        assert_eq!(c.grid().cards().len(), 1);
        assert_eq!(c.options().len(), 2);
    }

    #[test]
    fn select_option_out_of_range_is_ignored() {
        let (mut c, fake) = controller(FakeCatalog::new());
        assert!(!c.select_option(3));
        assert!(fake.requests().is_empty());
    }

    #[test]
    fn year_browse_is_local_and_descending() {
        let (mut c, fake) = controller(FakeCatalog::new());

        c.enter_year_browse_at(2026);

        let slugs: Vec<_> = c.options().iter().map(|o| o.slug.clone()).collect();
        let expected: Vec<_> = (0..20).map(|i| (2026 - i).to_string()).collect();
        assert_eq!(slugs, expected);
        assert!(c.options().iter().all(|o| o.kind == OptionKind::Year));
        assert_eq!(c.state().active_nav, Some(NavItem::Year));
        assert!(fake.requests().is_empty());
        assert!(!c.is_loading());
    }

    #[test]
    fn year_option_loads_release_year_results() {
        let (mut c, fake) = controller(
            FakeCatalog::new().json(Endpoint::ByYear("2024".into()), items(json!([{ "slug": "x", "name": "X" }]))),
        );

        c.enter_year_browse_at(2026);
        assert!(c.select_option(2));
        assert!(c.settle(WAIT));

        assert_eq!(fake.requests(), vec!["/nam-phat-hanh/2024"]);
        assert_eq!(c.state().title, "Năm: 2024");
    }

    #[test]
    fn blank_search_is_a_no_op() {
        let (mut c, fake) = controller(FakeCatalog::new());
        c.enter_year_browse_at(2026);
        let before = c.state().clone();

        assert!(!c.enter_search("   \t "));

        assert_eq!(*c.state(), before);
        assert_eq!(c.options().len(), 20);
        assert!(fake.requests().is_empty());
    }

    #[test]
    fn search_clears_nav_and_encodes_term() {
        let (mut c, fake) = controller(FakeCatalog::new().json(
            Endpoint::Search("người sắt".into()),
            items(json!([{ "slug": "iron", "name": "Người Sắt" }])),
        ));
        c.enter_year_browse_at(2026);

        assert!(c.enter_search("  người sắt "));
        assert!(c.options().is_empty());
        assert!(c.settle(WAIT));

        assert_eq!(c.state().active_nav, None);
        assert_eq!(c.state().title, "Kết quả cho: \"người sắt\"");
        assert_eq!(fake.requests(), vec!["/tim-kiem?keyword=ng%C6%B0%E1%BB%9Di%20s%E1%BA%AFt"]);
        assert_eq!(c.grid().cards().len(), 1);
    }

    #[test]
    fn search_with_missing_items_is_no_results_not_error() {
        let (mut c, _) = controller(FakeCatalog::new().json(Endpoint::Search("zzz".into()), json!({ "data": { "items": null } })));

        c.enter_search("zzz");
        assert!(c.settle(WAIT));

        assert_eq!(c.grid().message(), Some(NO_RESULTS_MESSAGE));
    }

    #[test]
    fn null_poster_still_renders_every_card() {
        let (mut c, _) = controller(FakeCatalog::new().json(
            Endpoint::Search("x".into()),
            items(json!([{ "slug": "a", "poster_url": "p" }, { "slug": "b", "poster_url": null }])),
        ));

        c.enter_search("x");
        assert!(c.settle(WAIT));

        let slugs: Vec<_> = c.grid().cards().iter().map(|card| card.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a", "b"]);
        assert_eq!(c.grid().cards()[1].poster_url, "");
    }

    #[test]
    fn taxonomy_list_without_items_shows_no_results() {
        let (mut c, _) = controller(
            FakeCatalog::new()
                .json(Endpoint::GenreList, json!({ "data": {} }))
                .json(Endpoint::CountryList, items(json!([]))),
        );

        c.enter_taxonomy_browse(OptionKind::Genre);
        assert!(c.settle(WAIT));
        assert!(c.options().is_empty());
        assert_eq!(c.grid().message(), Some(NO_RESULTS_MESSAGE));

        c.enter_taxonomy_browse(OptionKind::Country);
        assert!(c.settle(WAIT));
        assert!(c.options().is_empty());
        assert_eq!(c.grid().message(), Some(NO_RESULTS_MESSAGE));
    }

    #[test]
    fn slower_stale_response_does_not_overwrite_newer_view() {
        let (mut c, _) = controller(
            FakeCatalog::new()
                .json(Endpoint::Search("slow".into()), items(json!([{ "slug": "old", "name": "Old" }])))
                .delay(Endpoint::Search("slow".into()), Duration::from_millis(300))
                .json(Endpoint::Search("fast".into()), items(json!([{ "slug": "new", "name": "New" }]))),
        );

        c.enter_search("slow");
        c.enter_search("fast");
        assert!(c.is_loading());
        assert!(c.settle(WAIT));

        let cards = c.grid().cards();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].slug, "new");
        assert!(!c.is_loading());
    }

    #[test]
    fn detail_modal_shows_full_record() {
        let (mut c, _) = controller(FakeCatalog::new().json(Endpoint::Detail("a".into()), movie_a_detail()));

        c.open_detail("a");
        assert!(matches!(c.modal(), Some(Modal::Loading { slug }) if slug == "a"));
        assert!(c.settle(WAIT));

        match c.modal() {
            Some(Modal::Ready(view)) => {
                assert_eq!(view.name, "Movie A");
                assert_eq!(view.synopsis, "Chuyện về A");
            }
            other => panic!("unexpected modal: {other:?}"),
        }
        // neither poster nor placeholder exist in the fake catalog
        assert!(c.poster().is_none());
    }

    #[test]
    fn detail_failure_still_presents_modal() {
        let (mut c, _) = controller(
            FakeCatalog::new()
                .garbage(Endpoint::Detail("a".into()))
                .json(Endpoint::Detail("b".into()), json!({})),
        );

        c.open_detail("a");
        assert!(c.settle(WAIT));
        assert_eq!(c.modal(), Some(&Modal::Failed));

        c.open_detail("b");
        assert!(c.settle(WAIT));
        assert_eq!(c.modal(), Some(&Modal::Failed));
    }

    #[test]
    fn closing_modal_discards_late_detail() {
        let (mut c, _) = controller(
            FakeCatalog::new()
                .json(Endpoint::Detail("a".into()), movie_a_detail())
                .delay(Endpoint::Detail("a".into()), Duration::from_millis(100)),
        );

        c.open_detail("a");
        c.close_modal();
        assert!(c.settle(WAIT));

        assert!(c.modal().is_none());
    }

    #[test]
    fn hero_call_to_action_opens_detail_for_same_slug() {
        let (mut c, fake) = controller(
            FakeCatalog::new()
                .json(Endpoint::Home, items(json!([{ "slug": "a", "name": "Movie A" }])))
                .json(Endpoint::Detail("a".into()), movie_a_detail()),
        );
        c.enter_home();
        assert!(c.settle(WAIT));

        assert!(c.open_hero_detail());
        assert!(c.settle(WAIT));

        assert!(matches!(c.modal(), Some(Modal::Ready(_))));
        assert_eq!(fake.requests().iter().filter(|r| *r == "/phim/a").count(), 2);
    }

    #[test]
    fn leaving_home_hides_hero() {
        let (mut c, _) = controller(
            FakeCatalog::new()
                .json(Endpoint::Home, items(json!([{ "slug": "a", "name": "Movie A" }])))
                .json(Endpoint::Detail("a".into()), movie_a_detail()),
        );
        c.enter_home();
        assert!(c.settle(WAIT));
        assert!(c.hero().is_some());

        c.enter_year_browse_at(2026);
        assert!(c.hero().is_none());
        assert_eq!(*c.grid(), Grid::Blank);
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut out = std::io::Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(image::RgbImage::new(width, height))
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn search_with_posters(c: &mut Controller) {
        assert!(c.enter_search("x"));
        assert!(c.settle(WAIT));
    }

    fn poster_catalog() -> FakeCatalog {
        FakeCatalog::new()
            .json(
                Endpoint::Search("x".into()),
                items(json!([
                    { "slug": "a", "name": "A", "poster_url": "https://img/a.jpg" },
                    { "slug": "b", "name": "B" }
                ])),
            )
            .image("https://img/a.jpg", png(2, 3))
            .image("https://placeholder/img.png", png(4, 4))
    }

    #[test]
    fn preview_loads_the_card_poster() {
        let (mut c, _) = controller(poster_catalog());
        search_with_posters(&mut c);
        let before = c.preview_revision();

        assert!(c.preview_card(0));
        assert!(c.settle(WAIT));

        assert_eq!(c.preview().map(|p| (p.width(), p.height())), Some((2, 3)));
        assert_ne!(c.preview_revision(), before);
        assert!(!c.preview_card(0));
    }

    #[test]
    fn preview_of_posterless_card_uses_placeholder() {
        let (mut c, fake) = controller(poster_catalog());
        search_with_posters(&mut c);

        assert!(c.preview_card(1));
        assert!(c.settle(WAIT));

        assert_eq!(c.preview().map(|p| p.width()), Some(4));
        assert!(fake.requests().contains(&"https://placeholder/img.png".to_string()));
    }

    #[test]
    fn preview_is_dropped_when_the_view_changes() {
        let (mut c, _) = controller(poster_catalog());
        search_with_posters(&mut c);

        assert!(c.preview_card(0));
        c.enter_year_browse_at(2026);
        assert!(c.settle(WAIT));

        assert!(c.preview().is_none());
        assert!(!c.preview_card(0));
    }

    #[test]
    fn preview_download_does_not_raise_the_loading_indicator() {
        let (mut c, _) = controller(poster_catalog());
        search_with_posters(&mut c);

        assert!(c.preview_card(0));
        assert!(!c.is_loading());
        assert!(c.settle(WAIT));
        assert!(c.preview().is_some());
    }

    fn home_with_backdrop() -> FakeCatalog {
        FakeCatalog::new()
            .json(Endpoint::Home, items(json!([{ "slug": "a", "name": "Movie A" }])))
            .json(
                Endpoint::Detail("a".into()),
                json!({ "movie": { "slug": "a", "name": "Movie A", "thumb_url": "https://img/a-thumb.jpg" } }),
            )
            .image("https://img/a-thumb.jpg", png(6, 2))
    }

    #[test]
    fn hero_backdrop_is_loaded_from_the_thumb() {
        let (mut c, fake) = controller(home_with_backdrop());
        let before = c.backdrop_revision();

        c.enter_home();
        assert!(c.settle(WAIT));

        assert_eq!(c.hero().unwrap().backdrop_url, "https://img/a-thumb.jpg");
        assert_eq!(c.backdrop().map(|b| (b.width(), b.height())), Some((6, 2)));
        assert_ne!(c.backdrop_revision(), before);
        assert_eq!(fake.requests().last().unwrap(), "https://img/a-thumb.jpg");
    }

    #[test]
    fn leaving_home_clears_the_backdrop() {
        let (mut c, _) = controller(home_with_backdrop());
        c.enter_home();
        assert!(c.settle(WAIT));
        assert!(c.backdrop().is_some());

        c.enter_year_browse_at(2026);
        assert!(c.backdrop().is_none());
    }

    #[test]
    fn backdrop_for_a_superseded_home_is_dropped() {
        let (mut c, _) = controller(home_with_backdrop());
        c.enter_home();
        c.enter_year_browse_at(2026);
        assert!(c.settle(WAIT));

        assert!(c.hero().is_none());
        assert!(c.backdrop().is_none());
    }
}
