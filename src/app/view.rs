//! View models for the content area.
//!
//! Nothing here talks to the network: these are the values the controller
//! builds from catalog responses and the terminal widgets draw.

use crate::app::catalog::Endpoint;
use crate::app::models::{MovieDetail, MovieSummary, TaxonomyOption};
use crate::app::sanitize::{hero_blurb, strip_tags};

pub const HOME_TITLE: &str = "Phim Mới Cập Nhật";
pub const GENRE_TITLE: &str = "Khám Phá Theo Thể Loại";
pub const COUNTRY_TITLE: &str = "Khám Phá Theo Quốc Gia";
pub const YEAR_TITLE: &str = "Khám Phá Theo Năm";
pub const LOAD_FAILED_MESSAGE: &str = "Không thể tải dữ liệu. Vui lòng thử lại sau.";
pub const NO_RESULTS_MESSAGE: &str = "Không tìm thấy phim nào.";
pub const DETAIL_FAILED_TITLE: &str = "Lỗi";
pub const DETAIL_FAILED_MESSAGE: &str = "Không thể tải chi tiết phim. Vui lòng thử lại.";
pub const HERO_CALL_TO_ACTION: &str = "Xem chi tiết";

/// Number of years offered when browsing by year.
pub const YEAR_WINDOW: i32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Home,
    Search,
    Genre,
    Country,
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavItem {
    Home,
    Genre,
    Country,
    Year,
}

impl NavItem {
    pub const ALL: [NavItem; 4] = [NavItem::Home, NavItem::Genre, NavItem::Country, NavItem::Year];

    pub fn label(self) -> &'static str {
        match self {
            NavItem::Home => "Trang Chủ",
            NavItem::Genre => "Thể Loại",
            NavItem::Country => "Quốc Gia",
            NavItem::Year => "Năm",
        }
    }
}

/// Which taxonomy a browse screen lists. Year is synthesized locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Genre,
    Country,
    Year,
}

impl OptionKind {
    /// Results endpoint for an option of this kind.
    pub fn results_endpoint(self, slug: &str) -> Endpoint {
        match self {
            OptionKind::Genre => Endpoint::ByGenre(slug.to_string()),
            OptionKind::Country => Endpoint::ByCountry(slug.to_string()),
            OptionKind::Year => Endpoint::ByYear(slug.to_string()),
        }
    }

    pub fn title_prefix(self) -> &'static str {
        match self {
            OptionKind::Genre => "Thể loại",
            OptionKind::Country => "Quốc gia",
            OptionKind::Year => "Năm",
        }
    }

    pub fn mode(self) -> Mode {
        match self {
            OptionKind::Genre => Mode::Genre,
            OptionKind::Country => Mode::Country,
            OptionKind::Year => Mode::Year,
        }
    }

    pub fn nav(self) -> NavItem {
        match self {
            OptionKind::Genre => NavItem::Genre,
            OptionKind::Country => NavItem::Country,
            OptionKind::Year => NavItem::Year,
        }
    }

    pub fn browse_title(self) -> &'static str {
        match self {
            OptionKind::Genre => GENRE_TITLE,
            OptionKind::Country => COUNTRY_TITLE,
            OptionKind::Year => YEAR_TITLE,
        }
    }

    /// Endpoint listing the options, `None` for years.
    pub fn list_endpoint(self) -> Option<Endpoint> {
        match self {
            OptionKind::Genre => Some(Endpoint::GenreList),
            OptionKind::Country => Some(Endpoint::CountryList),
            OptionKind::Year => None,
        }
    }
}

/// Snapshot of what the content area shows. Each transition builds a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub mode: Mode,
    pub active_nav: Option<NavItem>,
    pub active_option: Option<String>,
    pub title: String,
    /// Bumped on every transition; responses tagged with an older value are dropped.
    pub generation: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            mode: Mode::Home,
            active_nav: Some(NavItem::Home),
            active_option: None,
            title: HOME_TITLE.to_string(),
            generation: 0,
        }
    }
}

impl ViewState {
    pub fn home(&self) -> Self {
        Self {
            mode: Mode::Home,
            active_nav: Some(NavItem::Home),
            active_option: None,
            title: HOME_TITLE.to_string(),
            generation: self.generation + 1,
        }
    }

    pub fn browse(&self, kind: OptionKind) -> Self {
        Self {
            mode: kind.mode(),
            active_nav: Some(kind.nav()),
            active_option: None,
            title: kind.browse_title().to_string(),
            generation: self.generation + 1,
        }
    }

    pub fn search(&self, term: &str) -> Self {
        Self {
            mode: Mode::Search,
            active_nav: None,
            active_option: None,
            title: format!("Kết quả cho: \"{term}\""),
            generation: self.generation + 1,
        }
    }

    /// Same mode and nav, one option selected, title switched to its label.
    pub fn select(&self, kind: OptionKind, option: &OptionButton) -> Self {
        Self {
            mode: self.mode,
            active_nav: self.active_nav,
            active_option: Some(option.slug.clone()),
            title: format!("{}: {}", kind.title_prefix(), option.label),
            generation: self.generation + 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub slug: String,
    pub name: String,
    pub year: Option<i32>,
    /// May be blank; the preview loader falls back to the placeholder.
    pub poster_url: String,
}

impl From<MovieSummary> for Card {
    fn from(movie: MovieSummary) -> Self {
        Self {
            slug: movie.slug,
            name: movie.name,
            year: movie.year,
            poster_url: movie.poster_url,
        }
    }
}

/// Contents of the movie grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Grid {
    /// Cleared by a transition, nothing drawn yet.
    #[default]
    Blank,
    Cards(Vec<Card>),
    NoResults,
    Failed,
}

impl Grid {
    pub fn cards(&self) -> &[Card] {
        match self {
            Grid::Cards(cards) => cards,
            _ => &[],
        }
    }

    pub fn message(&self) -> Option<&'static str> {
        match self {
            Grid::NoResults => Some(NO_RESULTS_MESSAGE),
            Grid::Failed => Some(LOAD_FAILED_MESSAGE),
            Grid::Blank | Grid::Cards(_) => None,
        }
    }
}

/// One card per movie, in input order; absent or empty input gives the
/// "no results" placeholder.
pub fn render_list(movies: Option<Vec<MovieSummary>>) -> Grid {
    match movies {
        Some(movies) if !movies.is_empty() => Grid::Cards(movies.into_iter().map(Card::from).collect()),
        _ => Grid::NoResults,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionButton {
    pub label: String,
    pub slug: String,
    pub kind: OptionKind,
}

pub fn render_options(options: Vec<TaxonomyOption>, kind: OptionKind) -> Vec<OptionButton> {
    options
        .into_iter()
        .map(|option| OptionButton {
            label: option.label,
            slug: option.slug,
            kind,
        })
        .collect()
}

/// `current_year` down to `current_year - 19`.
pub fn year_window(current_year: i32) -> Vec<TaxonomyOption> {
    (0..YEAR_WINDOW)
        .map(|offset| {
            let year = (current_year - offset).to_string();
            TaxonomyOption::new(year.clone(), year)
        })
        .collect()
}

/// Featured movie above the grid on the home screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroView {
    pub slug: String,
    pub name: String,
    pub blurb: String,
    /// Thumb image, or the poster when the movie has no thumb.
    pub backdrop_url: String,
}

impl HeroView {
    pub fn from_detail(movie: &MovieDetail) -> Self {
        Self {
            slug: movie.slug.clone(),
            name: movie.name.clone(),
            blurb: hero_blurb(&movie.synopsis_html),
            backdrop_url: if movie.backdrop_url.is_empty() {
                movie.poster_url.clone()
            } else {
                movie.backdrop_url.clone()
            },
        }
    }
}

/// Everything the detail modal shows for one movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub name: String,
    /// "Original Name (2021)"
    pub original_line: String,
    pub quality: String,
    pub language: String,
    pub synopsis: String,
    pub genres: Vec<String>,
    pub countries: Vec<String>,
    pub directors: String,
    pub actors: String,
    pub poster_url: String,
}

impl DetailView {
    pub fn from_detail(movie: &MovieDetail) -> Self {
        let year = movie.year.map(|y| y.to_string()).unwrap_or_default();
        let poster_url = if movie.poster_url.is_empty() {
            movie.backdrop_url.clone()
        } else {
            movie.poster_url.clone()
        };

        Self {
            name: movie.name.clone(),
            original_line: format!("{} ({})", movie.original_name, year),
            quality: movie.quality.clone(),
            language: movie.language.clone(),
            synopsis: strip_tags(&movie.synopsis_html),
            genres: movie.genres.iter().map(|g| g.name.clone()).collect(),
            countries: movie.countries.iter().map(|c| c.name.clone()).collect(),
            directors: movie.directors.join(", "),
            actors: movie.actors.join(", "),
            poster_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Loading { slug: String },
    Ready(Box<DetailView>),
    Failed,
}
