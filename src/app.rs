pub mod catalog;
pub mod controller;
pub mod error;
pub mod models;
pub mod poster;
pub mod sanitize;
pub mod view;

use image::DynamicImage;
use ratatui::crossterm::event::KeyCode;
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;
use throbber_widgets_tui::ThrobberState;

use crate::app::controller::Controller;
use crate::app::view::{NavItem, OptionKind};

/// Region of the content area that receives arrow keys and Enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Hero,
    Options,
    Grid,
}

pub struct App {
    pub controller: Controller,
    pub focus: Focus,
    pub searching: bool,
    pub search_term: String,
    pub grid_state: ListState,
    pub option_index: usize,
    pub throbber_state: ThrobberState,
    pub picker: Option<Picker>,
    pub poster_protocol: Option<StatefulProtocol>,
    pub preview_protocol: Option<StatefulProtocol>,
    pub backdrop_protocol: Option<StatefulProtocol>,
    /// Where the detail popup was last drawn; clicks outside it close it.
    pub modal_area: Option<Rect>,
    poster_revision: u64,
    preview_revision: u64,
    backdrop_revision: u64,
}

impl App {
    pub fn new(controller: Controller, picker: Option<Picker>) -> Self {
        let poster_revision = controller.poster_revision();
        let preview_revision = controller.preview_revision();
        let backdrop_revision = controller.backdrop_revision();

        Self {
            controller,
            focus: Focus::Grid,
            searching: false,
            search_term: String::new(),
            grid_state: ListState::default(),
            option_index: 0,
            throbber_state: ThrobberState::default(),
            picker,
            poster_protocol: None,
            preview_protocol: None,
            backdrop_protocol: None,
            modal_area: None,
            poster_revision,
            preview_revision,
            backdrop_revision,
        }
    }

    /// Applies finished requests and advances the spinner. Called every loop tick.
    pub fn tick(&mut self) {
        self.controller.drain();
        self.clamp_selection();
        self.request_preview();
        if self.controller.is_loading() {
            self.throbber_state.calc_next();
        }
        self.sync_poster();
        self.sync_preview();
        self.sync_backdrop();
    }

    pub fn navigate(&mut self, nav: NavItem) {
        match nav {
            NavItem::Home => self.controller.enter_home(),
            NavItem::Genre => self.controller.enter_taxonomy_browse(OptionKind::Genre),
            NavItem::Country => self.controller.enter_taxonomy_browse(OptionKind::Country),
            NavItem::Year => self.controller.enter_year_browse(),
        }
        self.reset_selection();
        self.focus = match nav {
            NavItem::Home => Focus::Grid,
            _ => Focus::Options,
        };
    }

    /// Dispatches one key press. Returns true when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.searching {
            match code {
                KeyCode::Char(c) => self.search_term.push(c),
                KeyCode::Backspace => {
                    self.search_term.pop();
                }
                KeyCode::Enter => self.submit_search(),
                KeyCode::Esc => self.cancel_search(),
                _ => {}
            }
            return false;
        }

        if self.controller.modal().is_some() {
            match code {
                KeyCode::Char('q') => return true,
                KeyCode::Esc | KeyCode::Char('b') => self.close_modal(),
                _ => {}
            }
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('1') => self.navigate(NavItem::Home),
            KeyCode::Char('2') | KeyCode::Char('g') => self.navigate(NavItem::Genre),
            KeyCode::Char('3') | KeyCode::Char('c') => self.navigate(NavItem::Country),
            KeyCode::Char('4') | KeyCode::Char('y') => self.navigate(NavItem::Year),
            KeyCode::Char('/') | KeyCode::Char('s') => self.begin_search(),
            KeyCode::Tab => self.cycle_focus(),
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Right | KeyCode::Char('l') => self.next_item(),
            KeyCode::Up | KeyCode::Char('k') | KeyCode::Left | KeyCode::Char('h') => self.previous_item(),
            KeyCode::Enter => self.activate(),
            _ => {}
        }
        false
    }

    pub fn begin_search(&mut self) {
        self.searching = true;
    }

    pub fn cancel_search(&mut self) {
        self.searching = false;
        self.search_term.clear();
    }

    /// Runs the search; the input is emptied whatever the outcome.
    pub fn submit_search(&mut self) {
        let term = std::mem::take(&mut self.search_term);
        self.searching = false;

        if self.controller.enter_search(&term) {
            self.reset_selection();
            self.focus = Focus::Grid;
        }
    }

    pub fn cycle_focus(&mut self) {
        let order = [Focus::Hero, Focus::Options, Focus::Grid];
        let start = order.iter().position(|f| *f == self.focus).unwrap_or(0);

        for step in 1..=order.len() {
            let candidate = order[(start + step) % order.len()];
            if self.can_focus(candidate) {
                self.focus = candidate;
                return;
            }
        }
    }

    fn can_focus(&self, focus: Focus) -> bool {
        match focus {
            Focus::Hero => self.controller.hero().is_some(),
            Focus::Options => !self.controller.options().is_empty(),
            Focus::Grid => true,
        }
    }

    pub fn next_item(&mut self) {
        self.move_selection(1);
    }

    pub fn previous_item(&mut self) {
        self.move_selection(-1);
    }

    fn move_selection(&mut self, delta: isize) {
        match self.focus {
            Focus::Hero => {}
            Focus::Options => {
                let count = self.controller.options().len();
                self.option_index = wrap(self.option_index, delta, count);
            }
            Focus::Grid => {
                let count = self.controller.grid().cards().len();
                if count == 0 {
                    return;
                }
                let current = self.grid_state.selected().unwrap_or(0);
                self.grid_state.select(Some(wrap(current, delta, count)));
            }
        }
    }

    /// Enter on the focused region.
    pub fn activate(&mut self) {
        match self.focus {
            Focus::Hero => {
                self.controller.open_hero_detail();
            }
            Focus::Options => {
                if self.controller.select_option(self.option_index) {
                    self.grid_state.select(None);
                }
            }
            Focus::Grid => {
                let slug = self
                    .grid_state
                    .selected()
                    .and_then(|i| self.controller.grid().cards().get(i))
                    .map(|card| card.slug.clone());
                if let Some(slug) = slug {
                    self.controller.open_detail(&slug);
                }
            }
        }
    }

    pub fn close_modal(&mut self) {
        self.controller.close_modal();
        self.sync_poster();
    }

    fn reset_selection(&mut self) {
        self.option_index = 0;
        self.grid_state.select(None);
    }

    fn clamp_selection(&mut self) {
        let cards = self.controller.grid().cards().len();
        match self.grid_state.selected() {
            _ if cards == 0 => self.grid_state.select(None),
            None => self.grid_state.select(Some(0)),
            Some(i) if i >= cards => self.grid_state.select(Some(cards - 1)),
            Some(_) => {}
        }

        let options = self.controller.options().len();
        if self.option_index >= options {
            self.option_index = options.saturating_sub(1);
        }
        if !self.can_focus(self.focus) {
            self.focus = Focus::Grid;
        }
    }

    /// Previews are only fetched when the terminal can draw them.
    fn request_preview(&mut self) {
        if self.picker.is_none() {
            return;
        }
        if let Some(index) = self.grid_state.selected() {
            self.controller.preview_card(index);
        }
    }

    fn sync_preview(&mut self) {
        let revision = self.controller.preview_revision();
        if revision == self.preview_revision {
            return;
        }
        self.preview_revision = revision;
        self.preview_protocol = protocol_for(&mut self.picker, self.controller.preview());
    }

    fn sync_backdrop(&mut self) {
        let revision = self.controller.backdrop_revision();
        if revision == self.backdrop_revision {
            return;
        }
        self.backdrop_revision = revision;
        self.backdrop_protocol = protocol_for(&mut self.picker, self.controller.backdrop());
    }

    fn sync_poster(&mut self) {
        let revision = self.controller.poster_revision();
        if revision == self.poster_revision {
            return;
        }
        self.poster_revision = revision;
        self.poster_protocol = protocol_for(&mut self.picker, self.controller.poster());
    }
}

fn protocol_for(picker: &mut Option<Picker>, image: Option<&DynamicImage>) -> Option<StatefulProtocol> {
    match (picker, image) {
        (Some(picker), Some(image)) => Some(picker.new_resize_protocol(image.clone())),
        _ => None,
    }
}

fn wrap(current: usize, delta: isize, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    (current as isize + delta).rem_euclid(count as isize) as usize
}
