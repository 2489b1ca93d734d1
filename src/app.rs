use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rust_i18n::t;

use crate::config::{Config, LOCALES};
use crate::event::AppEvent;
use crate::lexicon::{Lexicon, Subtopic, Topic};
use crate::lookup::{self, ImageLookup, ImageRef};
use crate::puzzle::selector::select_word;
use crate::puzzle::{HintOutcome, Letter, Mode, PuzzleError, PuzzleSession};
use crate::session::countdown::Countdown;
use crate::session::score::Score;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

pub const SETTINGS_COUNT: usize = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Play,
    TopicPicker,
    Stats,
    Settings,
    About,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptKind {
    Guess,
    Letter,
}

pub struct Prompt {
    pub kind: PromptKind,
    pub input: LineInput,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

/// Illustration state for the current word. Reset with every round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageState {
    Idle,
    Scheduled { due: Instant },
    Loading,
    Found(ImageRef),
    Missing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickerFocus {
    Topics,
    Subtopics,
}

pub struct TopicPicker {
    pub focus: PickerFocus,
    pub topic: usize,
    pub subtopic: usize,
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub theme: &'static Theme,
    pub lexicon: Lexicon,
    pub topic: usize,
    pub subtopic: usize,
    pub picker: TopicPicker,
    pub session: Option<PuzzleSession>,
    pub definition: String,
    pub definition_visible: bool,
    pub last_word: Option<String>,
    pub score: Score,
    pub countdown: Option<Countdown>,
    pub image: ImageState,
    pub prompt: Option<Prompt>,
    pub status: Option<StatusMessage>,
    pub settings_selected: usize,
    pub should_quit: bool,
    rng: SmallRng,
    lookup: Arc<dyn ImageLookup>,
    events: Option<Sender<AppEvent>>,
}

impl App {
    pub fn new(config: Config, lexicon: Lexicon, lookup: Arc<dyn ImageLookup>) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));

        Self {
            screen: AppScreen::TopicPicker,
            config,
            theme,
            lexicon,
            topic: 0,
            subtopic: 0,
            picker: TopicPicker {
                focus: PickerFocus::Topics,
                topic: 0,
                subtopic: 0,
            },
            session: None,
            definition: String::new(),
            definition_visible: false,
            last_word: None,
            score: Score::default(),
            countdown: None,
            image: ImageState::Idle,
            prompt: None,
            status: None,
            settings_selected: 0,
            should_quit: false,
            rng: SmallRng::from_entropy(),
            lookup,
            events: None,
        }
    }

    /// Channel that image lookup workers report back on.
    pub fn attach_events(&mut self, tx: Sender<AppEvent>) {
        self.events = Some(tx);
    }

    pub fn current_topic(&self) -> Option<&Topic> {
        self.lexicon.topics().get(self.topic)
    }

    pub fn current_subtopic(&self) -> Option<&Subtopic> {
        self.current_topic()?.subtopics.get(self.subtopic)
    }

    pub fn current_word(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.target())
    }

    fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            kind,
            text: text.into(),
        });
    }

    pub fn report_error(&mut self, err: &PuzzleError) {
        let (kind, text) = match err {
            PuzzleError::NoActiveSession => (StatusKind::Error, t!("status.no_word").to_string()),
            PuzzleError::EmptyPool => (StatusKind::Warning, t!("status.empty_pool").to_string()),
            PuzzleError::InvalidLetterInput(_) => {
                (StatusKind::Warning, t!("status.one_letter").to_string())
            }
            PuzzleError::ScrambleMode => {
                (StatusKind::Info, t!("status.flashcard_only").to_string())
            }
        };
        log::debug!("{err}");
        self.set_status(kind, text);
    }

    // --- Rounds ---

    /// Draw a word from the selected bucket and build a fresh puzzle for it.
    /// Cancels the countdown and any pending or in-flight image lookup.
    pub fn new_round(&mut self) -> Result<(), PuzzleError> {
        self.countdown = None;
        self.image = ImageState::Idle;
        self.prompt = None;
        self.status = None;
        self.definition_visible = false;

        let topic_name = self.current_topic().map(|t| t.name.clone()).unwrap_or_default();
        let subtopic = self.current_subtopic().map(|s| s.name.clone()).unwrap_or_default();
        let pool = self.lexicon.lookup(&topic_name, &subtopic);

        let entry = match select_word(pool, self.last_word.as_deref(), &mut self.rng) {
            Ok(entry) => entry.clone(),
            Err(err) => {
                self.session = None;
                self.definition.clear();
                return Err(err);
            }
        };

        log::info!(
            "new {} round in {topic_name}/{subtopic}: {}",
            self.config.mode.as_str(),
            entry.word
        );
        self.session = Some(PuzzleSession::new(&entry.word, self.config.mode, &mut self.rng));
        self.definition = entry.definition;
        // The definition is the clue in flashcard mode.
        self.definition_visible = self.config.mode == Mode::Flashcard;
        self.last_word = Some(entry.word);

        if self.config.auto_timer {
            self.start_countdown(Instant::now());
        }
        Ok(())
    }

    pub fn change_word(&mut self) {
        if let Err(err) = self.new_round() {
            self.report_error(&err);
        }
    }

    pub fn select_topic(&mut self, topic: usize, subtopic: usize) {
        self.topic = topic;
        self.subtopic = subtopic;
        self.screen = AppScreen::Play;
        self.change_word();
    }

    pub fn toggle_mode(&mut self) {
        self.config.mode = self.config.mode.toggled();
        if self.session.is_none() {
            return;
        }
        self.change_word();
        if self.session.is_some() {
            let label = mode_label(self.config.mode);
            self.set_status(StatusKind::Info, t!("status.mode_changed", mode = label));
        }
    }

    fn session_mut(&mut self) -> Result<&mut PuzzleSession, PuzzleError> {
        self.session.as_mut().ok_or(PuzzleError::NoActiveSession)
    }

    // --- Player actions ---

    /// Uncover every occurrence of a proposed letter. Returns how many slots
    /// were newly revealed.
    pub fn suggest_letter(&mut self, input: &str) -> Result<usize, PuzzleError> {
        let puzzle = self.session_mut()?.flashcard_mut()?;
        let letter = Letter::parse(input)?;
        if puzzle.is_complete() {
            self.set_status(StatusKind::Info, t!("status.already_complete"));
            return Ok(0);
        }
        let revealed = puzzle.suggest_letter(letter);
        let complete = puzzle.is_complete();

        if complete {
            self.set_status(StatusKind::Success, t!("status.all_letters_found"));
            self.on_word_revealed(Instant::now());
        } else if revealed == 0 {
            self.set_status(
                StatusKind::Info,
                t!("status.letter_absent", letter = letter.as_char()),
            );
        } else {
            self.set_status(
                StatusKind::Success,
                t!("status.letter_found", letter = letter.as_char(), count = revealed),
            );
        }
        Ok(revealed)
    }

    pub fn give_hint(&mut self) -> Result<HintOutcome, PuzzleError> {
        let puzzle = self.session.as_mut().ok_or(PuzzleError::NoActiveSession)?;
        let puzzle = puzzle.flashcard_mut()?;
        let outcome = puzzle.give_hint(&mut self.rng);
        let complete = puzzle.is_complete();

        match outcome {
            HintOutcome::Revealed { ch, .. } => {
                self.score.record_hint();
                if complete {
                    self.set_status(StatusKind::Success, t!("status.all_letters_found"));
                    self.on_word_revealed(Instant::now());
                } else {
                    self.set_status(StatusKind::Info, t!("status.hint_given", letter = ch));
                }
            }
            HintOutcome::AlreadyComplete => {
                self.set_status(StatusKind::Info, t!("status.already_complete"));
            }
        }
        Ok(outcome)
    }

    /// Score a typed answer. Blank input is ignored and returns `Ok(None)`;
    /// otherwise the word is revealed whether or not the guess was right.
    pub fn submit_guess(&mut self, input: &str) -> Result<Option<bool>, PuzzleError> {
        let session = self.session_mut()?;
        let guess = input.trim();
        if guess.is_empty() {
            return Ok(None);
        }

        let correct = session.check_guess(guess);
        session.reveal_all();
        let word = session.target().to_string();
        self.score.record_guess(correct);
        log::info!("guess '{guess}' for '{word}': {correct}");

        if correct {
            self.set_status(StatusKind::Success, t!("status.correct"));
        } else {
            self.set_status(StatusKind::Error, t!("status.wrong", word = word));
        }
        self.on_word_revealed(Instant::now());
        Ok(Some(correct))
    }

    pub fn show_word(&mut self) -> Result<(), PuzzleError> {
        self.session_mut()?.reveal_all();
        self.on_word_revealed(Instant::now());
        Ok(())
    }

    pub fn show_definition(&mut self) -> Result<(), PuzzleError> {
        if self.session.is_none() {
            return Err(PuzzleError::NoActiveSession);
        }
        if self.definition.is_empty() {
            self.set_status(StatusKind::Info, t!("status.no_definition"));
        } else {
            self.definition_visible = true;
        }
        Ok(())
    }

    fn on_word_revealed(&mut self, now: Instant) {
        self.countdown = None;
        if self.config.auto_images && self.config.lookups_enabled && self.image == ImageState::Idle
        {
            let delay = Duration::from_millis(self.config.image_delay_ms);
            self.image = ImageState::Scheduled { due: now + delay };
        }
    }

    // --- Countdown ---

    fn start_countdown(&mut self, now: Instant) {
        let duration = Duration::from_secs(self.config.timer_secs);
        self.countdown = Some(Countdown::start(duration, now));
    }

    pub fn toggle_timer(&mut self) -> Result<(), PuzzleError> {
        if self.countdown.take().is_some() {
            return Ok(());
        }
        if self.session.is_none() {
            return Err(PuzzleError::NoActiveSession);
        }
        self.start_countdown(Instant::now());
        Ok(())
    }

    pub fn toggle_auto_timer(&mut self) {
        self.config.auto_timer = !self.config.auto_timer;
        if !self.config.auto_timer {
            self.countdown = None;
        } else if self.countdown.is_none()
            && self.session.as_ref().is_some_and(|s| !s.is_revealed())
        {
            self.start_countdown(Instant::now());
        }
    }

    pub fn toggle_auto_images(&mut self) {
        self.config.auto_images = !self.config.auto_images;
        if !self.config.auto_images && matches!(self.image, ImageState::Scheduled { .. }) {
            self.image = ImageState::Idle;
        }
    }

    // --- Images ---

    /// Manual image request for the current word.
    pub fn request_image(&mut self) -> Result<(), PuzzleError> {
        if self.session.is_none() {
            return Err(PuzzleError::NoActiveSession);
        }
        if !self.config.lookups_enabled {
            self.set_status(StatusKind::Info, t!("status.lookups_disabled"));
            return Ok(());
        }
        match self.image {
            ImageState::Found(_) => {
                self.set_status(StatusKind::Info, t!("status.image_already_loaded"));
            }
            ImageState::Loading => {
                self.set_status(StatusKind::Info, t!("status.image_loading"));
            }
            _ => self.dispatch_lookup(),
        }
        Ok(())
    }

    fn dispatch_lookup(&mut self) {
        let Some(word) = self.current_word().map(str::to_string) else {
            return;
        };
        self.image = ImageState::Loading;

        let Some(tx) = self.events.clone() else {
            return;
        };
        let lookup = Arc::clone(&self.lookup);
        log::debug!("looking up image for '{word}'");
        thread::spawn(move || {
            let image = lookup.find_image(&word);
            let _ = tx.send(AppEvent::ImageLookup { word, image });
        });
    }

    /// Apply a worker result. Results for a word that is no longer on screen
    /// are dropped.
    pub fn on_image_lookup(&mut self, word: &str, image: Option<ImageRef>) {
        if self.current_word() != Some(word) || self.image != ImageState::Loading {
            log::debug!("dropping stale image result for '{word}'");
            return;
        }
        match image {
            Some(image) => self.image = ImageState::Found(image),
            None => {
                self.image = ImageState::Missing;
                self.set_status(StatusKind::Warning, t!("status.no_image", word = word));
            }
        }
    }

    pub fn encyclopedia_url(&self) -> Option<String> {
        self.current_word()
            .map(|w| lookup::encyclopedia_url(&self.config.wiki_language, w))
    }

    pub fn video_search_url(&self) -> Option<String> {
        self.current_word().map(lookup::video_search_url)
    }

    // --- Clock ---

    pub fn on_tick(&mut self, now: Instant) {
        if let Some(countdown) = self.countdown {
            if countdown.is_expired(now) {
                self.countdown = None;
                if let Some(session) = self.session.as_mut() {
                    session.reveal_all();
                    let word = session.target().to_string();
                    log::info!("time is up for '{word}'");
                    self.set_status(StatusKind::Warning, t!("status.time_up", word = word));
                }
            }
        }

        if let ImageState::Scheduled { due } = self.image {
            if now >= due {
                self.dispatch_lookup();
            }
        }
    }

    // --- Prompts ---

    pub fn open_prompt(&mut self, kind: PromptKind) {
        if self.session.is_none() {
            self.report_error(&PuzzleError::NoActiveSession);
            return;
        }
        if kind == PromptKind::Letter && self.config.mode == Mode::Scramble {
            self.report_error(&PuzzleError::ScrambleMode);
            return;
        }
        let input = match kind {
            PromptKind::Guess => LineInput::new(""),
            PromptKind::Letter => LineInput::with_limit(4),
        };
        self.prompt = Some(Prompt { kind, input });
    }

    /// Run the prompt's action. Invalid letters keep the prompt open with an
    /// empty field so the player can try again.
    pub fn submit_prompt(&mut self) {
        let Some(mut prompt) = self.prompt.take() else {
            return;
        };
        let value = prompt.input.value().to_string();
        let result = match prompt.kind {
            PromptKind::Guess => self.submit_guess(&value).map(|_| ()),
            PromptKind::Letter => self.suggest_letter(&value).map(|_| ()),
        };
        if let Err(err) = result {
            self.report_error(&err);
            if matches!(err, PuzzleError::InvalidLetterInput(_)) {
                prompt.input.clear();
                self.prompt = Some(prompt);
            }
        }
    }

    // --- Navigation ---

    pub fn go_to_play(&mut self) {
        self.screen = AppScreen::Play;
    }

    pub fn go_to_picker(&mut self) {
        self.picker = TopicPicker {
            focus: PickerFocus::Topics,
            topic: self.topic,
            subtopic: self.subtopic,
        };
        self.screen = AppScreen::TopicPicker;
    }

    pub fn picker_move(&mut self, down: bool) {
        let topics = self.lexicon.topics();
        match self.picker.focus {
            PickerFocus::Topics => {
                self.picker.topic = step(self.picker.topic, topics.len(), down);
                self.picker.subtopic = 0;
            }
            PickerFocus::Subtopics => {
                let count = topics
                    .get(self.picker.topic)
                    .map_or(0, |t| t.subtopics.len());
                self.picker.subtopic = step(self.picker.subtopic, count, down);
            }
        }
    }

    pub fn picker_focus(&mut self, focus: PickerFocus) {
        self.picker.focus = focus;
    }

    pub fn picker_confirm(&mut self) {
        match self.picker.focus {
            PickerFocus::Topics => self.picker.focus = PickerFocus::Subtopics,
            PickerFocus::Subtopics => self.select_topic(self.picker.topic, self.picker.subtopic),
        }
    }

    pub fn go_to_stats(&mut self) {
        self.screen = AppScreen::Stats;
    }

    pub fn go_to_about(&mut self) {
        self.screen = AppScreen::About;
    }

    pub fn go_to_settings(&mut self) {
        self.settings_selected = 0;
        self.screen = AppScreen::Settings;
    }

    pub fn leave_settings(&mut self) {
        if let Err(e) = self.config.save() {
            log::error!("could not save config: {e:#}");
            self.set_status(StatusKind::Error, t!("status.config_not_saved"));
        }
        self.screen = if self.session.is_some() {
            AppScreen::Play
        } else {
            AppScreen::TopicPicker
        };
    }

    pub fn settings_cycle_forward(&mut self) {
        self.settings_cycle(true);
    }

    pub fn settings_cycle_backward(&mut self) {
        self.settings_cycle(false);
    }

    fn settings_cycle(&mut self, forward: bool) {
        match self.settings_selected {
            0 => {
                let idx = LOCALES
                    .iter()
                    .position(|&l| l == self.config.locale)
                    .unwrap_or(0);
                self.config.locale = LOCALES[step_wrapping(idx, LOCALES.len(), forward)].to_string();
                rust_i18n::set_locale(&self.config.locale);
            }
            1 => {
                let themes = Theme::available_themes();
                if themes.is_empty() {
                    return;
                }
                let idx = themes
                    .iter()
                    .position(|t| *t == self.config.theme)
                    .unwrap_or(0);
                self.config.theme = themes[step_wrapping(idx, themes.len(), forward)].clone();
                if let Some(new_theme) = Theme::load(&self.config.theme) {
                    let theme: &'static Theme = Box::leak(Box::new(new_theme));
                    self.theme = theme;
                }
            }
            2 => self.toggle_mode(),
            3 => {
                self.config.timer_secs = if forward {
                    (self.config.timer_secs + 5).min(600)
                } else {
                    self.config.timer_secs.saturating_sub(5).max(5)
                };
            }
            4 => self.toggle_auto_timer(),
            5 => self.toggle_auto_images(),
            6 => self.config.lookups_enabled = !self.config.lookups_enabled,
            _ => {}
        }
    }
}

pub fn mode_label(mode: Mode) -> String {
    match mode {
        Mode::Flashcard => t!("mode.flashcard").to_string(),
        Mode::Scramble => t!("mode.scramble").to_string(),
    }
}

fn step(idx: usize, len: usize, down: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if down {
        (idx + 1).min(len - 1)
    } else {
        idx.saturating_sub(1)
    }
}

fn step_wrapping(idx: usize, len: usize, forward: bool) -> usize {
    if forward {
        (idx + 1) % len
    } else if idx == 0 {
        len - 1
    } else {
        idx - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    const LEXICON: &str = r#"
name = "Test"

[[theme]]
name = "Ostéologie"

[[theme.subtheme]]
name = "Membre supérieur"
words = [
    { word = "humérus", definition = "Os du bras." },
    { word = "radius", definition = "Os latéral de l'avant-bras." },
]

[[theme.subtheme]]
name = "Crâne"
words = [{ word = "os frontal" }]

[[theme]]
name = "Splanchnologie"

[[theme.subtheme]]
name = "Cœur"
words = [{ word = "arc de l'aorte", definition = "Segment courbe de l'aorte." }]
"#;

    struct FixedLookup(Option<ImageRef>);

    impl ImageLookup for FixedLookup {
        fn find_image(&self, _term: &str) -> Option<ImageRef> {
            self.0.clone()
        }
    }

    fn image(title: &str) -> ImageRef {
        ImageRef {
            page_title: title.to_string(),
            url: format!("https://upload.wikimedia.org/{title}.png"),
        }
    }

    fn test_app(mode: Mode) -> App {
        let config = Config {
            mode,
            ..Config::default()
        };
        let lexicon = Lexicon::from_toml(LEXICON).unwrap();
        let mut app = App::new(config, lexicon, Arc::new(FixedLookup(Some(image("Humérus")))));
        app.rng = SmallRng::seed_from_u64(42);
        app
    }

    #[test]
    fn test_actions_without_word_report_no_active_session() {
        let mut app = test_app(Mode::Flashcard);
        assert_eq!(app.suggest_letter("a"), Err(PuzzleError::NoActiveSession));
        assert_eq!(app.give_hint(), Err(PuzzleError::NoActiveSession));
        assert_eq!(app.submit_guess("x"), Err(PuzzleError::NoActiveSession));
        assert_eq!(app.show_word(), Err(PuzzleError::NoActiveSession));
        assert_eq!(app.show_definition(), Err(PuzzleError::NoActiveSession));
        assert_eq!(app.toggle_timer(), Err(PuzzleError::NoActiveSession));
        assert_eq!(app.request_image(), Err(PuzzleError::NoActiveSession));
    }

    #[test]
    fn test_new_round_never_repeats_last_word() {
        let mut app = test_app(Mode::Flashcard);
        app.select_topic(0, 0);
        let mut previous = app.current_word().unwrap().to_string();
        for _ in 0..20 {
            app.change_word();
            let word = app.current_word().unwrap().to_string();
            assert_ne!(word, previous);
            previous = word;
        }
    }

    #[test]
    fn test_single_word_bucket_repeats() {
        let mut app = test_app(Mode::Flashcard);
        app.select_topic(0, 1);
        app.change_word();
        assert_eq!(app.current_word(), Some("os frontal"));
        assert_eq!(app.last_word.as_deref(), Some("os frontal"));
    }

    #[test]
    fn test_flashcard_round_shows_definition_as_clue() {
        let mut app = test_app(Mode::Flashcard);
        app.select_topic(1, 0);
        assert!(app.definition_visible);
        assert_eq!(
            app.session.as_ref().unwrap().render('_'),
            "_ _ _   _ _   _ ' _ _ _ _ _"
        );
    }

    #[test]
    fn test_scramble_round_hides_definition_and_rejects_letters() {
        let mut app = test_app(Mode::Scramble);
        app.select_topic(0, 0);
        assert!(!app.definition_visible);
        assert_eq!(app.suggest_letter("a"), Err(PuzzleError::ScrambleMode));
        assert_eq!(app.give_hint(), Err(PuzzleError::ScrambleMode));

        app.show_definition().unwrap();
        assert!(app.definition_visible);
    }

    #[test]
    fn test_empty_pool_leaves_no_session() {
        let mut app = test_app(Mode::Flashcard);
        app.select_topic(7, 7);
        assert!(app.session.is_none());
        assert_eq!(app.status.as_ref().map(|s| s.kind), Some(StatusKind::Warning));
    }

    #[test]
    fn test_invalid_letter_keeps_prompt_open() {
        let mut app = test_app(Mode::Flashcard);
        app.select_topic(0, 0);
        app.open_prompt(PromptKind::Letter);
        for ch in "ab".chars() {
            if let Some(prompt) = app.prompt.as_mut() {
                prompt.input.handle(crossterm::event::KeyEvent::new(
                    crossterm::event::KeyCode::Char(ch),
                    crossterm::event::KeyModifiers::NONE,
                ));
            }
        }
        app.submit_prompt();
        let prompt = app.prompt.as_ref().expect("prompt stays open");
        assert_eq!(prompt.input.value(), "");
        assert_eq!(app.status.as_ref().map(|s| s.kind), Some(StatusKind::Warning));
    }

    #[test]
    fn test_letter_prompt_refused_in_scramble_mode() {
        let mut app = test_app(Mode::Scramble);
        app.select_topic(0, 0);
        app.open_prompt(PromptKind::Letter);
        assert!(app.prompt.is_none());
    }

    #[test]
    fn test_correct_guess_scores_and_reveals() {
        let mut app = test_app(Mode::Scramble);
        app.select_topic(1, 0);
        assert_eq!(app.submit_guess("  ARC DE L'AORTE "), Ok(Some(true)));
        assert_eq!(app.score.correct, 1);
        assert_eq!(app.score.attempts, 1);
        assert!(app.session.as_ref().unwrap().is_revealed());
        assert_eq!(
            app.session.as_ref().unwrap().render('_'),
            "a r c   d e   l ' a o r t e"
        );
    }

    #[test]
    fn test_wrong_guess_counts_attempt_and_reveals() {
        let mut app = test_app(Mode::Flashcard);
        app.select_topic(0, 1);
        assert_eq!(app.submit_guess("os pariétal"), Ok(Some(false)));
        assert_eq!(app.score.correct, 0);
        assert_eq!(app.score.attempts, 1);
        assert!(app.session.as_ref().unwrap().is_revealed());
    }

    #[test]
    fn test_blank_guess_is_ignored() {
        let mut app = test_app(Mode::Flashcard);
        app.select_topic(0, 1);
        assert_eq!(app.submit_guess("   "), Ok(None));
        assert_eq!(app.score.attempts, 0);
        assert!(!app.session.as_ref().unwrap().is_revealed());
    }

    #[test]
    fn test_hints_complete_word_and_schedule_image() {
        let mut app = test_app(Mode::Flashcard);
        app.select_topic(0, 1);
        let mut hints = 0;
        while let Ok(HintOutcome::Revealed { .. }) = app.give_hint() {
            hints += 1;
            assert!(hints <= 9);
        }
        assert_eq!(hints, 9);
        assert_eq!(app.score.hints, 9);
        assert!(matches!(app.image, ImageState::Scheduled { .. }));
        assert_eq!(app.give_hint(), Ok(HintOutcome::AlreadyComplete));
        assert_eq!(app.score.hints, 9);
    }

    #[test]
    fn test_suggest_letter_counts_and_reports_absent() {
        let mut app = test_app(Mode::Flashcard);
        app.select_topic(0, 1);
        assert_eq!(app.suggest_letter("o"), Ok(2));
        assert_eq!(app.suggest_letter("O"), Ok(0));
        assert_eq!(app.suggest_letter("z"), Ok(0));
        assert_eq!(
            app.suggest_letter("zz"),
            Err(PuzzleError::InvalidLetterInput("zz".to_string()))
        );
    }

    #[test]
    fn test_suggest_letter_after_reveal_reports_already_complete() {
        let mut app = test_app(Mode::Flashcard);
        app.config.auto_images = false;
        app.select_topic(0, 1);
        app.show_word().unwrap();
        app.image = ImageState::Idle;

        assert_eq!(app.suggest_letter("o"), Ok(0));
        let status = app.status.as_ref().unwrap();
        assert_eq!(status.kind, StatusKind::Info);
        assert_eq!(status.text, t!("status.already_complete"));
        assert!(matches!(app.image, ImageState::Idle));
    }

    #[test]
    fn test_timer_expiry_reveals_word() {
        let mut app = test_app(Mode::Flashcard);
        app.select_topic(0, 1);
        app.toggle_timer().unwrap();
        assert!(app.countdown.is_some());

        let later = Instant::now() + Duration::from_secs(app.config.timer_secs + 1);
        app.on_tick(later);
        assert!(app.countdown.is_none());
        assert!(app.session.as_ref().unwrap().is_revealed());
        assert_eq!(app.status.as_ref().map(|s| s.kind), Some(StatusKind::Warning));
    }

    #[test]
    fn test_toggle_timer_stops_running_countdown() {
        let mut app = test_app(Mode::Flashcard);
        app.select_topic(0, 1);
        app.toggle_timer().unwrap();
        app.toggle_timer().unwrap();
        assert!(app.countdown.is_none());
    }

    #[test]
    fn test_auto_timer_restarts_every_round() {
        let mut app = test_app(Mode::Flashcard);
        app.config.auto_timer = true;
        app.select_topic(0, 0);
        assert!(app.countdown.is_some());
        app.show_word().unwrap();
        assert!(app.countdown.is_none());
        app.change_word();
        assert!(app.countdown.is_some());
    }

    #[test]
    fn test_disabling_auto_timer_stops_countdown() {
        let mut app = test_app(Mode::Flashcard);
        app.config.auto_timer = true;
        app.select_topic(0, 0);
        assert!(app.countdown.is_some());
        app.toggle_auto_timer();
        assert!(!app.config.auto_timer);
        assert!(app.countdown.is_none());

        app.toggle_auto_timer();
        assert!(app.countdown.is_some());
    }

    #[test]
    fn test_scheduled_lookup_delivers_image() {
        let (tx, rx) = mpsc::channel();
        let mut app = test_app(Mode::Flashcard);
        app.attach_events(tx);
        app.select_topic(0, 1);
        app.show_word().unwrap();

        let ImageState::Scheduled { due } = app.image else {
            panic!("image lookup not scheduled");
        };
        app.on_tick(due - Duration::from_millis(1));
        assert!(matches!(app.image, ImageState::Scheduled { .. }));
        app.on_tick(due);
        assert_eq!(app.image, ImageState::Loading);

        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            AppEvent::ImageLookup { word, image } => {
                assert_eq!(word, "os frontal");
                app.on_image_lookup(&word, image);
            }
            _ => panic!("unexpected event"),
        }
        assert_eq!(app.image, ImageState::Found(image("Humérus")));

        app.request_image().unwrap();
        assert_eq!(
            app.status.as_ref().map(|s| s.kind),
            Some(StatusKind::Info)
        );
        assert_eq!(app.image, ImageState::Found(image("Humérus")));
    }

    #[test]
    fn test_stale_lookup_result_is_dropped() {
        let mut app = test_app(Mode::Flashcard);
        app.select_topic(0, 0);
        app.request_image().unwrap();
        let old_word = app.current_word().unwrap().to_string();

        app.change_word();
        app.on_image_lookup(&old_word, Some(image("Old")));
        assert_eq!(app.image, ImageState::Idle);
    }

    #[test]
    fn test_auto_images_off_skips_scheduling() {
        let mut app = test_app(Mode::Flashcard);
        app.toggle_auto_images();
        app.select_topic(0, 1);
        app.show_word().unwrap();
        assert_eq!(app.image, ImageState::Idle);
    }

    #[test]
    fn test_missing_image_is_reported() {
        let mut app = test_app(Mode::Flashcard);
        app.lookup = Arc::new(FixedLookup(None));
        app.select_topic(0, 1);
        app.request_image().unwrap();
        app.on_image_lookup("os frontal", None);
        assert_eq!(app.image, ImageState::Missing);
    }

    #[test]
    fn test_toggle_mode_starts_new_round() {
        let mut app = test_app(Mode::Flashcard);
        app.select_topic(0, 0);
        let first = app.current_word().unwrap().to_string();
        app.toggle_mode();
        assert_eq!(app.config.mode, Mode::Scramble);
        assert_eq!(app.session.as_ref().map(|s| s.mode()), Some(Mode::Scramble));
        assert_ne!(app.current_word().unwrap(), first);
    }

    #[test]
    fn test_picker_navigation_clamps() {
        let mut app = test_app(Mode::Flashcard);
        app.go_to_picker();
        app.picker_move(true);
        app.picker_move(true);
        assert_eq!(app.picker.topic, 1);
        app.picker_confirm();
        assert_eq!(app.picker.focus, PickerFocus::Subtopics);
        app.picker_move(true);
        assert_eq!(app.picker.subtopic, 0);
        app.picker_confirm();
        assert_eq!(app.screen, AppScreen::Play);
        assert_eq!(app.current_word(), Some("arc de l'aorte"));
    }

    #[test]
    fn test_links_follow_current_word() {
        let mut app = test_app(Mode::Flashcard);
        assert_eq!(app.encyclopedia_url(), None);
        app.select_topic(0, 1);
        assert_eq!(
            app.encyclopedia_url().as_deref(),
            Some("https://fr.wikipedia.org/wiki/os_frontal")
        );
        assert_eq!(
            app.video_search_url().as_deref(),
            Some("https://www.youtube.com/results?search_query=os+frontal")
        );
    }
}
