mod app;
mod config;
mod event;
mod lexicon;
mod logging;
mod lookup;
mod puzzle;
mod session;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};
use rust_i18n::t;

use app::{App, AppScreen, ImageState, PickerFocus, PromptKind, SETTINGS_COUNT, StatusKind};
use config::Config;
use event::{AppEvent, EventHandler};
use lexicon::Lexicon;
use lookup::{ImageLookup, NoLookup, WikipediaLookup};
use puzzle::{Mode, PuzzleError};
use ui::components::progress_bar::ProgressBar;
use ui::components::puzzle_board::PuzzleBoard;
use ui::components::score_panel::ScorePanel;
use ui::components::topic_picker::TopicPickerView;
use ui::layout::{AppLayout, pack_hint_lines};

rust_i18n::i18n!("locales", fallback = "en");

#[derive(Parser)]
#[command(name = "anatolexic", version, about = "Anatomy vocabulary trainer for the terminal")]
struct Cli {
    #[arg(short, long, help = "Lexicon name or path to a lexicon TOML file")]
    lexicon: Option<String>,

    #[arg(long, help = "Interface language (fr, en)")]
    locale: Option<String>,

    #[arg(short, long, help = "Start in scramble mode instead of flashcard mode")]
    scramble: bool,

    #[arg(long, value_name = "SECS", help = "Answer countdown in seconds")]
    timer: Option<u64>,

    #[arg(long, help = "Never contact Wikipedia")]
    offline: bool,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "List bundled lexicons and exit")]
    list_lexicons: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list_lexicons {
        for name in Lexicon::available() {
            println!("{name}");
        }
        return Ok(());
    }

    if let Err(e) = logging::init() {
        eprintln!("warning: logging disabled: {e:#}");
    }

    let mut config = Config::load().unwrap_or_else(|e| {
        log::warn!("ignoring unreadable config: {e:#}");
        Config::default()
    });
    if let Some(lexicon) = cli.lexicon {
        config.lexicon = lexicon;
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    if cli.scramble {
        config.mode = Mode::Scramble;
    }
    if let Some(secs) = cli.timer {
        config.timer_secs = secs;
    }
    if cli.offline {
        config.lookups_enabled = false;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    config.validate();
    rust_i18n::set_locale(&config.locale);

    let lexicon = Lexicon::load(&config.lexicon)
        .with_context(|| format!("could not load lexicon '{}'", config.lexicon))?;
    log::info!(
        "lexicon '{}': {} themes, {} words",
        lexicon.name,
        lexicon.topics().len(),
        lexicon.word_count()
    );

    let lookup: Arc<dyn ImageLookup> = if cli.offline {
        Arc::new(NoLookup)
    } else {
        Arc::new(WikipediaLookup::new(
            &config.wiki_language,
            &config.wiki_topic_hint,
        ))
    };

    let mut app = App::new(config, lexicon, lookup);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));
    app.attach_events(events.sender());

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        log::error!("{err:?}");
        eprintln!("Error: {err:?}");
    }
    log::info!(
        "session over: {}/{} correct",
        app.score.correct,
        app.score.attempts
    );

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.on_tick(Instant::now()),
            AppEvent::Resize(_, _) => {}
            AppEvent::ImageLookup { word, image } => app.on_image_lookup(&word, image),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn report<T>(app: &mut App, result: Result<T, PuzzleError>) {
    if let Err(err) = result {
        app.report_error(&err);
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if let Some(prompt) = app.prompt.as_mut() {
        match prompt.input.handle(key) {
            ui::line_input::InputResult::Submit => app.submit_prompt(),
            ui::line_input::InputResult::Cancel => app.prompt = None,
            ui::line_input::InputResult::Continue => {}
        }
        return;
    }

    match app.screen {
        AppScreen::Play => handle_play_key(app, key),
        AppScreen::TopicPicker => handle_picker_key(app, key),
        AppScreen::Stats | AppScreen::About => handle_info_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn handle_play_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('t') | KeyCode::Enter => app.open_prompt(PromptKind::Guess),
        KeyCode::Char('l') => app.open_prompt(PromptKind::Letter),
        KeyCode::Char('h') => {
            let result = app.give_hint();
            report(app, result);
        }
        KeyCode::Char('w') => {
            let result = app.show_word();
            report(app, result);
        }
        KeyCode::Char('d') => {
            let result = app.show_definition();
            report(app, result);
        }
        KeyCode::Char('i') => {
            let result = app.request_image();
            report(app, result);
        }
        KeyCode::Char('r') => {
            let result = app.toggle_timer();
            report(app, result);
        }
        KeyCode::Char('n') | KeyCode::Char(' ') => app.change_word(),
        KeyCode::Char('m') => app.toggle_mode(),
        KeyCode::Char('a') => app.toggle_auto_images(),
        KeyCode::Char('T') => app.toggle_auto_timer(),
        KeyCode::Char('c') => app.go_to_picker(),
        KeyCode::Char('s') => app.go_to_stats(),
        KeyCode::Char('o') => app.go_to_settings(),
        KeyCode::Char('?') => app.go_to_about(),
        _ => {}
    }
}

fn handle_picker_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            if app.session.is_some() {
                app.go_to_play();
            } else {
                app.should_quit = true;
            }
        }
        KeyCode::Up | KeyCode::Char('k') => app.picker_move(false),
        KeyCode::Down | KeyCode::Char('j') => app.picker_move(true),
        KeyCode::Left | KeyCode::Char('h') => app.picker_focus(PickerFocus::Topics),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => {
            app.picker_focus(PickerFocus::Subtopics)
        }
        KeyCode::Enter => app.picker_confirm(),
        _ => {}
    }
}

fn handle_info_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => {
            if app.session.is_some() {
                app.go_to_play();
            } else {
                app.go_to_picker();
            }
        }
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.leave_settings(),
        KeyCode::Up | KeyCode::Char('k') => {
            app.settings_selected = app.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.settings_selected + 1 < SETTINGS_COUNT {
                app.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
            app.settings_cycle_forward();
        }
        KeyCode::Left | KeyCode::Char('h') => {
            app.settings_cycle_backward();
        }
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Play => render_play(frame, app),
        AppScreen::TopicPicker => render_picker(frame, app),
        AppScreen::Stats => render_stats(frame, app),
        AppScreen::Settings => render_settings(frame, app),
        AppScreen::About => render_about(frame, app),
    }

    if app.prompt.is_some() {
        render_prompt(frame, app);
    }
}

fn status_color(app: &App, kind: StatusKind) -> Color {
    let colors = &app.theme.colors;
    match kind {
        StatusKind::Info => colors.accent(),
        StatusKind::Success => colors.success(),
        StatusKind::Warning => colors.warning(),
        StatusKind::Error => colors.error(),
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect, info: &str) {
    let colors = &app.theme.colors;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " AnatoLexic ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info,
            Style::default()
                .fg(colors.text_muted())
                .bg(colors.header_bg()),
        ),
    ]))
    .block(Block::bordered().border_style(Style::default().fg(colors.border())))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

/// Footer key hints for the play screen. Letter and hint keys only exist in
/// flashcard mode.
fn play_hint_labels(mode: Mode) -> Vec<String> {
    let mut labels = vec![t!("hints.guess").to_string()];
    if mode == Mode::Flashcard {
        labels.extend([t!("hints.letter").to_string(), t!("hints.hint").to_string()]);
    }
    labels.extend([
        t!("hints.show_word").to_string(),
        t!("hints.definition").to_string(),
        t!("hints.next").to_string(),
        t!("hints.mode").to_string(),
        t!("hints.timer").to_string(),
        t!("hints.auto_timer").to_string(),
        t!("hints.image").to_string(),
        t!("hints.auto_images").to_string(),
        t!("hints.topics").to_string(),
        t!("hints.stats").to_string(),
        t!("hints.settings").to_string(),
        t!("hints.about").to_string(),
        t!("hints.quit").to_string(),
    ]);
    labels
}

fn render_play(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let now = Instant::now();

    let hint_labels = play_hint_labels(app.config.mode);
    let hint_refs: Vec<&str> = hint_labels.iter().map(String::as_str).collect();
    let hint_lines = pack_hint_lines(&hint_refs, area.width as usize);
    let app_layout = AppLayout::new(area, hint_lines.len() as u16 + 1);
    let tier = app_layout.tier;

    let bucket = match (app.current_topic(), app.current_subtopic()) {
        (Some(topic), Some(sub)) => format!("{} › {}", topic.name, sub.name),
        _ => String::new(),
    };
    let header_info = format!(
        " {bucket} | {} | {} {} / {}",
        app::mode_label(app.config.mode),
        t!("stats.score"),
        app.score.correct,
        app.score.attempts,
    );
    render_header(frame, app, app_layout.header, &header_info);

    let show_links = tier.show_links(area.height);
    let mut constraints = vec![Constraint::Min(6), Constraint::Length(3)];
    if show_links {
        constraints.push(Constraint::Length(6));
    }
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(app_layout.main);

    let definition = if app.definition_visible && !app.definition.is_empty() {
        Some(app.definition.as_str())
    } else {
        None
    };
    let board = PuzzleBoard::new(app.session.as_ref(), app.config.placeholder, app.theme)
        .title(bucket)
        .definition(definition)
        .empty_text(t!("board.no_word").to_string());
    frame.render_widget(board, main_layout[0]);

    let bars = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(main_layout[1]);
    let progress = app.session.as_ref().map_or(0.0, |s| s.progress());
    frame.render_widget(
        ProgressBar::new(&t!("board.progress"), progress, app.theme),
        bars[0],
    );
    let countdown_bar = match app.countdown {
        Some(countdown) => {
            let secs = countdown.remaining_secs(now);
            let fill = if secs <= 5 {
                colors.error()
            } else {
                colors.bar_filled()
            };
            ProgressBar::new(&t!("board.timer"), countdown.ratio_left(now), app.theme)
                .text(format!("{secs}s"))
                .fill(fill)
        }
        None => ProgressBar::new(&t!("board.timer"), 0.0, app.theme).text("--".to_string()),
    };
    frame.render_widget(countdown_bar, bars[1]);

    if show_links {
        render_links(frame, app, main_layout[2]);
    }

    if let Some(sidebar) = app_layout.sidebar {
        let panel = ScorePanel::new(&app.score, app.config.mode, app.theme).toggles(
            app.config.auto_images,
            app.countdown.is_some(),
            app.config.auto_timer,
        );
        frame.render_widget(panel, sidebar);
    }

    let mut footer_lines = vec![match &app.status {
        Some(status) => Line::from(Span::styled(
            format!("  {}", status.text),
            Style::default()
                .fg(status_color(app, status.kind))
                .add_modifier(Modifier::BOLD),
        )),
        None => Line::from(""),
    }];
    footer_lines.extend(hint_lines.into_iter().map(|line| {
        Line::from(Span::styled(line, Style::default().fg(colors.text_muted())))
    }));
    frame.render_widget(Paragraph::new(footer_lines), app_layout.footer);
}

fn render_links(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let muted = Style::default().fg(colors.text_muted());
    let link = Style::default()
        .fg(colors.accent())
        .add_modifier(Modifier::UNDERLINED);

    let image_line = match &app.image {
        ImageState::Idle => Line::from(Span::styled(t!("image.idle").to_string(), muted)),
        ImageState::Scheduled { .. } | ImageState::Loading => {
            Line::from(Span::styled(t!("image.loading").to_string(), muted))
        }
        ImageState::Found(image) => Line::from(vec![
            Span::styled(format!("{}  ", image.page_title), Style::default().fg(colors.fg())),
            Span::styled(image.url.clone(), link),
        ]),
        ImageState::Missing => Line::from(Span::styled(
            t!("image.missing").to_string(),
            Style::default().fg(colors.warning()),
        )),
    };

    let mut lines = vec![image_line];
    // Links name the answer, so they wait until the word is shown.
    let revealed = app.session.as_ref().is_some_and(|s| s.is_revealed());
    if revealed {
        if let Some(url) = app.encyclopedia_url() {
            lines.push(Line::from(vec![
                Span::styled(format!("{} ", t!("links.encyclopedia")), muted),
                Span::styled(url, link),
            ]));
        }
        if let Some(url) = app.video_search_url() {
            lines.push(Line::from(vec![
                Span::styled(format!("{} ", t!("links.videos")), muted),
                Span::styled(url, link),
            ]));
        }
    }

    let block = Block::bordered()
        .title(format!(" {} ", t!("image.title")))
        .border_style(Style::default().fg(colors.border()));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_picker(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(area);

    render_header(frame, app, layout[0], &format!(" {}", t!("picker.header")));

    let picker_area = ui::layout::centered_rect(70, 90, layout[1]);
    let view = TopicPickerView::new(&app.lexicon, &app.picker, app.theme);
    frame.render_widget(&view, picker_area);

    let mut footer_lines = Vec::new();
    if let Some(status) = &app.status {
        footer_lines.push(Line::from(Span::styled(
            format!("  {}", status.text),
            Style::default().fg(status_color(app, status.kind)),
        )));
    }
    footer_lines.push(Line::from(Span::styled(
        format!("  {}", t!("picker.help")),
        Style::default().fg(colors.text_muted()),
    )));
    frame.render_widget(Paragraph::new(footer_lines), layout[2]);
}

fn render_stats(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let centered = ui::layout::centered_rect(50, 50, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(1)])
        .split(centered);

    let panel = ScorePanel::new(&app.score, app.config.mode, app.theme)
        .toggles(
            app.config.auto_images,
            app.countdown.is_some(),
            app.config.auto_timer,
        )
        .title(t!("stats.session_title").to_string());
    frame.render_widget(Clear, centered);
    frame.render_widget(panel, layout[0]);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!("  {}", t!("common.back")),
            Style::default().fg(colors.accent()),
        ))),
        layout[1],
    );
}

fn render_about(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let centered = ui::layout::centered_rect(60, 50, area);
    let log_path = logging::log_path();
    let config_path = Config::config_path();

    let block = Block::bordered()
        .title(format!(" {} ", t!("about.title")))
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));

    let lines = vec![
        Line::from(Span::styled(
            format!("AnatoLexic {}", env!("CARGO_PKG_VERSION")),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            t!("about.body").to_string(),
            Style::default().fg(colors.fg()),
        )),
        Line::from(""),
        Line::from(Span::styled(
            t!("about.log", path = log_path.display()).to_string(),
            Style::default().fg(colors.text_muted()),
        )),
        Line::from(Span::styled(
            t!("about.config", path = config_path.display()).to_string(),
            Style::default().fg(colors.text_muted()),
        )),
        Line::from(""),
        Line::from(Span::styled(
            t!("common.back").to_string(),
            Style::default().fg(colors.accent()),
        )),
    ];

    frame.render_widget(Clear, centered);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true }),
        centered,
    );
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let centered = ui::layout::centered_rect(60, 80, area);

    let block = Block::bordered()
        .title(format!(" {} ", t!("settings.title")))
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let on_off = |on: bool| {
        if on {
            t!("common.on").to_string()
        } else {
            t!("common.off").to_string()
        }
    };
    let fields: Vec<(String, String)> = vec![
        (t!("settings.language").to_string(), app.config.locale.clone()),
        (t!("settings.theme").to_string(), app.config.theme.clone()),
        (t!("settings.mode").to_string(), app::mode_label(app.config.mode)),
        (t!("settings.timer").to_string(), format!("{}s", app.config.timer_secs)),
        (t!("settings.auto_timer").to_string(), on_off(app.config.auto_timer)),
        (t!("settings.auto_images").to_string(), on_off(app.config.auto_images)),
        (t!("settings.lookups").to_string(), on_off(app.config.lookups_enabled)),
    ];

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(fields.len() as u16 * 2),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(inner);

    let header = Paragraph::new(Line::from(Span::styled(
        format!("  {}", t!("settings.help")),
        Style::default().fg(colors.text_muted()),
    )));
    header.render(layout[0], frame.buffer_mut());

    let field_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(fields.iter().map(|_| Constraint::Length(2)).collect::<Vec<_>>())
        .split(layout[1]);

    for (i, (label, value)) in fields.iter().enumerate() {
        let is_selected = i == app.settings_selected;
        let indicator = if is_selected { " > " } else { "   " };

        let label_style = Style::default()
            .fg(if is_selected {
                colors.accent()
            } else {
                colors.fg()
            })
            .add_modifier(if is_selected {
                Modifier::BOLD
            } else {
                Modifier::empty()
            });
        let value_style = Style::default().fg(if is_selected {
            colors.accent()
        } else {
            colors.text_muted()
        });

        let line = Line::from(vec![
            Span::styled(format!("{indicator}{label}: "), label_style),
            Span::styled(format!("< {value} >"), value_style),
        ]);
        Paragraph::new(line).render(field_layout[i], frame.buffer_mut());
    }

    let footer = Paragraph::new(Line::from(Span::styled(
        format!("  {}", t!("settings.footer")),
        Style::default().fg(colors.accent()),
    )));
    footer.render(layout[3], frame.buffer_mut());
}

fn render_prompt(frame: &mut ratatui::Frame, app: &App) {
    let Some(prompt) = app.prompt.as_ref() else {
        return;
    };
    let colors = &app.theme.colors;
    let area = ui::layout::centered_rect(50, 20, frame.area());

    let title = match prompt.kind {
        PromptKind::Guess => t!("prompt.guess_title"),
        PromptKind::Letter => t!("prompt.letter_title"),
    };
    let block = Block::bordered()
        .title(format!(" {title} "))
        .border_style(Style::default().fg(colors.border_focused()))
        .style(Style::default().bg(colors.bg()));

    let (before, cursor, after) = prompt.input.render_parts();
    let text_style = Style::default().fg(colors.fg());
    let cursor_style = Style::default().fg(colors.bg()).bg(colors.fg());
    let input_line = Line::from(vec![
        Span::styled("  > ", Style::default().fg(colors.accent())),
        Span::styled(before, text_style),
        Span::styled(cursor.map_or_else(|| " ".to_string(), |c| c.to_string()), cursor_style),
        Span::styled(after, text_style),
    ]);

    let lines = vec![
        Line::from(""),
        input_line,
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", t!("prompt.help")),
            Style::default().fg(colors.text_muted()),
        )),
    ];

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
