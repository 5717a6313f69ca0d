use anyhow::Result;
use ballot_tracker::{
    FeaturedPolitician, IdentityRef, LookupError, PoliticianKey, PoliticianProfile, RecordKind,
    Recommendation, Reconciler, SearchMode, View, Navigator, VoteRecord,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

const ZIP_LENGTH: usize = 5;

/// Something selectable in the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Politician(IdentityRef),
    Record(String),
}

pub struct App {
    pub reconciler: Reconciler,
    pub nav: Navigator,
    pub mode: SearchMode,
    pub input: String,
    pub state: TableState,
    pub error: Option<String>,
}

impl App {
    pub fn new(reconciler: Reconciler) -> Self {
        let mut app = Self {
            reconciler,
            nav: Navigator::new(),
            mode: SearchMode::Zip,
            input: String::new(),
            state: TableState::default(),
            error: None,
        };
        app.reset_selection();
        app
    }

    fn reset_selection(&mut self) {
        if self.entries().is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    fn results(&self, mode: SearchMode, query: &str) -> Result<Vec<PoliticianProfile>, LookupError> {
        match mode {
            SearchMode::Zip => self.reconciler.search_by_zip(query).map(|d| d.members),
            SearchMode::Name => self.reconciler.search_by_name(query),
        }
    }

    /// Selectable rows of the current view, re-derived from the snapshot
    pub fn entries(&self) -> Vec<Entry> {
        match self.nav.current() {
            View::Home => {
                let featured = self.reconciler.featured();
                featured
                    .positive
                    .iter()
                    .chain(featured.negative.iter())
                    .map(featured_entry)
                    .collect()
            }
            View::Results { mode, query } => self
                .results(*mode, query)
                .map(|profiles| {
                    profiles
                        .iter()
                        .map(|p| Entry::Politician(IdentityRef::StableId(p.stable_id.clone())))
                        .collect()
                })
                .unwrap_or_default(),
            View::ProfileDetail(reference) => self
                .profile_records(reference)
                .iter()
                .map(|r| Entry::Record(r.id.clone()))
                .collect(),
            View::RecordDetail { record_id } => self
                .reconciler
                .record_detail(record_id)
                .map(|d| {
                    d.politicians
                        .iter()
                        .map(|p| Entry::Politician(IdentityRef::StableId(p.stable_id.clone())))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// Linked records for a profile view. A name that is not on the roster
    /// still shows the records naming it.
    fn profile_records(&self, reference: &IdentityRef) -> Vec<VoteRecord> {
        match (self.reconciler.get_profile(reference), reference) {
            (Ok(profile), _) => profile.linked_records,
            (Err(_), IdentityRef::Name(name)) => self.reconciler.records_for_name(name),
            (Err(_), IdentityRef::StableId(_)) => Vec::new(),
        }
    }

    pub fn selected_entry(&self) -> Option<Entry> {
        self.state
            .selected()
            .and_then(|i| self.entries().into_iter().nth(i))
    }

    pub fn next(&mut self) {
        let len = self.entries().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.entries().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggle();
        self.input.clear();
        self.error = None;
    }

    pub fn push_char(&mut self, c: char) {
        match self.mode {
            SearchMode::Zip => {
                if c.is_ascii_digit() && self.input.len() < ZIP_LENGTH {
                    self.input.push(c);
                }
            }
            SearchMode::Name => self.input.push(c),
        }
    }

    /// Run the typed search. Invalid input stays on Home with a message.
    pub fn submit(&mut self) {
        let query = self.input.trim().to_string();
        match self.results(self.mode, &query) {
            Ok(_) => {
                self.error = None;
                self.nav.search(self.mode, &query);
                self.reset_selection();
            }
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    pub fn open_selected(&mut self) {
        let Some(entry) = self.selected_entry() else {
            return;
        };
        let view = match entry {
            Entry::Politician(reference) => {
                if let Err(err) = self.reconciler.get_profile(&reference) {
                    if self.profile_records(&reference).is_empty() {
                        self.error = Some(err.to_string());
                        return;
                    }
                }
                View::ProfileDetail(reference)
            }
            Entry::Record(record_id) => View::RecordDetail { record_id },
        };
        self.error = None;
        self.nav.go(view);
        self.reset_selection();
    }

    pub fn back(&mut self) {
        self.error = None;
        if self.nav.back() {
            self.reset_selection();
        }
    }

    pub fn home(&mut self) {
        self.error = None;
        self.nav.home();
        self.reset_selection();
    }

    /// Apply one key press. Returns true when the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        if *self.nav.current() == View::Home {
            match key.code {
                KeyCode::Esc => return true,
                KeyCode::Tab => self.toggle_mode(),
                KeyCode::Backspace => {
                    self.input.pop();
                }
                KeyCode::Enter => {
                    if self.input.trim().is_empty() {
                        self.open_selected();
                    } else {
                        self.submit();
                    }
                }
                KeyCode::Down => self.next(),
                KeyCode::Up => self.previous(),
                KeyCode::Char(c) => self.push_char(c),
                _ => {}
            }
            return false;
        }

        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Left => self.back(),
            KeyCode::Char('h') => self.home(),
            KeyCode::Enter | KeyCode::Right => self.open_selected(),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            _ => {}
        }
        false
    }
}

fn featured_entry(politician: &FeaturedPolitician) -> Entry {
    match &politician.key {
        PoliticianKey::StableId(id) => Entry::Politician(IdentityRef::StableId(id.clone())),
        PoliticianKey::Unresolved(_) => Entry::Politician(IdentityRef::Name(politician.name.clone())),
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

// ============================================================================
// RENDERING
// ============================================================================

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header / search box
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.nav.current().clone() {
        View::Home => render_home(f, chunks[1], app),
        View::Results { mode, query } => render_results(f, chunks[1], app, mode, &query),
        View::ProfileDetail(reference) => render_profile(f, chunks[1], app, &reference),
        View::RecordDetail { record_id } => render_record(f, chunks[1], app, &record_id),
    }

    render_status_bar(f, chunks[2], app);
}

fn label_style() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

fn header_style() -> Style {
    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
}

fn kind_color(kind: RecordKind) -> Color {
    match kind {
        RecordKind::Positive => Color::Green,
        RecordKind::Negative => Color::Red,
    }
}

fn recommendation_color(recommendation: Recommendation) -> Color {
    match recommendation {
        Recommendation::Favorable => Color::Green,
        Recommendation::Unfavorable => Color::Red,
        Recommendation::Undetermined => Color::DarkGray,
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled("🗳️  Ballot Tracker", header_style()), Span::raw("  |  ")];

    if *app.nav.current() == View::Home {
        spans.push(Span::styled(format!("{}: ", app.mode.title()), label_style()));
        spans.push(Span::styled(app.input.clone(), Style::default().fg(Color::White)));
        spans.push(Span::styled("▏", Style::default().fg(Color::Yellow)));
    } else {
        spans.push(Span::styled(app.nav.current().title(), Style::default().fg(Color::White)));
    }

    let header = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_home(f: &mut Frame, area: Rect, app: &mut App) {
    let featured = app.reconciler.featured();

    let header_cells = ["", "Name", "State", "Role", "+", "-", "Recommendation"]
        .iter()
        .map(|h| Cell::from(*h).style(header_style()));
    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let positive = featured.positive.iter().map(|p| ("▲", Color::Green, p));
    let negative = featured.negative.iter().map(|p| ("▼", Color::Red, p));

    let rows = positive.chain(negative).map(|(marker, color, p)| {
        Row::new(vec![
            Cell::from(marker).style(Style::default().fg(color)),
            Cell::from(truncate(&p.display_name, 28)),
            Cell::from(p.state.clone()),
            Cell::from(truncate(&p.role, 28)),
            Cell::from(p.stats.positive_count.to_string()).style(Style::default().fg(Color::Green)),
            Cell::from(p.stats.negative_count.to_string()).style(Style::default().fg(Color::Red)),
            Cell::from(p.recommendation.label())
                .style(Style::default().fg(recommendation_color(p.recommendation))),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Length(30),
            Constraint::Length(6),
            Constraint::Length(30),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(18),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Featured: good and bad votes "),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_results(f: &mut Frame, area: Rect, app: &mut App, mode: SearchMode, query: &str) {
    let (title, profiles) = match mode {
        SearchMode::Zip => match app.reconciler.search_by_zip(query) {
            Ok(delegation) => (
                format!(
                    " Representatives for {} ({}-{}) ",
                    delegation.zip, delegation.state, delegation.district
                ),
                delegation.members,
            ),
            Err(err) => (format!(" {} ", err), Vec::new()),
        },
        SearchMode::Name => match app.reconciler.search_by_name(query) {
            Ok(profiles) => (format!(" {} match(es) for \"{}\" ", profiles.len(), query), profiles),
            Err(err) => (format!(" {} ", err), Vec::new()),
        },
    };

    let header_cells = ["Name", "Role", "State", "Party", "Records", "Recommendation"]
        .iter()
        .map(|h| Cell::from(*h).style(header_style()));
    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = profiles.iter().map(|p| {
        Row::new(vec![
            Cell::from(truncate(&p.display_name, 28)),
            Cell::from(truncate(&p.role, 28)),
            Cell::from(p.state.clone()),
            Cell::from(truncate(&p.party, 14)),
            Cell::from(format!("{} (+{} / -{})", p.record_count, p.positive_count, p.negative_count)),
            Cell::from(p.recommendation.label())
                .style(Style::default().fg(recommendation_color(p.recommendation))),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(30),
            Constraint::Length(30),
            Constraint::Length(6),
            Constraint::Length(16),
            Constraint::Length(16),
            Constraint::Length(18),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn field<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![Span::styled(format!("  {}: ", label), label_style()), Span::raw(value)])
}

fn optional(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

fn render_profile(f: &mut Frame, area: Rect, app: &mut App, reference: &IdentityRef) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(45), // Identity + contact
            Constraint::Percentage(55), // Linked records
        ])
        .split(area);

    let profile = match app.reconciler.get_profile(reference) {
        Ok(profile) => profile,
        Err(err) => {
            let records = app.profile_records(reference);
            if records.is_empty() {
                let missing = Paragraph::new(err.to_string())
                    .style(Style::default().fg(Color::Red))
                    .block(Block::default().borders(Borders::ALL).title(" Profile "));
                f.render_widget(missing, area);
                return;
            }
            render_off_roster(f, chunks[0], reference, &records);
            render_record_table(f, chunks[1], &mut app.state, &records);
            return;
        }
    };

    let content = vec![
        Line::from(""),
        Line::from(vec![Span::styled(
            format!("  {}", profile.display_name),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        field("Role", profile.role.clone()),
        field("State", profile.state.clone()),
        field("Party", profile.party.clone()),
        field(
            "Age",
            profile.age.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string()),
        ),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Recommendation: ", label_style()),
            Span::styled(
                profile.recommendation.label(),
                Style::default()
                    .fg(recommendation_color(profile.recommendation))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        field(
            "Records",
            format!(
                "{} (+{} / -{})",
                profile.record_count, profile.positive_count, profile.negative_count
            ),
        ),
        Line::from(""),
        Line::from("  ─────────────────────────────────────"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  CONTACT",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )]),
        Line::from(""),
        field("Phone", optional(&profile.phone)),
        field("Office", optional(&profile.office_address)),
        field("Website", optional(&profile.official_url)),
        field("Contact form", optional(&profile.contact_form_url)),
        field("Finance id", optional(&profile.finance_disclosure_id)),
        field("Bioguide id", profile.stable_id.clone()),
    ];

    let identity = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Profile "),
    );
    f.render_widget(identity, chunks[0]);

    render_record_table(f, chunks[1], &mut app.state, &profile.linked_records);
}

/// Identity panel for a politician named by records but missing from the roster
fn render_off_roster(f: &mut Frame, area: Rect, reference: &IdentityRef, records: &[VoteRecord]) {
    let name = match reference {
        IdentityRef::Name(name) | IdentityRef::StableId(name) => name.clone(),
    };
    let state = records
        .iter()
        .find_map(|r| r.state.clone())
        .unwrap_or_else(|| "-".to_string());
    let positive = records.iter().filter(|r| r.is_positive()).count();

    let content = vec![
        Line::from(""),
        Line::from(vec![Span::styled(
            format!("  {}", name),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        field("State", state),
        field(
            "Records",
            format!("{} (+{} / -{})", records.len(), positive, records.len() - positive),
        ),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Not on the current roster",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )]),
    ];

    let panel = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Profile "),
    );
    f.render_widget(panel, area);
}

fn render_record_table(f: &mut Frame, area: Rect, state: &mut TableState, records: &[VoteRecord]) {
    let header_cells = ["Date", "Type", "Details"]
        .iter()
        .map(|h| Cell::from(*h).style(header_style()));
    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let detail_width = (area.width as usize).saturating_sub(30).max(10);
    let rows = records.iter().map(|record| {
        Row::new(vec![
            Cell::from(record.timestamp.format("%Y-%m-%d").to_string()),
            Cell::from(record.kind.as_str()).style(Style::default().fg(kind_color(record.kind))),
            Cell::from(truncate(&record.details, detail_width)),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [Constraint::Length(12), Constraint::Length(10), Constraint::Min(10)],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" Voting Record ({}) ", records.len())),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, state);
}

fn render_record(f: &mut Frame, area: Rect, app: &mut App, record_id: &str) {
    let detail = match app.reconciler.record_detail(record_id) {
        Ok(detail) => detail,
        Err(err) => {
            let missing = Paragraph::new(err.to_string())
                .style(Style::default().fg(Color::Red))
                .block(Block::default().borders(Borders::ALL).title(" Record "));
            f.render_widget(missing, area);
            return;
        }
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(8)])
        .split(area);

    let record = &detail.record;
    let mut content = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Type: ", label_style()),
            Span::styled(record.kind.as_str(), Style::default().fg(kind_color(record.kind))),
        ]),
        field("Date", record.timestamp.format("%Y-%m-%d %H:%M UTC").to_string()),
        field("State", optional(&record.state)),
        field("Named", record.politician_names.join(", ")),
    ];
    if !detail.unresolved.is_empty() {
        content.push(Line::from(vec![
            Span::styled("  Not on roster: ", label_style()),
            Span::styled(detail.unresolved.join(", "), Style::default().fg(Color::Red)),
        ]));
    }
    content.push(Line::from(""));
    content.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            wrap_text(&record.details, (chunks[0].width as usize).saturating_sub(6).max(20)),
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        ),
    ]));

    let body = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(format!(" Record {} ", record.id)),
    );
    f.render_widget(body, chunks[0]);

    let header_cells = ["Name", "Role", "State", "Party"]
        .iter()
        .map(|h| Cell::from(*h).style(header_style()));
    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);
    let rows = detail.politicians.iter().map(|p| {
        Row::new(vec![
            Cell::from(truncate(&p.display_name, 28)),
            Cell::from(truncate(&p.role, 28)),
            Cell::from(p.state.clone()),
            Cell::from(p.party.clone()),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(30),
            Constraint::Length(30),
            Constraint::Length(6),
            Constraint::Length(16),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Politicians "),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, chunks[1], &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = Vec::new();

    if let Some(error) = &app.error {
        status_spans.push(Span::styled(format!(" {} ", error), Style::default().fg(Color::Red)));
        status_spans.push(Span::raw(" | "));
    }

    if *app.nav.current() == View::Home {
        status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Search/Open | "));
        status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" ZIP/Name | "));
        status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Featured | "));
        status_spans.push(Span::styled("Esc", Style::default().fg(Color::Red)));
        status_spans.push(Span::raw(" Quit"));
    } else {
        status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Open | "));
        status_spans.push(Span::styled("Esc", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Back | "));
        status_spans.push(Span::styled("h", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Home | "));
        status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Nav | "));
        status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
        status_spans.push(Span::raw(" Quit"));
    }

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn wrap_text(text: &str, width: usize) -> String {
    if text.len() <= width {
        text.to_string()
    } else {
        let mut result = String::new();
        let words: Vec<&str> = text.split_whitespace().collect();
        let mut current_line = String::new();

        for word in words {
            if current_line.len() + word.len() + 1 <= width {
                if !current_line.is_empty() {
                    current_line.push(' ');
                }
                current_line.push_str(word);
            } else {
                if !result.is_empty() {
                    result.push_str("\n  ");
                }
                result.push_str(&current_line);
                current_line = word.to_string();
            }
        }

        if !current_line.is_empty() {
            if !result.is_empty() {
                result.push_str("\n  ");
            }
            result.push_str(&current_line);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_tracker::loader::{parse_roster, parse_zip_table};
    use ballot_tracker::Snapshot;

    const ROSTER: &str = "\
full_name,first_name,last_name,nickname,type,state,district,party,bioguide_id
Amy Klobuchar,Amy,Klobuchar,,sen,MN,,Democrat,K000367
Tina Smith,Tina,Smith,,sen,MN,,Democrat,S001203
Ilhan Omar,Ilhan,Omar,,rep,MN,5,Democrat,O000173
Bernard Sanders,Bernard,Sanders,Bernie,sen,VT,,Independent,S000033
";

    fn app() -> App {
        let roster = parse_roster(ROSTER).unwrap();
        let zips = parse_zip_table("zip,state_abbr,cd\n55401,MN,5\n").unwrap();
        App::new(Reconciler::new(Snapshot::build(&roster, &zips, VoteRecord::seed())))
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_zip_input_accepts_five_digits_only() {
        let mut app = app();
        type_text(&mut app, "55a4013");
        assert_eq!(app.input, "55401");
    }

    #[test]
    fn test_zip_search_then_profile_then_back() {
        let mut app = app();
        type_text(&mut app, "55401");
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.nav.current(), View::Results { mode: SearchMode::Zip, .. }));
        assert_eq!(app.entries().len(), 3);

        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.nav.current(),
            &View::ProfileDetail(IdentityRef::StableId("K000367".to_string()))
        );
        // Klobuchar has two linked records
        assert_eq!(app.entries().len(), 2);

        press(&mut app, KeyCode::Esc);
        assert!(matches!(app.nav.current(), View::Results { .. }));
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.nav.current(), &View::Home);
    }

    #[test]
    fn test_invalid_zip_stays_home_with_error() {
        let mut app = app();
        type_text(&mut app, "123");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.nav.current(), &View::Home);
        assert!(app.error.as_deref().unwrap_or("").contains("five digits"));
    }

    #[test]
    fn test_name_mode_and_record_detail() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.mode, SearchMode::Name);
        type_text(&mut app, "bernie");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.nav.current(), View::RecordDetail { .. }));
        assert_eq!(
            app.entries(),
            vec![Entry::Politician(IdentityRef::StableId("S000033".to_string()))]
        );
    }

    #[test]
    fn test_off_roster_featured_politician_opens_records() {
        let roster = parse_roster(ROSTER).unwrap();
        let zips = parse_zip_table("zip,state_abbr,cd\n55401,MN,5\n").unwrap();
        let records = vec![VoteRecord::new(
            "k1",
            RecordKind::Negative,
            "Voted against the bill",
            &["Tim Kaine"],
            chrono::Utc::now(),
        )];
        let mut app = App::new(Reconciler::new(Snapshot::build(&roster, &zips, records)));

        assert_eq!(
            app.entries(),
            vec![Entry::Politician(IdentityRef::Name("Tim Kaine".to_string()))]
        );
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.error, None);
        assert_eq!(
            app.nav.current(),
            &View::ProfileDetail(IdentityRef::Name("Tim Kaine".to_string()))
        );
        assert_eq!(app.entries(), vec![Entry::Record("k1".to_string())]);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.nav.current(), &View::RecordDetail { record_id: "k1".to_string() });
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(press(&mut app, KeyCode::Esc));
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("Peña Nieto Rodríguez", 8), "Peña ...");
        assert_eq!(truncate("short", 8), "short");
    }
}
