//! CLI (Command Line Interface) mode
//!
//! Interactive REPL over the hub. Slash commands browse the catalog,
//! calendar and team board; anything else is sent to the advisor.

use std::borrow::Cow;

use chrono::Local;
use fact_calendar::MonthView;
use fact_core::{
    Category, CompetitionSuggestion, Curriculum, Dialog, Hub, NewTeamRequest, Sender, TeamChat,
};
use nu_ansi_term::{Color, Style};
use reedline::{
    ColumnarMenu, Completer, DefaultHinter, Emacs, KeyCode, KeyModifiers, Keybindings,
    MenuBuilder, Prompt, PromptEditMode, PromptHistorySearch, Reedline, ReedlineEvent,
    ReedlineMenu, Signal, Suggestion,
};
use tokio::task::JoinHandle;
use tracing::info;

use crate::render;

/// Available commands for autocomplete display
const COMMANDS: &[(&str, &str)] = &[
    ("/help", "ヘルプを表示"),
    ("/exit", "プログラムを終了"),
    ("/dashboard", "注目の大会と最新のチーム募集"),
    ("/competitions", "大会を検索 (/competitions [キーワード])"),
    ("/filter", "カテゴリで絞り込み (/filter <カテゴリ|all>)"),
    ("/show", "大会の詳細 (/show <id>)"),
    ("/calendar", "カレンダーを表示 (/calendar [YYYY-MM])"),
    ("/next", "翌月"),
    ("/prev", "前月"),
    ("/today", "今月に戻る"),
    ("/requests", "チーム募集の一覧"),
    ("/team", "チーム募集を投稿 (/team <大会id>)"),
    ("/view", "募集の詳細 (/view <募集id>)"),
    ("/connect", "募集者とチャット開始 (/connect <募集id> <メッセージ>)"),
    ("/say", "チームチャットに送信 (/say <メッセージ>)"),
    ("/close", "開いているダイアログを閉じる"),
    ("/suggest", "未掲載の大会を提案"),
];

/// A parsed REPL line
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Help,
    Exit,
    Dashboard,
    Competitions(String),
    Filter(Option<Category>),
    Show(String),
    Calendar(Option<MonthView>),
    Next,
    Prev,
    Today,
    Requests,
    Team(String),
    View(String),
    Connect { request_id: String, message: String },
    Say(String),
    Close,
    Suggest,
    /// Free text for the advisor
    Ask(String),
    /// Unusable input, with a message for the user
    Invalid(String),
}

fn parse_command(input: &str) -> Command {
    let input = input.trim();
    if !input.starts_with('/') {
        return Command::Ask(input.to_string());
    }

    let (name, rest) = match input.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (input, ""),
    };

    let required = |usage: &str, build: fn(String) -> Command| {
        if rest.is_empty() {
            Command::Invalid(format!("使い方: {}", usage))
        } else {
            build(rest.to_string())
        }
    };

    match name.to_lowercase().as_str() {
        "/help" | "/?" => Command::Help,
        "/exit" | "/quit" | "/q" => Command::Exit,
        "/dashboard" | "/home" => Command::Dashboard,
        "/competitions" | "/list" => Command::Competitions(rest.to_string()),
        "/filter" => {
            if rest.is_empty() || rest.eq_ignore_ascii_case("all") {
                Command::Filter(None)
            } else {
                match rest.parse::<Category>() {
                    Ok(category) => Command::Filter(Some(category)),
                    Err(e) => Command::Invalid(e.to_string()),
                }
            }
        }
        "/show" => required("/show <id>", Command::Show),
        "/calendar" | "/cal" => {
            if rest.is_empty() {
                Command::Calendar(None)
            } else {
                match rest.parse::<MonthView>() {
                    Ok(month) => Command::Calendar(Some(month)),
                    Err(e) => Command::Invalid(e.to_string()),
                }
            }
        }
        "/next" => Command::Next,
        "/prev" => Command::Prev,
        "/today" => Command::Today,
        "/requests" => Command::Requests,
        "/team" => required("/team <大会id>", Command::Team),
        "/view" => required("/view <募集id>", Command::View),
        "/connect" => match rest.split_once(char::is_whitespace) {
            Some((request_id, message)) if !message.trim().is_empty() => Command::Connect {
                request_id: request_id.to_string(),
                message: message.trim().to_string(),
            },
            _ => Command::Invalid("使い方: /connect <募集id> <メッセージ>".to_string()),
        },
        "/say" => required("/say <メッセージ>", Command::Say),
        "/close" => Command::Close,
        "/suggest" => Command::Suggest,
        _ => Command::Invalid(format!(
            "不明なコマンド: {}。/help でコマンド一覧を確認してください。",
            name
        )),
    }
}

/// Command completer for reedline
#[derive(Clone)]
pub struct CommandCompleter {
    commands: Vec<(&'static str, &'static str)>,
}

impl CommandCompleter {
    pub fn new() -> Self {
        Self {
            commands: COMMANDS.to_vec(),
        }
    }
}

impl Default for CommandCompleter {
    fn default() -> Self {
        Self::new()
    }
}

impl Completer for CommandCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        // コマンド名の入力中のみ候補を表示
        if !line.starts_with('/') || line.contains(' ') {
            return Vec::new();
        }

        self.commands
            .iter()
            .filter(|(cmd, _)| cmd.starts_with(line))
            .map(|(cmd, desc)| Suggestion {
                value: cmd.to_string(),
                description: Some(desc.to_string()),
                extra: None,
                span: reedline::Span::new(0, pos),
                append_whitespace: true,
                style: None,
            })
            .collect()
    }
}

/// Prompt showing where the user is: advisor, a team chat, or a form field
struct ColoredPrompt {
    label: String,
    style: Style,
}

impl ColoredPrompt {
    fn new(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            style: color.bold(),
        }
    }
}

impl Prompt for ColoredPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Owned(self.style.paint(format!("{}> ", self.label)).to_string())
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _prompt_mode: PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_history_search_indicator(
        &self,
        _history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        Cow::Borrowed("")
    }
}

/// REPL state outside the controller
struct Session {
    hub: Hub,
    editor: Reedline,
    advisor_id: Option<String>,
    /// Team chat messages already printed
    printed: usize,
}

/// Run CLI interactive mode
pub async fn run_cli(hub: Hub) -> anyhow::Result<()> {
    info!("Starting CLI mode");

    print_welcome();

    let mut session = Session {
        hub,
        editor: line_editor(),
        advisor_id: None,
        printed: 0,
    };

    loop {
        let prompt = session.prompt().await;
        match session.editor.read_line(&prompt) {
            Ok(Signal::Success(line)) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                if !session.handle(parse_command(input)).await {
                    break;
                }
            }
            Ok(Signal::CtrlC) => {
                println!("^C");
                continue;
            }
            Ok(Signal::CtrlD) => break,
            Err(err) => {
                eprintln!("\n❌ エラー: {}\n", err);
                break;
            }
        }
    }

    println!("\n👋 さようなら！\n");
    Ok(())
}

fn line_editor() -> Reedline {
    let mut keybindings = default_keybindings();

    // Trigger completion on '/' key
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Char('/'),
        ReedlineEvent::Edit(vec![
            reedline::EditCommand::InsertChar('/'),
            reedline::EditCommand::Complete,
        ]),
    );

    let menu = Box::new(
        ColumnarMenu::default()
            .with_name("command_menu")
            .with_columns(1)
            .with_column_width(Some(60))
            .with_only_buffer_difference(false),
    );

    let hinter = DefaultHinter::default().with_style(Style::new().dimmed());

    Reedline::create()
        .with_completer(Box::new(CommandCompleter::new()))
        .with_menu(ReedlineMenu::EngineCompleter(menu))
        .with_hinter(Box::new(hinter))
        .with_edit_mode(Box::new(Emacs::new(keybindings)))
}

/// Default keybindings for reedline
fn default_keybindings() -> Keybindings {
    let mut keybindings = Keybindings::new();
    // Tab key triggers completion
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::Edit(vec![reedline::EditCommand::Complete]),
    );
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Enter, ReedlineEvent::Submit);
    // Esc key clears/closes menus
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Esc, ReedlineEvent::Esc);
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Char('c'), ReedlineEvent::CtrlC);
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Char('d'), ReedlineEvent::CtrlD);
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Up, ReedlineEvent::Up);
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Down, ReedlineEvent::Down);
    keybindings
}

impl Session {
    async fn prompt(&self) -> ColoredPrompt {
        let app = self.hub.read().await;
        match app.dialog() {
            Dialog::TeamChat { chat_id } => match app.team_chat(chat_id) {
                Some(chat) => ColoredPrompt::new(format!("chat:{}", chat.teammate_name), Color::Green),
                None => ColoredPrompt::new("fact", Color::Cyan),
            },
            _ => ColoredPrompt::new(format!("fact {}", app.month().abbreviation()), Color::Cyan),
        }
    }

    /// Handle one command. Returns false to quit.
    async fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Exit => return false,
            Command::Help => print_help(),
            Command::Invalid(message) => eprintln!("\n❓ {}\n", message),
            Command::Dashboard => self.dashboard().await,
            Command::Competitions(query) => {
                let mut app = self.hub.write().await;
                app.set_query(query);
                println!("\n{}", render::competition_list(&app.visible_competitions()));
            }
            Command::Filter(category) => {
                let mut app = self.hub.write().await;
                app.toggle_category(category);
                let selected: Vec<String> = app.filter().selected().map(|c| c.to_string()).collect();
                if selected.is_empty() {
                    println!("\nカテゴリ: All");
                } else {
                    println!("\nカテゴリ: {}", selected.join(", "));
                }
                println!("{}", render::competition_list(&app.visible_competitions()));
            }
            Command::Show(id) => match self.hub.read().await.competition_detail(&id) {
                Ok(detail) => println!("\n{}", render::competition_detail(&detail)),
                Err(e) => eprintln!("\n❌ {}\n", e),
            },
            Command::Calendar(month) => {
                if let Some(month) = month {
                    self.hub.write().await.set_month(month);
                }
                self.print_calendar().await;
            }
            Command::Next => {
                self.hub.write().await.next_month();
                self.print_calendar().await;
            }
            Command::Prev => {
                self.hub.write().await.previous_month();
                self.print_calendar().await;
            }
            Command::Today => {
                self.hub.write().await.go_to_today(Local::now().date_naive());
                self.print_calendar().await;
            }
            Command::Requests => {
                println!("\n{}", render::request_list(&self.hub.read().await.request_views()));
            }
            Command::Team(competition_id) => self.post_request(&competition_id).await,
            Command::View(id) => match self.hub.write().await.view_request(&id) {
                Ok(view) => {
                    println!("\n{}", render::request_detail(&view));
                    println!("💡 /connect {} <メッセージ> で話しかけられます\n", id);
                }
                Err(e) => eprintln!("\n❌ {}\n", e),
            },
            Command::Connect { request_id, message } => self.connect(&request_id, &message).await,
            Command::Say(message) => self.say(&message).await,
            Command::Close => {
                self.hub.write().await.close_dialog();
                self.printed = 0;
                println!("\n✅ 閉じました\n");
            }
            Command::Suggest => self.suggest().await,
            Command::Ask(message) => self.ask(&message).await,
        }
        true
    }

    async fn dashboard(&self) {
        let dashboard = self.hub.read().await.dashboard();
        let featured: Vec<_> = dashboard.featured.iter().collect();
        println!("\n⭐ 注目の大会");
        println!("{}", render::competition_list(&featured));
        println!("👥 最新のチーム募集");
        println!("{}", render::request_list(&dashboard.recent_requests));
    }

    async fn print_calendar(&self) {
        let app = self.hub.read().await;
        println!("\n{}", render::calendar(&app.calendar(), Local::now().date_naive()));
    }

    async fn ask(&mut self, message: &str) {
        if self.advisor_id.is_none() {
            println!("\n🤖 {}\n", fact_core::chat::ADVISOR_GREETING);
        }
        match self.hub.ask_advisor(self.advisor_id.as_deref(), message).await {
            Ok(exchange) => {
                self.advisor_id = Some(exchange.session_id);
                let style = if exchange.reply.is_error {
                    Color::Red.normal()
                } else {
                    Style::new()
                };
                println!("\n{}\n", style.paint(exchange.reply.text));
            }
            Err(e) => eprintln!("\n❌ {}\n", e),
        }
    }

    /// Ask one form field. `None` when the user cancels.
    fn field(&mut self, label: &str) -> Option<String> {
        let prompt = ColoredPrompt::new(label, Color::Yellow);
        match self.editor.read_line(&prompt) {
            Ok(Signal::Success(line)) => Some(line.trim().to_string()),
            _ => None,
        }
    }

    async fn post_request(&mut self, competition_id: &str) {
        let name = match self.hub.write().await.select_competition(competition_id) {
            Ok(comp) => comp.name.clone(),
            Err(e) => {
                eprintln!("\n❌ {}\n", e);
                return;
            }
        };
        println!("\n📝 {} のチーム募集 (Ctrl+C で中止)\n", name);

        let Some(form) = self.request_form() else {
            self.hub.write().await.close_dialog();
            println!("\n中止しました\n");
            return;
        };

        match self.hub.write().await.submit_request(competition_id, form) {
            Ok(request) => println!("\n✅ 投稿しました: {}\n", request.id),
            Err(e) => eprintln!("\n❌ {}\n", e),
        }
    }

    fn request_form(&mut self) -> Option<NewTeamRequest> {
        let student_name = self.field("名前")?;
        let grade = self.field("学年")?;
        let curriculum = loop {
            let value = self.field("カリキュラム (AP/A-Level/OSSD/CHP)")?;
            match value.parse::<Curriculum>() {
                Ok(c) => break c,
                Err(e) => eprintln!("{}", e),
            }
        };
        let bio = self.field("自己紹介")?;
        let contact = self.field("連絡先 (任意)")?;

        Some(NewTeamRequest {
            student_name,
            grade,
            curriculum,
            bio,
            contact: Some(contact).filter(|c| !c.is_empty()),
        })
    }

    async fn suggest(&mut self) {
        self.hub.write().await.open_suggestion_form();
        println!("\n📮 未掲載の大会を提案 (Ctrl+C で中止)\n");

        let form = self.suggestion_form();

        let mut app = self.hub.write().await;
        match form {
            Some(suggestion) => match app.submit_suggestion(&suggestion) {
                Ok(()) => println!("\n✅ ありがとうございます！提案を受け付けました\n"),
                Err(e) => eprintln!("\n❌ {}\n", e),
            },
            None => {
                app.close_dialog();
                println!("\n中止しました\n");
            }
        }
    }

    fn suggestion_form(&mut self) -> Option<CompetitionSuggestion> {
        let name = self.field("大会名")?;
        let category = loop {
            let value = self.field("カテゴリ")?;
            match value.parse::<Category>() {
                Ok(c) => break c,
                Err(e) => eprintln!("{}", e),
            }
        };
        let date = self.field("日程")?;
        let website = self.field("Webサイト (任意)")?;
        let description = self.field("説明")?;

        Some(CompetitionSuggestion {
            name,
            category,
            date,
            website: Some(website).filter(|w| !w.is_empty()),
            description,
        })
    }

    async fn connect(&mut self, request_id: &str, message: &str) {
        match self.hub.connect(request_id, message).await {
            Ok((chat, task)) => {
                self.printed = 0;
                self.print_new(&chat);
                self.wait_for_replies(&chat.id, task).await;
            }
            Err(e) => eprintln!("\n❌ {}\n", e),
        }
    }

    async fn say(&mut self, message: &str) {
        let chat_id = match self.hub.read().await.dialog() {
            Dialog::TeamChat { chat_id } => chat_id.clone(),
            _ => {
                eprintln!("\n❓ チームチャットが開いていません。/connect で開始してください。\n");
                return;
            }
        };

        match self.hub.send_team_message(&chat_id, message).await {
            Ok((chat, task)) => {
                self.print_new(&chat);
                self.wait_for_replies(&chat_id, task).await;
            }
            Err(e) => eprintln!("\n❌ {}\n", e),
        }
    }

    async fn wait_for_replies(&mut self, chat_id: &str, task: JoinHandle<()>) {
        println!("{}", Style::new().dimmed().paint("... typing"));
        if let Err(e) = task.await {
            eprintln!("\n❌ {}\n", e);
            return;
        }
        let chat = self.hub.read().await.team_chat(chat_id).cloned();
        if let Some(chat) = chat {
            self.print_new(&chat);
        }
    }

    fn print_new(&mut self, chat: &TeamChat) {
        for message in chat.messages.iter().skip(self.printed) {
            let line = render::team_message(message, &chat.teammate_name);
            let styled = match message.sender {
                Sender::Me => Color::Cyan.paint(line),
                Sender::Teammate => Color::Green.paint(line),
                Sender::System => Color::Yellow.paint(line),
            };
            println!("{}", styled);
        }
        self.printed = chat.messages.len();
    }
}

/// Print welcome message
fn print_welcome() {
    println!();
    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║          🏆 FACT Competition Hub - 対話モード              ║");
    println!("╠════════════════════════════════════════════════════════════╣");
    println!("║  メッセージを入力するとアドバイザーに相談できます          ║");
    println!("║  コマンド: /help, /competitions, /calendar, /requests      ║");
    println!("║  / を入力するとコマンド候補が表示されます                   ║");
    println!("╚════════════════════════════════════════════════════════════╝");
    println!();
}

/// Print help message
fn print_help() {
    println!();
    println!("📖 利用可能なコマンド:");
    for (cmd, desc) in COMMANDS {
        println!("  {:<14} {}", cmd, desc);
    }
    println!();
    println!("💡 ヒント: / から入力するとコマンド候補が表示されます");
    println!("💡 コマンド以外の入力はアドバイザーへの質問になります");
    println!();
}
