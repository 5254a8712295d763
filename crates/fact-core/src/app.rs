//! Application state
//!
//! All mutable state lives in one [`AppController`]. Views read from it and
//! change it only through the update methods below.

use std::collections::HashMap;

use chrono::NaiveDate;
use fact_calendar::{CalendarGrid, MonthView};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::catalog::{Catalog, Category, CategoryFilter, Competition, CompetitionSuggestion};
use crate::chat::prompts::advisor_instruction;
use crate::chat::{AdvisorReply, AdvisorSession, ChatContext, Sender, TeamChat};
use crate::error::{Error, Result};
use crate::team::{NewTeamRequest, RequestView, TeamBoard, TeamRequest};

/// Items shown per dashboard section
pub const DASHBOARD_ITEMS: usize = 3;

/// The dialog currently on top, if any
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Dialog {
    #[default]
    None,
    TeamRequestForm { competition_id: String },
    RequestDetail { request_id: String },
    TeamChat { chat_id: String },
    SuggestCompetition,
}

/// Featured competitions and newest requests
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub featured: Vec<Competition>,
    pub recent_requests: Vec<RequestView>,
}

/// Competition page: the record plus requests posted for it
#[derive(Debug, Clone, Serialize)]
pub struct CompetitionDetail {
    pub competition: Competition,
    pub requests: Vec<TeamRequest>,
}

/// Owner of all application state
#[derive(Debug)]
pub struct AppController {
    catalog: Catalog,
    board: TeamBoard,
    dialog: Dialog,
    selected_competition: Option<String>,
    month: MonthView,
    query: String,
    filter: CategoryFilter,
    advisor_instruction: String,
    advisor_sessions: HashMap<String, AdvisorSession>,
    team_chats: HashMap<String, TeamChat>,
}

impl AppController {
    pub fn new(catalog: Catalog, board: TeamBoard, start_month: MonthView) -> Self {
        let advisor_instruction = advisor_instruction(&catalog);
        Self {
            catalog,
            board,
            dialog: Dialog::None,
            selected_competition: None,
            month: start_month,
            query: String::new(),
            filter: CategoryFilter::all(),
            advisor_instruction,
            advisor_sessions: HashMap::new(),
            team_chats: HashMap::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn board(&self) -> &TeamBoard {
        &self.board
    }

    pub fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    pub fn selected_competition(&self) -> Option<&Competition> {
        self.selected_competition
            .as_deref()
            .and_then(|id| self.catalog.get(id))
    }

    // ========================================================================
    // Competitions
    // ========================================================================

    /// Select a competition and open the team request form for it
    pub fn select_competition(&mut self, id: &str) -> Result<&Competition> {
        let competition = self
            .catalog
            .get(id)
            .ok_or_else(|| Error::CompetitionNotFound(id.to_string()))?;

        self.selected_competition = Some(competition.id.clone());
        self.dialog = Dialog::TeamRequestForm {
            competition_id: competition.id.clone(),
        };
        Ok(competition)
    }

    pub fn competition_detail(&self, id: &str) -> Result<CompetitionDetail> {
        let competition = self
            .catalog
            .get(id)
            .ok_or_else(|| Error::CompetitionNotFound(id.to_string()))?;
        Ok(CompetitionDetail {
            competition: competition.clone(),
            requests: self.board.for_competition(&competition.id).cloned().collect(),
        })
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn toggle_category(&mut self, category: Option<Category>) {
        self.filter.toggle(category);
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    pub fn clear_filters(&mut self) {
        self.query.clear();
        self.filter = CategoryFilter::all();
    }

    /// Competitions matching the current query and filter
    pub fn visible_competitions(&self) -> Vec<&Competition> {
        self.catalog.search(&self.query, &self.filter)
    }

    pub fn open_suggestion_form(&mut self) {
        self.dialog = Dialog::SuggestCompetition;
    }

    /// Accept a suggestion. It is logged only.
    pub fn submit_suggestion(&mut self, suggestion: &CompetitionSuggestion) -> Result<()> {
        suggestion.validate()?;
        info!(
            "Competition suggestion received: {} ({})",
            suggestion.name, suggestion.category
        );
        if self.dialog == Dialog::SuggestCompetition {
            self.dialog = Dialog::None;
        }
        Ok(())
    }

    // ========================================================================
    // Team requests
    // ========================================================================

    /// Post a request for `competition_id`, which may be unknown
    pub fn submit_request(
        &mut self,
        competition_id: &str,
        form: NewTeamRequest,
    ) -> Result<TeamRequest> {
        let request = self.board.submit(competition_id, form)?.clone();
        if matches!(self.dialog, Dialog::TeamRequestForm { .. }) {
            self.dialog = Dialog::None;
        }
        Ok(request)
    }

    /// Open the detail dialog for a request
    pub fn view_request(&mut self, id: &str) -> Result<RequestView> {
        let view = self.request_view(id)?;
        self.dialog = Dialog::RequestDetail {
            request_id: id.to_string(),
        };
        Ok(view)
    }

    pub fn request_view(&self, id: &str) -> Result<RequestView> {
        let request = self
            .board
            .get(id)
            .ok_or_else(|| Error::RequestNotFound(id.to_string()))?;
        Ok(self.board.view(request, &self.catalog))
    }

    pub fn request_views(&self) -> Vec<RequestView> {
        self.board
            .list()
            .iter()
            .map(|r| self.board.view(r, &self.catalog))
            .collect()
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard {
            featured: self.catalog.featured(DASHBOARD_ITEMS).to_vec(),
            recent_requests: self
                .board
                .recent(DASHBOARD_ITEMS)
                .iter()
                .map(|r| self.board.view(r, &self.catalog))
                .collect(),
        }
    }

    /// Close whatever dialog is open. Closing a team chat discards it.
    pub fn close_dialog(&mut self) {
        if let Dialog::TeamChat { chat_id } = &self.dialog {
            self.team_chats.remove(chat_id);
            debug!("Closed team chat {}", chat_id);
        }
        self.dialog = Dialog::None;
    }

    // ========================================================================
    // Team chat
    // ========================================================================

    /// Connect to the author of a request and open a chat
    pub fn connect(&mut self, request_id: &str, opening: &str) -> Result<&TeamChat> {
        let opening = opening.trim();
        if opening.is_empty() {
            return Err(Error::InvalidSubmission(
                "An opening message is required".to_string(),
            ));
        }
        let request = self
            .board
            .get(request_id)
            .ok_or_else(|| Error::RequestNotFound(request_id.to_string()))?;

        let chat_id = format!("chat-{}", Uuid::now_v7());
        let chat = TeamChat::open(chat_id.clone(), request, opening);
        info!("Opened team chat {} with {}", chat_id, chat.teammate_name);

        self.dialog = Dialog::TeamChat {
            chat_id: chat_id.clone(),
        };
        Ok(self.team_chats.entry(chat_id).or_insert(chat))
    }

    /// Discard a chat. Returns false if it was already gone.
    pub fn close_team_chat(&mut self, chat_id: &str) -> bool {
        if matches!(&self.dialog, Dialog::TeamChat { chat_id: open } if open == chat_id) {
            self.dialog = Dialog::None;
        }
        self.team_chats.remove(chat_id).is_some()
    }

    pub fn team_chat(&self, chat_id: &str) -> Option<&TeamChat> {
        self.team_chats.get(chat_id)
    }

    /// Append to a chat. Returns false when the chat has been closed.
    pub fn append_team_message(&mut self, chat_id: &str, sender: Sender, text: &str) -> bool {
        match self.team_chats.get_mut(chat_id) {
            Some(chat) => {
                chat.push(sender, text);
                true
            }
            None => {
                debug!("Dropping {} message for closed chat {}", sender.as_str(), chat_id);
                false
            }
        }
    }

    // ========================================================================
    // Advisor
    // ========================================================================

    /// Start a new advisor session and return its id
    pub fn open_advisor(&mut self) -> &AdvisorSession {
        let id = format!("adv-{}", Uuid::now_v7());
        let session = AdvisorSession::new(id.clone(), self.advisor_instruction.clone());
        self.advisor_sessions.entry(id).or_insert(session)
    }

    pub fn advisor_session(&self, id: &str) -> Option<&AdvisorSession> {
        self.advisor_sessions.get(id)
    }

    /// Record a user message and return the context for the outbound call
    pub fn advisor_prepare(&mut self, session_id: &str, message: &str) -> Result<ChatContext> {
        let session = self
            .advisor_sessions
            .get_mut(session_id)
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;
        let context = session.context();
        session.push_user(message);
        Ok(context)
    }

    /// Record the advisor's reply
    pub fn advisor_finish(&mut self, session_id: &str, reply: &AdvisorReply) {
        match self.advisor_sessions.get_mut(session_id) {
            Some(session) => session.push_reply(reply),
            None => debug!("Dropping advisor reply for unknown session {}", session_id),
        }
    }

    // ========================================================================
    // Calendar
    // ========================================================================

    pub fn month(&self) -> MonthView {
        self.month
    }

    pub fn next_month(&mut self) -> MonthView {
        self.month = self.month.next();
        self.month
    }

    pub fn previous_month(&mut self) -> MonthView {
        self.month = self.month.previous();
        self.month
    }

    pub fn go_to_today(&mut self, today: NaiveDate) -> MonthView {
        self.month = MonthView::containing(today);
        self.month
    }

    pub fn set_month(&mut self, month: MonthView) {
        self.month = month;
    }

    /// Grid for the displayed month
    pub fn calendar(&self) -> CalendarGrid<'_, Competition> {
        self.calendar_for(self.month)
    }

    pub fn calendar_for(&self, month: MonthView) -> CalendarGrid<'_, Competition> {
        CalendarGrid::build(self.catalog.all(), month)
    }
}
