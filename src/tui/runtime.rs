use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::Rect;

use crate::form::{FormSession, SubmitOutcome};

use super::{
    input::{KeyCommand, classify},
    options::UiOptions,
    status::StatusLine,
    terminal::TerminalGuard,
    view::{self, Focus, ViewModel},
};

const HELP_TEXT: &str = "Tab/↑↓ move • ←/→ choose • Enter submit on button • Ctrl+S submit • Ctrl+Q quit";

pub(crate) struct App {
    session: FormSession,
    options: UiOptions,
    status: StatusLine,
    focus: Option<Focus>,
    exit_armed: bool,
    should_quit: bool,
}

impl App {
    pub fn new(session: FormSession, options: UiOptions) -> Self {
        let mut app = Self {
            session,
            options,
            status: StatusLine::new(),
            focus: None,
            exit_armed: false,
            should_quit: false,
        };
        app.normalize_focus();
        app
    }

    pub fn run(&mut self) -> Result<()> {
        let mut terminal = TerminalGuard::new()?;
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            if !event::poll(self.options.tick_rate)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) => self.handle_key(key)?,
                Event::Resize(width, height) => {
                    terminal.resize(Rect::new(0, 0, width, height))?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn into_session(self) -> FormSession {
        self.session
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let rows = view::form_rows(self.session.page());
        view::draw(
            frame,
            ViewModel {
                page: self.session.page(),
                rows: &rows,
                focus: self.focus.as_ref(),
                status: self.status.message(),
                help: self.options.show_help.then_some(HELP_TEXT),
            },
        );
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        match classify(&key) {
            KeyCommand::Submit => self.on_submit()?,
            KeyCommand::Quit => self.on_exit(),
            KeyCommand::NextField => self.move_focus(1),
            KeyCommand::PrevField => self.move_focus(-1),
            KeyCommand::CycleOption(delta) => self.cycle_option(delta)?,
            KeyCommand::Activate => match self.focus.clone() {
                Some(Focus::Submit) => self.on_submit()?,
                Some(Focus::Field(_)) if self.focused_is_textarea() => {
                    self.edit_focused(KeyEvent::new(KeyCode::Char('\n'), KeyModifiers::NONE))?
                }
                Some(Focus::Field(_)) => self.move_focus(1),
                None => {}
            },
            KeyCommand::Edit(event) => self.edit_focused(event)?,
            KeyCommand::None => {}
        }
        Ok(())
    }

    fn targets(&self) -> Vec<Focus> {
        view::focus_targets(&view::form_rows(self.session.page()))
    }

    fn normalize_focus(&mut self) {
        let targets = self.targets();
        let keep = self
            .focus
            .as_ref()
            .is_some_and(|focus| targets.contains(focus));
        if !keep {
            self.focus = targets.into_iter().next();
        }
    }

    fn move_focus(&mut self, delta: i32) {
        let targets = self.targets();
        if targets.is_empty() {
            self.focus = None;
            return;
        }
        let len = targets.len() as i32;
        let current = self
            .focus
            .as_ref()
            .and_then(|focus| targets.iter().position(|item| item == focus))
            .unwrap_or(0) as i32;
        let next = ((current + delta) % len + len) % len;
        self.focus = targets.get(next as usize).cloned();
        self.exit_armed = false;
        self.status.ready();
    }

    fn focused_field(&self) -> Option<&str> {
        match &self.focus {
            Some(Focus::Field(id)) => Some(id.as_str()),
            _ => None,
        }
    }

    fn focused_is_textarea(&self) -> bool {
        self.focused_field()
            .and_then(|id| self.session.context().control(id))
            .and_then(|handle| handle.control)
            .map(|control| self.session.page().doc.node(control).tag == crate::page::Tag::Textarea)
            .unwrap_or(false)
    }

    fn edit_focused(&mut self, key: KeyEvent) -> Result<()> {
        let Some(id) = self.focused_field().map(str::to_string) else {
            return Ok(());
        };
        let current = self.session.value(&id).unwrap_or_default().to_string();
        let next = match key.code {
            KeyCode::Char(ch) => {
                let mut buffer = current;
                buffer.push(ch);
                buffer
            }
            KeyCode::Backspace => {
                let mut buffer = current;
                buffer.pop();
                buffer
            }
            KeyCode::Delete => String::new(),
            _ => return Ok(()),
        };
        if self.session.input(&id, &next)? {
            self.exit_armed = false;
            self.status.editing(&id);
            self.normalize_focus();
        }
        Ok(())
    }

    fn cycle_option(&mut self, delta: i32) -> Result<()> {
        let Some(id) = self.focused_field().map(str::to_string) else {
            return Ok(());
        };
        let Some(control) = self
            .session
            .context()
            .control(&id)
            .and_then(|handle| handle.control)
        else {
            return Ok(());
        };
        let doc = &self.session.page().doc;
        let options: Vec<String> = doc
            .option_values(control)
            .into_iter()
            .map(str::to_string)
            .collect();
        if options.is_empty() {
            return Ok(());
        }
        let current = doc.node(control).value.as_str();
        let len = options.len() as i32;
        let index = options.iter().position(|opt| opt == current).unwrap_or(0) as i32;
        let next = ((index + delta) % len + len) % len;
        if self.session.input(&id, &options[next as usize])? {
            self.status.editing(&id);
            self.normalize_focus();
        }
        Ok(())
    }

    fn on_submit(&mut self) -> Result<()> {
        self.exit_armed = false;
        match self.session.submit()? {
            SubmitOutcome::Accepted(snapshot) => self.status.submitted(snapshot.len()),
            SubmitOutcome::Rejected { invalid } => self.status.issues_remaining(invalid.len()),
        }
        Ok(())
    }

    fn on_exit(&mut self) {
        let submitted = self.session.last_snapshot().is_some();
        if self.options.confirm_exit && !submitted && !self.exit_armed {
            self.exit_armed = true;
            self.status.pending_exit();
            return;
        }
        self.should_quit = true;
    }
}
