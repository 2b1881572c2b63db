use std::cell::{Cell, RefCell};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use eframe::egui;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::deck::channel::{Mailbox, Outbox};
use crate::deck::launch::{LaunchParams, deck_address};
use crate::deck::link::{WindowHandle, WindowOpener};
use crate::deck::surface::SurfaceState;
use crate::deck::{DeckController, PresenterOpen, Step, SyncMessage};
use crate::input::{self, Command, SwipeTracker};
use crate::notes::NotesTable;
use crate::parser::{self, Deck};
use crate::presenter::timer::TICK;
use crate::presenter::{PresenterSetup, PresenterView, TimerThresholds};
use crate::render;
use crate::theme::Theme;

const DOUBLE_ESC_WINDOW: f32 = 1.0;

/// A presenter window that is currently shown as a child viewport.
struct PresenterWindow {
    view: PresenterView<Outbox>,
    inbox: Mailbox,
    swipe: SwipeTracker,
}

type PresenterSlot = Rc<RefCell<Option<PresenterWindow>>>;

/// Handle the deck window keeps on its presenter viewport.
struct ViewportHandle {
    outbox: Outbox,
    focus_requested: Rc<Cell<bool>>,
}

impl WindowHandle for ViewportHandle {
    fn is_closed(&self) -> bool {
        self.outbox.is_closed()
    }

    fn focus(&mut self) {
        self.focus_requested.set(true);
    }

    fn post_message(&self, message: &SyncMessage) -> bool {
        self.outbox.post(message)
    }
}

/// Opens presenter windows as egui viewports. The new window's state goes
/// into the shared slot, which the app paints every frame while it is set.
struct ViewportOpener {
    deck_outbox: Outbox,
    notes: NotesTable,
    total: NonZeroUsize,
    thresholds: TimerThresholds,
    slot: PresenterSlot,
    focus_requested: Rc<Cell<bool>>,
}

impl WindowOpener for ViewportOpener {
    type Handle = ViewportHandle;

    fn open(&mut self, address: &str, opened_at: Instant) -> Option<ViewportHandle> {
        let setup = PresenterSetup {
            total: self.total,
            notes: self.notes.clone(),
            thresholds: self.thresholds,
            opened_at,
        };
        let params = LaunchParams::from_address(address);
        let view = PresenterView::on_load(params, setup, Some(self.deck_outbox.clone()))?;
        let inbox = Mailbox::new();
        let handle = ViewportHandle {
            outbox: inbox.outbox(),
            focus_requested: Rc::clone(&self.focus_requested),
        };
        *self.slot.borrow_mut() = Some(PresenterWindow {
            view,
            inbox,
            swipe: SwipeTracker::default(),
        });
        Some(handle)
    }
}

struct Toast {
    message: String,
    start: Instant,
}

impl Toast {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            start: Instant::now(),
        }
    }

    fn opacity(&self) -> f32 {
        let elapsed = self.start.elapsed().as_secs_f32();
        if elapsed < 1.0 {
            1.0
        } else {
            (1.0 - (elapsed - 1.0) / 0.5).max(0.0)
        }
    }

    fn is_expired(&self) -> bool {
        self.start.elapsed().as_secs_f32() >= 1.5
    }
}

struct DeckApp {
    deck: Rc<Deck>,
    controller: DeckController<SurfaceState, ViewportOpener>,
    inbox: Mailbox,
    presenter: PresenterSlot,
    presenter_size: [f32; 2],
    theme: Theme,
    swipe: SwipeTracker,
    show_help: bool,
    toast: Option<Toast>,
    last_esc: Option<Instant>,
}

impl DeckApp {
    fn new(deck: Deck, notes: NotesTable, config: &Config, total: NonZeroUsize) -> Self {
        let theme_name = deck
            .meta
            .theme
            .as_deref()
            .or(config.theme_name())
            .unwrap_or("light");
        let theme = Theme::from_name(theme_name);

        let inbox = Mailbox::new();
        let presenter: PresenterSlot = Rc::new(RefCell::new(None));
        let opener = ViewportOpener {
            deck_outbox: inbox.outbox(),
            notes,
            total,
            thresholds: config.timer_thresholds(),
            slot: Rc::clone(&presenter),
            focus_requested: Rc::new(Cell::new(false)),
        };
        let address = deck_address(&deck.path);
        let controller = DeckController::new(total, SurfaceState::default(), opener, address);

        Self {
            deck: Rc::new(deck),
            controller,
            inbox,
            presenter,
            presenter_size: config.presenter_size(),
            theme,
            swipe: SwipeTracker::default(),
            show_help: false,
            toast: None,
            last_esc: None,
        }
    }

    fn open_presenter(&mut self) {
        match self.controller.open_presenter_window() {
            PresenterOpen::Opened | PresenterOpen::Focused => {}
            PresenterOpen::Refused => {
                self.toast = Some(Toast::new("Presenter window could not be opened"));
            }
        }
    }

    /// Returns a viewport command to send once input is released.
    fn apply(&mut self, command: Command, fullscreen: bool) -> Option<egui::ViewportCommand> {
        match command {
            Command::Step(step) => {
                self.controller.advance(step);
            }
            Command::First => {
                self.controller.first();
            }
            Command::Last => {
                self.controller.last();
            }
            Command::OpenPresenter => self.open_presenter(),
            Command::ToggleFullscreen => return Some(egui::ViewportCommand::Fullscreen(!fullscreen)),
            Command::ToggleTheme => self.theme = self.theme.toggled(),
            Command::ToggleHelp => self.show_help = !self.show_help,
            Command::Quit => return Some(egui::ViewportCommand::Close),
        }
        None
    }

    fn handle_escape(&mut self) -> Option<egui::ViewportCommand> {
        if self.show_help {
            self.show_help = false;
            return None;
        }
        if self
            .last_esc
            .is_some_and(|last| last.elapsed().as_secs_f32() < DOUBLE_ESC_WINDOW)
        {
            return Some(egui::ViewportCommand::Close);
        }
        self.last_esc = Some(Instant::now());
        self.toast = Some(Toast::new("Press Esc again to exit"));
        None
    }

    fn draw_chrome(&mut self, ui: &mut egui::Ui, rect: egui::Rect) {
        let surface = self.controller.surface();
        let scale = render::scale_for(rect);
        render::draw_progress(ui, &self.theme, rect, surface.progress);

        let counter_color = Theme::with_opacity(self.theme.foreground, 0.4);
        ui.painter().text(
            egui::pos2(rect.right() - 16.0 * scale, rect.bottom() - 30.0 * scale),
            egui::Align2::RIGHT_BOTTOM,
            &surface.counter,
            egui::FontId::monospace(18.0 * scale.max(0.6)),
            counter_color,
        );

        let size = egui::vec2(44.0, 44.0);
        let back = egui::Rect::from_min_size(
            egui::pos2(rect.left() + 16.0, rect.bottom() - 60.0 - size.y),
            size,
        );
        let forward = back.translate(egui::vec2(size.x + 8.0, 0.0));
        let (back_enabled, forward_enabled) = (surface.back_enabled, surface.forward_enabled);

        let mut clicked = None;
        ui.scope_builder(egui::UiBuilder::new().max_rect(back), |ui| {
            if ui.add_enabled(back_enabled, egui::Button::new("‹").min_size(size)).clicked() {
                clicked = Some(Step::Back);
            }
        });
        ui.scope_builder(egui::UiBuilder::new().max_rect(forward), |ui| {
            if ui
                .add_enabled(forward_enabled, egui::Button::new("›").min_size(size))
                .clicked()
            {
                clicked = Some(Step::Forward);
            }
        });
        if let Some(step) = clicked {
            self.controller.advance(step);
        }
    }

    fn draw_toast(&mut self, ui: &egui::Ui, rect: egui::Rect) {
        let Some(toast) = &self.toast else {
            return;
        };
        if toast.is_expired() {
            self.toast = None;
            return;
        }
        let color = Theme::with_opacity(self.theme.foreground, toast.opacity());
        ui.painter().text(
            egui::pos2(rect.center().x, rect.bottom() - 60.0),
            egui::Align2::CENTER_BOTTOM,
            &toast.message,
            egui::FontId::proportional(18.0),
            color,
        );
        ui.ctx().request_repaint();
    }

    /// Show the presenter viewport if one is open. Closing it drops its
    /// mailbox, which the deck sees as a closed window.
    fn show_presenter(&mut self, ctx: &egui::Context) {
        if self.presenter.borrow().is_none() {
            return;
        }

        let slot = Rc::clone(&self.presenter);
        let focus = Rc::clone(&self.controller.opener().focus_requested);
        let deck = Rc::clone(&self.deck);
        let theme = self.theme.clone();
        let title = format!("Presenter: {}", deck.display_title());
        let builder = egui::ViewportBuilder::default()
            .with_title(title)
            .with_inner_size(self.presenter_size);

        let close = ctx.show_viewport_immediate(
            egui::ViewportId::from_hash_of("duodeck_presenter"),
            builder,
            move |ctx, _class| {
                let mut slot = slot.borrow_mut();
                let Some(window) = slot.as_mut() else {
                    return false;
                };
                for message in window.inbox.drain() {
                    window.view.receive(message);
                }

                if focus.take() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
                }

                let mut close = false;
                let mut moved = false;
                let mut viewport_cmds = Vec::new();
                let (commands, swipes, fullscreen) = ctx.input(|i| {
                    close = i.viewport().close_requested() || i.key_pressed(egui::Key::Escape);
                    (
                        input::commands(i),
                        window.swipe.feed(i),
                        i.viewport().fullscreen.unwrap_or(false),
                    )
                });
                for command in commands {
                    match command {
                        Command::Step(step) => moved |= window.view.advance(step),
                        Command::First => moved |= window.view.first(),
                        Command::Last => moved |= window.view.last(),
                        Command::ToggleFullscreen => {
                            viewport_cmds.push(egui::ViewportCommand::Fullscreen(!fullscreen));
                        }
                        Command::Quit => close = true,
                        Command::OpenPresenter | Command::ToggleTheme | Command::ToggleHelp => {}
                    }
                }
                for step in swipes {
                    moved |= window.view.advance(step);
                }
                for cmd in viewport_cmds {
                    ctx.send_viewport_cmd(cmd);
                }
                if moved {
                    ctx.request_repaint_of(egui::ViewportId::ROOT);
                }

                egui::CentralPanel::default()
                    .frame(egui::Frame::NONE)
                    .show(ctx, |ui| {
                        render::draw_presenter(ui, &window.view, &deck, &theme, Instant::now());
                    });
                close
            },
        );

        if close {
            info!("presenter window closed");
            self.presenter.borrow_mut().take();
        }
    }

    fn next_repaint(&self) -> Option<Duration> {
        let slot = self.presenter.borrow();
        let window = slot.as_ref()?;
        Some(window.view.timer().until_next_tick(Instant::now()).min(TICK))
    }
}

impl eframe::App for DeckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for message in self.inbox.drain() {
            self.controller.receive(message);
        }

        // Viewport commands go out after the input closure, sending them
        // inside ctx.input() deadlocks.
        let mut viewport_cmds: Vec<egui::ViewportCommand> = Vec::new();
        let (commands, escape, swipes, fullscreen) = ctx.input(|i| {
            (
                input::commands(i),
                i.key_pressed(egui::Key::Escape),
                self.swipe.feed(i),
                i.viewport().fullscreen.unwrap_or(false),
            )
        });

        if escape {
            viewport_cmds.extend(self.handle_escape());
        }
        for command in commands {
            viewport_cmds.extend(self.apply(command, fullscreen));
        }
        for step in swipes {
            self.controller.advance(step);
        }

        for cmd in viewport_cmds {
            ctx.send_viewport_cmd(cmd);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(self.theme.background))
            .show(ctx, |ui| {
                let full = ui.max_rect();
                let rect = render::fit_slide_rect(full);
                if render::draw_deck(ui, &self.deck, self.controller.surface(), &self.theme, rect) {
                    ctx.request_repaint();
                }
                self.draw_chrome(ui, full);
                if self.show_help {
                    render::draw_help(ui, &self.theme, full);
                }
                self.draw_toast(ui, full);
            });

        self.controller.observe();
        self.show_presenter(ctx);

        if let Some(delay) = self.next_repaint() {
            ctx.request_repaint_after(delay);
        }
    }
}

/// Load the deck and its notes, then run the deck window until it closes.
pub fn run(
    file: PathBuf,
    windowed: bool,
    start_slide: Option<usize>,
    notes_path: Option<PathBuf>,
    open_presenter: bool,
) -> anyhow::Result<()> {
    let deck = parser::load(&file)?;
    let total = deck
        .total()
        .ok_or_else(|| anyhow::anyhow!("No slides found in {}", file.display()))?;
    let notes = match NotesTable::discover(&file, notes_path.as_deref()) {
        Ok(notes) => notes,
        Err(e) if notes_path.is_some() => return Err(e.into()),
        Err(e) => {
            warn!("ignoring speaker notes: {e}");
            NotesTable::empty()
        }
    };

    let config = Config::load_or_default();
    let start = start_slide.or(config.start_slide());
    let title = format!("duodeck: {}", deck.display_title());

    let viewport = if windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    let mut app = DeckApp::new(deck, notes, &config, total);
    if let Some(slide) = start {
        if !app.controller.go_to(slide) {
            warn!(slide, total = total.get(), "start slide out of range, showing slide 1");
        }
    }
    if open_presenter {
        app.open_presenter();
    }
    debug!(slide = app.controller.current(), "starting deck window");

    eframe::run_native(&title, options, Box::new(move |_cc| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(content: &str, notes: &str) -> DeckApp {
        let deck = parser::parse(content, std::path::Path::new("/talks/demo.md"));
        let total = deck.total().unwrap();
        let notes = NotesTable::from_yaml(notes).unwrap();
        DeckApp::new(deck, notes, &Config::default(), total)
    }

    const DECK: &str = "# One\n\n---\n\n# Two\n\n---\n\n# Three\n";

    fn presenter_slide(app: &DeckApp) -> Option<usize> {
        app.presenter
            .borrow()
            .as_ref()
            .map(|w| w.view.displayed().slide_index)
    }

    fn pump_presenter(app: &DeckApp) {
        if let Some(window) = app.presenter.borrow_mut().as_mut() {
            for message in window.inbox.drain() {
                window.view.receive(message);
            }
        }
    }

    #[test]
    fn test_open_presenter_creates_viewport_state() {
        let mut app = app(DECK, "2:\n  target: \"1:00\"\n  body: Second\n");
        app.controller.advance(Step::Forward);
        app.open_presenter();
        pump_presenter(&app);
        assert_eq!(presenter_slide(&app), Some(2));
        let slot = app.presenter.borrow();
        let window = slot.as_ref().unwrap();
        assert_eq!(window.view.displayed().body, "Second");
        assert_eq!(window.view.target_label(), "Target: 1:00");
    }

    #[test]
    fn test_second_open_requests_focus() {
        let mut app = app(DECK, "");
        app.open_presenter();
        assert!(!app.controller.opener().focus_requested.get());
        app.open_presenter();
        assert!(app.controller.opener().focus_requested.get());
    }

    #[test]
    fn test_deck_moves_reach_presenter() {
        let mut app = app(DECK, "");
        app.open_presenter();
        app.apply(Command::Step(Step::Forward), false);
        app.apply(Command::Last, false);
        pump_presenter(&app);
        assert_eq!(presenter_slide(&app), Some(3));
    }

    #[test]
    fn test_presenter_moves_reach_deck() {
        let mut app = app(DECK, "");
        app.open_presenter();
        pump_presenter(&app);
        if let Some(window) = app.presenter.borrow_mut().as_mut() {
            window.view.go_to(3);
        }
        for message in app.inbox.drain() {
            app.controller.receive(message);
        }
        app.controller.observe();
        assert_eq!(app.controller.current(), 3);
        assert_eq!(app.controller.surface().counter, "3 / 3");

        // The deck already matches, nothing is echoed back.
        let mut slot = app.presenter.borrow_mut();
        assert!(slot.as_mut().unwrap().inbox.drain().is_empty());
    }

    #[test]
    fn test_closing_presenter_detected_by_deck() {
        let mut app = app(DECK, "");
        app.open_presenter();
        assert!(app.controller.is_presenter_open());
        app.presenter.borrow_mut().take();
        assert!(!app.controller.is_presenter_open());
        app.open_presenter();
        assert!(app.controller.is_presenter_open());
    }

    #[test]
    fn test_quit_and_fullscreen_commands() {
        let mut app = app(DECK, "");
        assert!(matches!(
            app.apply(Command::Quit, false),
            Some(egui::ViewportCommand::Close)
        ));
        assert!(matches!(
            app.apply(Command::ToggleFullscreen, true),
            Some(egui::ViewportCommand::Fullscreen(false))
        ));
        assert!(app.apply(Command::ToggleHelp, false).is_none());
        assert!(app.show_help);
    }

    #[test]
    fn test_double_escape_quits() {
        let mut app = app(DECK, "");
        assert!(app.handle_escape().is_none());
        assert!(matches!(
            app.handle_escape(),
            Some(egui::ViewportCommand::Close)
        ));
    }
}
