use eframe::egui;

use crate::deck::Step;

/// Minimum horizontal travel, in points, for a drag to count as a swipe.
pub const SWIPE_THRESHOLD: f32 = 50.0;

/// What a key press asks a window to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Step(Step),
    First,
    Last,
    OpenPresenter,
    ToggleFullscreen,
    ToggleTheme,
    ToggleHelp,
    Quit,
}

pub fn command_for_key(key: egui::Key) -> Option<Command> {
    use egui::Key;
    let command = match key {
        Key::ArrowRight | Key::Space | Key::PageDown => Command::Step(Step::Forward),
        Key::ArrowLeft | Key::PageUp => Command::Step(Step::Back),
        Key::Home => Command::First,
        Key::End => Command::Last,
        Key::N => Command::OpenPresenter,
        Key::F => Command::ToggleFullscreen,
        Key::D => Command::ToggleTheme,
        Key::Q => Command::Quit,
        _ => return None,
    };
    Some(command)
}

pub fn command_for_text(text: &str) -> Option<Command> {
    (text == "?").then_some(Command::ToggleHelp)
}

/// Collect the commands from one frame of input, in event order.
pub fn commands(input: &egui::InputState) -> Vec<Command> {
    input
        .events
        .iter()
        .filter_map(|event| match event {
            egui::Event::Key {
                key,
                pressed: true,
                repeat: false,
                modifiers,
                ..
            } if !modifiers.command => command_for_key(*key),
            egui::Event::Text(text) => command_for_text(text),
            _ => None,
        })
        .collect()
}

/// Turns a press/release pair into a swipe.
#[derive(Debug, Default, Clone, Copy)]
pub struct SwipeTracker {
    start_x: Option<f32>,
}

impl SwipeTracker {
    pub fn begin(&mut self, x: f32) {
        self.start_x = Some(x);
    }

    /// Finish a gesture. Swiping left moves forward, like turning a page.
    pub fn end(&mut self, x: f32) -> Option<Step> {
        let start = self.start_x.take()?;
        if x < start - SWIPE_THRESHOLD {
            Some(Step::Forward)
        } else if x > start + SWIPE_THRESHOLD {
            Some(Step::Back)
        } else {
            None
        }
    }

    /// Feed one frame of pointer events.
    pub fn feed(&mut self, input: &egui::InputState) -> Vec<Step> {
        let mut steps = Vec::new();
        for event in &input.events {
            if let egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed,
                ..
            } = event
            {
                if *pressed {
                    self.begin(pos.x);
                } else if let Some(step) = self.end(pos.x) {
                    steps.push(step);
                }
            }
        }
        steps
    }
}

pub const HELP_TEXT: &[(&str, &str)] = &[
    ("→ / Space / PgDn", "Next slide"),
    ("← / PgUp", "Previous slide"),
    ("Home", "First slide"),
    ("End", "Last slide"),
    ("N", "Open presenter window"),
    ("F", "Toggle fullscreen"),
    ("D", "Toggle dark/light theme"),
    ("?", "Show this help"),
    ("Q / Esc Esc", "Quit"),
];
