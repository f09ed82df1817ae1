//! Main application logic
//!
//! Ties together the editor bridge, the redraw interpreter, the window and
//! the script runner. Everything here runs on the UI thread; the only other
//! thread is the bridge's stdin reader.

use std::io;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::{Duration, Instant};

use glaze_core::RedrawInterpreter;
use glaze_input::{CommandScriptRunner, KeyEncoder, KeyEvent, RunnerAction, UsLayout};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoopBuilder, EventLoopWindowTarget};
use winit::keyboard::ModifiersState;
use winit::window::{Window, WindowBuilder};

use crate::bridge::{self, InputSink};
use crate::config::{Config, KeyBinding};
use crate::event::GlazeEvent;
use crate::font::FontPainter;
use crate::keymap::{key_label, map_modifiers, map_physical_key};

const BLINK_INTERVAL: Duration = Duration::from_millis(500);
const DEFAULT_TITLE: &str = "Glaze";

/// softbuffer presentation state, created with the window
struct Presenter {
    #[allow(dead_code)]
    context: softbuffer::Context<Rc<Window>>,
    surface: softbuffer::Surface<Rc<Window>, Rc<Window>>,
}

/// Application state
pub struct App {
    config: Config,
    window: Option<Rc<Window>>,
    presenter: Option<Presenter>,
    interpreter: RedrawInterpreter<FontPainter>,
    encoder: KeyEncoder,
    runner: CommandScriptRunner,
    /// Rows handed to the runner when the run binding is pressed
    script: Vec<String>,
    run_binding: Option<KeyBinding>,
    sink: InputSink<io::Stdout>,
    modifiers: ModifiersState,
    /// Title last set by the editor
    editor_title: String,
    /// Script row currently highlighted
    highlighted: Option<usize>,
    needs_redraw: bool,
    cursor_visible: bool,
    last_blink: Instant,
}

impl App {
    /// Create a new application
    pub fn new(config: Config, script: Vec<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let painter = FontPainter::load(config.font.path.as_deref(), config.font.size)?;
        let (cols, rows) = config.dimensions;
        let interpreter = RedrawInterpreter::new(
            cols as u32,
            rows as u32,
            painter,
            config.foreground(),
            config.background(),
        );
        let encoder = KeyEncoder::new(UsLayout);
        let runner = CommandScriptRunner::new(encoder, config.runner_timing());
        let run_binding = config.run_script_binding();

        Ok(Self {
            config,
            window: None,
            presenter: None,
            interpreter,
            encoder,
            runner,
            script,
            run_binding,
            sink: InputSink::stdout(),
            modifiers: ModifiersState::empty(),
            editor_title: DEFAULT_TITLE.to_string(),
            highlighted: None,
            needs_redraw: true,
            cursor_visible: true,
            last_blink: Instant::now(),
        })
    }

    /// Run the application
    pub fn run(mut self) -> Result<(), Box<dyn std::error::Error>> {
        let event_loop = EventLoopBuilder::<GlazeEvent>::with_user_event().build()?;

        let state = self.interpreter.state();
        let window = WindowBuilder::new()
            .with_title(DEFAULT_TITLE)
            .with_inner_size(PhysicalSize::new(state.pixel_width(), state.pixel_height()))
            .build(&event_loop)?;
        let window = Rc::new(window);

        let context = softbuffer::Context::new(window.clone())?;
        let surface = softbuffer::Surface::new(&context, window.clone())?;
        self.presenter = Some(Presenter { context, surface });
        self.window = Some(window);

        bridge::spawn_stdin_reader(event_loop.create_proxy())?;

        event_loop.run(move |event, elwt| match event {
            Event::UserEvent(GlazeEvent::Batch(commands)) => self.apply_batch(&commands),
            Event::UserEvent(GlazeEvent::EditorClosed) => {
                log::info!("Editor closed the redraw stream");
                elwt.exit();
            }
            Event::WindowEvent { event, .. } => self.handle_window_event(event, elwt),
            Event::AboutToWait => self.about_to_wait(elwt),
            _ => {}
        })?;

        Ok(())
    }

    fn handle_window_event(&mut self, event: WindowEvent, elwt: &EventLoopWindowTarget<GlazeEvent>) {
        match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::Resized(_) => self.needs_redraw = true,
            WindowEvent::ModifiersChanged(modifiers) => self.modifiers = modifiers.state(),
            WindowEvent::KeyboardInput { event, .. } => self.handle_key_input(&event),
            WindowEvent::RedrawRequested => self.render(),
            _ => {}
        }
    }

    fn apply_batch(&mut self, commands: &[glaze_core::RedrawCommand]) {
        let outcome = self.interpreter.apply(commands);
        if outcome.dirty {
            self.needs_redraw = true;
        }
        if let Some(title) = outcome.title {
            self.editor_title = title;
            self.update_title();
        }
        if outcome.resized.is_some() {
            let state = self.interpreter.state();
            let size = PhysicalSize::new(state.pixel_width(), state.pixel_height());
            if let Some(window) = &self.window {
                // None means the request is pending; Resized follows later
                let _ = window.request_inner_size(size);
            }
        }
    }

    fn handle_key_input(&mut self, event: &winit::event::KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }
        let Some(code) = map_physical_key(event.physical_key) else {
            log::trace!("Ignoring unmapped key {:?}", event.physical_key);
            return;
        };
        let modifiers = map_modifiers(self.modifiers);

        if let (Some(binding), Some(label)) = (self.run_binding, key_label(code)) {
            if binding.matches(label, modifiers.ctrl, modifiers.shift, modifiers.alt) {
                self.start_script();
                return;
            }
        }

        if let Some(input) = self.encoder.encode(KeyEvent::new(code, modifiers)) {
            self.send(&input);
        }
    }

    fn start_script(&mut self) {
        if self.script.is_empty() {
            log::warn!("No script loaded; pass --script FILE");
            return;
        }
        match self.runner.start(self.script.clone(), Instant::now()) {
            Ok(()) => log::info!("Running script of {} rows", self.script.len()),
            Err(e) => log::warn!("Cannot start script: {}", e),
        }
    }

    fn send(&mut self, input: &glaze_input::EncodedInput) {
        if let Err(e) = self.sink.send(input) {
            log::warn!("Failed to send input {}: {}", input, e);
        }
    }

    fn about_to_wait(&mut self, elwt: &EventLoopWindowTarget<GlazeEvent>) {
        let now = Instant::now();

        if self.runner.next_deadline().is_some_and(|d| d <= now) {
            for action in self.runner.poll(now) {
                self.perform(action);
            }
        }

        let mut wake = self.runner.next_deadline();
        if self.config.cursor_blink {
            if now.duration_since(self.last_blink) >= BLINK_INTERVAL {
                self.cursor_visible = !self.cursor_visible;
                self.last_blink = now;
                self.needs_redraw = true;
            }
            let blink_at = self.last_blink + BLINK_INTERVAL;
            wake = Some(wake.map_or(blink_at, |w| w.min(blink_at)));
        }

        elwt.set_control_flow(match wake {
            Some(deadline) => ControlFlow::WaitUntil(deadline),
            None => ControlFlow::Wait,
        });

        if self.needs_redraw {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }

    fn perform(&mut self, action: RunnerAction) {
        match action {
            RunnerAction::Send(input) => self.send(&input),
            RunnerAction::Highlight(row) => {
                self.highlighted = Some(row);
                self.update_title();
            }
            RunnerAction::Unhighlight(row) => {
                if self.highlighted == Some(row) {
                    self.highlighted = None;
                    self.update_title();
                }
            }
            RunnerAction::RowFailed { row, error } => {
                log::debug!("Row {} reported failed: {}", row + 1, error);
            }
            RunnerAction::Finished => {
                self.highlighted = None;
                self.update_title();
            }
        }
    }

    fn update_title(&self) {
        let Some(window) = &self.window else {
            return;
        };
        let title = match self.highlighted {
            Some(row) => format!(
                "{} [script row {}/{}]",
                self.editor_title,
                row + 1,
                self.script.len()
            ),
            None => self.editor_title.clone(),
        };
        window.set_title(&title);
    }

    /// Present the primary surface
    fn render(&mut self) {
        let (Some(window), Some(presenter)) = (&self.window, &mut self.presenter) else {
            return;
        };
        let size = window.inner_size();
        let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return;
        };

        if let Err(e) = presenter.surface.resize(width, height) {
            log::warn!("Failed to resize surface: {}", e);
            return;
        }
        let mut buffer = match presenter.surface.buffer_mut() {
            Ok(buffer) => buffer,
            Err(e) => {
                log::warn!("Failed to get surface buffer: {}", e);
                return;
            }
        };

        let cursor_visible = self.cursor_visible || !self.config.cursor_blink;
        self.interpreter
            .present(&mut buffer, size.width, size.height, cursor_visible);

        if let Err(e) = buffer.present() {
            log::warn!("Render error: {}", e);
        }
        self.needs_redraw = false;
    }
}
