//! The editor window and its event loop handler.

use std::sync::Arc;
use std::time::Duration;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use super::dialogs;
use super::gpu::{GpuContext, Renderer};
use super::input::{InputRouter, KeyBindings, UiAction};
use super::scene;
use super::{GuiError, drain};
use crate::app::TvatApp;
use crate::constants::HOST_TICK_INTERVAL;
use crate::message::Message;

const INITIAL_WIDTH: f64 = 1024.0;
const INITIAL_HEIGHT: f64 = 768.0;

/// Hosts a [`TvatApp`] in a native window.
pub struct EditorWindow {
    app: TvatApp,
    router: InputRouter,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    title: String,
    drain_timeout: Duration,
    /// First error that ended the event loop
    failure: Option<GuiError>,
}

impl EditorWindow {
    pub fn new(app: TvatApp, drain_timeout: Duration) -> Self {
        let router = InputRouter::new(
            KeyBindings::default(),
            INITIAL_WIDTH as f32,
            INITIAL_HEIGHT as f32,
        );
        let title = scene::window_title(&app, &router);
        Self {
            app,
            router,
            window: None,
            renderer: None,
            title,
            drain_timeout,
            failure: None,
        }
    }

    pub fn take_failure(&mut self) -> Option<GuiError> {
        self.failure.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: GuiError) {
        log::error!("{}", error);
        if self.failure.is_none() {
            self.failure = Some(error);
        }
        event_loop.exit();
    }

    fn dispatch(&mut self, action: Option<UiAction>) {
        let Some(action) = action else {
            return;
        };
        match action {
            UiAction::Send(message) => self.app.update(message),
            UiAction::PickCsv => {
                if let Some(file) = dialogs::pick_csv() {
                    self.app.update(Message::CsvSelected(file));
                }
            }
            UiAction::PickVideo => {
                if let Some(file) = dialogs::pick_video() {
                    self.app.update(Message::VideoSelected(file));
                }
            }
            UiAction::ShowHelp => dialogs::show_help(self.router.bindings()),
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        let batch = scene::build(&self.app, &self.router);
        match renderer.render(&batch, scene::BACKGROUND) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                renderer.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for EditorWindow {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(self.title.as_str())
            .with_inner_size(LogicalSize::new(INITIAL_WIDTH, INITIAL_HEIGHT));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        let gpu = match pollster::block_on(GpuContext::new(window.clone())) {
            Ok(gpu) => gpu,
            Err(e) => return self.fail(event_loop, e.into()),
        };

        let size = window.inner_size();
        let moved = self.router.resize(size.width as f32, size.height as f32);
        self.renderer = Some(Renderer::new(gpu));
        self.window = Some(window);
        self.dispatch(Some(moved));
        log::info!("Editor window open ({}x{})", size.width, size.height);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size.width, size.height);
                }
                let moved = self.router.resize(size.width as f32, size.height as f32);
                self.dispatch(Some(moved));
            }
            WindowEvent::CursorMoved { position, .. } => {
                let action =
                    self.router
                        .cursor_moved(position.x as f32, position.y as f32, &self.app);
                self.dispatch(action);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let action = match state {
                    ElementState::Pressed => self.router.mouse_pressed(&self.app),
                    ElementState::Released => self.router.mouse_released(&self.app),
                };
                self.dispatch(action);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        text,
                        ..
                    },
                ..
            } => {
                let action = self.router.key_pressed(code, text.as_deref(), &self.app);
                self.dispatch(action);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let changed = self.app.tick();
        if let Some(window) = &self.window {
            let title = scene::window_title(&self.app, &self.router);
            if title != self.title {
                window.set_title(&title);
                self.title = title;
            }
            if changed || self.app.is_playing() {
                window.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::wait_duration(HOST_TICK_INTERVAL));
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        drain(&mut self.app, self.drain_timeout);
        self.app.dispose();
        // Surface goes before the window it was created from
        self.renderer = None;
        self.window = None;
        log::info!("Editor window closed");
    }
}
