use iced::event::{self, Event};
use iced::keyboard::{self, key};
use iced::mouse;
use iced::time::{self, Instant};
use iced::widget::{
    button, canvas, column, container, image, row, text, text_input, Space, Stack,
};
use iced::window;
use iced::{
    Alignment, Border, Color, ContentFit, Element, Length, Padding, Point, Size, Subscription,
    Task, Theme,
};
use std::path::Path;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod imaging;
mod state;
mod ui;

use config::AppConfig;
use error::{Error, ErrorKind};
use imaging::ImageCache;
use state::adaptive::AdaptiveAnimator;
use state::canvas::TargetCanvas;
use state::data::{TileId, TilePosition};
use state::gallery::SourceGallery;
use state::interaction::{PointerRelease, PointerTracker, PointerUpdate, TileGesture};
use state::layout::LayoutRecord;
use ui::canvas::{ContextMenu, TargetSurface};
use ui::dialog::CloseChoice;
use ui::geometry::{self, WindowGeometry};

const CANVAS_BACKGROUND: Color = Color::from_rgb(0.96, 0.96, 0.96);
const PANEL_BORDER: Color = Color::from_rgb(0.6, 0.6, 0.6);
const ERROR_TEXT: Color = Color::from_rgb(0.75, 0.15, 0.15);

/// Line shown next to the Browse button
#[derive(Debug, Clone, Default)]
struct Notice {
    text: String,
    is_error: bool,
}

/// What to do with a close request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClosePlan {
    Close,
    SaveThenClose,
    Stay,
}

/// An empty canvas closes straight away; otherwise `ask` decides.
fn plan_close(has_tiles: bool, ask: impl FnOnce() -> CloseChoice) -> ClosePlan {
    if !has_tiles {
        return ClosePlan::Close;
    }
    match ask() {
        CloseChoice::Save => ClosePlan::SaveThenClose,
        CloseChoice::Discard => ClosePlan::Close,
        CloseChoice::Cancel => ClosePlan::Stay,
    }
}

/// Main window
struct ImageDrag {
    config: AppConfig,
    /// Decoded images shared by the gallery and the canvas
    cache: ImageCache,
    gallery: SourceGallery,
    canvas: TargetCanvas,
    animator: AdaptiveAnimator,
    pointer: PointerTracker,
    geometry: WindowGeometry,
    context_menu: Option<ContextMenu>,
    notice: Notice,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    BrowseFolder,
    SaveLayout,
    ResetCanvas,
    ToggleAdaptive,
    /// A gallery thumbnail was pressed
    DragStarted(usize),
    /// A canvas tile was pressed, on its body or its grip
    TileGrabbed(TileId, TileGesture),
    ContextMenuRequested(TileId, Point),
    DismissContextMenu,
    DeleteTile(TileId),
    PointerMoved(Point),
    PointerReleased,
    WindowResized(Size),
    CloseRequested(window::Id),
    AnimationTick(Instant),
}

impl ImageDrag {
    fn new(config: AppConfig, config_error: Option<Error>) -> (Self, Task<Message>) {
        let geometry = WindowGeometry::default();

        let mut app = ImageDrag {
            cache: ImageCache::new(config.image_cache_capacity, config.thumbnail_size),
            gallery: SourceGallery::new(config.image_directory.clone()),
            canvas: TargetCanvas::new(geometry.canvas_size()),
            animator: AdaptiveAnimator::new(config.uniform_tile_size, config.animation_duration()),
            pointer: PointerTracker::new(),
            geometry,
            context_menu: None,
            notice: Notice::default(),
            config,
        };

        if let Some(err) = config_error {
            app.report(&err);
        }
        app.restore_session();

        (app, Task::none())
    }

    /// Reload the gallery and the canvas from the saved layout, if any.
    ///
    /// The layout's folder wins over the configured one while it still exists.
    fn restore_session(&mut self) {
        let layout = match LayoutRecord::load(&self.config.layout_file) {
            Ok(layout) => layout,
            Err(err) => {
                self.report(&err);
                None
            }
        };

        let directory = layout
            .as_ref()
            .map(|l| l.image_directory.clone())
            .filter(|dir| dir.is_dir())
            .unwrap_or_else(|| self.config.image_directory.clone());
        self.reload_gallery(&directory);

        let Some(layout) = layout else {
            return;
        };
        let report = layout.restore_into(&mut self.canvas, &mut self.cache, &mut self.animator);
        tracing::info!(
            restored = report.restored,
            missing = report.missing,
            failed = report.failed.len(),
            "layout restored"
        );
        if !report.failed.is_empty() {
            self.report_all(&report.failed);
        } else if report.restored > 0 {
            let when = layout
                .saved_at_local()
                .map(|t| format!(" from {}", t.format("%Y-%m-%d %H:%M")))
                .unwrap_or_default();
            self.inform(format!("Restored {} tiles{when}", report.restored));
        }
    }

    fn reload_gallery(&mut self, directory: &Path) {
        match self.gallery.reload(directory, &mut self.cache) {
            Ok(report) if report.failed.is_empty() => self.inform(format!(
                "{} images in {}",
                report.loaded,
                directory.display()
            )),
            Ok(report) => self.report_all(&report.failed),
            Err(err) => self.report(&err),
        }
    }

    /// Write the layout; false when the save failed
    fn save_layout(&mut self) -> bool {
        let record = LayoutRecord::snapshot(self.gallery.directory(), &self.canvas);
        match record.save(&self.config.layout_file) {
            Ok(()) => {
                self.inform(format!("Layout saved ({} tiles)", record.tiles.len()));
                true
            }
            Err(err) => {
                self.report(&err);
                false
            }
        }
    }

    fn inform(&mut self, text: impl Into<String>) {
        self.notice = Notice {
            text: text.into(),
            is_error: false,
        };
    }

    fn report(&mut self, err: &Error) {
        match err.kind() {
            ErrorKind::Persistence => tracing::error!(error = %err, "layout file problem"),
            ErrorKind::Configuration => tracing::warn!(error = %err, "configuration problem"),
            ErrorKind::Decode => tracing::warn!(error = %err, "image problem"),
        }
        self.notice = Notice {
            text: err.to_string(),
            is_error: true,
        };
    }

    /// Report a batch of per-file failures in one notice naming every file
    fn report_all(&mut self, errors: &[Error]) {
        let [first, rest @ ..] = errors else {
            return;
        };
        if rest.is_empty() {
            self.report(first);
            return;
        }

        let names: Vec<String> = errors
            .iter()
            .map(|err| {
                let path = err.path();
                path.file_name()
                    .unwrap_or(path.as_os_str())
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        tracing::warn!(count = errors.len(), files = ?names, "images could not be loaded");
        self.notice = Notice {
            text: format!(
                "{} images could not be loaded: {}",
                errors.len(),
                names.join(", ")
            ),
            is_error: true,
        };
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::BrowseFolder => {
                if let Some(folder) = ui::dialog::pick_image_folder(self.gallery.directory()) {
                    self.reload_gallery(&folder);
                }
            }
            Message::SaveLayout => {
                self.save_layout();
            }
            Message::ResetCanvas => {
                self.context_menu = None;
                self.canvas.clear(&mut self.animator);
                self.inform("Canvas cleared");
            }
            Message::ToggleAdaptive => {
                self.animator.toggle(Instant::now(), self.canvas.tiles());
            }
            Message::DragStarted(index) => {
                self.context_menu = None;
                if let Some(payload) = self.gallery.begin_drag(index) {
                    tracing::debug!(?payload, "drag started");
                    self.pointer.begin_drag(payload);
                }
            }
            Message::TileGrabbed(id, gesture) => {
                self.pointer.begin_tile_gesture(id, gesture);
            }
            Message::ContextMenuRequested(tile, at) => {
                self.context_menu = Some(ContextMenu { tile, at });
            }
            Message::DismissContextMenu => {
                self.context_menu = None;
            }
            Message::DeleteTile(id) => {
                self.context_menu = None;
                self.canvas.delete(id, &mut self.animator);
            }
            Message::PointerMoved(position) => match self.pointer.moved(position) {
                PointerUpdate::Idle => {}
                PointerUpdate::MoveTile { id, dx, dy } => self.canvas.move_by(id, dx, dy),
                PointerUpdate::ResizeTile { id, dx, dy } => {
                    self.canvas.resize_by(id, dx, dy);
                }
            },
            Message::PointerReleased => self.finish_gesture(),
            Message::WindowResized(size) => {
                self.geometry = WindowGeometry::compute(size);
                self.canvas.set_size(self.geometry.canvas_size());
            }
            Message::CloseRequested(id) => {
                let plan = plan_close(!self.canvas.is_empty(), ui::dialog::confirm_close);
                tracing::info!(?plan, "close requested");
                return match plan {
                    ClosePlan::Close => window::close(id),
                    ClosePlan::SaveThenClose if self.save_layout() => window::close(id),
                    ClosePlan::SaveThenClose | ClosePlan::Stay => Task::none(),
                };
            }
            Message::AnimationTick(now) => {
                self.animator.tick(now, self.canvas.tiles_mut());
            }
        }

        Task::none()
    }

    fn finish_gesture(&mut self) {
        match self.pointer.released(self.geometry.canvas) {
            PointerRelease::Idle | PointerRelease::Cancelled => {}
            PointerRelease::Dropped { payload, at } => {
                let at = TilePosition::new(at.x as i32, at.y as i32);
                let dropped =
                    self.canvas
                        .drop_payload(&payload, at, &mut self.cache, &mut self.animator);
                if let Err(err) = dropped {
                    self.report(&err);
                }
            }
            // A free-form resize becomes the size adaptive mode returns to
            PointerRelease::TileReleased {
                id,
                gesture: TileGesture::Resize,
            } if !self.animator.is_uniform() => {
                if let Some(size) = self.canvas.tile(id).map(|t| t.size) {
                    self.animator.track(id, size);
                }
            }
            PointerRelease::TileReleased { .. } => {}
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        let events = event::listen_with(|event, _status, id| match event {
            Event::Mouse(mouse::Event::CursorMoved { position }) => {
                Some(Message::PointerMoved(position))
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                Some(Message::PointerReleased)
            }
            Event::Window(window::Event::Resized(size)) => Some(Message::WindowResized(size)),
            Event::Window(window::Event::CloseRequested) => Some(Message::CloseRequested(id)),
            Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(key::Named::Escape),
                ..
            }) => Some(Message::DismissContextMenu),
            _ => None,
        });

        if self.animator.is_running() {
            Subscription::batch([
                events,
                time::every(self.config.animation_tick()).map(Message::AnimationTick),
            ])
        } else {
            events
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        column![self.view_canvas(), self.view_controls(), self.view_gallery()]
            .spacing(5)
            .padding(geometry::MARGIN)
            .into()
    }

    fn view_canvas(&self) -> Element<'_, Message> {
        let area = self.geometry.canvas;

        // One layer per tile, offset by padding, with the overlay on top
        let mut layers: Vec<Element<'_, Message>> = self
            .canvas
            .tiles()
            .iter()
            .map(|tile| {
                let picture = image(tile.image.clone())
                    .width(Length::Fixed(tile.size.width as f32))
                    .height(Length::Fixed(tile.size.height as f32))
                    .content_fit(ContentFit::Fill);

                container(picture)
                    .padding(Padding {
                        top: tile.position.y as f32,
                        right: 0.0,
                        bottom: 0.0,
                        left: tile.position.x as f32,
                    })
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .into()
            })
            .collect();

        let hovering_drag = self
            .pointer
            .payload()
            .filter(|_| self.pointer.is_dragging_over(area))
            .map(|payload| self.canvas.accepts(payload));

        layers.push(
            canvas(TargetSurface {
                canvas: &self.canvas,
                hovering_drag,
                context_menu: self.context_menu,
            })
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        );

        container(Stack::with_children(layers))
            .width(Length::Fixed(area.width))
            .height(Length::Fixed(area.height))
            .clip(true)
            .style(|_theme| panel_style(Some(CANVAS_BACKGROUND)))
            .into()
    }

    fn view_controls(&self) -> Element<'_, Message> {
        let g = &self.geometry;
        let directory = self.gallery.directory().display().to_string();

        let path_field = text_input("Image folder", &directory)
            .size(13)
            .width(Length::Fixed(g.path_field.width));

        let status = format!("{}  ({} tiles)", self.notice.text, self.canvas.len());
        let status = text(status).size(13).color(if self.notice.is_error {
            ERROR_TEXT
        } else {
            Color::BLACK
        });

        type ButtonStyle = fn(&Theme, button::Status) -> button::Style;
        let adaptive_style: ButtonStyle = if self.animator.is_uniform() {
            button::primary
        } else {
            button::secondary
        };

        row![
            path_field,
            Space::with_width(geometry::gap(g.path_field, g.browse)),
            action("Browse", g.browse.size(), Message::BrowseFolder),
            container(status)
                .width(Length::Fixed(g.status_width()))
                .padding([0, 10])
                .clip(true),
            action("Save", g.save.size(), Message::SaveLayout),
            Space::with_width(geometry::gap(g.save, g.reset)),
            action("Reset", g.reset.size(), Message::ResetCanvas),
            Space::with_width(geometry::gap(g.reset, g.adaptive)),
            action("Adaptive", g.adaptive.size(), Message::ToggleAdaptive).style(adaptive_style),
        ]
        .height(Length::Fixed(geometry::ACTION_BUTTON.height))
        .align_y(Alignment::Center)
        .into()
    }

    fn view_gallery(&self) -> Element<'_, Message> {
        container(ui::gallery::view(&self.gallery, self.config.thumbnail_size))
            .width(Length::Fixed(self.geometry.gallery.width))
            .height(Length::Fill)
            .style(|_theme| panel_style(None))
            .into()
    }

    fn theme(&self) -> Theme {
        Theme::Light
    }
}

fn action(label: &str, size: Size, on_press: Message) -> button::Button<'_, Message> {
    button(container(text(label).size(13)).center_x(Length::Fill))
        .width(Length::Fixed(size.width))
        .height(Length::Fixed(size.height))
        .on_press(on_press)
}

fn panel_style(background: Option<Color>) -> container::Style {
    container::Style {
        background: background.map(Into::into),
        border: Border {
            color: PANEL_BORDER,
            width: 1.0,
            radius: 0.0.into(),
        },
        ..container::Style::default()
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("image_drag=info")),
        )
        .init();

    let (config, config_error) = AppConfig::load();
    tracing::info!(
        images = %config.image_directory.display(),
        layout = %config.layout_file.display(),
        "starting"
    );

    iced::application("Image Drag", ImageDrag::update, ImageDrag::view)
        .subscription(ImageDrag::subscription)
        .theme(ImageDrag::theme)
        .window(window::Settings {
            size: geometry::DEFAULT_WINDOW,
            min_size: Some(geometry::MIN_WINDOW),
            exit_on_close_request: false,
            ..window::Settings::default()
        })
        .run_with(move || ImageDrag::new(config, config_error))
}
