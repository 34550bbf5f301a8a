use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use clap::Parser;
use iced::widget::image::Handle;
use iced::{keyboard, window, Color, Element, Event, Point, Size, Subscription, Task, Theme};
use tracing::{error, info};

use flipbook_core::{
    EngineCommand, FullscreenRequest, Key, PageFlipEngine, PendingFlip, SwipeDirection,
    SWIPE_THRESHOLD,
};

mod chrome;
mod flip;
mod loader;
mod manifest;

use flip::TimedFlip;
use loader::PageCache;
use manifest::PublicationManifest;

/// Interactive viewer for flipbook publications.
#[derive(Debug, Parser)]
#[command(name = "flipbook-viewer", version, about)]
struct Args {
    /// Path to the publication manifest (JSON).
    manifest: PathBuf,
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter("flipbook_viewer=debug,flipbook_core=debug,info")
        .init();

    let args = Args::parse();

    iced::application("Flipbook Viewer", FlipbookApp::update, FlipbookApp::view)
        .subscription(FlipbookApp::subscription)
        .theme(|_| Theme::Dark)
        .run_with(move || FlipbookApp::new(args.manifest))
}

#[derive(Debug, Clone)]
enum Message {
    ManifestLoaded(Result<PublicationManifest, String>),
    PageLoaded(usize, Result<Handle, String>),
    ThumbnailLoaded(usize, Result<Handle, String>),
    Next,
    Prev,
    GoTo(usize),
    FlipFinished,
    ZoomIn,
    ZoomOut,
    ToggleThumbnails,
    CloseThumbnails,
    ToggleFullscreen,
    FullscreenChanged(window::Mode),
    Resized(Size),
    KeyPressed(Key),
    SwipePressed,
    SwipeMoved(Point),
    SwipeReleased,
    Share,
    Download,
    Print,
}

struct FlipbookApp {
    stage: Stage,
}

enum Stage {
    Loading,
    /// Terminal: empty publication or failed load. Never retried.
    Placeholder { message: String, background: Color },
    Ready(Box<Viewer>),
}

impl FlipbookApp {
    fn new(manifest_path: PathBuf) -> (Self, Task<Message>) {
        info!(manifest = %manifest_path.display(), "loading publication");
        (
            Self {
                stage: Stage::Loading,
            },
            Task::perform(
                PublicationManifest::load(manifest_path),
                Message::ManifestLoaded,
            ),
        )
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ManifestLoaded(result) => self.manifest_loaded(result),
            message => match &mut self.stage {
                Stage::Ready(viewer) => viewer.update(message),
                _ => Task::none(),
            },
        }
    }

    fn manifest_loaded(&mut self, result: Result<PublicationManifest, String>) -> Task<Message> {
        match result {
            Ok(manifest) => self.open(manifest),
            Err(e) => {
                error!("failed to load publication: {e}");
                self.stage = Stage::Placeholder {
                    message: "No pages available".to_string(),
                    background: chrome::DEFAULT_BACKGROUND,
                };
                Task::none()
            }
        }
    }

    fn open(&mut self, manifest: PublicationManifest) -> Task<Message> {
        let PublicationManifest {
            title,
            share_url,
            pdf_url,
            settings,
            pages,
        } = manifest;

        let background =
            chrome::parse_background_color(&settings.background_color).unwrap_or(chrome::DEFAULT_BACKGROUND);

        let renderer = TimedFlip::new(settings.flip_duration());
        let engine = match PageFlipEngine::new(pages, settings, Box::new(renderer)) {
            Ok(engine) => engine,
            Err(e) => {
                info!("rendering placeholder: {e}");
                self.stage = Stage::Placeholder {
                    message: "No pages available".to_string(),
                    background,
                };
                return Task::none();
            }
        };

        info!(pages = engine.page_count(), title = ?title, "publication opened");
        let mut viewer = Box::new(Viewer {
            engine,
            title,
            share_url,
            pdf_url,
            background,
            pages: PageCache::new(),
            thumbnails: HashMap::new(),
            loading_pages: HashSet::new(),
            thumbnails_requested: false,
            cursor: Point::ORIGIN,
            press_origin: None,
        });

        let task = Task::batch([
            viewer.prefetch_pages(),
            window::get_latest()
                .and_then(window::get_size)
                .map(Message::Resized),
        ]);
        self.stage = Stage::Ready(viewer);
        task
    }

    fn view(&self) -> Element<'_, Message> {
        match &self.stage {
            Stage::Loading => chrome::loading(),
            Stage::Placeholder {
                message,
                background,
            } => chrome::placeholder(message, *background),
            Stage::Ready(viewer) => chrome::view(viewer),
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            keyboard::on_key_press(handle_key_press),
            iced::event::listen_with(handle_window_event),
        ])
    }
}

fn handle_key_press(key: keyboard::Key, _modifiers: keyboard::Modifiers) -> Option<Message> {
    use keyboard::key::Named;

    let key = match key {
        keyboard::Key::Named(Named::ArrowRight) => Key::ArrowRight,
        keyboard::Key::Named(Named::ArrowLeft) => Key::ArrowLeft,
        keyboard::Key::Named(Named::Space) => Key::Space,
        keyboard::Key::Named(Named::Escape) => Key::Escape,
        _ => return None,
    };
    Some(Message::KeyPressed(key))
}

fn handle_window_event(
    event: Event,
    _status: iced::event::Status,
    _window: window::Id,
) -> Option<Message> {
    match event {
        Event::Window(window::Event::Resized(size)) => Some(Message::Resized(size)),
        _ => None,
    }
}

/// One mounted publication: the engine plus everything the chrome renders.
pub(crate) struct Viewer {
    pub(crate) engine: PageFlipEngine,
    pub(crate) title: Option<String>,
    pub(crate) share_url: Option<String>,
    pub(crate) pdf_url: Option<String>,
    pub(crate) background: Color,
    pub(crate) pages: PageCache,
    pub(crate) thumbnails: HashMap<usize, Handle>,
    loading_pages: HashSet<usize>,
    thumbnails_requested: bool,
    cursor: Point,
    press_origin: Option<Point>,
}

impl Viewer {
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Next => {
                let pending = self.engine.next();
                schedule_flip(pending)
            }
            Message::Prev => {
                let pending = self.engine.prev();
                schedule_flip(pending)
            }
            Message::GoTo(index) => {
                let pending = self.engine.go_to(index);
                schedule_flip(pending)
            }
            Message::FlipFinished => {
                self.engine.finish_flip();
                self.prefetch_pages()
            }
            Message::PageLoaded(index, Ok(handle)) => {
                self.loading_pages.remove(&index);
                self.pages.insert(index, handle, self.engine.current_page());
                Task::none()
            }
            Message::PageLoaded(index, Err(e)) => {
                self.loading_pages.remove(&index);
                error!(page = index, "failed to load page image: {e}");
                Task::none()
            }
            Message::ThumbnailLoaded(index, Ok(handle)) => {
                self.thumbnails.insert(index, handle);
                Task::none()
            }
            Message::ThumbnailLoaded(index, Err(e)) => {
                error!(page = index, "failed to load thumbnail: {e}");
                Task::none()
            }
            Message::ZoomIn => {
                self.engine.zoom_in();
                Task::none()
            }
            Message::ZoomOut => {
                self.engine.zoom_out();
                Task::none()
            }
            Message::ToggleThumbnails => {
                self.engine.toggle_thumbnails();
                if self.engine.thumbnails_open() {
                    self.fetch_thumbnails()
                } else {
                    Task::none()
                }
            }
            Message::CloseThumbnails => {
                self.engine.close_thumbnails();
                Task::none()
            }
            Message::ToggleFullscreen => request_mode_change(self.engine.fullscreen_request()),
            Message::FullscreenChanged(mode) => {
                self.engine.set_fullscreen(mode == window::Mode::Fullscreen);
                Task::none()
            }
            Message::Resized(size) => {
                self.engine.resize(size.width, size.height);
                Task::none()
            }
            Message::KeyPressed(key) => match self.engine.handle_key(key) {
                Some(EngineCommand::Flip(pending)) => schedule_flip(Some(pending)),
                Some(EngineCommand::Fullscreen(request)) => request_mode_change(request),
                None => Task::none(),
            },
            Message::SwipePressed => {
                self.press_origin = Some(self.cursor);
                Task::none()
            }
            Message::SwipeMoved(position) => {
                self.cursor = position;
                Task::none()
            }
            Message::SwipeReleased => match self.release_swipe() {
                Some(direction) => {
                    let pending = self.engine.handle_swipe(direction);
                    schedule_flip(pending)
                }
                None => Task::none(),
            },
            Message::Share => match &self.share_url {
                Some(url) => {
                    info!("publication link copied to clipboard");
                    iced::clipboard::write(url.clone())
                }
                None => Task::none(),
            },
            Message::Download => match &self.pdf_url {
                Some(url) => {
                    info!("source document link copied to clipboard");
                    iced::clipboard::write(url.clone())
                }
                None => Task::none(),
            },
            Message::Print => {
                info!("print requested for the source document");
                Task::none()
            }
            // ManifestLoaded is handled before the stage dispatch.
            Message::ManifestLoaded(_) => Task::none(),
        }
    }

    /// Start loads for the current page and its neighbors.
    fn prefetch_pages(&mut self) -> Task<Message> {
        let current = self.engine.current_page();
        let last = self.engine.page_count() - 1;

        let mut tasks = Vec::new();
        for index in current.saturating_sub(1)..=(current + 1).min(last) {
            if self.pages.contains(index) || self.loading_pages.contains(&index) {
                continue;
            }
            self.loading_pages.insert(index);
            let url = self.engine.pages()[index].image_url.clone();
            tasks.push(Task::perform(loader::fetch(url), move |result| {
                Message::PageLoaded(index, result)
            }));
        }
        Task::batch(tasks)
    }

    /// Load every thumbnail once, on the first open of the panel.
    fn fetch_thumbnails(&mut self) -> Task<Message> {
        if self.thumbnails_requested {
            return Task::none();
        }
        self.thumbnails_requested = true;

        let tasks: Vec<_> = self
            .engine
            .pages()
            .iter()
            .enumerate()
            .map(|(index, page)| {
                let url = page.thumbnail().to_string();
                Task::perform(loader::fetch(url), move |result| {
                    Message::ThumbnailLoaded(index, result)
                })
            })
            .collect();
        Task::batch(tasks)
    }

    fn release_swipe(&mut self) -> Option<SwipeDirection> {
        let origin = self.press_origin.take()?;
        let dx = self.cursor.x - origin.x;
        let dy = self.cursor.y - origin.y;
        if dx.abs() < SWIPE_THRESHOLD || dx.abs() <= dy.abs() {
            return None;
        }
        Some(if dx < 0.0 {
            SwipeDirection::Left
        } else {
            SwipeDirection::Right
        })
    }

    /// Share control action, present only when the settings flag is on and
    /// the publication carries a public link.
    pub(crate) fn share_action(&self) -> Option<Message> {
        (self.engine.settings().show_share_button && self.share_url.is_some())
            .then_some(Message::Share)
    }

    pub(crate) fn download_action(&self) -> Option<Message> {
        (self.engine.settings().show_download_button && self.pdf_url.is_some())
            .then_some(Message::Download)
    }

    pub(crate) fn print_action(&self) -> Option<Message> {
        (self.engine.settings().show_print_button && self.pdf_url.is_some())
            .then_some(Message::Print)
    }
}

fn schedule_flip(pending: Option<PendingFlip>) -> Task<Message> {
    match pending {
        Some(flip) => Task::perform(tokio::time::sleep(flip.duration), |_| Message::FlipFinished),
        None => Task::none(),
    }
}

fn request_mode_change(request: FullscreenRequest) -> Task<Message> {
    let mode = match request {
        FullscreenRequest::Enter => window::Mode::Fullscreen,
        FullscreenRequest::Exit => window::Mode::Windowed,
    };
    // Commit happens on the readback, not on the request: a denied
    // transition leaves the engine state untouched.
    window::get_latest().and_then(move |id| {
        window::change_mode(id, mode).chain(window::get_mode(id).map(Message::FullscreenChanged))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flipbook_core::{InstantFlip, Page, ViewerSettings};

    fn viewer(settings: ViewerSettings, share: Option<&str>, pdf: Option<&str>) -> Viewer {
        let pages = vec![Page {
            page_number: 1,
            image_url: "pages/1.png".to_string(),
            thumbnail_url: None,
            width: 1240,
            height: 1754,
        }];
        Viewer {
            engine: PageFlipEngine::new(pages, settings, Box::new(InstantFlip::new())).unwrap(),
            title: None,
            share_url: share.map(String::from),
            pdf_url: pdf.map(String::from),
            background: chrome::DEFAULT_BACKGROUND,
            pages: PageCache::new(),
            thumbnails: HashMap::new(),
            loading_pages: HashSet::new(),
            thumbnails_requested: false,
            cursor: Point::ORIGIN,
            press_origin: None,
        }
    }

    #[test]
    fn download_control_requires_flag_and_action() {
        let enabled = ViewerSettings {
            show_download_button: true,
            ..ViewerSettings::default()
        };
        // Flag without an action: no control.
        assert!(viewer(enabled.clone(), None, None).download_action().is_none());
        // Flag and action: control present.
        assert!(viewer(enabled, None, Some("catalog.pdf"))
            .download_action()
            .is_some());
        // Action without the flag: no control.
        assert!(viewer(ViewerSettings::default(), None, Some("catalog.pdf"))
            .download_action()
            .is_none());
    }

    #[test]
    fn share_and_print_follow_the_same_gating() {
        assert!(viewer(ViewerSettings::default(), Some("https://example.com/v/catalog"), None)
            .share_action()
            .is_some());
        assert!(viewer(ViewerSettings::default(), None, None).share_action().is_none());

        let print = ViewerSettings {
            show_print_button: true,
            ..ViewerSettings::default()
        };
        assert!(viewer(print, None, Some("catalog.pdf")).print_action().is_some());
    }

    #[test]
    fn horizontal_drag_past_threshold_registers_as_swipe() {
        let mut viewer = viewer(ViewerSettings::default(), None, None);

        viewer.press_origin = Some(Point::new(300.0, 100.0));
        viewer.cursor = Point::new(200.0, 100.0);
        assert_eq!(viewer.release_swipe(), Some(SwipeDirection::Left));

        viewer.press_origin = Some(Point::new(200.0, 100.0));
        viewer.cursor = Point::new(260.0, 110.0);
        assert_eq!(viewer.release_swipe(), Some(SwipeDirection::Right));
    }

    #[test]
    fn short_or_vertical_drags_are_not_swipes() {
        let mut viewer = viewer(ViewerSettings::default(), None, None);

        viewer.press_origin = Some(Point::new(200.0, 100.0));
        viewer.cursor = Point::new(220.0, 100.0);
        assert_eq!(viewer.release_swipe(), None);

        viewer.press_origin = Some(Point::new(200.0, 100.0));
        viewer.cursor = Point::new(150.0, 300.0);
        assert_eq!(viewer.release_swipe(), None);

        // A release without a press is ignored.
        assert_eq!(viewer.release_swipe(), None);
    }
}
