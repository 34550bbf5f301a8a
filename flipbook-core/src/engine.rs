//! Navigation state machine for one flipbook viewer instance.
//!
//! The engine owns the viewer state exclusively. Navigation is an explicit
//! request/commit pair: `next`/`prev`/`go_to` only *request* a flip from the
//! injected renderer, and `current_page` moves when the renderer's completion
//! edge calls [`PageFlipEngine::commit_flip`]. Callers must treat the current
//! page as eventually consistent with the last accepted request.

use tracing::{debug, trace};

use crate::error::ViewerError;
use crate::input::{EngineCommand, FullscreenRequest, Key, SwipeDirection};
use crate::layout::{compute_render_dimensions, RenderDimensions};
use crate::page::Page;
use crate::renderer::{FlipKind, FlipRenderer, FlipRequest, PendingFlip};
use crate::settings::ViewerSettings;

pub struct PageFlipEngine {
    pages: Vec<Page>,
    settings: ViewerSettings,
    renderer: Box<dyn FlipRenderer>,
    current_page: usize,
    zoom: f32,
    fullscreen: bool,
    thumbnails_open: bool,
    dimensions: RenderDimensions,
}

impl std::fmt::Debug for PageFlipEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageFlipEngine")
            .field("page_count", &self.pages.len())
            .field("current_page", &self.current_page)
            .field("zoom", &self.zoom)
            .field("fullscreen", &self.fullscreen)
            .field("thumbnails_open", &self.thumbnails_open)
            .finish()
    }
}

impl PageFlipEngine {
    pub const ZOOM_MIN: f32 = 0.5;
    pub const ZOOM_MAX: f32 = 2.0;
    pub const ZOOM_STEP: f32 = 0.25;
    pub const ZOOM_DEFAULT: f32 = 1.0;

    /// Build an engine over a non-empty, immutable page sequence.
    ///
    /// Pages are ordered by their 1-based `page_number`; the sequence they
    /// arrived in is not trusted. Duplicate page numbers are rejected.
    pub fn new(
        mut pages: Vec<Page>,
        settings: ViewerSettings,
        renderer: Box<dyn FlipRenderer>,
    ) -> Result<Self, ViewerError> {
        if pages.is_empty() {
            return Err(ViewerError::NoPages);
        }
        pages.sort_by_key(|page| page.page_number);
        if let Some(pair) = pages.windows(2).find(|w| w[0].page_number == w[1].page_number) {
            return Err(ViewerError::DuplicatePage(pair[0].page_number));
        }

        Ok(Self {
            pages,
            settings,
            renderer,
            current_page: 0,
            zoom: Self::ZOOM_DEFAULT,
            fullscreen: false,
            thumbnails_open: false,
            dimensions: RenderDimensions::default(),
        })
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// The committed page index. Lags behind an accepted navigation request
    /// until the renderer finishes its animation.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn is_first_page(&self) -> bool {
        self.current_page == 0
    }

    pub fn is_last_page(&self) -> bool {
        self.current_page + 1 == self.pages.len()
    }

    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    pub fn dimensions(&self) -> RenderDimensions {
        self.dimensions
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn thumbnails_open(&self) -> bool {
        self.thumbnails_open
    }

    /// Request a forward page turn. No-op at the last page.
    pub fn next(&mut self) -> Option<PendingFlip> {
        if self.is_last_page() {
            trace!("next ignored at last page");
            return None;
        }
        self.request(self.current_page + 1, FlipKind::Turn)
    }

    /// Request a backward page turn. No-op at the first page.
    pub fn prev(&mut self) -> Option<PendingFlip> {
        if self.is_first_page() {
            trace!("prev ignored at first page");
            return None;
        }
        self.request(self.current_page - 1, FlipKind::Turn)
    }

    /// Request a direct jump to `index`, closing the thumbnail panel on
    /// acceptance. Out-of-range indices are ignored.
    pub fn go_to(&mut self, index: usize) -> Option<PendingFlip> {
        if index >= self.pages.len() {
            debug!(index, page_count = self.pages.len(), "jump out of range, ignored");
            return None;
        }
        if index == self.current_page {
            self.thumbnails_open = false;
            return None;
        }
        let pending = self.request(index, FlipKind::Jump)?;
        self.thumbnails_open = false;
        Some(pending)
    }

    fn request(&mut self, target: usize, kind: FlipKind) -> Option<PendingFlip> {
        let accepted = self.renderer.begin(FlipRequest { target, kind });
        match accepted {
            Some(_) => debug!(page = target, ?kind, "flip requested"),
            None => debug!(page = target, ?kind, "flip dropped, animation in flight"),
        }
        accepted
    }

    /// Drain the renderer's finished animation and commit where it landed.
    pub fn finish_flip(&mut self) {
        if let Some(index) = self.renderer.complete() {
            self.commit_flip(index);
        }
    }

    /// The renderer's flip-completion callback: the single authoritative
    /// update path for the current page. Out-of-range indices are clamped
    /// rather than allowed to desync the state.
    pub fn commit_flip(&mut self, new_index: usize) {
        self.current_page = new_index.min(self.pages.len() - 1);
        debug!(page = self.current_page, "flip committed");
    }

    pub fn is_animating(&self) -> bool {
        self.renderer.is_animating()
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn can_zoom_in(&self) -> bool {
        self.zoom < Self::ZOOM_MAX
    }

    pub fn can_zoom_out(&self) -> bool {
        self.zoom > Self::ZOOM_MIN
    }

    /// Zoom is a display transform over the rendered surface; it never
    /// triggers a re-layout.
    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + Self::ZOOM_STEP).min(Self::ZOOM_MAX);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom - Self::ZOOM_STEP).max(Self::ZOOM_MIN);
    }

    /// Which fullscreen transition the host should ask the platform for.
    pub fn fullscreen_request(&self) -> FullscreenRequest {
        if self.fullscreen {
            FullscreenRequest::Exit
        } else {
            FullscreenRequest::Enter
        }
    }

    /// Commit the platform's actual fullscreen state. Never called
    /// optimistically: a denied request simply never reports back and the
    /// displayed state stays truthful.
    pub fn set_fullscreen(&mut self, active: bool) {
        self.fullscreen = active;
    }

    /// Toggle the thumbnail overlay. Opening is gated on the publication
    /// enabling thumbnails at all.
    pub fn toggle_thumbnails(&mut self) {
        if self.thumbnails_open {
            self.thumbnails_open = false;
        } else if self.settings.show_thumbnails {
            self.thumbnails_open = true;
        }
    }

    pub fn close_thumbnails(&mut self) {
        self.thumbnails_open = false;
    }

    /// Recompute the page surface for a new container size. Called on
    /// resize and after fullscreen transitions.
    pub fn resize(&mut self, container_width: f32, container_height: f32) {
        self.dimensions = compute_render_dimensions(container_width, container_height);
        trace!(dims = ?self.dimensions, "render dimensions recomputed");
    }

    /// Keyboard entry point, gated by the publication settings.
    pub fn handle_key(&mut self, key: Key) -> Option<EngineCommand> {
        if !self.settings.enable_keyboard_navigation {
            return None;
        }
        match key {
            Key::ArrowRight | Key::Space => self.next().map(EngineCommand::Flip),
            Key::ArrowLeft => self.prev().map(EngineCommand::Flip),
            Key::Escape if self.fullscreen => {
                Some(EngineCommand::Fullscreen(FullscreenRequest::Exit))
            }
            Key::Escape => None,
        }
    }

    /// Swipe entry point, gated by the publication settings. Swiping left
    /// pulls the next page across; swiping right turns back.
    pub fn handle_swipe(&mut self, direction: SwipeDirection) -> Option<PendingFlip> {
        if !self.settings.enable_swipe_navigation {
            return None;
        }
        match direction {
            SwipeDirection::Left => self.next(),
            SwipeDirection::Right => self.prev(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::InstantFlip;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn pages(count: u32) -> Vec<Page> {
        (1..=count)
            .map(|number| Page {
                page_number: number,
                image_url: format!("pages/{number}.png"),
                thumbnail_url: None,
                width: 1240,
                height: 1754,
            })
            .collect()
    }

    fn engine(count: u32) -> PageFlipEngine {
        PageFlipEngine::new(
            pages(count),
            ViewerSettings::default(),
            Box::new(InstantFlip::new()),
        )
        .unwrap()
    }

    fn engine_with(count: u32, settings: ViewerSettings) -> PageFlipEngine {
        PageFlipEngine::new(pages(count), settings, Box::new(InstantFlip::new())).unwrap()
    }

    /// Drive one request through to its commit, like the host event loop.
    fn settle(engine: &mut PageFlipEngine, pending: Option<PendingFlip>) {
        if pending.is_some() {
            engine.finish_flip();
        }
    }

    #[test]
    fn empty_publication_is_rejected() {
        let err = PageFlipEngine::new(
            Vec::new(),
            ViewerSettings::default(),
            Box::new(InstantFlip::new()),
        )
        .unwrap_err();
        assert_eq!(err, ViewerError::NoPages);
    }

    #[test]
    fn duplicate_page_numbers_are_rejected() {
        let mut dup = pages(3);
        dup[2].page_number = 2;
        let err = PageFlipEngine::new(
            dup,
            ViewerSettings::default(),
            Box::new(InstantFlip::new()),
        )
        .unwrap_err();
        assert_eq!(err, ViewerError::DuplicatePage(2));
    }

    #[test]
    fn pages_are_ordered_by_page_number() {
        let mut shuffled = pages(3);
        shuffled.reverse();
        let engine = PageFlipEngine::new(
            shuffled,
            ViewerSettings::default(),
            Box::new(InstantFlip::new()),
        )
        .unwrap();
        let numbers: Vec<u32> = engine.pages().iter().map(|p| p.page_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn three_completed_turns_land_on_index_three() {
        let mut engine = engine(6);
        assert_eq!(engine.current_page(), 0);
        for _ in 0..3 {
            let pending = engine.next();
            settle(&mut engine, pending);
        }
        assert_eq!(engine.current_page(), 3);
    }

    #[test]
    fn current_page_commits_only_on_completion() {
        let mut engine = engine(6);
        let pending = engine.next().unwrap();
        assert_eq!(pending.target, 1);
        assert_eq!(engine.current_page(), 0, "request alone must not move the page");
        engine.finish_flip();
        assert_eq!(engine.current_page(), 1);
    }

    #[test]
    fn next_at_last_page_does_not_wrap() {
        let mut engine = engine(2);
        let pending = engine.go_to(1);
        settle(&mut engine, pending);
        assert!(engine.is_last_page());
        assert!(engine.next().is_none());
        assert_eq!(engine.current_page(), 1);
    }

    #[test]
    fn prev_at_first_page_is_ignored() {
        let mut engine = engine(4);
        assert!(engine.prev().is_none());
        assert_eq!(engine.current_page(), 0);
    }

    #[test]
    fn go_to_commits_and_closes_thumbnails() {
        let mut engine = engine(6);
        engine.toggle_thumbnails();
        assert!(engine.thumbnails_open());
        let pending = engine.go_to(4);
        assert!(pending.is_some());
        assert!(!engine.thumbnails_open());
        settle(&mut engine, pending);
        assert_eq!(engine.current_page(), 4);
    }

    #[test]
    fn go_to_current_page_only_closes_thumbnails() {
        let mut engine = engine(6);
        engine.toggle_thumbnails();
        assert!(engine.go_to(0).is_none());
        assert!(!engine.thumbnails_open());
        assert_eq!(engine.current_page(), 0);
    }

    #[test]
    fn go_to_out_of_range_is_ignored() {
        let mut engine = engine(6);
        assert!(engine.go_to(6).is_none());
        assert!(engine.go_to(usize::MAX).is_none());
        assert_eq!(engine.current_page(), 0);
    }

    #[test]
    fn requests_during_an_animation_are_dropped() {
        let mut engine = engine(6);
        assert!(engine.next().is_some());
        assert!(engine.is_animating());
        assert!(engine.next().is_none());
        assert!(engine.go_to(5).is_none());
        engine.finish_flip();
        assert_eq!(engine.current_page(), 1);
    }

    #[test]
    fn commit_from_renderer_is_clamped() {
        let mut engine = engine(3);
        engine.commit_flip(99);
        assert_eq!(engine.current_page(), 2);
    }

    #[test]
    fn keyboard_navigation_funnels_into_turns() {
        let mut engine = engine(6);
        let command = engine.handle_key(Key::ArrowRight).unwrap();
        assert!(matches!(command, EngineCommand::Flip(p) if p.target == 1));
        engine.finish_flip();
        let command = engine.handle_key(Key::Space).unwrap();
        assert!(matches!(command, EngineCommand::Flip(p) if p.target == 2));
        engine.finish_flip();
        let command = engine.handle_key(Key::ArrowLeft).unwrap();
        assert!(matches!(command, EngineCommand::Flip(p) if p.target == 1));
    }

    #[test]
    fn disabled_keyboard_navigation_ignores_keys() {
        let mut engine = engine_with(
            6,
            ViewerSettings {
                enable_keyboard_navigation: false,
                ..ViewerSettings::default()
            },
        );
        assert!(engine.handle_key(Key::ArrowRight).is_none());
        assert_eq!(engine.current_page(), 0);
    }

    #[test]
    fn escape_exits_fullscreen_only_when_fullscreen() {
        let mut engine = engine(2);
        assert!(engine.handle_key(Key::Escape).is_none());
        engine.set_fullscreen(true);
        assert_eq!(
            engine.handle_key(Key::Escape),
            Some(EngineCommand::Fullscreen(FullscreenRequest::Exit))
        );
    }

    #[test]
    fn swipe_left_turns_forward() {
        let mut engine = engine(3);
        let pending = engine.handle_swipe(SwipeDirection::Left).unwrap();
        assert_eq!(pending.target, 1);
        engine.finish_flip();
        assert_eq!(engine.handle_swipe(SwipeDirection::Right).unwrap().target, 0);
    }

    #[test]
    fn disabled_swipe_navigation_ignores_gestures() {
        let mut engine = engine_with(
            3,
            ViewerSettings {
                enable_swipe_navigation: false,
                ..ViewerSettings::default()
            },
        );
        assert!(engine.handle_swipe(SwipeDirection::Left).is_none());
    }

    #[test]
    fn thumbnails_honor_the_settings_gate() {
        let mut engine = engine_with(
            3,
            ViewerSettings {
                show_thumbnails: false,
                ..ViewerSettings::default()
            },
        );
        engine.toggle_thumbnails();
        assert!(!engine.thumbnails_open());
    }

    #[test]
    fn fullscreen_request_mirrors_committed_state() {
        let mut engine = engine(2);
        assert_eq!(engine.fullscreen_request(), FullscreenRequest::Enter);
        engine.set_fullscreen(true);
        assert_eq!(engine.fullscreen_request(), FullscreenRequest::Exit);
        // A denied request never reports back, so the state stays put.
        assert!(engine.is_fullscreen());
    }

    #[test]
    fn resize_recomputes_dimensions_zoom_does_not() {
        let mut engine = engine(2);
        assert_eq!(engine.dimensions(), RenderDimensions::default());
        engine.resize(1000.0, 1000.0);
        let resized = engine.dimensions();
        assert_eq!(resized.width, 450);
        engine.zoom_in();
        assert_eq!(engine.dimensions(), resized);
    }

    proptest! {
        #[test]
        fn zoom_stays_clamped(steps in proptest::collection::vec(any::<bool>(), 0..64)) {
            let mut engine = engine(2);
            for zoom_in in steps {
                if zoom_in {
                    engine.zoom_in();
                } else {
                    engine.zoom_out();
                }
                prop_assert!(engine.zoom() >= PageFlipEngine::ZOOM_MIN);
                prop_assert!(engine.zoom() <= PageFlipEngine::ZOOM_MAX);
            }
        }
    }
}
