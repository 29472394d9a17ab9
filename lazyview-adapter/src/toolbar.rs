use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use lazyview::{AlbumId, ArtSignals, Executor, PlayerSignals, Subscription, TrackId};

use crate::{
    ArtCache, LongPress, PlayerState, ToolbarOptions, Track, TrackKind, now_playing_tooltip,
};

/// Mouse button that opens the info/tunein popover; any other button opens the track menu.
pub const PRIMARY_BUTTON: u32 = 1;

/// What the toolbar shows.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize` when the artwork
/// type does.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ToolbarModel<Art> {
    pub infobox_visible: bool,
    pub spinner_active: bool,
    pub labels_visible: bool,
    pub title: String,
    pub artist: String,
    pub cover_visible: bool,
    pub cover: Option<Art>,
    pub art_size: u32,
    /// Forced preferred width, 0 when unset.
    pub width: u32,
}

impl<Art> ToolbarModel<Art> {
    fn new(art_size: u32) -> Self {
        Self {
            infobox_visible: false,
            spinner_active: false,
            labels_visible: false,
            title: String::new(),
            artist: String::new(),
            cover_visible: false,
            cover: None,
            art_size,
            width: 0,
        }
    }
}

/// A request for the host to open a popover or menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ToolbarAction {
    /// Popover listing externally opened files, anchored at the title.
    ShowExternals,
    /// Track information popover, anchored at the title. `create` is set the first time; the
    /// host reuses the popover afterwards.
    ShowInfo { create: bool },
    /// Radio station browser, anchored at the title. `create` is set the first time, when the
    /// host must also populate it.
    ShowTunein { create: bool },
    /// Context menu of the current track, anchored at the info box.
    ShowTrackMenu(TrackId),
}

type ActionCallback = Rc<dyn Fn(&ToolbarAction)>;

struct Inner<P, A: ArtCache> {
    player: Rc<P>,
    art: Rc<A>,
    executor: Rc<dyn Executor>,
    options: ToolbarOptions,
    model: RefCell<ToolbarModel<A::Artwork>>,
    scale: Cell<u32>,
    press: LongPress,
    info_created: Cell<bool>,
    tunein_created: Cell<bool>,
    on_action: RefCell<Option<ActionCallback>>,
    subscriptions: RefCell<Vec<Subscription>>,
}

impl<P: PlayerState, A: ArtCache> Inner<P, A> {
    fn emit(&self, action: ToolbarAction) {
        ldebug!(?action, "ToolbarPresenter: action");
        let cb = self.on_action.borrow().clone();
        if let Some(cb) = cb {
            cb(&action);
        }
    }

    fn show_track_menu(&self) {
        if let TrackKind::Local(id) = self.player.current_track().kind {
            self.emit(ToolbarAction::ShowTrackMenu(id));
        }
    }

    fn load_cover(&self, track: &Track, size: u32) -> Option<A::Artwork> {
        match track.kind {
            TrackKind::Radio => self.art.radio_artwork(&track.album_artist, size),
            _ => {
                let album_id = track.album_id?;
                self.art.album_artwork(album_id, size, self.scale.get())
            }
        }
    }

    fn set_cover(&self, cover: Option<A::Artwork>) {
        let mut m = self.model.borrow_mut();
        // The spinner owns the info box while a track is loading.
        if !m.spinner_active {
            m.cover_visible = cover.is_some();
        }
        m.cover = cover;
    }
}

/// Headless presenter for the now-playing toolbar: cover, title and artist, a loading spinner,
/// and the popovers opened from the title.
///
/// The player and the artwork cache are injected; the host renders [`ToolbarModel`] and opens
/// whatever [`ToolbarAction`] asks for. Clones share the same presenter.
pub struct ToolbarPresenter<P, A: ArtCache> {
    inner: Rc<Inner<P, A>>,
}

impl<P, A: ArtCache> Clone for ToolbarPresenter<P, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<P, A> ToolbarPresenter<P, A>
where
    P: PlayerState + 'static,
    A: ArtCache + 'static,
{
    pub fn new(
        player: Rc<P>,
        art: Rc<A>,
        executor: Rc<dyn Executor>,
        options: ToolbarOptions,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                player,
                art,
                executor,
                options,
                model: RefCell::new(ToolbarModel::new(options.art_size)),
                scale: Cell::new(1),
                press: LongPress::new(),
                info_created: Cell::new(false),
                tunein_created: Cell::new(false),
                on_action: RefCell::new(None),
                subscriptions: RefCell::new(Vec::new()),
            }),
        }
    }

    fn from_inner(inner: Rc<Inner<P, A>>) -> Self {
        Self { inner }
    }

    pub fn options(&self) -> &ToolbarOptions {
        &self.inner.options
    }

    pub fn model(&self) -> ToolbarModel<A::Artwork> {
        self.inner.model.borrow().clone()
    }

    pub fn set_on_action(&self, on_action: Option<impl Fn(&ToolbarAction) + 'static>) {
        *self.inner.on_action.borrow_mut() = on_action.map(|f| Rc::new(f) as ActionCallback);
    }

    /// Drops the action callback; later actions are discarded.
    pub fn clear_on_action(&self) {
        self.inner.on_action.borrow_mut().take();
    }

    pub fn set_scale_factor(&self, scale: u32) {
        self.inner.scale.set(scale.max(1));
    }

    /// Forces the preferred width.
    pub fn set_width(&self, width: u32) {
        self.inner.model.borrow_mut().width = width;
    }

    /// `(minimum, natural)` width, both equal to the forced width.
    pub fn preferred_width(&self) -> (u32, u32) {
        let width = self.inner.model.borrow().width;
        (width, width)
    }

    pub fn art_size(&self) -> u32 {
        self.inner.model.borrow().art_size
    }

    /// The toolbar got its allocation: the cover fills the height inside the padding.
    pub fn on_realize(&self, allocated_height: u32, padding_top: u32, padding_bottom: u32) {
        let art_size = allocated_height
            .saturating_sub(padding_top)
            .saturating_sub(padding_bottom);
        ltrace!(art_size, "ToolbarPresenter::on_realize");
        self.inner.model.borrow_mut().art_size = art_size;
    }

    /// The player started loading: swap labels and cover for a running spinner.
    pub fn on_loading_changed(&self) {
        let mut m = self.inner.model.borrow_mut();
        m.labels_visible = false;
        m.cover_visible = false;
        m.spinner_active = true;
        m.infobox_visible = true;
    }

    /// The current track changed: show its labels and cover, stop the spinner.
    pub fn on_current_changed(&self) {
        let track = self.inner.player.current_track();
        let size = self.art_size();
        let cover = match track.kind {
            TrackKind::None => None,
            _ => self.inner.load_cover(&track, size),
        };

        let mut m = self.inner.model.borrow_mut();
        m.spinner_active = false;
        if track.kind == TrackKind::None {
            m.infobox_visible = false;
            m.labels_visible = false;
            m.cover_visible = false;
            m.title.clear();
            m.artist.clear();
            m.cover = None;
            return;
        }
        m.infobox_visible = true;
        m.labels_visible = true;
        m.title = track.title;
        m.artist = track.artist;
        m.cover_visible = cover.is_some();
        m.cover = cover;
    }

    /// Reloads the cover when `album_id` is the current track's album.
    pub fn on_album_artwork_changed(&self, album_id: AlbumId) {
        let track = self.inner.player.current_track();
        if track.album_id != Some(album_id) {
            return;
        }
        let size = self.art_size();
        let cover = self
            .inner
            .art
            .album_artwork(album_id, size, self.inner.scale.get());
        self.inner.set_cover(cover);
    }

    /// Reloads the logo when `name` is the current radio.
    pub fn on_radio_artwork_changed(&self, name: &str) {
        let track = self.inner.player.current_track();
        if track.album_artist != name {
            return;
        }
        let size = self.art_size();
        let cover = self.inner.art.radio_artwork(name, size);
        self.inner.set_cover(cover);
    }

    /// Tooltip markup for the labels, only when one of them is ellipsized.
    pub fn query_tooltip(&self, title_ellipsized: bool, artist_ellipsized: bool) -> Option<String> {
        let m = self.inner.model.borrow();
        now_playing_tooltip(&m.title, &m.artist, title_ellipsized, artist_ellipsized)
    }

    /// The title was pressed. Holding it for [`ToolbarOptions::long_press_ms`] opens the track
    /// menu.
    pub fn on_title_press(&self) {
        let ticket = self.inner.press.press();
        let weak: Weak<Inner<P, A>> = Rc::downgrade(&self.inner);
        self.inner.executor.run_after_delay(
            self.inner.options.long_press_ms,
            Box::new(move || {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                if inner.press.fire(ticket) {
                    ltrace!(ticket, "ToolbarPresenter: long press");
                    inner.show_track_menu();
                }
            }),
        );
    }

    /// The title was released. Before the long press fired this is a click:
    /// - externals: externals popover
    /// - primary button: tunein popover for radios, info popover otherwise
    /// - other buttons: track menu
    pub fn on_title_release(&self, button: u32) {
        if !self.inner.press.release() {
            return;
        }
        let track = self.inner.player.current_track();
        match track.kind {
            TrackKind::None => {}
            TrackKind::Externals => self.inner.emit(ToolbarAction::ShowExternals),
            _ if button != PRIMARY_BUTTON => self.inner.show_track_menu(),
            TrackKind::Radio => {
                let create = !self.inner.tunein_created.replace(true);
                self.inner.emit(ToolbarAction::ShowTunein { create });
            }
            TrackKind::Local(_) => {
                let create = !self.inner.info_created.replace(true);
                self.inner.emit(ToolbarAction::ShowInfo { create });
            }
        }
    }

    /// Connects the presenter to the player and artwork notifications until
    /// [`ToolbarPresenter::detach`] or until the presenter is dropped.
    pub fn subscribe(&self, player: &PlayerSignals, art: &ArtSignals) {
        let loading = {
            let weak = Rc::downgrade(&self.inner);
            player.loading_changed.connect(move |_| {
                if let Some(inner) = weak.upgrade() {
                    ToolbarPresenter::from_inner(inner).on_loading_changed();
                }
            })
        };
        let current = {
            let weak = Rc::downgrade(&self.inner);
            player.current_changed.connect(move |_| {
                if let Some(inner) = weak.upgrade() {
                    ToolbarPresenter::from_inner(inner).on_current_changed();
                }
            })
        };
        let album = {
            let weak = Rc::downgrade(&self.inner);
            art.album_artwork_changed.connect(move |album_id| {
                if let Some(inner) = weak.upgrade() {
                    ToolbarPresenter::from_inner(inner).on_album_artwork_changed(*album_id);
                }
            })
        };
        let radio = {
            let weak = Rc::downgrade(&self.inner);
            art.radio_artwork_changed.connect(move |name| {
                if let Some(inner) = weak.upgrade() {
                    ToolbarPresenter::from_inner(inner).on_radio_artwork_changed(name);
                }
            })
        };
        self.inner
            .subscriptions
            .borrow_mut()
            .extend([loading, current, album, radio]);
    }

    pub fn detach(&self) {
        let subscriptions = core::mem::take(&mut *self.inner.subscriptions.borrow_mut());
        drop(subscriptions);
    }
}
