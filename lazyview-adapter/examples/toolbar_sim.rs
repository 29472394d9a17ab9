// Example: a host wiring the toolbar presenter to player/art notifications.
use std::cell::RefCell;
use std::rc::Rc;

use lazyview::{AlbumId, ArtSignals, ManualLoop, PlayerSignals, TrackId};
use lazyview_adapter::{
    ArtCache, PRIMARY_BUTTON, PlayerState, ToolbarAction, ToolbarOptions, ToolbarPresenter, Track,
};

struct Player {
    current: RefCell<Track>,
}

impl PlayerState for Player {
    fn current_track(&self) -> Track {
        self.current.borrow().clone()
    }
}

struct Covers;

impl ArtCache for Covers {
    type Artwork = String;

    fn album_artwork(&self, album_id: AlbumId, size: u32, scale: u32) -> Option<String> {
        Some(format!("covers/{}_{}.jpg", album_id.0, size * scale))
    }

    fn radio_artwork(&self, name: &str, size: u32) -> Option<String> {
        Some(format!("radios/{name}_{size}.png"))
    }
}

fn main() {
    let lp = Rc::new(ManualLoop::new());
    let player = Rc::new(Player {
        current: RefCell::new(Track::none()),
    });
    let player_signals = PlayerSignals::new();
    let art_signals = ArtSignals::new();

    let toolbar = ToolbarPresenter::new(
        player.clone(),
        Rc::new(Covers),
        lp.clone(),
        ToolbarOptions::new(),
    );
    toolbar.set_on_action(Some(|action: &ToolbarAction| {
        println!("host opens {action:?}");
    }));
    toolbar.subscribe(&player_signals, &art_signals);
    toolbar.on_realize(48, 4, 4);

    player_signals.loading_changed.emit(&());
    println!("loading: {:?}", toolbar.model());

    *player.current.borrow_mut() =
        Track::local(TrackId(7), "Blue in Green", "Miles Davis", AlbumId(2));
    player_signals.current_changed.emit(&());
    println!("playing: {:?}", toolbar.model());

    // A click...
    toolbar.on_title_press();
    toolbar.on_title_release(PRIMARY_BUTTON);
    // ...and a long press.
    toolbar.on_title_press();
    lp.run_to_completion();
    toolbar.on_title_release(PRIMARY_BUTTON);

    println!("tooltip: {:?}", toolbar.query_tooltip(true, false));
}
