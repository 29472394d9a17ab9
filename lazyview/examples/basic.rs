// Example: minimal usage, one row populated per loop turn.
use std::rc::Rc;

use lazyview::{Item, LazyOptions, LazyView, ManualLoop};

struct Tile(&'static str);

impl Item for Tile {
    fn populate(&self) {
        println!("populate {}", self.0);
    }
}

fn main() {
    let lp = Rc::new(ManualLoop::new());
    let view = LazyView::new(lp.clone(), LazyOptions::new());
    let tiles = ["Abbey Road", "Blue", "Kind of Blue"].map(|name| Rc::new(Tile(name)));
    for tile in &tiles {
        view.append(tile.clone());
    }

    // The last tile is what the user looks at: populate it first.
    view.lazy_load_current(vec![tiles[2].clone()]);
    while lp.run_once() {
        println!("turn done, state={:?}", view.state());
    }
    println!("after idle: {} queued", view.queue_len());
    lp.run_to_completion();
    println!("done: {} queued, state={:?}", view.queue_len(), view.state());
}
