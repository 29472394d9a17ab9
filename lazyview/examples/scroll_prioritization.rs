// Example: a long list populated lazily, with a scroll that pulls visible rows forward.
use std::cell::Cell;
use std::rc::Rc;

use lazyview::{Item, ItemBounds, LazyOptions, LazyView, ManualLoop};

struct Row {
    index: usize,
    // Offset of the row's top edge relative to the scroll container.
    y: Cell<f64>,
}

const ROW_HEIGHT: f64 = 40.0;

impl Item for Row {
    fn populate(&self) {
        println!("populate row {}", self.index);
    }

    fn bounds(&self) -> Option<ItemBounds> {
        Some(ItemBounds::new(self.y.get(), ROW_HEIGHT))
    }
}

fn main() {
    let lp = Rc::new(ManualLoop::new());
    let view = LazyView::new(lp.clone(), LazyOptions::new());
    view.set_viewport_height(120.0);

    let rows: Vec<Rc<Row>> = (0..50)
        .map(|index| {
            Rc::new(Row {
                index,
                y: Cell::new(index as f64 * ROW_HEIGHT),
            })
        })
        .collect();
    for row in &rows {
        view.append(row.clone());
    }

    // Start draining the backlog, but only let three turns run.
    view.lazy_load_current(Vec::new());
    for _ in 0..3 {
        lp.run_once();
    }

    // The user jumps to row 40: shift every row up and report the new position.
    let scroll = 40.0 * ROW_HEIGHT;
    for row in &rows {
        row.y.set(row.index as f64 * ROW_HEIGHT - scroll);
    }
    view.on_scroll_changed(scroll);

    let ran = lp.run_to_completion();
    println!("ran {ran} tasks, {} rows left, state={:?}", view.queue_len(), view.state());
}
