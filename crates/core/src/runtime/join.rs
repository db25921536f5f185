use std::mem;
use std::sync::{Arc, Mutex};

/// Counting fan-in barrier.
///
/// Initialized with the number of expected contributions, it accumulates
/// results and fires its callback exactly once, from whichever thread
/// records the final contribution. Decrement-and-check happens under a
/// single lock, so two tasks finishing simultaneously cannot both observe
/// zero, and the callback is taken out of an `Option` so a second firing is
/// impossible by construction.
pub struct CompletionGroup<T> {
    state: Mutex<State<T>>,
}

struct State<T> {
    remaining: usize,
    results: Vec<T>,
    on_done: Option<Box<dyn FnOnce(Vec<T>) + Send>>,
}

impl<T: Send + 'static> CompletionGroup<T> {
    /// A group expecting `count` contributions. With `count == 0` the
    /// callback fires immediately on the calling thread with an empty
    /// result set.
    pub fn new(count: usize, on_done: impl FnOnce(Vec<T>) + Send + 'static) -> Arc<Self> {
        if count == 0 {
            on_done(Vec::new());
            return Arc::new(Self {
                state: Mutex::new(State {
                    remaining: 0,
                    results: Vec::new(),
                    on_done: None,
                }),
            });
        }
        Arc::new(Self {
            state: Mutex::new(State {
                remaining: count,
                results: Vec::new(),
                on_done: Some(Box::new(on_done)),
            }),
        })
    }

    /// Record one finished task, optionally contributing a result.
    pub fn complete(&self, result: Option<T>) {
        let fire = {
            let mut state = self.state.lock().unwrap();
            if state.remaining == 0 {
                return;
            }
            if let Some(r) = result {
                state.results.push(r);
            }
            state.remaining -= 1;
            if state.remaining == 0 {
                let results = mem::take(&mut state.results);
                state.on_done.take().map(|cb| (cb, results))
            } else {
                None
            }
        };
        if let Some((cb, results)) = fire {
            cb(results);
        }
    }
}
