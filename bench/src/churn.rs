//! Seeded workload mixing subscribe, unsubscribe and publish.

use std::{cell::Cell, rc::Rc};

use event_aggregator::{EventAggregator, Handler};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::events::{Source, Tick};

/// A pool of handlers and a registry they are randomly attached to and detached from.
pub struct Churn {
    aggregator: EventAggregator<Source>,
    handlers: Vec<Handler<Source, Tick>>,
    delivered: Rc<Cell<u64>>,
    rng: ChaCha8Rng,
}

impl Churn {
    /// Creates a workload over `pool` handlers, none of them subscribed.
    ///
    /// # Panics
    ///
    /// Panics if `pool` is zero.
    pub fn new(pool: usize, seed: u64) -> Self {
        assert!(pool > 0, "Churn needs at least one handler");
        let delivered = Rc::new(Cell::new(0));
        let handlers = (0..pool)
            .map(|_| {
                let delivered = Rc::clone(&delivered);
                Handler::new(move |_: &Source, event: &Tick| {
                    delivered.set(delivered.get() + event.frame % 2 + 1);
                })
            })
            .collect();

        Self {
            aggregator: EventAggregator::new(),
            handlers,
            delivered,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Runs `steps` random operations. Roughly half of them are publishes.
    pub fn run(&mut self, steps: usize) {
        let source = Source { id: 1 };
        for frame in 0..steps as u64 {
            let handler = &self.handlers[self.rng.gen_range(0..self.handlers.len())];
            match self.rng.gen_range(0..4) {
                0 => {
                    self.aggregator.subscribe(handler);
                }
                1 => {
                    self.aggregator.unsubscribe(handler);
                }
                _ => self.aggregator.publish(&source, &Tick { frame }),
            }
        }
    }

    /// Total handler invocations weighted by frame parity, to keep the work observable.
    pub fn delivered(&self) -> u64 {
        self.delivered.get()
    }

    /// Number of currently subscribed handlers.
    pub fn subscribed(&self) -> usize {
        self.aggregator.subscriber_count::<Tick>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_is_deterministic() {
        let mut first = Churn::new(16, 7);
        let mut second = Churn::new(16, 7);

        first.run(1_000);
        second.run(1_000);

        assert_eq!(first.delivered(), second.delivered());
        assert_eq!(first.subscribed(), second.subscribed());
    }

    #[test]
    #[should_panic(expected = "Churn needs at least one handler")]
    fn empty_pool_panics() {
        Churn::new(0, 1);
    }

    #[test]
    fn subscriptions_never_exceed_pool() {
        let mut churn = Churn::new(8, 1);

        churn.run(10_000);

        assert!(churn.subscribed() <= 8);
    }
}
