use std::{cell::Cell, rc::Rc};

use event_aggregator::{AnyHandler, Event, EventAggregator, EventKey, Handler};

#[derive(Event, Debug)]
struct SampleEvent {
    message: String,
    time: i32,
}

#[derive(Event, Debug)]
struct Shutdown;

#[derive(Debug)]
struct Window {
    title: &'static str,
}

fn main() {
    let aggregator: Rc<EventAggregator<Window>> = Rc::new(EventAggregator::new());
    let received = Rc::new(Cell::new(0));

    let counter = Rc::clone(&received);
    let printer = Handler::new(move |sender: &Window, event: &SampleEvent| {
        counter.set(counter.get() + 1);
        println!("[{}] {} (t={})", sender.title, event.message, event.time);
    });

    // Subscribing twice keeps a single registration.
    aggregator.subscribe(&printer);
    aggregator.subscribe(&printer);

    // Key-based registration, resolved to the same map as the generic form.
    let registry = Rc::downgrade(&aggregator);
    let printer_handle = printer.clone();
    let shutdown = AnyHandler::new(move |sender: &Window, _: &Shutdown| {
        println!("[{}] shutting down, detaching printer", sender.title);
        if let Some(registry) = registry.upgrade() {
            registry.unsubscribe(&printer_handle);
        }
    });
    aggregator.subscribe_to(EventKey::of::<Shutdown>(), &shutdown);

    let window = Window { title: "main" };
    aggregator.publish(
        &window,
        &SampleEvent {
            message: "TestMessage".to_string(),
            time: 42,
        },
    );
    aggregator.publish(&window, &Shutdown);
    aggregator.publish(
        &window,
        &SampleEvent {
            message: "never printed".to_string(),
            time: 43,
        },
    );

    println!("printer invoked {} time(s)", received.get());
    println!("registry: {aggregator:?}");
}
