//! Example of bridging an external push-based source into an event.
//!
//! The source here is a simple observable temperature sensor that pushes readings to whoever is
//! attached to it. The event attaches on creation and detaches when disposed.

use std::cell::RefCell;
use std::rc::Rc;

use fanout::{Emitter, Event, from_source, send};

#[derive(Default)]
struct Sensor {
    sinks: RefCell<Vec<Emitter<f64>>>,
}

impl Sensor {
    fn attach(&self, sink: Emitter<f64>) {
        self.sinks.borrow_mut().push(sink);
    }

    fn detach_all(&self) {
        self.sinks.borrow_mut().clear();
    }

    fn attached(&self) -> usize {
        self.sinks.borrow().len()
    }

    fn publish(&self, reading: f64) {
        for sink in self.sinks.borrow().iter() {
            send(sink, reading);
        }
    }
}

fn main() {
    println!("=== Fanout Source Example ===");

    let sensor = Rc::new(Sensor::default());

    let on_reading: Event<f64> = from_source({
        let sensor = Rc::clone(&sensor);
        move |notify| {
            sensor.attach(notify);
            Some(move || sensor.detach_all())
        }
    });

    on_reading.on(|celsius: &f64| println!("Temperature: {celsius:.1} C"));
    on_reading.on(|celsius: &f64| {
        if *celsius > 30.0 {
            println!("It is getting hot!");
        }
    });

    println!("Sensor has {} attached sink(s)", sensor.attached());

    sensor.publish(21.5);
    sensor.publish(31.0);

    println!("Disposing the event...");
    on_reading.dispose();

    println!("Sensor has {} attached sink(s)", sensor.attached());

    // Nobody is listening anymore.
    sensor.publish(40.0);

    println!("Example completed successfully!");
}
