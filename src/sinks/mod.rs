//! Result sinks
//!
//! A [`LogSink`] observes test execution events and renders them to some
//! destination. [`CompositeLogger`] is itself a sink that forwards every
//! event to its members, so a run always has exactly one observer no
//! matter how many outputs are active.

mod console;
mod factory;
mod file;
mod xml;

pub use console::ConsoleSink;
pub use factory::{build_sinks, SinkSettings};
pub use file::FileSink;
pub use xml::{XmlSink, XmlTarget};

use crate::models::{RunSummary, TestComponent, TestResult};

/// Observer of test execution events
///
/// Rendering failures are logged by the sink and never interrupt a run.
pub trait LogSink {
    /// A component is about to run
    fn on_start(&mut self, component: &TestComponent);

    /// A component finished
    fn on_result(&mut self, component: &TestComponent, result: &TestResult);

    /// All components finished
    fn on_finish(&mut self, summary: &RunSummary);

    /// Short description for diagnostics
    fn describe(&self) -> String;
}

/// Fan-out sink forwarding to members in registration order
#[derive(Default)]
pub struct CompositeLogger {
    sinks: Vec<Box<dyn LogSink>>,
}

impl CompositeLogger {
    pub fn new(sinks: Vec<Box<dyn LogSink>>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: Box<dyn LogSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl LogSink for CompositeLogger {
    fn on_start(&mut self, component: &TestComponent) {
        for sink in &mut self.sinks {
            sink.on_start(component);
        }
    }

    fn on_result(&mut self, component: &TestComponent, result: &TestResult) {
        for sink in &mut self.sinks {
            sink.on_result(component, result);
        }
    }

    fn on_finish(&mut self, summary: &RunSummary) {
        for sink in &mut self.sinks {
            sink.on_finish(summary);
        }
    }

    fn describe(&self) -> String {
        let members: Vec<String> = self.sinks.iter().map(|s| s.describe()).collect();
        format!("composite[{}]", members.join(", "))
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::LogSink;
    use crate::models::{RunSummary, TestComponent, TestResult};

    /// Sink that records events into a shared log
    pub struct RecordingSink {
        pub label: &'static str,
        pub events: Rc<RefCell<Vec<String>>>,
    }

    impl RecordingSink {
        pub fn new(label: &'static str, events: Rc<RefCell<Vec<String>>>) -> Self {
            Self { label, events }
        }
    }

    impl LogSink for RecordingSink {
        fn on_start(&mut self, component: &TestComponent) {
            self.events
                .borrow_mut()
                .push(format!("{}:start:{}", self.label, component.name));
        }

        fn on_result(&mut self, component: &TestComponent, result: &TestResult) {
            self.events
                .borrow_mut()
                .push(format!("{}:result:{}:{}", self.label, component.name, result.status));
        }

        fn on_finish(&mut self, summary: &RunSummary) {
            self.events
                .borrow_mut()
                .push(format!("{}:finish:{}", self.label, summary.counts.total));
        }

        fn describe(&self) -> String {
            self.label.to_string()
        }
    }
}
