use bevy::log::BoxedLayer;
use bevy::log::tracing::field::{Field, Visit};
use bevy::log::tracing::{Event, Level, Subscriber};
use bevy::log::tracing_subscriber::layer::{Context, Layer};
use bevy::prelude::*;
use constants::layout::AUDIT_CONSOLE_CAPACITY;
use layout_guard::{ConsoleEntry, ConsoleLevel};
use std::sync::{Arc, Mutex};

/// Warnings, errors and panics seen since startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapturedLog {
    pub console: Vec<ConsoleEntry>,
    pub page_errors: Vec<String>,
}

/// Shared with the tracing layer and the panic hook, read by the layout audit
/// when it captures a snapshot.
#[derive(Resource, Clone, Default)]
pub struct AuditConsoleLog(Arc<Mutex<CapturedLog>>);

impl AuditConsoleLog {
    pub fn layer(&self) -> ConsoleCaptureLayer {
        ConsoleCaptureLayer(self.clone())
    }

    pub fn push_console(&self, level: ConsoleLevel, message: String) {
        if let Ok(mut log) = self.0.lock() {
            if log.console.len() < AUDIT_CONSOLE_CAPACITY {
                log.console.push(ConsoleEntry { level, message });
            }
        }
    }

    pub fn push_page_error(&self, message: String) {
        if let Ok(mut log) = self.0.lock() {
            if log.page_errors.len() < AUDIT_CONSOLE_CAPACITY {
                log.page_errors.push(message);
            }
        }
    }

    pub fn captured(&self) -> CapturedLog {
        self.0.lock().map(|log| log.clone()).unwrap_or_default()
    }
}

/// Tracing layer that copies `warn!` and `error!` events into the audit log.
pub struct ConsoleCaptureLayer(AuditConsoleLog);

impl<S: Subscriber> Layer<S> for ConsoleCaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = match *event.metadata().level() {
            Level::ERROR => ConsoleLevel::Error,
            Level::WARN => ConsoleLevel::Warning,
            _ => return,
        };
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.0.push_console(level, visitor.message);
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else if self.message.is_empty() {
            self.message = format!("{} = {value:?}", field.name());
        }
    }
}

/// Chain a panic hook that records the panic as an uncaught page error.
pub fn capture_panics(log: AuditConsoleLog) {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        log.push_page_error(info.to_string());
        previous(info);
    }));
}

/// `LogPlugin::custom_layer` hook: starts capturing before any plugin logs.
pub fn console_capture_layer(app: &mut App) -> Option<BoxedLayer> {
    let log = AuditConsoleLog::default();
    capture_panics(log.clone());
    app.insert_resource(log.clone());
    Some(Box::new(log.layer()))
}
