//! Global logging module for scangate
//!
//! Thread-safe, write-once global logging service with a small macro interface.
//! A thread-scoped service overrides the global one; with neither installed,
//! logging calls are dropped.

pub mod codes;
pub mod events;
pub mod macros;
pub mod service;

use crate::config::runtime::LoggingPreferences;
use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

// Re-export main types
pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

#[cfg(feature = "logging")]
pub use service::FacadeLogger;

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

thread_local! {
    static SCOPED_LOGGER: RefCell<Option<Arc<LoggingService>>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging from runtime preferences
pub fn init_global_logging(preferences: &LoggingPreferences) -> Result<(), String> {
    let logging_service = Arc::new(LoggingService::with_preferences(preferences));

    GLOBAL_LOGGER
        .set(logging_service.clone())
        .map_err(|_| "Global logger already initialized")?;

    logging_service.log_event(
        LogEvent::success(
            codes::success::SYSTEM_INITIALIZATION_COMPLETED,
            "Global logging system initialized",
        )
        .with_context("min_level", preferences.min_log_level.as_str()),
    );

    Ok(())
}

/// Initialize with custom service (primarily for testing)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

/// Check if global logging is initialized
pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

// ============================================================================
// THREAD SCOPE
// ============================================================================

/// Route this thread's events to `service` while `f` runs
///
/// The scoped service takes precedence over the global one; the previous
/// scope is restored on return or unwind.
pub fn with_scoped_logger<R>(service: Arc<LoggingService>, f: impl FnOnce() -> R) -> R {
    struct Restore(Option<Arc<LoggingService>>);

    impl Drop for Restore {
        fn drop(&mut self) {
            let previous = self.0.take();
            SCOPED_LOGGER.with(|slot| *slot.borrow_mut() = previous);
        }
    }

    let _restore = Restore(SCOPED_LOGGER.with(|slot| slot.replace(Some(service))));
    f()
}

/// Hand `event` to the scoped service, else the global one; dropped when neither exists
fn dispatch(event: LogEvent) -> bool {
    if let Some(scoped) = SCOPED_LOGGER.with(|slot| slot.borrow().clone()) {
        scoped.log_event(event);
        return true;
    }

    match try_get_global_logger() {
        Some(logger) => {
            logger.log_event(event);
            true
        }
        None => false,
    }
}

// ============================================================================
// MACRO SUPPORT
// ============================================================================

/// Attach context pairs and dispatch the event (used by the macros)
pub fn log_with_context(event: LogEvent, context: Vec<(&str, String)>) {
    let event = context
        .into_iter()
        .fold(event, |event, (key, value)| event.with_context(key, &value));

    dispatch(event);
}

/// Error logging that falls back to stderr when no service is installed
pub fn safe_log_error(code: Code, message: &str) {
    if !dispatch(LogEvent::error(code, message)) {
        eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_service() -> (Arc<MemoryLogger>, Arc<LoggingService>) {
        let memory = Arc::new(MemoryLogger::new());
        let service = Arc::new(LoggingService::new(memory.clone(), LogLevel::Debug));
        (memory, service)
    }

    #[test]
    fn test_scoped_logger_receives_macro_events() {
        let (memory, service) = memory_service();

        with_scoped_logger(service, || {
            crate::log_info!("inside scope", "answer" => 42);
        });
        crate::log_info!("outside scope");

        let events = memory.get_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "inside scope");
        assert_eq!(events[0].context.get("answer"), Some(&"42".to_string()));
    }

    #[test]
    fn test_nested_scopes_restore_previous() {
        let (outer_memory, outer) = memory_service();
        let (inner_memory, inner) = memory_service();

        with_scoped_logger(outer, || {
            with_scoped_logger(inner, || crate::log_info!("inner"));
            crate::log_info!("outer");
        });

        assert_eq!(inner_memory.event_count(), 1);
        assert_eq!(outer_memory.event_count(), 1);
        assert_eq!(outer_memory.get_events()[0].message, "outer");
    }

    #[test]
    fn test_safe_log_error_uses_scoped_service() {
        let (memory, service) = memory_service();

        with_scoped_logger(service, || {
            safe_log_error(codes::system::INITIALIZATION_FAILURE, "init failed");
        });

        assert!(memory.has_event_with_code(codes::system::INITIALIZATION_FAILURE));
        assert_eq!(memory.get_errors().len(), 1);
    }

    #[test]
    fn test_global_initialization_is_write_once() {
        let (_, service) = memory_service();
        // Either this call or another test's installs the global service
        let _ = init_global_logging_with_service(service);

        assert!(is_initialized());
        assert!(init_global_logging(&LoggingPreferences::from_lookup(|_| None)).is_err());
    }

    #[test]
    fn test_safe_logging_without_scope() {
        safe_log_error(codes::system::INTERNAL_ERROR, "Test error");
    }
}
