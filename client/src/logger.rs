use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::JsValue;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&message),
            Level::Warn => web_sys::console::warn_1(&message),
            Level::Info => web_sys::console::info_1(&message),
            Level::Debug | Level::Trace => web_sys::console::log_1(&message),
        }
    }

    fn flush(&self) {}
}

pub fn debug_enabled(search: &str) -> bool {
    search
        .trim_start_matches('?')
        .split('&')
        .any(|pair| matches!(pair, "debug=1" | "debug=true" | "log=1" | "log=true"))
}

/// Routes `log` records to the browser console. Warnings always show;
/// debug output needs `?debug=1`.
pub fn init(debug: bool) {
    if log::set_logger(&LOGGER).is_err() {
        return;
    }
    log::set_max_level(if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_from_query_string() {
        assert!(debug_enabled("?debug=1"));
        assert!(debug_enabled("?foo=bar&log=true"));
        assert!(!debug_enabled(""));
        assert!(!debug_enabled("?debug=0"));
        assert!(!debug_enabled("?nodebug=1"));
    }
}
