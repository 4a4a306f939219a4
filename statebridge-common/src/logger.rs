use statebridge_error::{BridgeError, BridgeResult};
use statebridge_models::settings::Log;
use std::sync::{Arc, Mutex};
use tracing::{subscriber::set_global_default, Level};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    filter::DynFilterFn, fmt, layer::SubscriberExt, Layer, Registry,
};

/// Tracing bootstrap: console output plus an optional daily-rolling log file,
/// both filtered by a runtime-adjustable level.
pub struct Logger {
    level: Arc<Mutex<Level>>,
    _file_guard: Option<WorkerGuard>,
}

impl Logger {
    pub fn new(level: Option<Level>) -> Self {
        Logger {
            level: Arc::new(Mutex::new(level.unwrap_or(Level::INFO))),
            _file_guard: None,
        }
    }

    /// Build a logger from settings; an unrecognized level falls back to INFO.
    pub fn from_settings(settings: &Log) -> Self {
        let level = settings.level.parse::<Level>().ok();
        Self::new(level)
    }

    #[inline]
    pub fn set_level(&self, new_level: Level) {
        let mut level = self.level.lock().unwrap();
        *level = new_level;
    }

    #[inline]
    pub fn get_level(&self) -> Level {
        *self.level.lock().unwrap()
    }

    /// Install this logger as the global tracing subscriber.
    ///
    /// With `file_dir` set, a non-blocking daily-rolling appender is added
    /// next to the console layer; its worker guard lives as long as `self`.
    pub fn initialize(&mut self, file_dir: Option<&str>) -> BridgeResult<()> {
        let console_filter = {
            let level = Arc::clone(&self.level);
            DynFilterFn::new(move |metadata, _| metadata.level() <= &*level.lock().unwrap())
        };
        let console_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_filter(console_filter);

        let file_filter = {
            let level = Arc::clone(&self.level);
            DynFilterFn::new(move |metadata, _| metadata.level() <= &*level.lock().unwrap())
        };
        let file_layer = file_dir.map(|dir| {
            let file_appender = rolling::daily(dir, "statebridge.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            self._file_guard = Some(guard);
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(file_filter)
        });

        let subscriber = Registry::default().with(console_layer).with(file_layer);
        set_global_default(subscriber).map_err(|_| BridgeError::from("Failed to set logger"))?;
        Ok(())
    }
}
