//! Logging macros over [`SerialLogger::write`](crate::SerialLogger::write).
//!
//! Each expands to a single `write` call with `format_args!`, so arguments
//! are only formatted once the line has passed both level checks.

/// Log at an explicit level: `log_at!(logger, Level::Warn, "net", "x = {}", x)`.
#[macro_export]
macro_rules! log_at {
    ($logger:expr, $level:expr, $tag:expr, $($arg:tt)+) => {
        $logger.write($level, $tag, ::core::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $tag:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Level::Error, $tag, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $tag:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Level::Warn, $tag, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $tag:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Level::Info, $tag, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $tag:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Level::Debug, $tag, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_verbose {
    ($logger:expr, $tag:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Level::Verbose, $tag, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Level, SerialLogger, SharedTagLevels, WriteOutcome};

    #[test]
    fn macros_route_through_the_filter() {
        let levels = SharedTagLevels::new();
        levels.set_level("net", Level::Info);
        let mut logger = SerialLogger::new(&levels, Vec::new(), || 7).with_color(false);

        assert!(log_error!(logger, "net", "e{}", 1).is_emitted());
        assert!(log_info!(logger, "net", "i").is_emitted());
        assert_eq!(log_debug!(logger, "net", "d"), WriteOutcome::Suppressed);
        assert_eq!(log_verbose!(logger, "net", "v"), WriteOutcome::Suppressed);
        assert!(log_warn!(logger, "other", "w").is_emitted());
        assert!(log_at!(logger, Level::Verbose, "other", "v").is_emitted());

        let text = String::from_utf8(logger.into_transport()).unwrap();
        assert_eq!(
            text,
            "E (7) net: e1\r\nI (7) net: i\r\nW (7) other: w\r\nV (7) other: v\r\n"
        );
    }
}
