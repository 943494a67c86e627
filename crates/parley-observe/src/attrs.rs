//! Span names and log level defaults shared across the gateway.

/// Name of the span wrapping one client connection.
pub const CONNECTION_SPAN: &str = "connection";

/// Service name reported to OpenTelemetry.
pub const SERVICE_NAME: &str = "parley";

/// Verbosity-to-filter mapping used by the CLI.
///
/// `RUST_LOG` takes precedence when set.
pub fn filter_for(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "warn,parley=info",
        1 => "info,parley=debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_for_verbosity() {
        assert_eq!(filter_for(0, true), "error");
        assert_eq!(filter_for(0, false), "warn,parley=info");
        assert_eq!(filter_for(1, false), "info,parley=debug");
        assert_eq!(filter_for(2, true), "trace");
    }
}
