use tracing::{Event, Subscriber};
use tracing_subscriber::{
    fmt::{
        format::{FormatEvent, FormatFields, Writer},
        FmtContext,
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

const DEFAULT_LEVEL: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Installs the process-wide JSON subscriber for the function. Called once at cold start;
/// later calls are ignored.
pub fn init_lambda_logging() {
    let result = tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_current_span(false)
        .try_init();

    if result.is_err() {
        tracing::debug!("Global subscriber already installed");
    }
}

/// Installs the human-readable subscriber for the packaging CLI.
pub fn init_cli_logging() {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(SpanPathFormat)
        .with_writer(std::io::stderr);

    let result = Registry::default()
        .with(env_filter())
        .with(stderr_layer)
        .try_init();

    if result.is_err() {
        tracing::debug!("Global subscriber already installed");
    }
}

/// One line per event: the level, the names of the enclosing spans from the root down, then
/// the event fields. `INFO create_layer_zip: Created layer zip` reads well next to the
/// per-archive spans of the packager.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanPathFormat;

impl<S, N> FormatEvent<S, N> for SpanPathFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'writer> FormatFields<'writer> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        write!(writer, "{} ", event.metadata().level())?;

        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                write!(writer, "{}: ", span.name())?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn capture<F: FnOnce()>(f: F) -> String {
        let buffer = Arc::new(Mutex::new(Vec::<u8>::new()));
        let sink = buffer.clone();
        let layer = tracing_subscriber::fmt::layer()
            .event_format(SpanPathFormat)
            .with_writer(move || SinkWriter(sink.clone()));
        let subscriber = Registry::default().with(layer);

        tracing::subscriber::with_default(subscriber, f);

        let bytes = buffer.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    struct SinkWriter(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for SinkWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_event_outside_spans() {
        let output = capture(|| tracing::info!("Packaging started"));
        assert_eq!(output, "INFO Packaging started\n");
    }

    #[test]
    fn test_event_lists_spans_from_root() {
        let output = capture(|| {
            let run = tracing::info_span!("run");
            let _run = run.enter();
            let layer = tracing::info_span!("create_layer_zip");
            let _layer = layer.enter();
            tracing::warn!("Created layer zip");
        });
        assert_eq!(output, "WARN run: create_layer_zip: Created layer zip\n");
    }
}
