//! Record emission: render once, then hand the text to every bound appender

use super::{
    appender::SharedAppender,
    config::LoggerConfig,
    error::{LoggerError, Result},
    metrics::LoggerMetrics,
    record::Record,
};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Render `record` with `config` and write it to the config's appenders
///
/// The level check has already passed by the time this runs. A render failure
/// (an unknown token under the fail policy, or a failing resolver) is returned
/// with the raw record content; appender failures are reported on stderr and
/// counted, never returned.
pub(crate) fn emit(config: &LoggerConfig, metrics: &LoggerMetrics, record: Record) -> Result<()> {
    let record = config.stamp(record);

    let rendered = match config.render(&record) {
        Ok(rendered) => rendered,
        Err(e) => {
            metrics.record_render_failure();
            return Err(LoggerError::render_failed(
                record.level(),
                record.scope_path("."),
                record.message(),
                e,
            ));
        }
    };

    if rendered.unresolved > 0 {
        metrics.record_unresolved_tokens(rendered.unresolved as u64);
    }

    if dispatch(config.appenders(), &rendered.text, &record) {
        metrics.record_sink_failure();
    } else {
        metrics.record_emitted();
    }
    Ok(())
}

/// Write to each appender in binding order with per-appender panic isolation
///
/// Returns true if any appender failed or panicked. A failing appender does not
/// stop the remaining ones from receiving the record.
fn dispatch(appenders: &[SharedAppender], rendered: &str, record: &Record) -> bool {
    let mut has_error = false;

    for (idx, appender) in appenders.iter().enumerate() {
        let append_result =
            catch_unwind(AssertUnwindSafe(|| appender.lock().append(rendered, record)));

        match append_result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                eprintln!("[LOGGER ERROR] Appender #{} failed: {}", idx, e);
                has_error = true;
            }
            Err(panic_info) => {
                eprintln!(
                    "[LOGGER CRITICAL] Appender #{} panicked: {}. \
                     Other appenders continue to function.",
                    idx,
                    panic_message(panic_info.as_ref())
                );
                has_error = true;
            }
        }
    }

    has_error
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
