use colored::*;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::FormatEvent;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::registry::LookupSpan;

use super::spinner::SpinnerWriter;

/// Prefixes events from the scanning crates with the module that raised them
/// (`pool`, `orchestrator`, `shodan`, ...). CLI events stay untagged.
pub struct SweeprFormatter;

fn component(target: &str) -> Option<&str> {
    let path = target
        .strip_prefix("sweepr_core::")
        .or_else(|| target.strip_prefix("sweepr_common::"))?;
    path.rsplit("::").next()
}

impl<S, N> FormatEvent<S, N> for SweeprFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();

        let (symbol, color_func): (&str, fn(ColoredString) -> ColoredString) = match *meta.level() {
            Level::TRACE => ("[ ]", |s| s.dimmed()),
            Level::DEBUG => ("[?]", |s| s.blue()),
            Level::INFO => ("[+]", |s| s.green().bold()),
            Level::WARN => ("[*]", |s| s.yellow().bold()),
            Level::ERROR => ("[-]", |s| s.red().bold()),
        };

        write!(writer, "{} ", color_func(symbol.into()))?;

        if let Some(component) = component(meta.target()) {
            write!(writer, "{} ", format!("{component:<12}").dimmed())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Routes every diagnostic to stderr, above the spinner.
///
/// `RUST_LOG` overrides the level picked from `-v`/`-q`.
pub fn init_logging(verbose: bool, quiet: bool) {
    colored::control::set_override(console::colors_enabled_stderr());

    let level = match (verbose, quiet) {
        (true, _) => "debug",
        (_, true) => "warn",
        _ => "info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,sweepr={level},sweepr_core={level},sweepr_common={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(SweeprFormatter)
        .with_writer(|| SpinnerWriter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_is_last_module_of_library_targets() {
        assert_eq!(component("sweepr_core::scanner::pool"), Some("pool"));
        assert_eq!(component("sweepr_core::lookup::shodan"), Some("shodan"));
        assert_eq!(component("sweepr_core::scanner"), Some("scanner"));
        assert_eq!(component("sweepr_common::network::range"), Some("range"));
    }

    #[test]
    fn component_skips_cli_and_foreign_targets() {
        assert_eq!(component("sweepr::commands::scan"), None);
        assert_eq!(component("reqwest::connect"), None);
        assert_eq!(component("sweepr_core"), None);
    }
}
