use std::io::{self, Write};
use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use sweepr_core::scanner::ScanProgress;

const TICK_RATE: Duration = Duration::from_millis(100);
const REFRESH_RATE: Duration = Duration::from_millis(250);

pub(crate) static SPINNER: OnceLock<ProgressBar> = OnceLock::new();

/// Creates the spinner. It stays hidden with `-q` or when nobody watches stderr.
pub fn init_spinner(visible: bool) -> &'static ProgressBar {
    SPINNER.get_or_init(|| {
        if !visible || !console::user_attended_stderr() {
            return ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden());
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
            pb.set_style(style.tick_strings(&[
                "▁▁▁▁▁",
                "▁▂▂▂▁",
                "▁▄▂▄▁",
                "▂▄▆▄▂",
                "▄▆█▆▄",
                "▂▄▆▄▂",
                "▁▄▂▄▁",
                "▁▂▂▂▁",
            ]));
        }
        pb
    })
}

pub fn get_spinner() -> &'static ProgressBar {
    init_spinner(true)
}

/// Refreshes the spinner message from `progress` until `running` turns false.
pub fn start_scan_spinner(progress: Arc<ScanProgress>, running: Arc<AtomicBool>) -> JoinHandle<()> {
    let pb = get_spinner().clone();
    pb.enable_steady_tick(TICK_RATE);

    thread::spawn(move || {
        while running.load(Ordering::Relaxed) {
            pb.set_message(format!(
                "Scanned {} addresses across {} active ranges, {} hostnames found",
                progress.addresses().to_string().green().bold(),
                progress.active_jobs().to_string().yellow(),
                progress.hostnames().to_string().green().bold(),
            ));
            thread::sleep(REFRESH_RATE);
        }
        pb.finish_and_clear();
    })
}

/// Stops the refresher thread. Returns `false` if it panicked.
pub fn stop_scan_spinner(running: &AtomicBool, handle: JoinHandle<()>) -> bool {
    running.store(false, Ordering::Relaxed);
    handle.join().is_ok()
}

pub struct SpinnerWriter;

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let msg = String::from_utf8_lossy(buf);
        let msg = msg.trim_end();
        let pb = get_spinner();
        // A hidden bar swallows println, go straight to stderr instead.
        if pb.is_hidden() || pb.is_finished() {
            eprintln!("{msg}");
        } else {
            pb.println(msg);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Result output that clears the spinner line before every write and redraws
/// it afterwards, so hostnames never land in the middle of the spinner.
pub struct SuspendedWriter<W> {
    inner: W,
}

impl<W: Write> SuspendedWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write> Write for SuspendedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let inner = &mut self.inner;
        get_spinner().suspend(|| {
            let written = inner.write_all(buf);
            written.and_then(|()| inner.flush())
        })?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
