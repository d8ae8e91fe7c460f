use crate::cli::ProgressMode;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use std::io::Write;
use std::sync::{Arc, Mutex};
use structparity::engine::outcome::{Discrepancy, Mismatch, Representation};
use structparity::engine::progress::{Progress, ProgressCallback};
use tracing::warn;

/// Renders batch progress on the terminal: either one dot per compared entry
/// or an indicatif bar, with failure details and the closing summary printed
/// in between.
#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<RenderState>>,
}

struct RenderState {
    mode: ProgressMode,
    dots_per_line: usize,
    dots_on_line: usize,
    out: Box<dyn Write + Send>,
    pb: ProgressBar,
}

impl CliProgressHandler {
    pub fn new(mode: ProgressMode, dots_per_line: usize) -> Self {
        Self::with_parts(
            mode,
            dots_per_line,
            Box::new(std::io::stdout()),
            ProgressDrawTarget::stderr(),
        )
    }

    fn with_parts(
        mode: ProgressMode,
        dots_per_line: usize,
        out: Box<dyn Write + Send>,
        target: ProgressDrawTarget,
    ) -> Self {
        let pb = ProgressBar::new(0);
        pb.set_draw_target(target);
        Self {
            state: Arc::new(Mutex::new(RenderState {
                mode,
                dots_per_line: dots_per_line.max(1),
                dots_on_line: 0,
                out,
                pb,
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = self.state.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut state) = state.lock() else {
                warn!("Progress renderer mutex was poisoned. Cannot update progress.");
                return;
            };
            state.handle(progress);
        })
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<6} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                },
            )
            .progress_chars("##-")
    }
}

impl RenderState {
    fn handle(&mut self, progress: Progress) {
        match progress {
            Progress::BatchStart { total } => {
                self.dots_on_line = 0;
                if self.mode == ProgressMode::Bar {
                    self.pb.reset();
                    self.pb.set_length(total);
                    self.pb.set_style(CliProgressHandler::bar_style());
                }
            }
            Progress::EntryStart { id } => {
                if self.mode == ProgressMode::Bar {
                    self.pb.set_message(id.to_string());
                }
            }
            Progress::EntryFinish => match self.mode {
                ProgressMode::Bar => self.pb.inc(1),
                ProgressMode::Dots => self.dot(),
            },
            Progress::Mismatch { id, mismatch } => {
                let mut lines = vec![format!("Comparison failure for {}! Values follow", id)];
                lines.extend(mismatch_lines(&mismatch));
                self.print_lines(&lines);
            }
            Progress::FetchFailed {
                id,
                format,
                message,
            } => {
                self.print_lines(&[format!(
                    "Could not obtain the {} record of {}: {}",
                    format, id, message
                )]);
            }
            Progress::Waived {
                id,
                mismatch,
                reason,
            } => {
                self.print_lines(&[format!(
                    "Known exception for {} on '{}' waived: {}",
                    id, mismatch.field, reason
                )]);
            }
            Progress::LastAttempted { id } => {
                if self.mode == ProgressMode::Bar {
                    self.pb.finish_and_clear();
                }
                if let Some(id) = id {
                    self.print_lines(&[format!("##### ----> Last tested PDB entry was: {}", id)]);
                }
            }
            Progress::BatchFinish { elapsed } => {
                self.print_lines(&[format!(
                    "Done in {:5.1} minutes",
                    elapsed.as_secs_f64() / 60.0
                )]);
            }
            Progress::Message(msg) => self.print_lines(&[msg]),
        }
    }

    fn dot(&mut self) {
        let mut result = write!(self.out, ".");
        self.dots_on_line += 1;
        if self.dots_on_line == self.dots_per_line {
            result = result.and_then(|_| writeln!(self.out));
            self.dots_on_line = 0;
        }
        if let Err(e) = result.and_then(|_| self.out.flush()) {
            warn!("Failed to write progress: {}", e);
        }
    }

    /// Prints full lines, first closing an unfinished row of dots.
    fn print_lines(&mut self, lines: &[String]) {
        let RenderState {
            out,
            pb,
            dots_on_line,
            ..
        } = self;
        let result = pb.suspend(|| -> std::io::Result<()> {
            if *dots_on_line > 0 {
                writeln!(out)?;
                *dots_on_line = 0;
            }
            for line in lines {
                writeln!(out, "{}", line)?;
            }
            out.flush()
        });
        if let Err(e) = result {
            warn!("Failed to write progress: {}", e);
        }
    }
}

fn mismatch_lines(mismatch: &Mismatch) -> Vec<String> {
    let mut lines = vec![match &mismatch.chain_id {
        Some(chain_id) => format!("  field: {} (chain {})", mismatch.field, chain_id),
        None => format!("  field: {}", mismatch.field),
    }];
    match &mismatch.discrepancy {
        Discrepancy::Differs { a, b } => {
            lines.push(format!("  {}: {}", Representation::A, a));
            lines.push(format!("  {}: {}", Representation::B, b));
        }
        Discrepancy::Violates {
            representation,
            actual,
            expected,
        } => {
            lines.push(format!("  {}: {}", representation, actual));
            lines.push(format!("  expected: {}", expected));
        }
    }
    lines
}
