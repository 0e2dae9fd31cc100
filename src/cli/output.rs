//! Colored terminal output for release progress.
//!
//! Progress and error lines carry status glyphs for interactive and CI log
//! consumption; nothing here is meant to be machine-parsed. Write failures
//! on stdout are swallowed, output is best-effort.

use std::io::Write;
use termcolor::{Buffer, BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Output manager for consistent colored terminal output
pub struct OutputManager {
    stdout: BufferWriter,
    verbose: bool,
    quiet: bool,
}

impl std::fmt::Debug for OutputManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputManager")
            .field("verbose", &self.verbose)
            .field("quiet", &self.quiet)
            .finish_non_exhaustive()
    }
}

impl Clone for OutputManager {
    fn clone(&self) -> Self {
        Self::new(self.verbose, self.quiet)
    }
}

impl OutputManager {
    /// Create a new output manager
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            stdout: BufferWriter::stdout(ColorChoice::Auto),
            verbose,
            quiet,
        }
    }

    fn glyph_line(&self, buffer: &mut Buffer, glyph: &str, color: Color, bold: bool, message: &str) {
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(bold));
        let _ = write!(buffer, "{glyph}");
        let _ = buffer.reset();
        let _ = writeln!(buffer, " {message}");
    }

    fn emit(&self, glyph: &str, color: Color, bold: bool, message: &str) {
        if self.quiet {
            return;
        }
        let mut buffer = self.stdout.buffer();
        self.glyph_line(&mut buffer, glyph, color, bold, message);
        let _ = self.stdout.print(&buffer);
    }

    /// Print an info message (normal output)
    pub fn info(&self, message: &str) {
        self.emit("ℹ", Color::Cyan, false, message);
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        self.emit("✓", Color::Green, true, message);
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        self.emit("⚠", Color::Yellow, true, message);
    }

    /// Print a progress message
    pub fn progress(&self, message: &str) {
        self.emit("⋯", Color::Magenta, false, message);
    }

    /// Print a verbose message (only in verbose mode)
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            self.emit("→", Color::Blue, false, message);
        }
    }

    /// Print an error message to stderr (always shown, quiet or not)
    pub fn error(&self, message: &str) {
        let stderr = BufferWriter::stderr(ColorChoice::Auto);
        let mut buffer = stderr.buffer();
        self.glyph_line(&mut buffer, "✗", Color::Red, true, message);
        if stderr.print(&buffer).is_err() {
            // Stderr failed, fall back to stdout as last resort.
            println!("✗ {message}");
        }
    }

    /// Print a plain message (respects quiet mode)
    pub fn println(&self, message: &str) {
        if self.quiet {
            return;
        }
        let mut buffer = self.stdout.buffer();
        let _ = writeln!(buffer, "{message}");
        let _ = self.stdout.print(&buffer);
    }

    /// Print indented text (for sub-items)
    pub fn indent(&self, message: &str) {
        if self.quiet {
            return;
        }
        let mut buffer = self.stdout.buffer();
        let _ = writeln!(buffer, "    {message}");
        let _ = self.stdout.print(&buffer);
    }

    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}
