//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use mapdepot_core::ExtractionManifest;
use mapdepot_core::InstallOutcome;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn success_line(&self, message: &str) {
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("✓").green().bold()));
        } else {
            let _ = self.term.write_line(message);
        }
    }

    fn write_manifest(&self, manifest: &ExtractionManifest) {
        let _ = self
            .term
            .write_line(&format!("  Files written: {}", manifest.len()));
        let _ = self.term.write_line(&format!(
            "  Destination: {}",
            manifest.destination_root().display()
        ));

        if self.verbose {
            for path in manifest.written() {
                let _ = self.term.write_line(&format!("  {}", path.display()));
            }
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_install_result(&self, outcome: &InstallOutcome) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        match outcome {
            InstallOutcome::Installed(manifest) => {
                self.success_line("Package installed");
                self.write_manifest(manifest);
            }
            InstallOutcome::Delegated => {
                self.success_line("Package installed (via elevated helper)");
            }
            InstallOutcome::Cancelled => {
                // A dismissed prompt is a normal outcome, so no error
                // styling here.
                let _ = self.term.write_line("Install cancelled.");
            }
        }

        Ok(())
    }

    fn format_extract_result(&self, manifest: &ExtractionManifest) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.success_line("Extraction complete");
        self.write_manifest(manifest);
        Ok(())
    }
}
