use crate::core::{BuildDescriptor, Mode, PluginKind};
use colored::*;

pub struct Ui;

impl Ui {
    pub fn show_banner() {
        println!("\n  {} {}", "SCRUMPY BUILD".bright_cyan().bold(), env!("CARGO_PKG_VERSION").bright_white());
        println!();
    }

    /// One row per plugin, one column per mode
    pub fn show_plugin_matrix(dev: &BuildDescriptor, prod: &BuildDescriptor) {
        println!(
            "  {} {} {}",
            format!("{:<26}", "plugin").bright_black(),
            format!("{:^13}", Mode::Development.as_str()).bright_black(),
            format!("{:^12}", Mode::Production.as_str()).bright_black()
        );

        for kind in PluginKind::ALL {
            println!(
                "  {} {} {}",
                format!("{:<26}", kind.name()).bright_cyan(),
                Self::mark(dev.has_plugin(kind), 13),
                Self::mark(prod.has_plugin(kind), 12)
            );
        }
        println!();
    }

    pub fn show_summary(descriptor: &BuildDescriptor, fingerprint: &str) {
        println!("  {} {}", "mode".bright_black(), descriptor.mode.to_string().bright_white().bold());
        println!(
            "  {} {}",
            "output".bright_black(),
            descriptor.output.path.display().to_string().bright_white()
        );
        for (label, pattern) in descriptor.output_patterns() {
            println!("    {} {}", label.bright_black(), pattern.as_str().bright_cyan());
        }
        println!("  {} {}", "fingerprint".bright_black(), fingerprint.get(..12).unwrap_or(fingerprint).bright_white());
        println!();
    }

    fn mark(active: bool, width: usize) -> ColoredString {
        if active {
            format!("{:^width$}", "✓").bright_green()
        } else {
            format!("{:^width$}", "·").bright_black()
        }
    }
}
