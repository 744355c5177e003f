//! Terminal output utilities

use console::style;

/// Print an error message to stderr
pub fn print_error(message: &str) {
    eprintln!("{}: {}", style("error").red().bold(), message);
}

/// Print a warning message to stderr
pub fn print_warning(message: &str) {
    eprintln!("{}: {}", style("warning").yellow().bold(), message);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{}: {}", style("success").green().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{}: {}", style("info").blue().bold(), message);
}

/// Echo a command line before it is executed
pub fn print_command(command: &str) {
    println!("{} {}", style("##").cyan().bold(), style(command).dim());
}

/// Print a message only in verbose mode
pub fn print_verbose(verbose: bool, message: &str) {
    if verbose {
        eprintln!("{}: {}", style("verbose").dim(), message);
    }
}

/// Turn colored output off for both streams
pub fn disable_colors() {
    console::set_colors_enabled(false);
    console::set_colors_enabled_stderr(false);
}
