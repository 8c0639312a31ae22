use crossterm::{
    event::DisableBracketedPaste,
    execute,
    terminal::{LeaveAlternateScreen, disable_raw_mode},
};
use std::io::{self, Write};
use std::panic;

/// Install a panic hook that puts the terminal back before reporting.
///
/// Debug builds get `better_panic` backtraces, release builds the
/// `human_panic` crash report.
pub fn initialize_panic_handler() {
    #[cfg(debug_assertions)]
    better_panic::install();

    #[cfg(not(debug_assertions))]
    human_panic::setup_panic!();

    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        default_hook(panic_info);
        std::process::exit(1);
    }));
}

/// Restore terminal to a clean state
///
/// Specifically handles:
/// - Disabling raw mode
/// - Exiting alternate screen
/// - Disabling bracketed paste
/// - Showing the cursor
pub fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableBracketedPaste);
    let _ = execute!(io::stderr(), crossterm::cursor::Show);
    let _ = writeln!(io::stderr());
}
