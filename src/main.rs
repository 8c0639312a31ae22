use std::fs::File;
use std::io::stdout;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{error, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use simplelog::{Config, LevelFilter, WriteLogger};

use folio::event_source::TerminalEventSource;
use folio::pdf::MupdfDecoder;
use folio::resize::TerminalViewport;
use folio::{App, panic_handler, run_app_with_event_source, settings};

/// Terminal PDF viewer, one page at a time
#[derive(Parser, Debug)]
#[command(name = "folio", version, about)]
struct Args {
    /// PDF file to open on start
    file: Option<PathBuf>,

    /// Let the page use the full width fraction with no cap
    #[arg(long, conflicts_with = "max_width")]
    uncapped: bool,

    /// Cap the page width at this many columns
    #[arg(long, value_name = "COLUMNS")]
    max_width: Option<f32>,

    /// Raster pixels per terminal column
    #[arg(long, value_name = "N")]
    pixel_density: Option<u16>,

    #[arg(long, value_name = "PATH", default_value = "folio.log")]
    log_file: PathBuf,

    /// Log at debug level
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    WriteLogger::init(level, Config::default(), File::create(&args.log_file)?)?;

    info!("Starting folio");

    settings::load_settings();
    let mut config = settings::get_settings();
    if args.uncapped {
        config.max_width = None;
    } else if let Some(max_width) = args.max_width {
        config.max_width = Some(max_width);
    }
    if let Some(density) = args.pixel_density {
        config.pixel_density = density.max(1);
    }
    let viewer_config = config.viewer_config();
    info!(
        "Width policy {:?}, pixel density {}",
        viewer_config.policy, config.pixel_density
    );

    panic_handler::initialize_panic_handler();

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let viewport = TerminalViewport::new(config.pixel_density);
    let mut app = App::new(
        MupdfDecoder,
        viewport,
        (size.width, size.height),
        viewer_config,
    );
    if let Some(path) = args.file.as_deref() {
        app.open_path(path);
    }

    let mut event_source = TerminalEventSource;
    let res = run_app_with_event_source(&mut terminal, &mut app, &mut event_source);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    app.teardown();

    if let Err(err) = res {
        error!("Application error: {err:?}");
        println!("{err:?}");
    }

    info!("Shutting down folio");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio::pdf::WidthPolicy;

    #[test]
    fn cli_accepts_a_file_and_width_options() {
        let args = Args::parse_from(["folio", "paper.pdf", "--max-width", "120", "--debug"]);
        assert_eq!(args.file, Some(PathBuf::from("paper.pdf")));
        assert_eq!(args.max_width, Some(120.0));
        assert!(args.debug);
        assert_eq!(args.log_file, PathBuf::from("folio.log"));
    }

    #[test]
    fn uncapped_conflicts_with_max_width() {
        assert!(Args::try_parse_from(["folio", "--uncapped", "--max-width", "90"]).is_err());
    }

    #[test]
    fn uncapped_policy_from_settings() {
        let mut config = settings::Settings::default();
        config.max_width = None;
        assert!(matches!(
            config.width_policy(),
            WidthPolicy::Uncapped { .. }
        ));
    }
}
