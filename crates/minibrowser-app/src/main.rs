//! minibrowser entry point.
//!
//! Loads the address given on the command line (or the configured home
//! page), prints the page as a character grid, then reads commands from
//! stdin and prints a fresh frame after each one. `help` lists commands.
//! Set `MINIBROWSER_PLAIN=1` to print without ANSI underlines.

use std::io::{self, BufRead, Write};

use anyhow::Result;

use minibrowser_app::commands::{self, Reply};
use minibrowser_app::{AppConfig, Browser, TextCanvas};
use minibrowser_net::DefaultFetcher;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load()?;
    log::info!(
        "Starting minibrowser ({}x{})",
        config.window.width,
        config.window.height,
    );
    let ansi = std::env::var_os("MINIBROWSER_PLAIN").is_none();

    let fetcher = DefaultFetcher::new(config.net.clone());
    let mut browser = Browser::new(&config, Box::new(fetcher));

    let start = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.home_url.clone());
    browser.navigate(&start);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    print_frame(&mut out, &browser, &config, ansi)?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let cmd = match commands::parse(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "error: {e:#}")?;
                continue;
            },
        };
        match commands::execute(&mut browser, cmd) {
            Ok(Reply::Frame) => print_frame(&mut out, &browser, &config, ansi)?,
            Ok(Reply::Text(text)) => writeln!(out, "{text}")?,
            Ok(Reply::Quit) => break,
            Err(e) => writeln!(out, "error: {e:#}")?,
        }
        out.flush()?;
    }

    log::info!("Shutting down");
    Ok(())
}

/// Rasterize the current frame onto a character grid and print it.
fn print_frame(out: &mut impl Write, browser: &Browser, config: &AppConfig, ansi: bool) -> Result<()> {
    let (width, height) = browser.size();
    let engine = browser.engine();
    let mut canvas = TextCanvas::new(
        width,
        height,
        engine.char_advance(),
        engine.line_height(),
        config.colors.link,
    );
    browser.frame(&mut canvas)?;
    writeln!(out, "{}", canvas.render(ansi))?;
    writeln!(out, "{}", "-".repeat(canvas.cols()))?;
    out.flush()?;
    Ok(())
}
