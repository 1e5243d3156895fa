//! Line commands for driving the browser from stdin.

use anyhow::{Context, Result, anyhow, bail};

use minibrowser_types::input::{InputEvent, Key};

use crate::browser::{Browser, BrowserAction};

pub const HELP: &str = "\
commands:
  open <address>     load an address (scheme defaults to https)
  click <x> <y>      press the pointer at a surface position
  scroll <lines>     wheel scroll; positive moves toward the top
  key <name>         press a key (Enter, Tab, Escape, Up, Down, PageUp, ...)
  type <text>        type into the address bar
  link <n>           follow the page's nth link
  back | forward | reload
  resize <w> <h>     resize the surface
  links              list the page's links
  dump               print the extracted page as JSON
  help | quit";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Open(String),
    Type(String),
    Link(usize),
    Back,
    Forward,
    Reload,
    Links,
    Dump,
    Help,
    /// Forwarded to [`Browser::handle_event`].
    Event(InputEvent),
}

/// What the caller should print after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Redraw the page.
    Frame,
    Text(String),
    Quit,
}

/// Parse one line. Blank lines and `#` comments are `None`.
pub fn parse(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (name, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(n, r)| (n, r.trim()));

    let cmd = match name.to_ascii_lowercase().as_str() {
        "open" | "go" => Command::Open(required(rest, "open <address>")?.to_string()),
        "type" => Command::Type(required(rest, "type <text>")?.to_string()),
        "click" => {
            let [x, y] = numbers::<f32, 2>(rest, "click <x> <y>")?;
            Command::Event(InputEvent::PointerDown { x, y })
        },
        "scroll" => {
            let [delta_lines] = numbers::<f32, 1>(rest, "scroll <lines>")?;
            Command::Event(InputEvent::Scroll { delta_lines })
        },
        "resize" => {
            let [width, height] = numbers::<f32, 2>(rest, "resize <w> <h>")?;
            Command::Event(InputEvent::Resize { width, height })
        },
        "key" => Command::Event(InputEvent::KeyPress(parse_key(required(rest, "key <name>")?)?)),
        "link" => {
            let [n] = numbers::<usize, 1>(rest, "link <n>")?;
            Command::Link(n)
        },
        "back" => Command::Back,
        "forward" => Command::Forward,
        "reload" => Command::Reload,
        "links" => Command::Links,
        "dump" => Command::Dump,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Event(InputEvent::Quit),
        other => bail!("unknown command: {other} (try `help`)"),
    };
    Ok(Some(cmd))
}

/// Run a command against the browser.
pub fn execute(browser: &mut Browser, cmd: Command) -> Result<Reply> {
    match cmd {
        Command::Open(address) => {
            browser.navigate(&address);
        },
        Command::Type(text) => {
            browser.focus_address_bar();
            for ch in text.chars() {
                browser.handle_event(&InputEvent::TextInput(ch));
            }
        },
        Command::Link(n) => {
            browser.follow_page_link(n);
        },
        Command::Back => {
            browser.back();
        },
        Command::Forward => {
            browser.forward();
        },
        Command::Reload => {
            browser.reload();
        },
        Command::Links => return Ok(Reply::Text(link_list(browser))),
        Command::Dump => return Ok(Reply::Text(browser.page_json()?)),
        Command::Help => return Ok(Reply::Text(HELP.to_string())),
        Command::Event(event) => {
            if let Some(action) = browser.handle_event(&event) {
                match action {
                    BrowserAction::Quit => return Ok(Reply::Quit),
                    BrowserAction::Navigated(url) => log::debug!("navigated to {url}"),
                }
            }
        },
    }
    Ok(Reply::Frame)
}

fn link_list(browser: &Browser) -> String {
    let links = &browser.page().links;
    if links.is_empty() {
        return "(no links)".to_string();
    }
    links
        .iter()
        .enumerate()
        .map(|(i, link)| format!("[{i}] {} -> {}", link.text, link.target))
        .collect::<Vec<_>>()
        .join("\n")
}

fn required<'a>(rest: &'a str, usage: &str) -> Result<&'a str> {
    if rest.is_empty() {
        bail!("usage: {usage}");
    }
    Ok(rest)
}

fn numbers<T, const N: usize>(rest: &str, usage: &str) -> Result<[T; N]>
where
    T: std::str::FromStr + Copy + Default,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let parts: Vec<&str> = rest.split_whitespace().collect();
    if parts.len() != N {
        bail!("usage: {usage}");
    }
    let mut out = [T::default(); N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .with_context(|| format!("bad number {part:?}; usage: {usage}"))?;
    }
    Ok(out)
}

/// Key names as serialized (`PageDown`), matched case-insensitively.
fn parse_key(name: &str) -> Result<Key> {
    const KEYS: &[Key] = &[
        Key::Enter,
        Key::Backspace,
        Key::Delete,
        Key::Tab,
        Key::Escape,
        Key::Left,
        Key::Right,
        Key::Up,
        Key::Down,
        Key::Home,
        Key::End,
        Key::PageUp,
        Key::PageDown,
    ];
    KEYS.iter()
        .copied()
        .find(|key| {
            serde_json::to_value(key)
                .ok()
                .and_then(|v| v.as_str().map(|s| s.eq_ignore_ascii_case(name)))
                .unwrap_or(false)
        })
        .ok_or_else(|| anyhow!("unknown key: {name}"))
}
