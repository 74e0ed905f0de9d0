use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use url::Url;
use usersearch_core::SearchViewModel;
use usersearch_engine::{
    ChannelRenderSink, LocalUserLookup, ReqwestUserLookup, SearchCoordinator, UserLookup,
};
use usersearch_logging::{search_info, search_warn};

use crate::config::AppConfig;
use crate::render;

/// Delay between simulated keystrokes for `:type`.
const KEYSTROKE_INTERVAL: Duration = Duration::from_millis(60);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    /// A full replacement of the input box contents.
    Query(String),
    /// Type the text one character at a time.
    Type(String),
    Clear,
    Dismiss,
    Focus,
    Quit,
    Help,
}

fn parse_input(line: &str) -> Input {
    let Some(command) = line.strip_prefix(':') else {
        return Input::Query(line.to_string());
    };
    let (name, rest) = command.split_once(' ').unwrap_or((command, ""));
    match name {
        "clear" => Input::Clear,
        "dismiss" | "blur" => Input::Dismiss,
        "focus" => Input::Focus,
        "quit" | "q" => Input::Quit,
        "type" => Input::Type(rest.to_string()),
        // `::text` searches for a literal leading colon.
        _ if command.starts_with(':') => Input::Query(command.to_string()),
        _ => Input::Help,
    }
}

pub fn run(config: AppConfig) -> anyhow::Result<()> {
    let avatar_base = config.avatar_base()?;
    let lookup: Arc<dyn UserLookup> = match config.directory() {
        Some(users) => {
            search_info!("searching local directory of {} users", users.len());
            Arc::new(LocalUserLookup::new(users))
        }
        None => {
            search_info!("searching endpoint {}", config.endpoint);
            Arc::new(
                ReqwestUserLookup::new(config.lookup_settings())
                    .context("failed to set up search endpoint")?,
            )
        }
    };

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let (view_tx, view_rx) = mpsc::channel::<SearchViewModel>();
    let coordinator = SearchCoordinator::new(
        runtime.handle().clone(),
        lookup,
        Arc::new(ChannelRenderSink::new(view_tx)),
        config.coordinator_settings(),
    );

    let renderer = thread::spawn(move || render_loop(view_rx, avatar_base));

    print_help();
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        match parse_input(&line) {
            Input::Query(text) => coordinator.update_query(text),
            Input::Type(text) => {
                let mut typed = String::new();
                for ch in text.chars() {
                    typed.push(ch);
                    coordinator.update_query(typed.clone());
                    thread::sleep(KEYSTROKE_INTERVAL);
                }
            }
            Input::Clear => coordinator.clear(),
            Input::Dismiss => coordinator.dismiss(),
            Input::Focus => coordinator.focus(),
            Input::Quit => break,
            Input::Help => print_help(),
        }
    }

    coordinator.shutdown();
    // Dropping the coordinator drops the render sink, which ends the render loop.
    drop(coordinator);
    if renderer.join().is_err() {
        search_warn!("render thread panicked");
    }
    runtime.shutdown_timeout(Duration::from_secs(1));
    Ok(())
}

fn render_loop(view_rx: mpsc::Receiver<SearchViewModel>, avatar_base: Option<Url>) {
    let stdout = io::stdout();
    while let Ok(view) = view_rx.recv() {
        let mut out = stdout.lock();
        for line in render::render(&view, avatar_base.as_ref()) {
            let _ = writeln!(out, "{line}");
        }
        let _ = out.flush();
    }
}

fn print_help() {
    println!("Each line replaces the search text. Commands:");
    println!("  :type <text>   type text one character at a time");
    println!("  :clear         clear the search");
    println!("  :dismiss       hide results (focus left the widget)");
    println!("  :focus         show results again");
    println!("  :quit          exit");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_queries() {
        assert_eq!(parse_input("ada"), Input::Query("ada".to_string()));
        assert_eq!(parse_input(""), Input::Query(String::new()));
        assert_eq!(parse_input("  "), Input::Query("  ".to_string()));
    }

    #[test]
    fn commands_are_recognized() {
        assert_eq!(parse_input(":clear"), Input::Clear);
        assert_eq!(parse_input(":blur"), Input::Dismiss);
        assert_eq!(parse_input(":focus"), Input::Focus);
        assert_eq!(parse_input(":q"), Input::Quit);
        assert_eq!(parse_input(":type ada l"), Input::Type("ada l".to_string()));
        assert_eq!(parse_input(":nope"), Input::Help);
        assert_eq!(parse_input("::colon"), Input::Query(":colon".to_string()));
    }
}
