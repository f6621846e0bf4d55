//! Biblioteca - virtual bookshelf terminal client
//!
//! A stdin REPL over the library view controller: the shelf re-renders
//! whenever the controller publishes a state change, while commands map to
//! the form and button events of the view.

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use biblioteca::controller::{self, LibraryHandle, ViewState};
use biblioteca::remote::BooksApi;
use biblioteca::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("biblioteca={}", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Biblioteca v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Books API at {}", config.api.base_url);

    let handle = controller::spawn(BooksApi::new(config.api.base_url.as_str()));
    let mut updates = handle.watch();

    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                render(&state);
            }
            line = lines.next_line() => {
                match line? {
                    Some(line) if dispatch(&handle, line.trim()) => {}
                    _ => break,
                }
            }
        }
    }

    Ok(())
}

/// Map one input line to controller commands. Returns false to quit.
fn dispatch(handle: &LibraryHandle, line: &str) -> bool {
    match line {
        "" => {}
        "quit" | "exit" => return false,
        "help" => print_help(),
        "list" | "refresh" => handle.refresh(),
        _ => {
            if let Some(rest) = line.strip_prefix("add ") {
                match rest.split_once(" -- ") {
                    Some((title, author)) => handle.add_book(title.trim(), author.trim()),
                    None => eprintln!("usage: add <title> -- <author>"),
                }
            } else if let Some(rest) = line.strip_prefix("rm ") {
                match rest.trim().parse::<usize>() {
                    Ok(index) => handle.remove(index),
                    Err(_) => eprintln!("usage: rm <position>"),
                }
            } else {
                eprintln!("unknown command, type 'help'");
            }
        }
    }
    true
}

fn render(state: &ViewState) {
    if state.loading {
        println!("Carregando livros...");
        return;
    }
    if state.books.is_empty() {
        println!("Nenhum livro adicionado ainda");
        return;
    }
    println!("Meus livros:");
    for (index, book) in state.books.iter().enumerate() {
        println!("  {index}. {} (por {})", book.title, book.author);
    }
}

fn print_help() {
    println!("Minha Biblioteca Virtual");
    println!("  list                     refetch and show the shelf");
    println!("  add <title> -- <author>  add a book");
    println!("  rm <position>            remove the book at a position");
    println!("  quit");
}
