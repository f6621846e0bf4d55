//! Library view controller
//!
//! Owns the mirrored book list as single-writer state: commands arrive on an
//! mpsc queue, are applied one at a time, and every visible change is
//! published on a watch channel. Mutations never patch local state directly;
//! the authoritative sequence always comes from a full re-fetch.
//!
//! Remote failures are logged and otherwise swallowed. The view never enters
//! an error state; the previous (possibly stale) sequence stays on display.

use tokio::sync::{mpsc, watch};
use tracing::warn;
use validator::Validate;

use crate::models::Book;
use crate::remote::RemoteLibrary;

/// Everything the view renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Shelf contents, in the order of the last successful fetch.
    pub books: Vec<Book>,
    /// Pending form title.
    pub title: String,
    /// Pending form author.
    pub author: String,
    /// True while a fetch of the list is in flight.
    pub loading: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            books: Vec::new(),
            title: String::new(),
            author: String::new(),
            // The view mounts in the loading state, before the first fetch.
            loading: true,
        }
    }
}

/// Commands accepted by the controller task.
#[derive(Debug)]
pub enum ViewCommand {
    Refresh,
    EditTitle(String),
    EditAuthor(String),
    Submit,
    Remove(usize),
}

/// Cloneable front half of the controller: event handlers push commands,
/// the render side watches state.
#[derive(Clone)]
pub struct LibraryHandle {
    commands: mpsc::UnboundedSender<ViewCommand>,
    updates: watch::Receiver<ViewState>,
}

impl LibraryHandle {
    /// Re-fetch the shelf from the server.
    pub fn refresh(&self) {
        self.send(ViewCommand::Refresh);
    }

    pub fn edit_title(&self, title: impl Into<String>) {
        self.send(ViewCommand::EditTitle(title.into()));
    }

    pub fn edit_author(&self, author: impl Into<String>) {
        self.send(ViewCommand::EditAuthor(author.into()));
    }

    /// Submit the pending form fields.
    pub fn submit(&self) {
        self.send(ViewCommand::Submit);
    }

    /// Fill both form fields and submit in one go.
    pub fn add_book(&self, title: impl Into<String>, author: impl Into<String>) {
        self.edit_title(title);
        self.edit_author(author);
        self.submit();
    }

    /// Delete the book at a zero-based position in the displayed sequence.
    pub fn remove(&self, index: usize) {
        self.send(ViewCommand::Remove(index));
    }

    /// Snapshot of the current view state.
    pub fn state(&self) -> ViewState {
        self.updates.borrow().clone()
    }

    /// Subscribe to view state changes.
    pub fn watch(&self) -> watch::Receiver<ViewState> {
        self.updates.clone()
    }

    fn send(&self, command: ViewCommand) {
        // The controller task only goes away at shutdown; a command sent
        // after that has nowhere to land and is dropped.
        let _ = self.commands.send(command);
    }
}

/// State-owning task behind a [`LibraryHandle`].
pub struct LibraryController<R> {
    remote: R,
    state: ViewState,
    commands: mpsc::UnboundedReceiver<ViewCommand>,
    updates: watch::Sender<ViewState>,
}

/// Spawn the controller task. The initial fetch runs before any command is
/// processed.
pub fn spawn<R>(remote: R) -> LibraryHandle
where
    R: RemoteLibrary + 'static,
{
    let (controller, handle) = LibraryController::new(remote);
    tokio::spawn(controller.run());
    handle
}

impl<R: RemoteLibrary> LibraryController<R> {
    pub fn new(remote: R) -> (Self, LibraryHandle) {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (updates_tx, updates_rx) = watch::channel(ViewState::default());
        let controller = Self {
            remote,
            state: ViewState::default(),
            commands: commands_rx,
            updates: updates_tx,
        };
        let handle = LibraryHandle {
            commands: commands_tx,
            updates: updates_rx,
        };
        (controller, handle)
    }

    pub async fn run(mut self) {
        self.refresh().await;
        while let Some(command) = self.commands.recv().await {
            self.apply(command).await;
        }
    }

    async fn apply(&mut self, command: ViewCommand) {
        match command {
            ViewCommand::Refresh => self.refresh().await,
            ViewCommand::EditTitle(title) => {
                self.state.title = title;
                self.publish();
            }
            ViewCommand::EditAuthor(author) => {
                self.state.author = author;
                self.publish();
            }
            ViewCommand::Submit => self.submit().await,
            ViewCommand::Remove(index) => self.remove(index).await,
        }
    }

    /// Replace the shelf wholesale from a fresh fetch. On failure the
    /// previous sequence stays on display; no retry.
    async fn refresh(&mut self) {
        self.state.loading = true;
        self.publish();
        match self.remote.list().await {
            Ok(books) => self.state.books = books,
            Err(err) => warn!(error = %err, "failed to fetch books"),
        }
        self.state.loading = false;
        self.publish();
    }

    async fn submit(&mut self) {
        let book = Book::new(self.state.title.clone(), self.state.author.clone());
        // Presence check only; an empty field makes the submit a no-op.
        if book.validate().is_err() {
            return;
        }
        match self.remote.create(book).await {
            Ok(()) => {
                self.state.title.clear();
                self.state.author.clear();
                self.publish();
                self.refresh().await;
            }
            Err(err) => warn!(error = %err, "failed to add book"),
        }
    }

    async fn remove(&mut self, index: usize) {
        match self.remote.delete(index).await {
            Ok(()) => self.refresh().await,
            Err(err) => warn!(error = %err, "failed to remove book"),
        }
    }

    fn publish(&self) {
        self.updates.send_if_modified(|current| {
            if *current == self.state {
                false
            } else {
                *current = self.state.clone();
                true
            }
        });
    }
}
