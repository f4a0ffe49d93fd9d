//! Runs the search shell on its own task. All reads and writes of the search
//! text go through one mailbox and are handled strictly in arrival order.

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use tokio::sync::{mpsc, oneshot};

use crate::{
    search::{SearchOutcome, SearchShell},
    RequestResult,
};

const MAILBOX_SIZE: usize = 32;

#[derive(Debug)]
pub enum ShellCommand {
    SetQuery {
        query: String,
        responder: oneshot::Sender<String>,
    },
    GetQuery {
        responder: oneshot::Sender<String>,
    },
    Submit {
        responder: oneshot::Sender<SearchOutcome>,
    },
    #[cfg(test)]
    Crash,
}

#[derive(Debug, Clone)]
pub struct ShellRef {
    sender: mpsc::Sender<ShellCommand>,
}

impl ShellRef {
    /// Replaces the search text and answers with the stored value.
    pub async fn set_query<S: Into<String>>(&self, query: S) -> RequestResult<String> {
        let (responder, response) = oneshot::channel();
        self.sender
            .send(ShellCommand::SetQuery {
                query: query.into(),
                responder,
            })
            .await?;
        Ok(response.await?)
    }

    pub async fn query(&self) -> RequestResult<String> {
        let (responder, response) = oneshot::channel();
        self.sender.send(ShellCommand::GetQuery { responder }).await?;
        Ok(response.await?)
    }

    pub async fn submit(&self) -> RequestResult<SearchOutcome> {
        let (responder, response) = oneshot::channel();
        self.sender.send(ShellCommand::Submit { responder }).await?;
        Ok(response.await?)
    }
}

/// Spawns the shell task. If handling a command panics, the shell is replaced
/// by a fresh one from `factory` and the next command is served by it.
pub fn spawn<F>(factory: F) -> ShellRef
where
    F: 'static + Send + Fn() -> SearchShell,
{
    let (sender, mut receiver) = mpsc::channel(MAILBOX_SIZE);
    let mut shell = factory();

    tokio::spawn(async move {
        while let Some(command) = receiver.recv().await {
            let result = panic::catch_unwind(AssertUnwindSafe(|| handle(&mut shell, command)));
            if let Err(payload) = result {
                log::error!(
                    "search shell panicked, restarting: {}",
                    panic_message(payload.as_ref())
                );
                shell = factory();
            }
        }
        log::debug!("search shell stopped, all references dropped");
    });

    ShellRef { sender }
}

fn handle(shell: &mut SearchShell, command: ShellCommand) {
    let delivered = match command {
        ShellCommand::SetQuery { query, responder } => {
            shell.set_query(query);
            responder.send(shell.query().to_owned()).is_ok()
        }
        ShellCommand::GetQuery { responder } => {
            responder.send(shell.query().to_owned()).is_ok()
        }
        ShellCommand::Submit { responder } => responder.send(shell.submit()).is_ok(),
        #[cfg(test)]
        ShellCommand::Crash => panic!("crash requested while holding {:?}", shell.query()),
    };
    if !delivered {
        log::warn!("search shell could not answer, requester is gone");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn query_round_trips_through_the_task() {
        let shell = spawn(SearchShell::new);
        assert_eq!(shell.query().await.unwrap(), "");
        assert_eq!(shell.set_query("Union Station").await.unwrap(), "Union Station");
        assert_eq!(shell.query().await.unwrap(), "Union Station");
    }

    #[tokio::test]
    async fn commands_apply_in_order() {
        let shell = spawn(SearchShell::new);
        let other = shell.clone();
        shell.set_query("first").await.unwrap();
        other.set_query("second").await.unwrap();
        let outcome = shell.submit().await.unwrap();
        assert_eq!(outcome.query(), "second");
        assert_eq!(other.query().await.unwrap(), "second");
    }

    #[tokio::test]
    async fn panicking_shell_restarts_empty() {
        let shell = spawn(SearchShell::new);
        shell.set_query("Echo Park").await.unwrap();
        shell.sender.send(ShellCommand::Crash).await.unwrap();
        assert_eq!(shell.query().await.unwrap(), "");
        assert_eq!(shell.set_query("Silver Lake").await.unwrap(), "Silver Lake");
    }

    #[test]
    fn panic_messages_are_readable() {
        let literal = panic::catch_unwind(|| panic!("boom")).unwrap_err();
        assert_eq!(panic_message(literal.as_ref()), "boom");
        let formatted = panic::catch_unwind(|| panic!("boom {}", 2)).unwrap_err();
        assert_eq!(panic_message(formatted.as_ref()), "boom 2");
        let other = panic::catch_unwind(|| panic::panic_any(7)).unwrap_err();
        assert_eq!(panic_message(other.as_ref()), "non-string panic payload");
    }
}
