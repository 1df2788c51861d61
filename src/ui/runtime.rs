//! The event loop: messages in, commands out
//!
//! Commands run as spawned tasks against the client; their results
//! come back over the same channel as generation-tagged messages. The
//! loop itself never blocks on the network.

use std::sync::Arc;

use ratatui::backend::Backend;
use ratatui::Terminal;
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::ui::msg::{Cmd, Msg, SyncKind};
use crate::ui::state::AppState;
use crate::ui::{events, render, update};
use crate::Client;

/// Run the UI until the user quits
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, client: Arc<Client>) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    events::spawn_input_thread(tx.clone());

    // Restore any persisted session once; an expired token is caught
    // by the first load coming back 401.
    let mut state = match client.session().restore_session() {
        Some(session) => AppState::authenticated(session.identity),
        None => AppState::new(),
    };
    if state.is_dashboard() {
        state.in_flight = true;
        dispatch(
            Cmd::Load {
                generation: state.generation,
            },
            &client,
            &tx,
        );
    }

    loop {
        terminal.draw(|f| render::draw(f, &state))?;

        let Some(msg) = rx.recv().await else {
            break;
        };
        let cmds = update::update(&mut state, msg);
        for cmd in cmds {
            dispatch(cmd, &client, &tx);
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}

fn dispatch(cmd: Cmd, client: &Arc<Client>, tx: &UnboundedSender<Msg>) {
    // Logout is local and infallible; everything else is a network
    // round trip on its own task.
    if let Cmd::Logout = cmd {
        client.session().logout();
        return;
    }

    let client = Arc::clone(client);
    let tx = tx.clone();
    tokio::spawn(async move {
        let msg = match cmd {
            Cmd::Login {
                generation,
                username,
                password,
            } => {
                let result = client.session().login(&username, &password).await;
                Msg::LoginDone { generation, result }
            }
            Cmd::Load { generation } => {
                let result = client.inventory().list().await;
                Msg::SyncDone {
                    generation,
                    kind: SyncKind::Load,
                    result,
                }
            }
            Cmd::Create { generation, draft } => {
                let result = client
                    .inventory()
                    .create(&draft)
                    .await
                    .map(|_| client.inventory().collection());
                Msg::SyncDone {
                    generation,
                    kind: SyncKind::Create,
                    result,
                }
            }
            Cmd::Update {
                generation,
                id,
                draft,
            } => {
                let result = client
                    .inventory()
                    .update(id, &draft)
                    .await
                    .map(|_| client.inventory().collection());
                Msg::SyncDone {
                    generation,
                    kind: SyncKind::Update,
                    result,
                }
            }
            Cmd::Delete { generation, id } => {
                let result = client
                    .inventory()
                    .delete(id)
                    .await
                    .map(|_| client.inventory().collection());
                Msg::SyncDone {
                    generation,
                    kind: SyncKind::Delete,
                    result,
                }
            }
            Cmd::Logout => unreachable!("handled synchronously"),
        };
        // The receiver is gone only when the UI already shut down.
        let _ = tx.send(msg);
    });
}
